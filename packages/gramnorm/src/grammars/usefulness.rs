//! Removal of useless non-terminals.

use indexmap::IndexSet;
use log::{debug, warn};

use crate::{
    grammars::context_free::ContextFreeGrammar,
    language::{NonTerminal, Symbol},
};

impl ContextFreeGrammar {
    /// Drops empty rules, then unproductive non-terminals, then unreachable
    /// ones. Idempotent. The start symbol stays registered even when it
    /// derives nothing.
    pub fn clean(&mut self) {
        let before = self.productions.len();

        self.remove_empty_rules();
        self.remove_unproductive();
        self.remove_unreachable();

        if before != self.productions.len() {
            debug!(
                "cleanup removed {} non-terminals, {} left",
                before - self.productions.len(),
                self.productions.len()
            );
        }
    }

    /// Least fixpoint of the non-terminals deriving at least one terminal
    /// string (possibly empty).
    pub fn productive_non_terminals(&self) -> IndexSet<NonTerminal> {
        let mut productive = IndexSet::new();

        loop {
            let mut changed = false;

            for (lhs, rhs) in &self.productions {
                if productive.contains(lhs) {
                    continue;
                }

                let is_productive = rhs.iter().any(|word| {
                    word.symbols().iter().all(|symbol| match symbol {
                        Symbol::NonTerminal(nt) => productive.contains(nt),
                        Symbol::Terminal(_) | Symbol::Epsilon => true,
                    })
                });

                if is_productive {
                    productive.insert(*lhs);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        productive
    }

    pub fn reachable_non_terminals(&self) -> IndexSet<NonTerminal> {
        let mut reachable = IndexSet::new();
        let mut stack = self.start_symbol.into_iter().collect::<Vec<_>>();

        while let Some(nt) = stack.pop() {
            if reachable.insert(nt) {
                for word in self.productions.get(&nt).into_iter().flatten() {
                    stack.extend(word.non_terminals());
                }
            }
        }

        reachable
    }

    fn remove_empty_rules(&mut self) {
        self.productions.retain(|_, rhs| !rhs.is_empty());
        self.sync_non_terminals();
    }

    fn remove_unproductive(&mut self) {
        let productive = self.productive_non_terminals();

        self.productions.retain(|lhs, _| productive.contains(lhs));
        for rhs in self.productions.values_mut() {
            rhs.retain(|word| word.non_terminals().all(|nt| productive.contains(&nt)));
        }

        if let Some(start) = self.start_symbol {
            if !productive.contains(&start) {
                warn!("start symbol {start} derives no terminal string");
            }
        }

        self.sync_non_terminals();
    }

    fn remove_unreachable(&mut self) {
        let reachable = self.reachable_non_terminals();

        self.productions.retain(|lhs, _| reachable.contains(lhs));
        self.sync_non_terminals();
    }

    fn sync_non_terminals(&mut self) {
        self.non_terminals = self
            .start_symbol
            .into_iter()
            .chain(self.productions.keys().copied())
            .collect();
    }
}
