use std::fmt::Display;

use indexmap::{indexset, IndexMap, IndexSet};
use itertools::Itertools;
use log::debug;

use crate::{
    error::{GrammarError, ReadError},
    grammars::nullability::Nullability,
    language::{NonTerminal, Production, Symbol, Terminal},
    names::NameAllocator,
    reader,
};

pub type Rules = IndexMap<NonTerminal, IndexSet<Production>>;

/// Which terminals the terminal-isolation pass moves into dedicated
/// non-terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalIsolation {
    /// Every terminal of every production longer than one symbol.
    All,
    /// Every terminal except the leading one.
    KeepHead,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextFreeGrammar {
    pub(super) start_symbol: Option<NonTerminal>,
    pub(super) non_terminals: IndexSet<NonTerminal>,
    pub(super) productions: Rules,
    pub(super) names: NameAllocator,
}

impl ContextFreeGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_symbol(start_symbol: NonTerminal) -> Self {
        let mut grammar = Self::new();
        grammar.set_start_symbol(start_symbol);
        grammar
    }

    /// Builds a grammar from rule lines such as `"S0 : aS0b | E"`. The first
    /// line's left-hand side becomes the start symbol. Unlike
    /// [`reader::read_grammar`], the first bad line is returned as an error and
    /// no cleanup runs.
    pub fn from_productions(lines: &[impl AsRef<str>]) -> Result<Self, ReadError> {
        let mut grammar = Self::new();

        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let (lhs, productions) = reader::read_rule(line)
                .map_err(|kind| ReadError::new(idx + 1, kind, line.trim()))?;
            grammar.add_rule(lhs, productions);
        }

        Ok(grammar)
    }

    pub fn start_symbol(&self) -> Option<&NonTerminal> {
        self.start_symbol.as_ref()
    }

    pub fn require_start_symbol(&self) -> Result<NonTerminal, GrammarError> {
        self.start_symbol.ok_or(GrammarError::NoStartSymbol)
    }

    pub fn set_start_symbol(&mut self, start_symbol: NonTerminal) {
        self.start_symbol = Some(start_symbol);
        self.non_terminals.insert(start_symbol);
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn productions(&self) -> &Rules {
        &self.productions
    }

    pub fn productions_of(&self, nt: &NonTerminal) -> Option<&IndexSet<Production>> {
        self.productions.get(nt)
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(IndexSet::len).sum()
    }

    /// Adds the alternatives of one rule. The first left-hand side ever added
    /// becomes the start symbol, and every non-terminal mentioned is registered.
    pub fn add_rule(&mut self, lhs: NonTerminal, productions: impl IntoIterator<Item = Production>) {
        if self.start_symbol.is_none() {
            self.set_start_symbol(lhs);
        }
        self.non_terminals.insert(lhs);

        let entry = self.productions.entry(lhs).or_default();
        for production in productions {
            self.non_terminals.extend(production.non_terminals());
            entry.insert(production);
        }
    }

    pub fn add_production(&mut self, lhs: NonTerminal, production: Production) {
        self.add_rule(lhs, [production]);
    }

    /// Mints a name no live non-terminal uses and registers it.
    pub fn fresh_non_terminal(&mut self) -> Result<NonTerminal, GrammarError> {
        let nt = self.names.allocate(&self.non_terminals)?;
        self.non_terminals.insert(nt);
        Ok(nt)
    }

    /// Picks a name outside `reserved` and adds it there. Passes start from a
    /// copy of the registry and only commit it once every name is minted.
    pub(super) fn reserve_name(
        &self,
        reserved: &mut IndexSet<NonTerminal>,
    ) -> Result<NonTerminal, GrammarError> {
        let nt = self.names.allocate(reserved)?;
        reserved.insert(nt);
        Ok(nt)
    }

    /// Makes a fresh non-terminal the start symbol, with the old start symbol
    /// as its only production.
    pub fn introduce_start_symbol(&mut self) -> Result<NonTerminal, GrammarError> {
        let previous = self.require_start_symbol()?;
        let start_symbol = self.fresh_non_terminal()?;

        self.productions
            .insert(start_symbol, indexset! {Production::new([Symbol::NonTerminal(previous)])});
        self.start_symbol = Some(start_symbol);

        debug!("introduced start symbol {start_symbol} → {previous}");

        Ok(start_symbol)
    }

    /// Removes every erasing production. Each production is replaced by all
    /// the variants obtained by keeping or dropping each nullable non-terminal;
    /// the empty variant survives as `E` only under a nullable start symbol.
    pub fn eliminate_erasing_productions(&mut self) {
        let nullable = Nullability::new(self).nullable_set();
        let start_is_nullable = self
            .start_symbol
            .is_some_and(|start| nullable.contains(&start));

        let mut next_productions = Rules::with_capacity(self.productions.len());

        for (lhs, rhs) in &self.productions {
            let keeps_epsilon = start_is_nullable && Some(*lhs) == self.start_symbol;
            let mut next_rhs = IndexSet::new();

            for word in rhs {
                let variants = word
                    .symbols()
                    .iter()
                    .map(|symbol| match symbol {
                        Symbol::Epsilon => vec![None],
                        Symbol::NonTerminal(nt) if nullable.contains(nt) => {
                            vec![Some(*symbol), None]
                        }
                        _ => vec![Some(*symbol)],
                    })
                    .multi_cartesian_product()
                    .map(|variant| variant.into_iter().flatten().collect::<Vec<_>>());

                for variant in variants {
                    if !variant.is_empty() {
                        next_rhs.insert(Production::new(variant));
                    } else if keeps_epsilon {
                        next_rhs.insert(Production::epsilon());
                    }
                }
            }

            next_productions.insert(*lhs, next_rhs);
        }

        debug!(
            "erasing productions eliminated, {} nullable non-terminals",
            nullable.len()
        );

        self.productions = next_productions;
        self.clean();
    }

    /// Replaces unit productions `X → Y` by the non-unit productions found at
    /// the end of every unit chain starting at `X`.
    pub fn eliminate_unit_productions(&mut self) {
        let mut next_productions = Rules::with_capacity(self.productions.len());

        for (lhs, rhs) in &self.productions {
            let mut next_rhs = rhs
                .iter()
                .filter(|word| word.as_unit().is_none())
                .cloned()
                .collect::<IndexSet<_>>();

            let mut visited = rhs.iter().filter_map(Production::as_unit).collect::<IndexSet<_>>();
            let mut stack = visited.iter().copied().collect::<Vec<_>>();

            while let Some(current) = stack.pop() {
                for word in self.productions.get(&current).into_iter().flatten() {
                    match word.as_unit() {
                        Some(target) => {
                            if visited.insert(target) {
                                stack.push(target);
                            }
                        }
                        None => {
                            next_rhs.insert(word.clone());
                        }
                    }
                }
            }

            next_productions.insert(*lhs, next_rhs);
        }

        debug!("unit productions eliminated");

        self.productions = next_productions;
        self.clean();
    }

    /// Moves terminals out of productions longer than one symbol, giving each
    /// terminal a dedicated non-terminal `T → a`. Existing non-terminals whose
    /// only production is that terminal are reused.
    pub fn replace_terminals(&mut self, isolation: TerminalIsolation) -> Result<(), GrammarError> {
        let mut dedicated = IndexMap::<Terminal, NonTerminal>::new();

        for (lhs, rhs) in &self.productions {
            if Some(*lhs) == self.start_symbol || rhs.len() != 1 {
                continue;
            }
            if let Some(t) = rhs.first().and_then(Production::as_single_terminal) {
                dedicated.entry(t).or_insert(*lhs);
            }
        }

        let skip = match isolation {
            TerminalIsolation::All => 0,
            TerminalIsolation::KeepHead => 1,
        };

        let mut reserved = self.non_terminals.clone();
        let mut next_productions = Rules::with_capacity(self.productions.len());
        let mut minted = Rules::new();

        for (lhs, rhs) in &self.productions {
            let mut next_rhs = IndexSet::with_capacity(rhs.len());

            for word in rhs {
                if word.len() == 1 {
                    next_rhs.insert(word.clone());
                    continue;
                }

                let mut symbols = word.symbols().to_vec();
                for symbol in symbols.iter_mut().skip(skip) {
                    if let Symbol::Terminal(t) = *symbol {
                        let nt = match dedicated.get(&t) {
                            Some(nt) => *nt,
                            None => {
                                let nt = self.reserve_name(&mut reserved)?;
                                minted.insert(nt, indexset! {Production::new([*symbol])});
                                dedicated.insert(t, nt);
                                nt
                            }
                        };
                        *symbol = Symbol::NonTerminal(nt);
                    }
                }

                next_rhs.insert(Production::new(symbols));
            }

            next_productions.insert(*lhs, next_rhs);
        }

        debug!(
            "terminals isolated ({isolation:?}), {} dedicated non-terminals minted",
            minted.len()
        );

        next_productions.extend(minted);
        self.productions = next_productions;
        self.non_terminals = reserved;
        self.clean();

        Ok(())
    }
}

impl Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start_symbol = self.start_symbol.as_ref();

        let lhss = start_symbol
            .into_iter()
            .chain(
                self.productions
                    .keys()
                    .filter(|lhs| Some(*lhs) != start_symbol)
                    .sorted(),
            )
            .filter_map(|lhs| self.productions.get(lhs).map(|rhs| (lhs, rhs)))
            .filter(|(_, rhs)| !rhs.is_empty());

        for (lhs, rhs) in lhss {
            writeln!(f, "{} : {}", lhs, rhs.iter().join(" | "))?;
        }

        Ok(())
    }
}
