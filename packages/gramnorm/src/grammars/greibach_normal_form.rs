use std::fmt::Display;

use indexmap::{indexset, IndexSet};
use itertools::Itertools;
use log::{debug, trace};
use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};

use crate::{
    error::GrammarError,
    grammars::{
        context_free::{ContextFreeGrammar, Rules, TerminalIsolation},
        types::{NormalFormGrammar, ProductionWord},
    },
    language::{NonTerminal, Production, Symbol, Terminal},
};

/// Upper bound on the extra left-recursion rounds the Greibach pipeline runs
/// after epsilon elimination.
pub const MAX_LEFT_RECURSION_ROUNDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GnfWord(Terminal, Vec<NonTerminal>);

impl GnfWord {
    pub fn new(terminal: Terminal, non_terminals: Vec<NonTerminal>) -> Self {
        GnfWord(terminal, non_terminals)
    }

    pub fn terminal(&self) -> Terminal {
        self.0
    }

    pub fn non_terminals(&self) -> &[NonTerminal] {
        &self.1
    }
}

impl Display for GnfWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0, self.1.iter().join(""))
    }
}

impl TryFrom<Production> for GnfWord {
    type Error = String;

    fn try_from(value: Production) -> Result<Self, Self::Error> {
        let (head, tail) = value
            .symbols()
            .split_first()
            .ok_or_else(|| "GNF word cannot be empty".to_string())?;

        let terminal = match head {
            Symbol::Terminal(t) => *t,
            _ => return Err("First symbol must be a terminal".to_string()),
        };

        let non_terminals = tail
            .iter()
            .map(|symbol| {
                symbol
                    .as_non_terminal()
                    .ok_or_else(|| "Only non-terminals may follow the first symbol".to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GnfWord(terminal, non_terminals))
    }
}

impl ProductionWord for GnfWord {
    const FORM: &'static str = "Greibach normal form";

    fn to_production(&self) -> Production {
        Production::new(
            std::iter::once(Symbol::Terminal(self.0))
                .chain(self.1.iter().copied().map(Symbol::NonTerminal)),
        )
    }
}

pub type GreibachNormalFormGrammar = NormalFormGrammar<GnfWord>;

impl GreibachNormalFormGrammar {
    pub fn from_context_free_grammar(cfg: &ContextFreeGrammar) -> Result<Self, GrammarError> {
        Self::try_from(&cfg.to_greibach_normal_form()?)
    }
}

impl ContextFreeGrammar {
    /// Introduces a new start symbol, removes erasing and unit productions,
    /// eliminates left recursion, expands leading non-terminals until every
    /// production starts with a terminal, then isolates the remaining
    /// terminals behind the head.
    pub fn to_greibach_normal_form(&self) -> Result<ContextFreeGrammar, GrammarError> {
        let mut gnf = self.clone();
        gnf.require_start_symbol()?;

        gnf.introduce_start_symbol()?;
        gnf.eliminate_erasing_productions();
        gnf.eliminate_unit_productions();

        // Left recursion is removed on an epsilon-free grammar; each round
        // restores that before checking again.
        let mut rounds = 0;
        while gnf.is_left_recursive() {
            if rounds == MAX_LEFT_RECURSION_ROUNDS {
                return Err(GrammarError::UnresolvedLeftRecursion(rounds));
            }
            rounds += 1;

            debug!("eliminating left recursion, round {rounds}");
            gnf.eliminate_left_recursion()?;
            gnf.eliminate_erasing_productions();
            gnf.eliminate_unit_productions();
        }

        gnf.expand_heads();
        gnf.replace_terminals(TerminalIsolation::KeepHead)?;
        gnf.resolve_epsilon_heads();
        gnf.eliminate_erasing_productions();
        gnf.eliminate_unit_productions();

        debug!(
            "Greibach normal form reached with {} non-terminals and {} productions",
            gnf.productions.len(),
            gnf.production_count()
        );

        Ok(gnf)
    }

    /// Whether some non-terminal can derive a sentential form starting with
    /// itself through leading symbols only.
    pub fn is_left_recursive(&self) -> bool {
        let mut left_corners = DiGraphMap::<NonTerminal, ()>::new();

        for (lhs, rhs) in &self.productions {
            left_corners.add_node(*lhs);
            for word in rhs {
                if let Some(head) = leading_non_terminal(word) {
                    left_corners.add_edge(*lhs, head, ());
                }
            }
        }

        is_cyclic_directed(&left_corners)
    }

    /// Removes direct and indirect left recursion. The non-terminals present
    /// on entry are visited with the start symbol first and the others in name
    /// order; each one has its productions led by an earlier non-terminal
    /// substituted, then its direct left recursion `A → Aα | β` rewritten into
    /// `A → βA'` and `A' → αA' | E`. The `A'` non-terminals minted on the way
    /// are never visited. Passes repeat until the rules stop changing.
    ///
    /// Nullable leading symbols can still hide left recursion afterwards;
    /// [`ContextFreeGrammar::to_greibach_normal_form`] removes erasing
    /// productions first.
    pub fn eliminate_left_recursion(&mut self) -> Result<(), GrammarError> {
        let start = self.require_start_symbol()?;
        self.clean();

        let order = std::iter::once(start)
            .chain(
                self.productions
                    .keys()
                    .filter(|nt| **nt != start)
                    .copied()
                    .sorted(),
            )
            .collect::<Vec<_>>();

        let mut rules = self.productions.clone();
        let mut reserved = self.non_terminals.clone();
        let mut passes = 0;

        loop {
            let previous = rules.clone();
            passes += 1;

            for (i, a_i) in order.iter().enumerate() {
                for a_j in &order[..i] {
                    substitute_leading(&mut rules, a_i, a_j);
                }

                self.eliminate_direct_left_recursion(&mut rules, &mut reserved, a_i)?;
            }

            if previous == rules {
                break;
            }
        }

        debug!(
            "left recursion eliminated after {passes} passes, {} non-terminals added",
            rules.len() - self.productions.len()
        );

        self.productions = rules;
        self.non_terminals = reserved;
        self.clean();

        Ok(())
    }

    fn eliminate_direct_left_recursion(
        &self,
        rules: &mut Rules,
        reserved: &mut IndexSet<NonTerminal>,
        a_i: &NonTerminal,
    ) -> Result<(), GrammarError> {
        let Some(rhs) = rules.get(a_i) else {
            return Ok(());
        };

        let mut alphas = Vec::new();
        let mut betas = Vec::new();

        for word in rhs {
            if word.first() == Some(&Symbol::NonTerminal(*a_i)) {
                let alpha = Production::joined(&word.symbols()[1..], &[]);
                // `A → A` derives nothing new.
                if !alpha.is_epsilon() {
                    alphas.push(alpha);
                }
            } else {
                betas.push(word.clone());
            }
        }

        if alphas.is_empty() {
            if betas.len() != rhs.len() {
                rules.insert(*a_i, betas.into_iter().collect());
            }
            return Ok(());
        }

        let a_i_prime = self.reserve_name(reserved)?;
        let tail = [Symbol::NonTerminal(a_i_prime)];

        let next_rhs = if betas.is_empty() {
            indexset! {Production::new(tail)}
        } else {
            betas
                .iter()
                .map(|beta| Production::joined(beta.symbols(), &tail))
                .collect()
        };

        let mut prime_rhs = alphas
            .iter()
            .map(|alpha| Production::joined(alpha.symbols(), &tail))
            .collect::<IndexSet<_>>();
        prime_rhs.insert(Production::epsilon());

        debug!("direct left recursion on {a_i} moved to {a_i_prime}");

        rules.insert(*a_i, next_rhs);
        rules.insert(a_i_prime, prime_rhs);

        Ok(())
    }

    /// Replaces every production led by a non-terminal `Y` with one copy per
    /// production of `Y`, until every production is led by a terminal. Left
    /// recursion must have been removed beforehand.
    pub fn expand_heads(&mut self) {
        let mut rounds = 0;

        loop {
            let mut changed = false;
            let mut next_productions = Rules::with_capacity(self.productions.len());

            for (lhs, rhs) in &self.productions {
                let mut next_rhs = IndexSet::with_capacity(rhs.len());

                for word in rhs {
                    let head_rhs = word
                        .first()
                        .and_then(Symbol::as_non_terminal)
                        .and_then(|head| self.productions.get(&head));

                    match head_rhs {
                        Some(head_rhs) => {
                            let rest = &word.symbols()[1..];
                            next_rhs.extend(
                                head_rhs
                                    .iter()
                                    .map(|head_word| Production::joined(head_word.symbols(), rest)),
                            );
                            changed = true;
                        }
                        None => {
                            next_rhs.insert(word.clone());
                        }
                    }
                }

                next_productions.insert(*lhs, next_rhs);
            }

            self.productions = next_productions;
            rounds += 1;

            if !changed {
                break;
            }
        }

        debug!("leading non-terminals expanded in {rounds} rounds");

        self.clean();
    }

    /// Resolves productions of the shape `E Y γ` by splicing in every
    /// production of `Y`. An erasing result is kept and left for the next
    /// epsilon elimination to redistribute.
    pub fn resolve_epsilon_heads(&mut self) {
        let mut next_productions = Rules::with_capacity(self.productions.len());
        let mut resolved = 0;

        for (lhs, rhs) in &self.productions {
            let mut next_rhs = IndexSet::with_capacity(rhs.len());

            for word in rhs {
                match word.symbols() {
                    [Symbol::Epsilon, Symbol::NonTerminal(follower), rest @ ..] => {
                        resolved += 1;
                        next_rhs.extend(
                            self.productions
                                .get(follower)
                                .into_iter()
                                .flatten()
                                .map(|follower_word| {
                                    Production::joined(follower_word.symbols(), rest)
                                }),
                        );
                    }
                    _ => {
                        next_rhs.insert(word.clone());
                    }
                }
            }

            next_productions.insert(*lhs, next_rhs);
        }

        if resolved > 0 {
            debug!("{resolved} epsilon-led productions resolved");
        }

        self.productions = next_productions;
        self.clean();
    }
}

/// The non-terminal a production starts with, past any epsilon markers.
fn leading_non_terminal(word: &Production) -> Option<NonTerminal> {
    word.symbols()
        .iter()
        .find(|symbol| **symbol != Symbol::Epsilon)
        .and_then(Symbol::as_non_terminal)
}

/// Rewrites `A_i → A_j γ` into `A_i → δ γ` for every production `A_j → δ`.
fn substitute_leading(rules: &mut Rules, a_i: &NonTerminal, a_j: &NonTerminal) {
    let (Some(rhs_i), Some(rhs_j)) = (rules.get(a_i), rules.get(a_j)) else {
        return;
    };

    let leads = |word: &Production| word.first() == Some(&Symbol::NonTerminal(*a_j));
    if !rhs_i.iter().any(leads) {
        return;
    }

    let mut next_rhs = IndexSet::with_capacity(rhs_i.len());
    for word in rhs_i {
        if leads(word) {
            let gamma = &word.symbols()[1..];
            next_rhs.extend(rhs_j.iter().map(|delta| Production::joined(delta.symbols(), gamma)));
        } else {
            next_rhs.insert(word.clone());
        }
    }

    trace!("substituted {a_j} at the head of {a_i}");

    rules.insert(*a_i, next_rhs);
}
