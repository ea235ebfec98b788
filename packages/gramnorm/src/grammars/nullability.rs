//! Which non-terminals derive the empty string.
//!
//! A non-terminal is nullable when one of its productions consists only of
//! epsilon markers and nullable non-terminals. The check recurses through the
//! productions while keeping the non-terminals under evaluation on a stack; a
//! non-terminal met again while still on the stack counts as not nullable for
//! that branch, which keeps mutually recursive rules from looping.
//!
//! Cutting cycles loses nothing: a shortest derivation of the empty string
//! never revisits a non-terminal along one path, so the search still finds it.
//! A `false` reached through a cut does depend on the stack, though, so only
//! answers that did not pass through a cut are memoized.

use indexmap::{IndexMap, IndexSet};

use crate::{
    grammars::context_free::ContextFreeGrammar,
    language::{NonTerminal, Symbol},
};

/// One nullability analysis run over a grammar. The memo lives as long as the
/// analysis, so a grammar changed afterwards needs a new one.
#[derive(Debug)]
pub struct Nullability<'g> {
    grammar: &'g ContextFreeGrammar,
    known: IndexMap<NonTerminal, bool>,
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    nullable: bool,
    cut: bool,
}

impl<'g> Nullability<'g> {
    pub fn new(grammar: &'g ContextFreeGrammar) -> Self {
        Self {
            grammar,
            known: IndexMap::new(),
        }
    }

    pub fn is_nullable(&mut self, nt: &NonTerminal) -> bool {
        let mut in_progress = IndexSet::new();
        self.evaluate(nt, &mut in_progress).nullable
    }

    /// Every non-terminal with rules that derives the empty string.
    pub fn nullable_set(&mut self) -> IndexSet<NonTerminal> {
        let grammar = self.grammar;
        grammar
            .productions()
            .keys()
            .filter(|nt| self.is_nullable(nt))
            .copied()
            .collect()
    }

    fn evaluate(&mut self, nt: &NonTerminal, in_progress: &mut IndexSet<NonTerminal>) -> Outcome {
        if let Some(&nullable) = self.known.get(nt) {
            return Outcome {
                nullable,
                cut: false,
            };
        }
        if in_progress.contains(nt) {
            return Outcome {
                nullable: false,
                cut: true,
            };
        }

        in_progress.insert(*nt);

        let grammar = self.grammar;
        let mut nullable = false;
        let mut cut = false;

        'productions: for word in grammar.productions_of(nt).into_iter().flatten() {
            for symbol in word.symbols() {
                match symbol {
                    Symbol::Epsilon => {}
                    Symbol::Terminal(_) => continue 'productions,
                    Symbol::NonTerminal(child) => {
                        let outcome = self.evaluate(child, in_progress);
                        cut |= outcome.cut;
                        if !outcome.nullable {
                            continue 'productions;
                        }
                    }
                }
            }

            nullable = true;
            break;
        }

        in_progress.pop();

        if nullable || !cut {
            self.known.insert(*nt, nullable);
        }

        Outcome {
            nullable,
            cut: cut && !nullable,
        }
    }
}
