use std::{fmt::Display, hash::Hash};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{
    error::GrammarError,
    grammars::context_free::ContextFreeGrammar,
    language::{NonTerminal, Production, EPSILON},
};

/// A right-hand side shape that only admits the productions of one normal form.
pub trait ProductionWord: Display + Clone + Eq + Hash + TryFrom<Production, Error = String> {
    /// Name of the normal form, for error messages.
    const FORM: &'static str;

    fn to_production(&self) -> Production;
}

/// A grammar whose productions all have the shape `W`. The empty string can
/// only be derived by the start symbol, which is then marked erasable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalFormGrammar<W: ProductionWord> {
    pub(super) start_symbol: NonTerminal,
    pub(super) is_start_symbol_erasable: bool,
    pub(super) productions: IndexMap<NonTerminal, IndexSet<W>>,
}

impl<W: ProductionWord> NormalFormGrammar<W> {
    pub fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    pub fn is_start_symbol_erasable(&self) -> bool {
        self.is_start_symbol_erasable
    }

    pub fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<W>> {
        &self.productions
    }

    pub fn to_context_free_grammar(&self) -> ContextFreeGrammar {
        let mut cfg = ContextFreeGrammar::with_start_symbol(self.start_symbol);

        if self.is_start_symbol_erasable {
            cfg.add_production(self.start_symbol, Production::epsilon());
        }

        for (lhs, rhs) in &self.productions {
            cfg.add_rule(*lhs, rhs.iter().map(ProductionWord::to_production));
        }

        cfg
    }
}

impl<W: ProductionWord> TryFrom<&ContextFreeGrammar> for NormalFormGrammar<W> {
    type Error = GrammarError;

    fn try_from(cfg: &ContextFreeGrammar) -> Result<Self, Self::Error> {
        let start_symbol = cfg.require_start_symbol()?;

        let mut grammar = Self {
            start_symbol,
            is_start_symbol_erasable: false,
            productions: IndexMap::new(),
        };

        for (lhs, rhs) in cfg.productions() {
            let entry = grammar.productions.entry(*lhs).or_default();

            for word in rhs {
                if word.is_epsilon() {
                    if *lhs != start_symbol {
                        return Err(not_in_normal_form::<W>(
                            lhs,
                            word,
                            "only the start symbol may be erasable",
                        ));
                    }
                    grammar.is_start_symbol_erasable = true;
                    continue;
                }

                let shaped = W::try_from(word.clone())
                    .map_err(|reason| not_in_normal_form::<W>(lhs, word, &reason))?;
                entry.insert(shaped);
            }
        }

        grammar.productions.retain(|_, rhs| !rhs.is_empty());

        Ok(grammar)
    }
}

fn not_in_normal_form<W: ProductionWord>(
    lhs: &NonTerminal,
    word: &Production,
    reason: &str,
) -> GrammarError {
    GrammarError::NotInNormalForm {
        form: W::FORM,
        lhs: lhs.to_string(),
        production: word.to_string(),
        reason: reason.to_owned(),
    }
}

impl<W: ProductionWord> Display for NormalFormGrammar<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = &self.start_symbol;

        let mut start_rhs = Vec::new();
        if self.is_start_symbol_erasable {
            start_rhs.push(EPSILON.to_string());
        }
        if let Some(rhs) = self.productions.get(start) {
            start_rhs.extend(rhs.iter().map(ToString::to_string));
        }
        if !start_rhs.is_empty() {
            writeln!(f, "{} : {}", start, start_rhs.join(" | "))?;
        }

        for lhs in self.productions.keys().filter(|lhs| *lhs != start).sorted() {
            writeln!(f, "{} : {}", lhs, self.productions[lhs].iter().join(" | "))?;
        }

        Ok(())
    }
}
