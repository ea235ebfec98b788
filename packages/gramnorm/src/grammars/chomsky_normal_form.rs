use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::{
    error::GrammarError,
    grammars::{
        context_free::{ContextFreeGrammar, Rules, TerminalIsolation},
        types::{NormalFormGrammar, ProductionWord},
    },
    language::{NonTerminal, Production, Symbol, Terminal},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CnfWord {
    Terminal(Terminal),
    NonTerminals(NonTerminal, NonTerminal),
}

impl Display for CnfWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CnfWord::Terminal(t) => write!(f, "{t}"),
            CnfWord::NonTerminals(nt1, nt2) => write!(f, "{nt1}{nt2}"),
        }
    }
}

impl TryFrom<Production> for CnfWord {
    type Error = String;

    fn try_from(value: Production) -> Result<Self, Self::Error> {
        match value.symbols() {
            [Symbol::Terminal(t)] => Ok(CnfWord::Terminal(*t)),
            [Symbol::NonTerminal(nt1), Symbol::NonTerminal(nt2)] => {
                Ok(CnfWord::NonTerminals(*nt1, *nt2))
            }
            [_] => Err("Expected a terminal".to_string()),
            [_, _] => Err("Expected two non-terminals".to_string()),
            _ => Err(
                "CnfWord can only be created from a word with one terminal or two non-terminals"
                    .to_string(),
            ),
        }
    }
}

impl ProductionWord for CnfWord {
    const FORM: &'static str = "Chomsky normal form";

    fn to_production(&self) -> Production {
        match self {
            CnfWord::Terminal(t) => Production::new([Symbol::Terminal(*t)]),
            CnfWord::NonTerminals(nt1, nt2) => {
                Production::new([Symbol::NonTerminal(*nt1), Symbol::NonTerminal(*nt2)])
            }
        }
    }
}

pub type ChomskyNormalFormGrammar = NormalFormGrammar<CnfWord>;

impl ChomskyNormalFormGrammar {
    pub fn from_context_free_grammar(cfg: &ContextFreeGrammar) -> Result<Self, GrammarError> {
        Self::try_from(&cfg.to_chomsky_normal_form()?)
    }
}

impl ContextFreeGrammar {
    /// START, TERM, BIN, DEL, UNIT, with a cleanup after each structural pass.
    pub fn to_chomsky_normal_form(&self) -> Result<ContextFreeGrammar, GrammarError> {
        let mut cnf = self.clone();

        cnf.introduce_start_symbol()?;
        cnf.replace_terminals(TerminalIsolation::All)?;
        cnf.binarize()?;
        cnf.eliminate_erasing_productions();
        cnf.eliminate_unit_productions();

        debug!(
            "Chomsky normal form reached with {} non-terminals and {} productions",
            cnf.productions.len(),
            cnf.production_count()
        );

        Ok(cnf)
    }

    /// Splits every production longer than two symbols into a head symbol and
    /// a fresh non-terminal for the rest. Identical suffixes share one
    /// non-terminal.
    pub fn binarize(&mut self) -> Result<(), GrammarError> {
        let mut reserved = self.non_terminals.clone();
        let mut next_productions = Rules::with_capacity(self.productions.len());
        let mut suffixes = IndexMap::<Vec<Symbol>, NonTerminal>::new();
        let mut minted = Rules::new();

        for (lhs, rhs) in &self.productions {
            let mut next_rhs = IndexSet::with_capacity(rhs.len());
            for word in rhs {
                next_rhs.insert(self.binarized(
                    word.symbols(),
                    &mut suffixes,
                    &mut minted,
                    &mut reserved,
                )?);
            }
            next_productions.insert(*lhs, next_rhs);
        }

        debug!("binarized, {} suffix non-terminals minted", suffixes.len());

        next_productions.extend(minted);
        self.productions = next_productions;
        self.non_terminals = reserved;
        self.clean();

        Ok(())
    }

    fn binarized(
        &self,
        symbols: &[Symbol],
        suffixes: &mut IndexMap<Vec<Symbol>, NonTerminal>,
        minted: &mut Rules,
        reserved: &mut IndexSet<NonTerminal>,
    ) -> Result<Production, GrammarError> {
        if symbols.len() <= 2 {
            return Ok(Production::new(symbols.iter().copied()));
        }

        let suffix = &symbols[1..];
        let nt = match suffixes.get(suffix) {
            Some(nt) => *nt,
            None => {
                let nt = self.reserve_name(reserved)?;
                suffixes.insert(suffix.to_vec(), nt);

                let rest = self.binarized(suffix, suffixes, minted, reserved)?;
                minted.entry(nt).or_default().insert(rest);

                nt
            }
        };

        Ok(Production::new([symbols[0], Symbol::NonTerminal(nt)]))
    }
}
