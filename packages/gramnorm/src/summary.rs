use std::fmt::Display;

use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    generate::shortest_yields,
    grammars::{context_free::ContextFreeGrammar, nullability::Nullability},
    language::NonTerminal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminalSummary {
    pub non_terminal: NonTerminal,
    pub productions: usize,
    pub nullable: bool,
    /// Length of the shortest word it derives, if it derives any.
    pub shortest: Option<usize>,
}

/// Per non-terminal facts about a grammar, start symbol first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSummary {
    pub start_symbol: Option<NonTerminal>,
    pub rows: Vec<NonTerminalSummary>,
    pub left_recursive: bool,
}

impl GrammarSummary {
    pub fn new(grammar: &ContextFreeGrammar) -> Self {
        let start_symbol = grammar.start_symbol().copied();
        let shortest = shortest_yields(grammar);
        let mut nullability = Nullability::new(grammar);

        let rows = start_symbol
            .iter()
            .filter(|start| grammar.productions().contains_key(*start))
            .chain(
                grammar
                    .productions()
                    .keys()
                    .filter(|nt| Some(**nt) != start_symbol)
                    .sorted(),
            )
            .map(|nt| NonTerminalSummary {
                non_terminal: *nt,
                productions: grammar.productions_of(nt).map_or(0, |rhs| rhs.len()),
                nullable: nullability.is_nullable(nt),
                shortest: shortest.get(nt).copied(),
            })
            .collect();

        Self {
            start_symbol,
            rows,
            left_recursive: grammar.is_left_recursive(),
        }
    }
}

impl Display for GrammarSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(start_symbol) = self.start_symbol else {
            return writeln!(f, "The grammar has no rules.");
        };

        let mut builder = Builder::default();
        builder.push_record(["Non-terminal", "Productions", "Nullable", "Shortest word"]);

        for row in &self.rows {
            builder.push_record([
                if row.non_terminal == start_symbol {
                    format!("{} (start)", row.non_terminal)
                } else {
                    row.non_terminal.to_string()
                },
                row.productions.to_string(),
                if row.nullable { "yes" } else { "no" }.to_string(),
                row.shortest.map_or("-".to_string(), |length| length.to_string()),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        writeln!(f, "{}", table)?;
        writeln!(
            f,
            "The grammar is {}left recursive.",
            if self.left_recursive { "" } else { "not " }
        )
    }
}
