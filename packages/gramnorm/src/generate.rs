//! Bounded enumeration of the words a grammar derives.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

use crate::{
    error::GrammarError,
    grammars::context_free::ContextFreeGrammar,
    language::{NonTerminal, Symbol},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Derivation tree levels allowed per symbol of output, plus one. Grammars
    /// that need long erasing chains before reaching a terminal may need more.
    pub depth_factor: usize,
}

impl GeneratorConfig {
    pub fn depth_limit(&self, max_length: usize) -> usize {
        self.depth_factor.saturating_mul(max_length.saturating_add(1))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { depth_factor: 5 }
    }
}

/// Length of the shortest terminal string each productive non-terminal
/// derives. Unproductive non-terminals are absent.
pub fn shortest_yields(grammar: &ContextFreeGrammar) -> IndexMap<NonTerminal, usize> {
    let mut shortest = IndexMap::new();

    loop {
        let mut changed = false;

        for (lhs, rhs) in grammar.productions() {
            let best = rhs
                .iter()
                .filter_map(|word| lower_bound(word.symbols(), &shortest))
                .min();

            if let Some(best) = best {
                if shortest.get(lhs).map_or(true, |current| best < *current) {
                    shortest.insert(*lhs, best);
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    shortest
}

/// Fewest terminals `symbols` can still produce, or `None` if one of them
/// derives nothing.
fn lower_bound(symbols: &[Symbol], shortest: &IndexMap<NonTerminal, usize>) -> Option<usize> {
    symbols.iter().try_fold(0, |total, symbol| match symbol {
        Symbol::Terminal(_) => Some(total + 1),
        Symbol::Epsilon => Some(total),
        Symbol::NonTerminal(nt) => shortest.get(nt).map(|length| total + length),
    })
}

/// Depth-first expansion from the start symbol, bounded by output length and
/// by the height of the derivation tree. The words each non-terminal yields
/// with a given height budget are computed once.
#[derive(Debug)]
pub struct WordGenerator<'g> {
    grammar: &'g ContextFreeGrammar,
    config: GeneratorConfig,
    shortest: IndexMap<NonTerminal, usize>,
}

impl<'g> WordGenerator<'g> {
    pub fn new(grammar: &'g ContextFreeGrammar, config: GeneratorConfig) -> Self {
        Self {
            grammar,
            config,
            shortest: shortest_yields(grammar),
        }
    }

    /// Every word of at most `max_length` symbols found within the depth
    /// limit, sorted. Empty when the grammar has no start symbol.
    pub fn generate(&self, max_length: usize) -> BTreeSet<String> {
        let Some(start) = self.grammar.start_symbol() else {
            return BTreeSet::new();
        };

        let mut expansion = Expansion {
            generator: self,
            max_length,
            memo: IndexMap::new(),
        };
        let words = expansion.words_of(*start, self.config.depth_limit(max_length));

        debug!(
            "{} words of length at most {max_length} generated, {} expansions memoized",
            words.len(),
            expansion.memo.len()
        );

        words
    }
}

struct Expansion<'a, 'g> {
    generator: &'a WordGenerator<'g>,
    max_length: usize,
    memo: IndexMap<(NonTerminal, usize), BTreeSet<String>>,
}

impl Expansion<'_, '_> {
    /// Words `nt` derives through a tree at most `depth` levels high.
    fn words_of(&mut self, nt: NonTerminal, depth: usize) -> BTreeSet<String> {
        if depth == 0 {
            return BTreeSet::new();
        }
        if let Some(words) = self.memo.get(&(nt, depth)) {
            return words.clone();
        }

        let grammar = self.generator.grammar;
        let mut words = BTreeSet::new();
        for word in grammar.productions_of(&nt).into_iter().flatten() {
            words.extend(self.concatenate(word.symbols(), depth - 1));
        }

        self.memo.insert((nt, depth), words.clone());
        words
    }

    fn concatenate(&mut self, symbols: &[Symbol], depth: usize) -> BTreeSet<String> {
        let generator = self.generator;
        let fits = lower_bound(symbols, &generator.shortest)
            .is_some_and(|needed| needed <= self.max_length);
        if !fits {
            return BTreeSet::new();
        }

        let mut prefixes = BTreeSet::from([String::new()]);

        for (idx, symbol) in symbols.iter().enumerate() {
            let expansions = match symbol {
                Symbol::Terminal(t) => BTreeSet::from([t.0.to_string()]),
                Symbol::Epsilon => continue,
                Symbol::NonTerminal(nt) => self.words_of(*nt, depth),
            };

            // The rest of the production is productive, checked above.
            let rest = lower_bound(&symbols[idx + 1..], &generator.shortest).unwrap_or(0);

            prefixes = prefixes
                .iter()
                .cartesian_product(&expansions)
                .map(|(prefix, expansion)| format!("{prefix}{expansion}"))
                .filter(|word| word.chars().count() + rest <= self.max_length)
                .collect();

            if prefixes.is_empty() {
                break;
            }
        }

        prefixes
    }
}

impl ContextFreeGrammar {
    /// Sorted words of at most `max_length` symbols, with the default depth
    /// limit.
    pub fn generate_words(&self, max_length: usize) -> Result<Vec<String>, GrammarError> {
        self.generate_words_with(max_length, GeneratorConfig::default())
    }

    pub fn generate_words_with(
        &self,
        max_length: usize,
        config: GeneratorConfig,
    ) -> Result<Vec<String>, GrammarError> {
        self.require_start_symbol()?;

        Ok(WordGenerator::new(self, config)
            .generate(max_length)
            .into_iter()
            .collect())
    }
}
