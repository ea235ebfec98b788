use indexmap::IndexSet;
use itertools::Itertools;

use crate::{
    error::GrammarError,
    language::{NonTerminal, DIGITS, LETTERS},
};

/// Mints non-terminal names that are not yet in use.
///
/// Candidates are enumerated letter by letter, digit by digit (`A0`, `A1`, ...,
/// `A9`, `B0`, ...), skipping the epsilon marker. The first candidate missing
/// from the used set wins, so the same used set always yields the same name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NameAllocator;

impl NameAllocator {
    pub fn candidates() -> impl Iterator<Item = NonTerminal> {
        LETTERS
            .chars()
            .cartesian_product(DIGITS.chars())
            .filter_map(|(letter, digit)| NonTerminal::new(letter, digit).ok())
    }

    pub fn allocate(&self, used: &IndexSet<NonTerminal>) -> Result<NonTerminal, GrammarError> {
        Self::candidates()
            .find(|candidate| !used.contains(candidate))
            .ok_or(GrammarError::ExhaustedNameSpace)
    }
}
