use std::str::FromStr;

use derive_more::Display;

use crate::error::GrammarError;

/// Marker written for the empty string, both in grammar sources and in output.
pub const EPSILON: char = 'E';

/// Letters a non-terminal name may start with, in allocation order.
pub const LETTERS: &str = "ABCDFGHIJKLMNOPQRSTUVWXYZ";

/// Digits a non-terminal name may end with, in allocation order.
pub const DIGITS: &str = "0123456789";

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub char);

/// A two-character non-terminal name: an uppercase letter other than [`EPSILON`]
/// followed by a digit.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}{_1}")]
pub struct NonTerminal(char, char);

impl NonTerminal {
    pub fn new(letter: char, digit: char) -> Result<Self, GrammarError> {
        if LETTERS.contains(letter) && digit.is_ascii_digit() {
            Ok(NonTerminal(letter, digit))
        } else {
            Err(GrammarError::InvalidName(format!("{letter}{digit}")))
        }
    }

    pub fn letter(&self) -> char {
        self.0
    }
}

impl FromStr for NonTerminal {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), Some(digit), None) => NonTerminal::new(letter, digit),
            _ => Err(GrammarError::InvalidName(s.to_owned())),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
    #[display("E")]
    Epsilon,
}

impl Symbol {
    pub fn as_non_terminal(&self) -> Option<NonTerminal> {
        match self {
            Symbol::NonTerminal(nt) => Some(*nt),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Symbol::Terminal(t)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(nt: NonTerminal) -> Self {
        Symbol::NonTerminal(nt)
    }
}

/// One alternative right-hand side of a rule. Never empty: the empty string is
/// spelled as a single [`Symbol::Epsilon`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production(Vec<Symbol>);

impl Production {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let symbols = symbols.into_iter().collect::<Vec<_>>();
        if symbols.is_empty() {
            Self::epsilon()
        } else {
            Production(symbols)
        }
    }

    pub fn epsilon() -> Self {
        Production(vec![Symbol::Epsilon])
    }

    /// Concatenates `head` and `tail`, dropping epsilon markers unless nothing
    /// else is left.
    pub fn joined(head: &[Symbol], tail: &[Symbol]) -> Self {
        Self::new(
            head.iter()
                .chain(tail)
                .filter(|symbol| **symbol != Symbol::Epsilon)
                .copied(),
        )
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.0.first()
    }

    pub fn is_epsilon(&self) -> bool {
        self.0 == [Symbol::Epsilon]
    }

    /// The non-terminal of a unit production `X → Y`.
    pub fn as_unit(&self) -> Option<NonTerminal> {
        match self.0.as_slice() {
            [Symbol::NonTerminal(nt)] => Some(*nt),
            _ => None,
        }
    }

    pub fn as_single_terminal(&self) -> Option<Terminal> {
        match self.0.as_slice() {
            [Symbol::Terminal(t)] => Some(*t),
            _ => None,
        }
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = NonTerminal> + '_ {
        self.0.iter().filter_map(Symbol::as_non_terminal)
    }
}

impl FromIterator<Symbol> for Production {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
