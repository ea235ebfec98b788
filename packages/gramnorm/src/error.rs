use thiserror::Error;

/// Errors raised by the grammar store and its transformations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Every letter and digit combination is already taken by a live non-terminal.
    #[error("no fresh non-terminal name is left, the grammar is too large to normalize")]
    ExhaustedNameSpace,

    /// The grammar has no rules, so it has no start symbol either.
    #[error("the grammar has no start symbol")]
    NoStartSymbol,

    #[error("'{0}' is not a valid non-terminal name")]
    InvalidName(String),

    #[error("{lhs} : {production} is not in {form}: {reason}")]
    NotInNormalForm {
        form: &'static str,
        lhs: String,
        production: String,
        reason: String,
    },

    #[error("left recursion is still present after {0} elimination rounds")]
    UnresolvedLeftRecursion(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadErrorKind {
    #[error("malformed rule")]
    MalformedRule,

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(char),
}

/// A rule line the reader had to skip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {kind} in \"{text}\"")]
pub struct ReadError {
    pub line: usize,
    pub kind: ReadErrorKind,
    pub text: String,
}

impl ReadError {
    pub(crate) fn new(line: usize, kind: ReadErrorKind, text: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            text: text.into(),
        }
    }
}
