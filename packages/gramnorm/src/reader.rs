//! Reading grammars from rule lines of the form `S0 : aS0b | A1 | E`.
//!
//! Non-terminals are an uppercase letter other than `E` followed by a digit,
//! possibly with blanks in between. Terminals are lowercase letters and `E` is
//! the empty string.

use log::{debug, warn};
use winnow::{
    ascii::space0,
    combinator::{alt, preceded, repeat, terminated},
    prelude::*,
    token::one_of,
};

use crate::{
    error::{ReadError, ReadErrorKind},
    grammars::context_free::ContextFreeGrammar,
    language::{NonTerminal, Production, Symbol, Terminal, EPSILON},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    NonTerminal(NonTerminal),
    Terminal(Terminal),
    Pipe,
    Epsilon,
    Separator,
}

fn non_terminal(input: &mut &str) -> ModalResult<NonTerminal> {
    (
        one_of(('A'..='D', 'F'..='Z')),
        preceded(space0, one_of('0'..='9')),
    )
        .try_map(|(letter, digit)| NonTerminal::new(letter, digit))
        .parse_next(input)
}

fn token(input: &mut &str) -> ModalResult<Token> {
    preceded(
        space0,
        alt((
            non_terminal.map(Token::NonTerminal),
            EPSILON.value(Token::Epsilon),
            ':'.value(Token::Separator),
            '|'.value(Token::Pipe),
            one_of('a'..='z').map(|c| Token::Terminal(Terminal(c))),
        )),
    )
    .parse_next(input)
}

/// Splits one rule line into tokens. The first character that starts no token
/// is reported as an invalid symbol.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ReadErrorKind> {
    terminated(repeat(0.., token), space0)
        .parse(line)
        .map_err(|error| {
            line.get(error.offset()..)
                .and_then(|rest| rest.chars().next())
                .map_or(ReadErrorKind::MalformedRule, ReadErrorKind::InvalidSymbol)
        })
}

/// Reads one rule line into its left-hand side and its alternatives. Empty
/// alternatives are skipped.
pub fn read_rule(line: &str) -> Result<(NonTerminal, Vec<Production>), ReadErrorKind> {
    let tokens = tokenize(line)?;

    let (lhs, rhs) = match tokens.as_slice() {
        [Token::NonTerminal(lhs), Token::Separator, rhs @ ..] => (*lhs, rhs),
        _ => return Err(ReadErrorKind::MalformedRule),
    };

    let mut productions = Vec::new();

    for alternative in rhs.split(|token| *token == Token::Pipe) {
        if alternative.is_empty() {
            continue;
        }

        let symbols = alternative
            .iter()
            .map(|token| match token {
                Token::NonTerminal(nt) => Ok(Symbol::NonTerminal(*nt)),
                Token::Terminal(t) => Ok(Symbol::Terminal(*t)),
                Token::Epsilon => Ok(Symbol::Epsilon),
                Token::Pipe | Token::Separator => Err(ReadErrorKind::MalformedRule),
            })
            .collect::<Result<Vec<_>, _>>()?;

        productions.push(Production::new(symbols));
    }

    Ok((lhs, productions))
}

/// Reads a whole grammar, one rule per line. Bad lines are skipped and
/// returned alongside the grammar; blank lines are ignored. Repeated rules for
/// the same non-terminal are merged, and the result is cleaned.
pub fn read_grammar(text: &str) -> (ContextFreeGrammar, Vec<ReadError>) {
    let mut grammar = ContextFreeGrammar::new();
    let mut errors = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match read_rule(line) {
            Ok((lhs, productions)) => grammar.add_rule(lhs, productions),
            Err(kind) => {
                let error = ReadError::new(idx + 1, kind, line);
                warn!("skipping {error}");
                errors.push(error);
            }
        }
    }

    if grammar.start_symbol().is_some() {
        grammar.clean();
    }

    debug!(
        "read {} non-terminals and {} productions, {} lines skipped",
        grammar.productions().len(),
        grammar.production_count(),
        errors.len()
    );

    (grammar, errors)
}
