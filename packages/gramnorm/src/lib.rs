//! Normalization of context-free grammars to Chomsky and Greibach normal
//! form, and bounded enumeration of the words they derive.

pub mod error;
pub mod generate;
pub mod grammars;
pub mod language;
pub mod names;
pub mod reader;
pub mod summary;

pub use error::{GrammarError, ReadError, ReadErrorKind};
pub use generate::{GeneratorConfig, WordGenerator};
pub use grammars::{ChomskyNormalFormGrammar, ContextFreeGrammar, GreibachNormalFormGrammar};
pub use language::{NonTerminal, Production, Symbol, Terminal};
pub use reader::read_grammar;
pub use summary::GrammarSummary;
