pub mod chomsky_normal_form;
pub mod context_free;
pub mod greibach_normal_form;
pub mod nullability;
pub mod types;
mod usefulness;

pub use chomsky_normal_form::{ChomskyNormalFormGrammar, CnfWord};
pub use context_free::{ContextFreeGrammar, Rules, TerminalIsolation};
pub use greibach_normal_form::{GnfWord, GreibachNormalFormGrammar};
