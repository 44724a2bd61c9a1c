//! Script language: `$name[arg;arg]` calls embedded in text.

mod eval;
mod parser;
mod span;

pub use eval::{Evaluation, Evaluator};
pub use parser::{parse, Argument, Call, Node, MAX_DEPTH};
pub use span::{Location, Span};
