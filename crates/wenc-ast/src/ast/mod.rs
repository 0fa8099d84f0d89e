//! Syntax tree for the supported source subset
//!
//! Closed tagged enums per syntax category; every node carries a `Span`.

mod expression;
mod statement;

pub use expression::*;
pub use statement::*;
