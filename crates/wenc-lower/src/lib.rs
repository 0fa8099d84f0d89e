//! wenc-lower
//!
//! Lowers a curly-brace source tree to the flat op sequence of a
//! classical-prose target: an implicit last-computed-value slot instead of
//! expression nesting, 1-indexed append-only containers, a bounded counting
//! loop and an unconditional loop with manual breaks, and generated wrapper
//! functions for native operations the target cannot express.
//!
//! The pipeline is census → per-statement lowering → polyfill-block
//! prepending → single-use inlining. `lower_program` runs all of it.

pub mod analyze;
pub mod error;
pub mod inline;
pub mod ir;
pub mod lower;
pub mod names;
pub mod symbols;

pub use error::{LowerError, LowerResult, Phase};
pub use ir::{BinOp, CtnrOp, Op, Param, PrettyPrint, Triple, Type, Value};
pub use lower::Lowerer;

use wenc_ast::Program;

/// Lower `program` to its op sequence. `source` is the original text, used
/// only for error snippets; pass an empty string for synthetic trees.
pub fn lower_program(program: &Program, source: &str) -> LowerResult<Vec<Op>> {
    Lowerer::new(source).lower(program)
}

/// Lower and serialize the op sequence to JSON.
pub fn lower_to_json(program: &Program, source: &str) -> LowerResult<String> {
    let ops = lower_program(program, source)?;
    serde_json::to_string_pretty(&ops)
        .map_err(|e| LowerError::invariant(Phase::PostProcess, e.to_string()))
}
