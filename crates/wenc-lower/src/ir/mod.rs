//! The flat IR
//!
//! Lowering produces a single ordered `Vec<Op>`; there is no block graph.
//! Control flow is region-structured with explicit `End` markers, matching
//! the shape the target-language printer expects.

pub mod op;
pub mod pretty;
pub mod value;

pub use op::{Op, Param};
pub use pretty::PrettyPrint;
pub use value::{BinOp, CtnrOp, Triple, Type, Value};
