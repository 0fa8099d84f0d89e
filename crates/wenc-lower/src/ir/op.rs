//! IR ops
//!
//! The flat, ordered records emitted by lowering and consumed verbatim by the
//! external printer. Ops are appended, never reordered; only the single-use
//! inlining post-pass may splice adjacent ops.

use super::value::{BinOp, Triple, Type};
use serde::{Deserialize, Serialize};
use wenc_ast::Span;

/// A function parameter descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// One IR op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Declare bindings. `names` may be empty (stage values onto the slot)
    /// and `values` may be empty (declare without initial value).
    Var {
        names: Vec<String>,
        values: Vec<Triple>,
        ty: Type,
    },

    /// Bind the implicit slot to new names.
    Name { names: Vec<String> },

    /// Reassign a binding, optionally at a subscript.
    Reassign {
        lhs: Triple,
        lhssubs: Option<Triple>,
        rhs: Triple,
    },

    /// Call a named function; the result lands in the implicit slot.
    Call {
        fun: String,
        args: Vec<Triple>,
        pos: Option<Span>,
    },

    /// Function definition header.
    Fun {
        arity: usize,
        params: Vec<Param>,
        pos: Option<Span>,
    },

    /// Start of a function body.
    FunBody,

    /// End of a function definition.
    FunEnd,

    /// Conditional with a structured test (operand triples, possibly split
    /// around a comparator marker).
    If {
        test: Vec<Triple>,
        pos: Option<Span>,
    },

    Else,

    /// Closes an `If`, `WhileTrue`, `WhileN`, or `ForEach` region.
    End,

    /// Unconditional loop; exits only via `Break`.
    WhileTrue,

    /// Bounded counting loop: run the body `bound` times.
    WhileN {
        bound: Triple,
        pos: Option<Span>,
    },

    /// Iterate a container, binding each element.
    ForEach {
        container: String,
        iterator: String,
    },

    Break,

    Return {
        value: Option<Triple>,
        pos: Option<Span>,
    },

    /// Append values to a container.
    Push {
        container: String,
        values: Vec<Triple>,
        pos: Option<Span>,
    },

    /// Concatenate containers in order; result in the implicit slot.
    Cat {
        containers: Vec<String>,
        pos: Option<Span>,
    },

    /// Container length into the implicit slot.
    Length { container: String },

    /// Subscript read into the implicit slot. `value` may be a literal, an
    /// identifier, or a container-position marker.
    Subscript { container: String, value: Triple },

    /// Arithmetic negation of `value` into the implicit slot.
    Neg {
        value: Triple,
        pos: Option<Span>,
    },

    /// Logical not of `value` into the implicit slot.
    Not {
        value: Triple,
        pos: Option<Span>,
    },

    /// Binary operation into the implicit slot.
    Binary {
        op: BinOp,
        lhs: Triple,
        rhs: Triple,
        pos: Option<Span>,
    },

    /// Print the staged values.
    Print,

    /// Drop the implicit slot's current value.
    Discard,

    Comment { text: String },
}

impl Op {
    /// Every triple operand of this op, including write targets.
    pub fn triples(&self) -> Vec<&Triple> {
        let mut out = self.read_triples();
        if let Op::Reassign { lhs, .. } = self {
            out.insert(0, lhs);
        }
        out
    }

    /// Triple operands this op reads. Reassign targets are writes and
    /// excluded; plain-string container/name fields are not triples.
    pub fn read_triples(&self) -> Vec<&Triple> {
        match self {
            Op::Var { values, .. } => values.iter().collect(),
            Op::Reassign { lhssubs, rhs, .. } => {
                lhssubs.iter().chain(std::iter::once(rhs)).collect()
            }
            Op::Call { args, .. } => args.iter().collect(),
            Op::If { test, .. } => test.iter().collect(),
            Op::WhileN { bound, .. } => vec![bound],
            Op::Return { value, .. } => value.iter().collect(),
            Op::Push { values, .. } => values.iter().collect(),
            Op::Subscript { value, .. } => vec![value],
            Op::Neg { value, .. } | Op::Not { value, .. } => vec![value],
            Op::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Op::Name { .. }
            | Op::Fun { .. }
            | Op::FunBody
            | Op::FunEnd
            | Op::Else
            | Op::End
            | Op::WhileTrue
            | Op::ForEach { .. }
            | Op::Break
            | Op::Cat { .. }
            | Op::Length { .. }
            | Op::Print
            | Op::Discard
            | Op::Comment { .. } => vec![],
        }
    }

    /// Mutable view of the read triples, same positions as `read_triples`.
    pub fn read_triples_mut(&mut self) -> Vec<&mut Triple> {
        match self {
            Op::Var { values, .. } => values.iter_mut().collect(),
            Op::Reassign { lhssubs, rhs, .. } => {
                lhssubs.iter_mut().chain(std::iter::once(rhs)).collect()
            }
            Op::Call { args, .. } => args.iter_mut().collect(),
            Op::If { test, .. } => test.iter_mut().collect(),
            Op::WhileN { bound, .. } => vec![bound],
            Op::Return { value, .. } => value.iter_mut().collect(),
            Op::Push { values, .. } => values.iter_mut().collect(),
            Op::Subscript { value, .. } => vec![value],
            Op::Neg { value, .. } | Op::Not { value, .. } => vec![value],
            Op::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Op::Name { .. }
            | Op::Fun { .. }
            | Op::FunBody
            | Op::FunEnd
            | Op::Else
            | Op::End
            | Op::WhileTrue
            | Op::ForEach { .. }
            | Op::Break
            | Op::Cat { .. }
            | Op::Length { .. }
            | Op::Print
            | Op::Discard
            | Op::Comment { .. } => vec![],
        }
    }
}
