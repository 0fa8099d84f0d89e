//! Syntax tree for the JavaScript subset accepted by wenc
//!
//! This crate is the contract between the external front-end parser and the
//! lowering engine. Trees serialize with serde, so a front end living in
//! another process can hand programs over as JSON. The `build` module offers
//! constructor helpers for assembling trees programmatically.

pub mod ast;
pub mod build;
pub mod span;

pub use ast::*;
pub use span::Span;
