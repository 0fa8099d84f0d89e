//! Statement AST nodes
//!
//! The statement subset the lowering engine accepts. A `Program` is the unit
//! handed over by the external front end.

use super::expression::{Expr, Identifier};
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A whole parsed program: the top-level statement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// let/var/const declaration (binding kind is irrelevant to lowering)
    VarDecl(VarDecl),

    /// Expression statement
    Expr(ExprStmt),

    /// if / if-else
    If(IfStmt),

    /// Pre-test loop
    While(WhileStmt),

    /// Post-test loop
    DoWhile(DoWhileStmt),

    /// C-style counting loop
    For(ForStmt),

    /// for (x of xs)
    ForOf(ForOfStmt),

    /// break
    Break(Span),

    /// return [expr]
    Return(ReturnStmt),

    /// function f(a, b) { ... }
    FunctionDecl(FunctionDecl),

    /// Lone semicolon
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForOf(s) => s.span,
            Stmt::Break(span) => *span,
            Stmt::Return(s) => s.span,
            Stmt::FunctionDecl(s) => s.span,
            Stmt::Empty(span) => *span,
        }
    }
}

/// A braced statement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Variable declaration: one or more declarators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// A single `name = init` declarator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: Identifier,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Expression statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// if (test) { consequent } else { alternate }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub test: Expr,
    pub consequent: Block,
    pub alternate: Option<Block>,
    pub span: Span,
}

/// while (test) { body }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub test: Expr,
    pub body: Block,
    pub span: Span,
}

/// do { body } while (test)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileStmt {
    pub body: Block,
    pub test: Expr,
    pub span: Span,
}

/// for (init; test; update) { body }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Option<VarDecl>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Block,
    pub span: Span,
}

/// for (binding of iterable) { body }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForOfStmt {
    pub binding: Identifier,
    pub iterable: Expr,
    pub body: Block,
    pub span: Span,
}

/// return [argument]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub argument: Option<Expr>,
    pub span: Span,
}

/// function name(params) { body }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}
