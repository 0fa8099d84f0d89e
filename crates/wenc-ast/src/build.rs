//! Tree construction helpers
//!
//! Convenience constructors for assembling programs without a front end,
//! used by external producers and heavily by the lowering engine's tests.
//!
//! Every helper mints a fresh synthetic span, so two structurally identical
//! nodes are still distinguishable by identity (the update scheduler relies
//! on span identity to apply each `x++` exactly once).

use crate::ast::*;
use crate::span::Span;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SYNTH: AtomicUsize = AtomicUsize::new(0);

fn synth() -> Span {
    let n = NEXT_SYNTH.fetch_add(1, Ordering::Relaxed);
    Span::new(n, n)
}

// ============================================================================
// Expressions
// ============================================================================

pub fn num(value: f64) -> Expr {
    Expr::Num(NumLit { value, span: synth() })
}

pub fn str_(value: &str) -> Expr {
    Expr::Str(StrLit { value: value.to_string(), span: synth() })
}

pub fn boolean(value: bool) -> Expr {
    Expr::Bool(BoolLit { value, span: synth() })
}

pub fn ident(name: &str) -> Expr {
    Expr::Ident(id(name))
}

pub fn id(name: &str) -> Identifier {
    Identifier { name: name.to_string(), span: synth() }
}

pub fn this() -> Expr {
    Expr::This(synth())
}

pub fn array(elements: Vec<Expr>) -> Expr {
    Expr::Array(ArrayLit { elements, span: synth() })
}

pub fn object(properties: Vec<(&str, Expr)>) -> Expr {
    let properties = properties
        .into_iter()
        .map(|(key, value)| Property {
            key: PropKey::Ident(key.to_string()),
            value,
            span: synth(),
        })
        .collect();
    Expr::Object(ObjectLit { properties, span: synth() })
}

pub fn function(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(FunctionExpr {
        name: None,
        params: params.iter().map(|p| id(p)).collect(),
        body: block(body),
        is_arrow: false,
        span: synth(),
    }))
}

pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary(Box::new(BinaryExpr { op, left, right, span: synth() }))
}

pub fn neg(argument: Expr) -> Expr {
    Expr::Unary(Box::new(UnaryExpr { op: UnaryOp::Neg, argument, span: synth() }))
}

pub fn not(argument: Expr) -> Expr {
    Expr::Unary(Box::new(UnaryExpr { op: UnaryOp::Not, argument, span: synth() }))
}

pub fn update(op: UpdateOp, prefix: bool, argument: Expr) -> Expr {
    Expr::Update(Box::new(UpdateExpr { op, prefix, argument, span: synth() }))
}

/// `name++`
pub fn post_incr(name: &str) -> Expr {
    update(UpdateOp::Incr, false, ident(name))
}

/// `++name`
pub fn pre_incr(name: &str) -> Expr {
    update(UpdateOp::Incr, true, ident(name))
}

pub fn assign(left: Expr, right: Expr) -> Expr {
    Expr::Assign(Box::new(AssignExpr { op: AssignOp::Assign, left, right, span: synth() }))
}

pub fn compound_assign(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Assign(Box::new(AssignExpr { op: AssignOp::Compound(op), left, right, span: synth() }))
}

pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(CallExpr { callee, arguments, span: synth() }))
}

pub fn new_(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::New(Box::new(NewExpr { callee, arguments, span: synth() }))
}

/// `object.property` (non-computed)
pub fn member(object: Expr, property: &str) -> Expr {
    Expr::Member(Box::new(MemberExpr {
        object,
        property: ident(property),
        computed: false,
        span: synth(),
    }))
}

/// `object[property]` (computed)
pub fn index(object: Expr, property: Expr) -> Expr {
    Expr::Member(Box::new(MemberExpr { object, property, computed: true, span: synth() }))
}

pub fn seq(exprs: Vec<Expr>) -> Expr {
    Expr::Seq(SeqExpr { exprs, span: synth() })
}

// ============================================================================
// Statements
// ============================================================================

pub fn program(body: Vec<Stmt>) -> Program {
    Program { body }
}

pub fn block(statements: Vec<Stmt>) -> Block {
    Block { statements, span: synth() }
}

/// `let name = init;`
pub fn let_(name: &str, init: Expr) -> Stmt {
    decl(vec![(name, Some(init))])
}

/// `let name;`
pub fn let_uninit(name: &str) -> Stmt {
    decl(vec![(name, None)])
}

/// A declaration with arbitrary declarators: `let a = 1, b;`
pub fn decl(declarators: Vec<(&str, Option<Expr>)>) -> Stmt {
    Stmt::VarDecl(VarDecl {
        declarators: declarators
            .into_iter()
            .map(|(name, init)| Declarator { name: id(name), init, span: synth() })
            .collect(),
        span: synth(),
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt { expr, span: synth() })
}

pub fn if_(test: Expr, consequent: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt { test, consequent: block(consequent), alternate: None, span: synth() })
}

pub fn if_else(test: Expr, consequent: Vec<Stmt>, alternate: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        test,
        consequent: block(consequent),
        alternate: Some(block(alternate)),
        span: synth(),
    })
}

pub fn while_(test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While(WhileStmt { test, body: block(body), span: synth() })
}

pub fn do_while(body: Vec<Stmt>, test: Expr) -> Stmt {
    Stmt::DoWhile(DoWhileStmt { body: block(body), test, span: synth() })
}

pub fn for_(init: Option<Stmt>, test: Option<Expr>, update: Option<Expr>, body: Vec<Stmt>) -> Stmt {
    let init = init.map(|s| match s {
        Stmt::VarDecl(d) => d,
        other => panic!("for initializer must be a declaration, got {:?}", other),
    });
    Stmt::For(ForStmt { init, test, update, body: block(body), span: synth() })
}

/// The canonical counting loop: `for (let name = 0; name < bound; name++)`
pub fn for_count(name: &str, bound: Expr, body: Vec<Stmt>) -> Stmt {
    for_(
        Some(let_(name, num(0.0))),
        Some(binary(BinOp::Lt, ident(name), bound)),
        Some(post_incr(name)),
        body,
    )
}

pub fn for_of(binding: &str, iterable: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::ForOf(ForOfStmt { binding: id(binding), iterable, body: block(body), span: synth() })
}

pub fn break_() -> Stmt {
    Stmt::Break(synth())
}

pub fn ret(argument: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt { argument, span: synth() })
}

pub fn func_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::FunctionDecl(FunctionDecl {
        name: id(name),
        params: params.iter().map(|p| id(p)).collect(),
        body: block(body),
        span: synth(),
    })
}

pub fn empty() -> Stmt {
    Stmt::Empty(synth())
}
