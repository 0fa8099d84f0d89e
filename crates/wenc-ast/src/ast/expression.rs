//! Expression AST nodes
//!
//! The expression subset the lowering engine accepts. Operators are closed
//! enums, so an out-of-subset operator is unrepresentable rather than a
//! runtime rejection; the remaining unsupported constructs are structural.

use super::statement::Block;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Numeric literal: 42, 3.14
    Num(NumLit),

    /// String literal: "hello"
    Str(StrLit),

    /// Boolean literal: true, false
    Bool(BoolLit),

    /// Identifier reference
    Ident(Identifier),

    /// `this`
    This(Span),

    /// Array literal: [1, 2, 3]
    Array(ArrayLit),

    /// Object literal: { a: 1 }
    Object(ObjectLit),

    /// Function or arrow expression
    Function(Box<FunctionExpr>),

    /// Binary or logical operation: a + b, a && b
    Binary(Box<BinaryExpr>),

    /// Unary operation: -a, !a
    Unary(Box<UnaryExpr>),

    /// Increment/decrement: a++, --a
    Update(Box<UpdateExpr>),

    /// Assignment: a = b, a += b
    Assign(Box<AssignExpr>),

    /// Call: f(a, b)
    Call(Box<CallExpr>),

    /// Constructor call: new C(a)
    New(Box<NewExpr>),

    /// Member access: a.b, a[b]
    Member(Box<MemberExpr>),

    /// Comma sequence: (a, b, c)
    Seq(SeqExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Num(e) => e.span,
            Expr::Str(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::This(span) => *span,
            Expr::Array(e) => e.span,
            Expr::Object(e) => e.span,
            Expr::Function(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Update(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::New(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Seq(e) => e.span,
        }
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Num(_) | Expr::Str(_) | Expr::Bool(_))
    }

    /// The identifier name, if this is a bare identifier reference.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(id) => Some(&id.name),
            _ => None,
        }
    }
}

/// Identifier: a user-level name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Numeric literal: 42, 3.14
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumLit {
    pub value: f64,
    pub span: Span,
}

/// String literal: "hello"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrLit {
    pub value: String,
    pub span: Span,
}

/// Boolean literal: true, false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

/// Array literal: [1, 2, 3]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLit {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Object literal: { a: 1, "b": 2 }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLit {
    pub properties: Vec<Property>,
    pub span: Span,
}

/// A single `key: value` entry of an object literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: PropKey,
    pub value: Expr,
    pub span: Span,
}

/// Object literal key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(f64),
}

impl PropKey {
    /// The key as the string the target language subscripts with.
    pub fn as_subscript(&self) -> String {
        match self {
            PropKey::Ident(s) | PropKey::Str(s) => s.clone(),
            PropKey::Num(n) => format_num(*n),
        }
    }
}

fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Function or arrow expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    pub name: Option<Identifier>,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub is_arrow: bool,
    pub span: Span,
}

/// Binary and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
}

impl BinOp {
    /// Comparison operators produce a comparator triple in structured tests.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::StrictEq | BinOp::StrictNe
                | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Binary or logical operation: left op right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation: -a
    Neg,
    /// Logical not: !a
    Not,
}

/// Unary operation: op argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub argument: Expr,
    pub span: Span,
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    /// ++
    Incr,
    /// --
    Decr,
}

/// Increment/decrement: a++, --a
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpr {
    pub op: UpdateOp,
    pub prefix: bool,
    pub argument: Expr,
    pub span: Span,
}

/// Assignment operator: plain `=` or a compound form like `+=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Compound(BinOp),
}

/// Assignment: left = right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

/// Call: callee(arguments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Constructor call: new callee(arguments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpr {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Member access: object.property (computed = false) or object[property]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpr {
    pub object: Expr,
    pub property: Expr,
    pub computed: bool,
    pub span: Span,
}

/// Comma sequence: expressions evaluated left to right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeqExpr {
    pub exprs: Vec<Expr>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_literal() {
        let num = Expr::Num(NumLit { value: 1.0, span: Span::dummy() });
        assert!(num.is_literal());
        let ident = Expr::Ident(Identifier { name: "a".into(), span: Span::dummy() });
        assert!(!ident.is_literal());
        assert_eq!(ident.as_ident(), Some("a"));
    }

    #[test]
    fn test_binop_comparison() {
        assert!(BinOp::Lt.is_comparison());
        assert!(BinOp::StrictEq.is_comparison());
        assert!(!BinOp::Add.is_comparison());
        assert!(!BinOp::And.is_comparison());
    }

    #[test]
    fn test_prop_key_subscript() {
        assert_eq!(PropKey::Ident("a".into()).as_subscript(), "a");
        assert_eq!(PropKey::Num(3.0).as_subscript(), "3");
        assert_eq!(PropKey::Num(1.5).as_subscript(), "1.5");
    }
}
