//! IR operand values
//!
//! The triple value is the universal operand representation: a tagged,
//! immutable payload plus an optional source position. Triples never own
//! emitted ops; they only reference names, literals, or the implicit slot.

use serde::{Deserialize, Serialize};
use wenc_ast::{self as ast, Span};

/// Coarse type tag attached to declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Object,
    Container,
    Function,
    Boolean,
    String,
    Number,
}

impl Type {
    /// The target language's spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Object => "obj",
            Type::Container => "arr",
            Type::Function => "fun",
            Type::Boolean => "bol",
            Type::String => "str",
            Type::Number => "num",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binary and logical operators carried by `Op::Binary` and comparator triples.
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

impl From<ast::BinOp> for BinOp {
    fn from(op: ast::BinOp) -> Self {
        match op {
            ast::BinOp::Eq => BinOp::Eq,
            ast::BinOp::Ne => BinOp::Ne,
            ast::BinOp::StrictEq => BinOp::StrictEq,
            ast::BinOp::StrictNe => BinOp::StrictNe,
            ast::BinOp::Lt => BinOp::Lt,
            ast::BinOp::Gt => BinOp::Gt,
            ast::BinOp::Le => BinOp::Le,
            ast::BinOp::Ge => BinOp::Ge,
            ast::BinOp::Add => BinOp::Add,
            ast::BinOp::Sub => BinOp::Sub,
            ast::BinOp::Mul => BinOp::Mul,
            ast::BinOp::Div => BinOp::Div,
            ast::BinOp::Mod => BinOp::Mod,
            ast::BinOp::And => BinOp::And,
            ast::BinOp::Or => BinOp::Or,
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Container-position markers used by subscript triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtnrOp {
    /// Container length
    Len,
    /// Subscript at a length-relative position
    Sub,
    /// Everything after the first element
    Rest,
}

/// Triple value payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Reference to a named binding
    Iden(String),
    /// Numeric literal
    Num(f64),
    /// String literal; `None` encodes the empty string, which the target
    /// declares as a bare string binding with no value
    Str(Option<String>),
    /// Boolean literal
    Bool(bool),
    /// The implicit "last computed value" slot
    Ans,
    /// Container-position marker
    Ctnr(CtnrOp),
    /// Comparator marker inside structured tests
    Cmp(BinOp),
    /// Raw inline target-language data (polyfill bodies only)
    Data(String),
}

impl Value {
    pub fn as_iden(&self) -> Option<&str> {
        match self {
            Value::Iden(name) => Some(name),
            _ => None,
        }
    }
}

/// The universal operand: a value plus an optional source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub value: Value,
    pub pos: Option<Span>,
}

impl Triple {
    pub fn new(value: Value) -> Self {
        Self { value, pos: None }
    }

    pub fn at(value: Value, span: Span) -> Self {
        Self { value, pos: Some(span) }
    }

    pub fn iden(name: &str) -> Self {
        Self::new(Value::Iden(name.to_string()))
    }

    pub fn num(value: f64) -> Self {
        Self::new(Value::Num(value))
    }

    pub fn str_lit(value: &str) -> Self {
        let value = if value.is_empty() { None } else { Some(value.to_string()) };
        Self::new(Value::Str(value))
    }

    pub fn ans() -> Self {
        Self::new(Value::Ans)
    }

    pub fn cmp(op: BinOp) -> Self {
        Self::new(Value::Cmp(op))
    }

    pub fn as_iden(&self) -> Option<&str> {
        self.value.as_iden()
    }

    pub fn is_ans(&self) -> bool {
        matches!(self.value, Value::Ans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(Type::Container.as_str(), "arr");
        assert_eq!(Type::Boolean.as_str(), "bol");
    }

    #[test]
    fn test_str_lit_empty_is_none() {
        assert_eq!(Triple::str_lit("").value, Value::Str(None));
        assert_eq!(Triple::str_lit("a").value, Value::Str(Some("a".into())));
    }

    #[test]
    fn test_as_iden() {
        assert_eq!(Triple::iden("x").as_iden(), Some("x"));
        assert_eq!(Triple::num(1.0).as_iden(), None);
        assert!(Triple::ans().is_ans());
    }
}
