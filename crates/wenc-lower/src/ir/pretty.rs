//! Pretty-printing for IR
//!
//! Human-readable output for debugging op lists. The text form is for
//! inspection only; the external printer consumes the ops structurally.

use super::op::Op;
use super::value::{Triple, Value};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Triple {
    fn pretty_print(&self) -> String {
        match &self.value {
            Value::Iden(name) => format!("%{}", name),
            Value::Num(n) => format!("{}", n),
            Value::Str(Some(s)) => format!("{:?}", s),
            Value::Str(None) => "\"\"".to_string(),
            Value::Bool(b) => format!("{}", b),
            Value::Ans => "ans".to_string(),
            Value::Ctnr(op) => format!("ctnr:{:?}", op).to_lowercase(),
            Value::Cmp(op) => format!("cmp {}", op),
            Value::Data(text) => format!("data {:?}", text),
        }
    }
}

fn join(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|t| t.pretty_print())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PrettyPrint for Op {
    fn pretty_print(&self) -> String {
        match self {
            Op::Var { names, values, ty } => {
                format!("var [{}] = [{}] : {}", names.join(", "), join(values), ty)
            }
            Op::Name { names } => format!("name [{}]", names.join(", ")),
            Op::Reassign { lhs, lhssubs, rhs } => match lhssubs {
                Some(sub) => format!(
                    "reassign {}[{}] = {}",
                    lhs.pretty_print(),
                    sub.pretty_print(),
                    rhs.pretty_print()
                ),
                None => format!("reassign {} = {}", lhs.pretty_print(), rhs.pretty_print()),
            },
            Op::Call { fun, args, .. } => format!("call {}({})", fun, join(args)),
            Op::Fun { arity, params, .. } => {
                let params: Vec<String> =
                    params.iter().map(|p| format!("{}: {}", p.name, p.ty)).collect();
                format!("fun/{} ({})", arity, params.join(", "))
            }
            Op::FunBody => "funbody".to_string(),
            Op::FunEnd => "funend".to_string(),
            Op::If { test, .. } => format!("if [{}]", join(test)),
            Op::Else => "else".to_string(),
            Op::End => "end".to_string(),
            Op::WhileTrue => "whiletrue".to_string(),
            Op::WhileN { bound, .. } => format!("whilen {}", bound.pretty_print()),
            Op::ForEach { container, iterator } => {
                format!("foreach %{} in %{}", iterator, container)
            }
            Op::Break => "break".to_string(),
            Op::Return { value, .. } => match value {
                Some(v) => format!("return {}", v.pretty_print()),
                None => "return".to_string(),
            },
            Op::Push { container, values, .. } => {
                format!("push %{} <- [{}]", container, join(values))
            }
            Op::Cat { containers, .. } => format!("cat [{}]", containers.join(", ")),
            Op::Length { container } => format!("length %{}", container),
            Op::Subscript { container, value } => {
                format!("subscript %{}[{}]", container, value.pretty_print())
            }
            Op::Neg { value, .. } => format!("neg {}", value.pretty_print()),
            Op::Not { value, .. } => format!("not {}", value.pretty_print()),
            Op::Binary { op, lhs, rhs, .. } => {
                format!("binary {} {} {}", lhs.pretty_print(), op, rhs.pretty_print())
            }
            Op::Print => "print".to_string(),
            Op::Discard => "discard".to_string(),
            Op::Comment { text } => format!("; {}", text),
        }
    }
}

impl PrettyPrint for [Op] {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        let mut indent = 0usize;
        for op in self {
            if matches!(op, Op::Else | Op::End | Op::FunBody | Op::FunEnd) {
                indent = indent.saturating_sub(1);
            }
            writeln!(output, "{}{}", "  ".repeat(indent), op.pretty_print()).unwrap();
            match op {
                Op::If { .. }
                | Op::Else
                | Op::WhileTrue
                | Op::WhileN { .. }
                | Op::ForEach { .. }
                | Op::Fun { .. }
                | Op::FunBody => indent += 1,
                _ => {}
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Type;

    #[test]
    fn test_pretty_var() {
        let op = Op::Var {
            names: vec!["x".into()],
            values: vec![Triple::num(3.0)],
            ty: Type::Number,
        };
        assert_eq!(op.pretty_print(), "var [x] = [3] : num");
    }

    #[test]
    fn test_pretty_indents_regions() {
        let ops = vec![
            Op::If { test: vec![Triple::iden("a")], pos: None },
            Op::Break,
            Op::End,
        ];
        let text = ops.pretty_print();
        assert!(text.contains("\n  break\n"));
    }
}
