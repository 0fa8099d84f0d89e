//! Native-operation wrappers
//!
//! The target has no `new`, no dynamic subscripts, and no ambient standard
//! library. Every such operation routes through a small generated function
//! whose body is an opaque escape-hatch payload understood by the printer.
//! Wrappers are deduplicated by signature and collected into a block that is
//! prepended to the program, separated from user code by a comment line.

use super::Lowerer;
use crate::error::LowerResult;
use crate::ir::{Op, Param, Triple, Type, Value};
use wenc_ast::{CallExpr, Expr, NewExpr, Span};

const NEW_SIGNATURE: &str = "JS_NEW()";
const NEW_FUNC: &str = "造物";
const NEW_PARAM: &str = "蓝图";
const NEW_BODY: &str = "new 蓝图(...Array.prototype.slice.call(arguments, 1))";

const INDEX_ASSIGN_SIGNATURE: &str = "JS_INDEX_ASSIGN()";
const INDEX_ASSIGN_FUNC: &str = "賦值";
const INDEX_ASSIGN_BODY: &str = "對象[域] = 值;";

const SUBSCRIPT_SIGNATURE: &str = "JS_SUBSCRIPT()";
const SUBSCRIPT_FUNC: &str = "獲取";
const SUBSCRIPT_BODY: &str = "對象[域]";

/// Wrapper names that fresh-name minting must never hand out.
pub(crate) const RESERVED_NAMES: [&str; 3] = [NEW_FUNC, INDEX_ASSIGN_FUNC, SUBSCRIPT_FUNC];

impl Lowerer<'_> {
    /// Emit a wrapper definition into the polyfill block unless one with the
    /// same signature already exists.
    fn define_native_wrapper(
        &mut self,
        signature: &str,
        name: &str,
        params: &[&str],
        body: &str,
        pos: Option<Span>,
    ) {
        if self.signatures.contains_key(signature) {
            return;
        }
        self.signatures.insert(signature.to_string(), name.to_string());
        self.symbols.insert(name, Type::Function);

        self.polyfills.push(Op::Var {
            names: vec![name.to_string()],
            values: vec![],
            ty: Type::Function,
        });
        self.polyfills.push(Op::Fun {
            arity: params.len(),
            params: params
                .iter()
                .map(|p| Param { name: (*p).to_string(), ty: Type::Object })
                .collect(),
            pos,
        });
        self.polyfills.push(Op::FunBody);
        self.polyfills.push(Op::Return {
            value: Some(Triple::new(Value::Data(body.to_string()))),
            pos: None,
        });
        self.polyfills.push(Op::FunEnd);
    }

    /// `new C(a, b)` becomes a call to the construction wrapper with the
    /// blueprint as the first argument.
    pub(crate) fn lower_new(&mut self, new: &NewExpr) -> LowerResult<()> {
        self.define_native_wrapper(
            NEW_SIGNATURE,
            NEW_FUNC,
            &[NEW_PARAM],
            NEW_BODY,
            None,
        );
        let mut args = vec![self.lower_value(&new.callee, false)?];
        args.extend(self.lower_args(&new.arguments)?);
        self.emit(Op::Call { fun: NEW_FUNC.to_string(), args, pos: Some(new.span) });
        Ok(())
    }

    /// Dynamic subscript read: `obj[key]` with a non-literal key.
    pub(crate) fn subscript_get(&mut self, obj: Triple, key: Triple) {
        self.define_native_wrapper(
            SUBSCRIPT_SIGNATURE,
            SUBSCRIPT_FUNC,
            &["對象", "域"],
            SUBSCRIPT_BODY,
            None,
        );
        self.emit(Op::Call {
            fun: SUBSCRIPT_FUNC.to_string(),
            args: vec![obj, key],
            pos: None,
        });
    }

    /// Dynamic subscript write: `obj[key] = value` with a non-literal key.
    pub(crate) fn index_assign(&mut self, obj: Triple, key: Triple, value: Triple) {
        self.define_native_wrapper(
            INDEX_ASSIGN_SIGNATURE,
            INDEX_ASSIGN_FUNC,
            &["對象", "域", "值"],
            INDEX_ASSIGN_BODY,
            None,
        );
        self.emit(Op::Call {
            fun: INDEX_ASSIGN_FUNC.to_string(),
            args: vec![obj, key, value],
            pos: None,
        });
    }

    /// A call whose callee is not a program-defined function: wrap the
    /// ambient path behind a generated function of matching arity. Wrappers
    /// are keyed by path and arity, so `Math.max(a, b)` in two places shares
    /// one definition while `Math.max(a, b, c)` gets its own.
    pub(crate) fn polyfill_ambient_call(&mut self, call: &CallExpr) -> LowerResult<()> {
        let path = callee_path(&call.callee).ok_or_else(|| {
            self.unsupported(call.callee.span(), "cannot resolve ambient callee")
        })?;

        let mut signature = format!("{path}(");
        for i in 0..call.arguments.len() {
            signature.push_str(&format!("_a{i},"));
        }
        signature.push(')');

        let fun = match self.signatures.get(&signature) {
            Some(existing) => existing.clone(),
            None => {
                let name = self.fresh_name();
                let params: Vec<String> =
                    (0..call.arguments.len()).map(|i| format!("_a{i}")).collect();
                let param_refs: Vec<&str> = params.iter().map(String::as_str).collect();
                self.define_native_wrapper(
                    &signature,
                    &name,
                    &param_refs,
                    &signature,
                    Some(call.span),
                );
                name
            }
        };

        let args = self.lower_args(&call.arguments)?;
        self.emit(Op::Call { fun, args, pos: Some(call.span) });
        Ok(())
    }
}

/// The dotted source path of an ambient callee: a bare name or a chain of
/// non-computed member accesses.
fn callee_path(callee: &Expr) -> Option<String> {
    match callee {
        Expr::Ident(id) => Some(id.name.clone()),
        Expr::Member(member) if !member.computed => {
            let base = callee_path(&member.object)?;
            let prop = member.property.as_ident()?;
            Some(format!("{base}.{prop}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::ir::Op;
    use wenc_ast::build::*;

    #[test]
    fn test_ambient_wrappers_dedup_by_shape() {
        // two Math.sqrt(x) calls share a wrapper; Math.max(x, y) gets its own
        let program = program(vec![
            let_("x", num(4.0)),
            let_("y", num(9.0)),
            expr_stmt(call(member(ident("Math"), "sqrt"), vec![ident("x")])),
            expr_stmt(call(member(ident("Math"), "sqrt"), vec![ident("y")])),
            expr_stmt(call(member(ident("Math"), "max"), vec![ident("x"), ident("y")])),
        ]);
        let ops = crate::lower_program(&program, "").unwrap();
        let wrappers = ops.iter().filter(|op| matches!(op, Op::Fun { .. })).count();
        assert_eq!(wrappers, 2);
    }

    #[test]
    fn test_polyfill_block_precedes_user_code() {
        let program = program(vec![expr_stmt(call(ident("alert"), vec![str_("hi")]))]);
        let ops = crate::lower_program(&program, "").unwrap();
        let separator = ops
            .iter()
            .position(|op| matches!(op, Op::Comment { .. }))
            .unwrap();
        let user_call = ops
            .iter()
            .rposition(|op| matches!(op, Op::Call { .. }))
            .unwrap();
        assert!(matches!(ops[0], Op::Var { .. }));
        assert!(separator < user_call);
    }

    #[test]
    fn test_new_routes_through_construction_wrapper() {
        let program = program(vec![let_(
            "d",
            new_(ident("Date"), vec![]),
        )]);
        let ops = crate::lower_program(&program, "").unwrap();
        assert!(ops
            .iter()
            .any(|op| matches!(op, Op::Call { fun, .. } if fun == "造物")));
    }
}
