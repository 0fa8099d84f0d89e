//! Expression lowering
//!
//! `lower_value` is the workhorse: given an expression and a flag saying
//! whether the caller can consume the implicit slot, it returns a triple for
//! the result, emitting staging ops as needed. Left operands never use the
//! slot (the right side would clobber it); right operands and sole consumers
//! may.

use super::stmt::is_num_literal;
use super::Lowerer;
use crate::error::LowerResult;
use crate::ir::{Op, Triple, Type, Value};
use wenc_ast::*;

impl Lowerer<'_> {
    pub(crate) fn lower_value(&mut self, expr: &Expr, can_use_slot: bool) -> LowerResult<Triple> {
        match expr {
            Expr::Num(n) => Ok(Triple::at(Value::Num(n.value), n.span)),
            Expr::Str(s) => {
                let mut triple = Triple::str_lit(&s.value);
                triple.pos = Some(s.span);
                Ok(triple)
            }
            Expr::Bool(b) => Ok(Triple::at(Value::Bool(b.value), b.span)),
            Expr::This(span) => Ok(Triple::at(Value::Iden("this".to_string()), *span)),
            Expr::Ident(id) => {
                if can_use_slot {
                    if let Some(compressed) = self.try_compress(&id.name) {
                        return Ok(compressed);
                    }
                }
                Ok(Triple::at(Value::Iden(id.name.clone()), id.span))
            }
            Expr::Unary(unary) => self.lower_unary(unary, can_use_slot),
            Expr::Binary(binary) => {
                let lhs = self.lower_value(&binary.left, false)?;
                let rhs = self.lower_value(&binary.right, true)?;
                self.emit(Op::Binary {
                    op: binary.op.into(),
                    lhs,
                    rhs,
                    pos: Some(binary.span),
                });
                Ok(self.seal(can_use_slot))
            }
            Expr::Update(update) => self.lower_update(update),
            Expr::Assign(assign) => {
                self.lower_assignment(assign)?;
                // the assignment's value is its target
                match &assign.left {
                    Expr::Ident(id) => Ok(Triple::at(Value::Iden(id.name.clone()), id.span)),
                    Expr::Member(member) => self.emit_member(member, can_use_slot),
                    other => Err(self.unsupported(
                        other.span(),
                        "assignment target must be a name or member path",
                    )),
                }
            }
            Expr::Call(call) => {
                self.lower_call_universal(call)?;
                Ok(self.seal(can_use_slot))
            }
            Expr::New(new) => {
                self.lower_new(new)?;
                Ok(self.seal(can_use_slot))
            }
            Expr::Member(member) => self.emit_member(member, can_use_slot),
            Expr::Array(arr) => {
                let name = self.lower_array(arr, None)?;
                Ok(Triple::at(Value::Iden(name), arr.span))
            }
            Expr::Object(obj) => {
                let name = self.lower_object(obj, None)?;
                Ok(Triple::at(Value::Iden(name), obj.span))
            }
            Expr::Function(func) => {
                let name = self.fresh_name();
                self.add_var(vec![name.clone()], vec![], Type::Function);
                self.lower_function(&func.params, &func.body, func.span)?;
                // re-stage the binding so the slot holds the function
                self.emit(Op::Var {
                    names: vec![],
                    values: vec![Triple::iden(&name)],
                    ty: Type::Function,
                });
                Ok(self.seal(can_use_slot))
            }
            Expr::Seq(seq) => {
                let Some((last, init)) = seq.exprs.split_last() else {
                    return Err(self.unsupported(seq.span, "empty expression sequence"));
                };
                for e in init {
                    self.lower_expr_stmt(e)?;
                }
                self.lower_value(last, can_use_slot)
            }
        }
    }

    fn lower_unary(&mut self, unary: &UnaryExpr, can_use_slot: bool) -> LowerResult<Triple> {
        match unary.op {
            UnaryOp::Neg => {
                // negated numeric literals fold at lowering time
                if let Expr::Num(n) = &unary.argument {
                    return Ok(Triple::at(Value::Num(-n.value), unary.span));
                }
                let value = self.lower_value(&unary.argument, true)?;
                self.emit(Op::Neg { value, pos: Some(unary.span) });
                Ok(self.seal(can_use_slot))
            }
            UnaryOp::Not => {
                let value = self.lower_value(&unary.argument, true)?;
                self.emit(Op::Not { value, pos: Some(unary.span) });
                Ok(self.seal(can_use_slot))
            }
        }
    }

    /// Update expressions yield their target; prefix forms apply first,
    /// postfix forms queue onto the deferred list. The handled set keeps a
    /// re-entrant visit through an ancestor from applying twice.
    fn lower_update(&mut self, update: &UpdateExpr) -> LowerResult<Triple> {
        let first_visit = self.handled_updates.insert(update.span);
        match &update.argument {
            Expr::Ident(id) => {
                if first_visit {
                    if update.prefix {
                        self.apply_update(update)?;
                    } else {
                        self.deferred.push(update.clone());
                    }
                }
                Ok(Triple::at(Value::Iden(id.name.clone()), id.span))
            }
            Expr::Member(member) => {
                if first_visit && update.prefix {
                    self.apply_update(update)?;
                }
                let value = self.emit_member(member, false)?;
                if first_visit && !update.prefix {
                    self.deferred.push(update.clone());
                }
                Ok(value)
            }
            other => {
                Err(self.unsupported(other.span(), "update target must be a name or member"))
            }
        }
    }

    /// Member reads: length, literal keys, the `e - 1` last-index idiom, and
    /// the dynamic-subscript wrapper for everything else.
    pub(crate) fn emit_member(
        &mut self,
        member: &MemberExpr,
        can_use_slot: bool,
    ) -> LowerResult<Triple> {
        let container = self.member_base(member)?;

        if member.computed {
            if let Expr::Binary(b) = &member.property {
                if b.op == BinOp::Sub && is_num_literal(&b.right, 1.0) {
                    let value = self.lower_value(&b.left, true)?;
                    self.emit(Op::Subscript { container, value });
                    return Ok(self.seal(can_use_slot));
                }
            }
            return match &member.property {
                Expr::Num(n) => {
                    // 1-indexed target
                    self.emit(Op::Subscript {
                        container,
                        value: Triple::num(n.value + 1.0),
                    });
                    Ok(self.seal(can_use_slot))
                }
                Expr::Str(s) => {
                    self.emit(Op::Subscript {
                        container,
                        value: Triple::str_lit(&s.value),
                    });
                    Ok(self.seal(can_use_slot))
                }
                dynamic => {
                    let key = self.lower_value(dynamic, false)?;
                    self.subscript_get(Triple::iden(&container), key);
                    Ok(self.seal(can_use_slot))
                }
            };
        }

        match member.property.as_ident() {
            Some("length") => {
                self.emit(Op::Length { container });
                Ok(self.seal(can_use_slot))
            }
            Some(prop) => {
                self.emit(Op::Subscript { container, value: Triple::str_lit(prop) });
                Ok(self.seal(can_use_slot))
            }
            None => Err(self.unsupported(member.span, "member property must be a name")),
        }
    }

    /// Materialize an array literal into a named container.
    pub(crate) fn lower_array(
        &mut self,
        arr: &ArrayLit,
        dest: Option<String>,
    ) -> LowerResult<String> {
        let name = dest.unwrap_or_else(|| self.fresh_name());
        self.add_var(vec![name.clone()], vec![], Type::Container);
        if !arr.elements.is_empty() {
            let values = self.lower_args(&arr.elements)?;
            self.emit(Op::Push { container: name.clone(), values, pos: Some(arr.span) });
        }
        Ok(name)
    }

    /// Materialize an object literal: declare, then one subscripted
    /// reassignment per property.
    pub(crate) fn lower_object(
        &mut self,
        obj: &ObjectLit,
        dest: Option<String>,
    ) -> LowerResult<String> {
        let name = dest.unwrap_or_else(|| self.fresh_name());
        self.add_var(vec![name.clone()], vec![], Type::Object);
        for property in &obj.properties {
            let rhs = self.lower_value(&property.value, true)?;
            self.add_reassign(
                Triple::iden(&name),
                Some(Triple::str_lit(&property.key.as_subscript())),
                rhs,
            );
        }
        Ok(name)
    }

    /// Argument operands are always materialized (never the slot: there is
    /// only one of it).
    pub(crate) fn lower_args(&mut self, args: &[Expr]) -> LowerResult<Vec<Triple>> {
        args.iter().map(|arg| self.lower_value(arg, false)).collect()
    }

    /// Value-position calls: registered names call directly, anything else
    /// routes through the ambient-call wrapper.
    pub(crate) fn lower_call_universal(&mut self, call: &CallExpr) -> LowerResult<()> {
        if let Some(name) = call.callee.as_ident() {
            if self.symbols.contains(name) {
                let fun = name.to_string();
                let args = self.lower_args(&call.arguments)?;
                self.emit(Op::Call { fun, args, pos: Some(call.span) });
                return Ok(());
            }
        }
        self.polyfill_ambient_call(call)
    }
}
