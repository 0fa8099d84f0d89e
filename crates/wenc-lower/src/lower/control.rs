//! Control-flow lowering
//!
//! Conditionals get a structured test; the two loop families lower to the
//! target's unconditional loop with a manual break, except the canonical
//! zero-to-n counting loop, which owns the target's bounded loop primitive.

use super::stmt::is_num_literal;
use super::Lowerer;
use crate::analyze;
use crate::error::LowerResult;
use crate::ir::{BinOp as IrBinOp, CtnrOp, Op, Triple, Value};
use wenc_ast::*;

impl Lowerer<'_> {
    pub(crate) fn lower_if(&mut self, stmt: &IfStmt) -> LowerResult<()> {
        let test = self.build_test(&stmt.test)?;
        self.emit(Op::If { test, pos: Some(stmt.span) });
        self.lower_block(&stmt.consequent)?;
        if let Some(alternate) = &stmt.alternate {
            self.emit(Op::Else);
            self.lower_block(alternate)?;
        }
        self.emit(Op::End);
        Ok(())
    }

    /// A structured test: relational comparisons keep their shape as
    /// `lhs cmp rhs`; everything else reduces to a single staged value.
    fn build_test(&mut self, test: &Expr) -> LowerResult<Vec<Triple>> {
        if let Expr::Binary(b) = test {
            if b.op.is_comparison() {
                let mut out = self.test_operand(&b.left)?;
                out.push(Triple::cmp(b.op.into()));
                out.extend(self.test_operand(&b.right)?);
                return Ok(out);
            }
        }
        Ok(vec![self.lower_value(test, false)?])
    }

    /// Comparison operands keep the container idioms inline: `x.length` and
    /// `x[e - 1]` become position markers instead of staged reads.
    fn test_operand(&mut self, expr: &Expr) -> LowerResult<Vec<Triple>> {
        if let Expr::Member(member) = expr {
            if let Some(base) = member.object.as_ident() {
                if !member.computed && member.property.as_ident() == Some("length") {
                    return Ok(vec![
                        Triple::iden(base),
                        Triple::new(Value::Ctnr(CtnrOp::Len)),
                    ]);
                }
                if member.computed {
                    if let Expr::Binary(b) = &member.property {
                        if b.op == BinOp::Sub && is_num_literal(&b.right, 1.0) {
                            let index = self.lower_value(&b.left, false)?;
                            return Ok(vec![
                                Triple::iden(base),
                                Triple::new(Value::Ctnr(CtnrOp::Sub)),
                                index,
                            ]);
                        }
                    }
                }
            }
        }
        Ok(vec![self.lower_value(expr, false)?])
    }

    /// The manual loop exit: `if (!test) break`. Literal tests fold; a true
    /// test never breaks, a false one always does.
    fn break_unless(&mut self, test: &Expr) -> LowerResult<()> {
        if let Expr::Bool(b) = test {
            if !b.value {
                self.emit(Op::Break);
            }
            return Ok(());
        }

        let value = self.lower_value(test, true)?;
        self.emit(Op::If {
            test: vec![value, Triple::cmp(IrBinOp::Eq), Triple::num(0.0)],
            pos: Some(test.span()),
        });
        self.emit(Op::Break);
        self.emit(Op::End);
        Ok(())
    }

    pub(crate) fn lower_while(&mut self, stmt: &WhileStmt) -> LowerResult<()> {
        self.emit(Op::WhileTrue);
        self.break_unless(&stmt.test)?;
        self.lower_block(&stmt.body)?;
        self.emit(Op::End);
        Ok(())
    }

    pub(crate) fn lower_do_while(&mut self, stmt: &DoWhileStmt) -> LowerResult<()> {
        self.emit(Op::WhileTrue);
        self.lower_block(&stmt.body)?;
        self.break_unless(&stmt.test)?;
        // updates deferred from the test run on every iteration
        self.drain_deferred()?;
        self.emit(Op::End);
        Ok(())
    }

    pub(crate) fn lower_for(&mut self, stmt: &ForStmt) -> LowerResult<()> {
        if let Some(bound) = self.canonical_bound(stmt) {
            // the counter stays live for the body; only the break test goes
            if let Some(init) = &stmt.init {
                self.lower_var_decl(init)?;
            }
            self.emit(Op::WhileN { bound, pos: Some(stmt.span) });
            self.lower_block(&stmt.body)?;
            if let Some(update) = &stmt.update {
                self.lower_loop_update(update)?;
            }
            self.drain_deferred()?;
            self.emit(Op::End);
            return Ok(());
        }

        if let Some(init) = &stmt.init {
            self.lower_var_decl(init)?;
        }
        self.emit(Op::WhileTrue);
        if let Some(test) = &stmt.test {
            self.break_unless(test)?;
        }
        self.lower_block(&stmt.body)?;
        if let Some(update) = &stmt.update {
            self.lower_loop_update(update)?;
        }
        self.drain_deferred()?;
        self.emit(Op::End);
        Ok(())
    }

    /// The update clause runs in statement position at the end of each
    /// iteration, before the break test of the next one.
    fn lower_loop_update(&mut self, update: &Expr) -> LowerResult<()> {
        self.lower_expr_stmt(update)
    }

    /// `for (let i = 0; i < n; i++)` with `i` never reassigned in the body:
    /// the bound, ready for the native counting loop.
    fn canonical_bound(&self, stmt: &ForStmt) -> Option<Triple> {
        let init = stmt.init.as_ref()?;
        if init.declarators.len() != 1 {
            return None;
        }
        let declarator = &init.declarators[0];
        let counter = declarator.name.name.as_str();
        if !is_num_literal(declarator.init.as_ref()?, 0.0) {
            return None;
        }

        let Expr::Binary(test) = stmt.test.as_ref()? else { return None };
        if test.op != BinOp::Lt || test.left.as_ident() != Some(counter) {
            return None;
        }
        let bound = match &test.right {
            Expr::Num(n) => Triple::at(Value::Num(n.value), n.span),
            Expr::Ident(id) => Triple::at(Value::Iden(id.name.clone()), id.span),
            _ => return None,
        };

        let Expr::Update(update) = stmt.update.as_ref()? else { return None };
        if update.op != UpdateOp::Incr || update.argument.as_ident() != Some(counter) {
            return None;
        }

        if analyze::reassigns(counter, &stmt.body) {
            return None;
        }
        Some(bound)
    }

    pub(crate) fn lower_for_of(&mut self, stmt: &ForOfStmt) -> LowerResult<()> {
        let Some(container) = stmt.iterable.as_ident() else {
            return Err(self.unsupported(
                stmt.iterable.span(),
                "for-of iterable must be a named container",
            ));
        };
        let container = container.to_string();
        self.symbols.insert(&stmt.binding.name, crate::ir::Type::Object);
        self.emit(Op::ForEach { container, iterator: stmt.binding.name.clone() });
        self.lower_block(&stmt.body)?;
        self.emit(Op::End);
        Ok(())
    }
}
