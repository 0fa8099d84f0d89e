//! Statement lowering
//!
//! Statement dispatch appends to the op sequence; declaration initializers
//! route through the statement-level call recognitions (push, concat chains,
//! slice-rest, print), which is why the call handler takes an optional
//! destination name.

use super::Lowerer;
use crate::error::LowerResult;
use crate::ir::{BinOp as IrBinOp, CtnrOp, Op, Triple, Type, Value};
use wenc_ast::*;

impl Lowerer<'_> {
    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> LowerResult<()> {
        match stmt {
            Stmt::VarDecl(decl) => self.lower_var_decl(decl),
            Stmt::Expr(s) => self.lower_expr_stmt(&s.expr),
            Stmt::If(s) => self.lower_if(s),
            Stmt::While(s) => self.lower_while(s),
            Stmt::DoWhile(s) => self.lower_do_while(s),
            Stmt::For(s) => self.lower_for(s),
            Stmt::ForOf(s) => self.lower_for_of(s),
            Stmt::Break(_) => {
                self.emit(Op::Break);
                Ok(())
            }
            Stmt::Return(s) => self.lower_return(s),
            Stmt::FunctionDecl(f) => self.lower_function_decl(f),
            Stmt::Empty(_) => Ok(()),
        }
    }

    /// Lower a statement list, running queued postfix updates before each
    /// statement and once more before leaving the block. Draining ahead of
    /// the first statement places updates deferred from an enclosing test
    /// (`while (x++ < n)`) before the body they guard.
    pub(crate) fn lower_block(&mut self, block: &Block) -> LowerResult<()> {
        for stmt in &block.statements {
            self.drain_deferred()?;
            self.lower_stmt(stmt)?;
        }
        self.drain_deferred()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub(crate) fn lower_var_decl(&mut self, decl: &VarDecl) -> LowerResult<()> {
        for declarator in &decl.declarators {
            self.lower_declarator(declarator)?;
        }
        Ok(())
    }

    fn lower_declarator(&mut self, declarator: &Declarator) -> LowerResult<()> {
        let name = declarator.name.name.clone();
        let Some(init) = &declarator.init else {
            self.add_var(vec![name], vec![], Type::Object);
            return Ok(());
        };

        match init {
            Expr::Array(arr) => {
                self.lower_array(arr, Some(name))?;
                Ok(())
            }
            Expr::Object(obj) => {
                self.lower_object(obj, Some(name))?;
                Ok(())
            }
            Expr::Function(func) => {
                self.add_var(vec![name], vec![], Type::Function);
                self.lower_function(&func.params, &func.body, func.span)
            }
            Expr::New(new) => {
                self.lower_new(new)?;
                self.add_naming(vec![name]);
                Ok(())
            }
            Expr::Call(call) => self.lower_call_stmt(call, Some(&name)),
            _ => {
                // literals, identifier copies, operators, update and
                // assignment results
                let triple = self.lower_value(init, true)?;
                self.bind_value(&name, triple);
                Ok(())
            }
        }
    }

    /// Bind a lowered initializer to its declared name: slot values get a
    /// naming (or a reassignment when the name already exists), plain values
    /// get a declaration.
    fn bind_value(&mut self, name: &str, triple: Triple) {
        if triple.is_ans() {
            if self.symbols.contains(name) {
                self.add_reassign(Triple::iden(name), None, Triple::ans());
            } else {
                self.add_naming(vec![name.to_string()]);
            }
            return;
        }

        let ty = self.declaration_type(&triple);
        // the empty string declares as a bare string binding
        let values = match &triple.value {
            Value::Str(None) => vec![],
            _ => vec![triple],
        };
        self.add_var(vec![name.to_string()], values, ty);
    }

    /// Lenient type tag for declarations: an unregistered identifier
    /// initializer defaults to an object binding.
    pub(crate) fn declaration_type(&self, triple: &Triple) -> Type {
        match &triple.value {
            Value::Iden(name) => self.symbols.get(name).unwrap_or(Type::Object),
            Value::Num(_) => Type::Number,
            Value::Str(_) => Type::String,
            Value::Bool(_) => Type::Boolean,
            Value::Ans | Value::Ctnr(_) | Value::Cmp(_) | Value::Data(_) => Type::Object,
        }
    }

    pub(crate) fn lower_function_decl(&mut self, decl: &FunctionDecl) -> LowerResult<()> {
        self.add_var(vec![decl.name.name.clone()], vec![], Type::Function);
        self.lower_function(&decl.params, &decl.body, decl.span)
    }

    /// Emit a function definition: header, body region, end, and a discard
    /// clearing whatever the body left staged.
    pub(crate) fn lower_function(
        &mut self,
        params: &[Identifier],
        body: &Block,
        span: Span,
    ) -> LowerResult<()> {
        let descriptors = params
            .iter()
            .map(|p| crate::ir::Param { name: p.name.clone(), ty: Type::Object })
            .collect::<Vec<_>>();
        for param in params {
            self.symbols.insert(&param.name, Type::Object);
        }
        self.emit(Op::Fun { arity: descriptors.len(), params: descriptors, pos: Some(span) });
        self.emit(Op::FunBody);
        self.lower_block(body)?;
        self.emit(Op::FunEnd);
        self.emit(Op::Discard);
        Ok(())
    }

    // ========================================================================
    // Expression statements
    // ========================================================================

    pub(crate) fn lower_expr_stmt(&mut self, expr: &Expr) -> LowerResult<()> {
        match expr {
            Expr::Call(call) => self.lower_call_stmt(call, None),
            Expr::Assign(assign) => self.lower_assignment(assign),
            Expr::Update(update) => {
                if self.handled_updates.insert(update.span) {
                    self.apply_update(update)?;
                }
                Ok(())
            }
            Expr::Seq(seq) => {
                for e in &seq.exprs {
                    self.lower_expr_stmt(e)?;
                }
                Ok(())
            }
            Expr::Function(func) => {
                let name = self.fresh_name();
                self.add_var(vec![name], vec![], Type::Function);
                self.lower_function(&func.params, &func.body, func.span)
            }
            other => {
                let triple = self.lower_value(other, true)?;
                if triple.is_ans() {
                    self.emit(Op::Discard);
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    pub(crate) fn lower_assignment(&mut self, assign: &AssignExpr) -> LowerResult<()> {
        // compound forms desugar to `lhs = lhs op rhs`
        if let AssignOp::Compound(op) = assign.op {
            let rhs = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: assign.left.clone(),
                right: assign.right.clone(),
                span: assign.span,
            }));
            return self.lower_plain_assign(&assign.left, &rhs, assign.span);
        }
        self.lower_plain_assign(&assign.left, &assign.right, assign.span)
    }

    fn lower_plain_assign(&mut self, left: &Expr, right: &Expr, span: Span) -> LowerResult<()> {
        match left {
            Expr::Ident(id) => {
                if let Expr::Function(func) = right {
                    // rebinding a name to a function only works right after
                    // its declaration; the header must be the trailing op
                    let just_declared = matches!(
                        self.ops.last(),
                        Some(Op::Var { names, .. })
                            if names.first().map(String::as_str) == Some(id.name.as_str())
                    );
                    if !just_declared {
                        return Err(
                            self.unsupported(span, "function assigned to an existing binding")
                        );
                    }
                    return self.lower_function(&func.params, &func.body, func.span);
                }

                let rhs = self.lower_value(right, true)?;
                if !self.symbols.contains(&id.name) {
                    self.symbols.insert(&id.name, Type::Object);
                }
                self.add_reassign(
                    Triple::at(Value::Iden(id.name.clone()), id.span),
                    None,
                    rhs,
                );
                Ok(())
            }
            Expr::Member(member) => self.assign_member(member, right),
            other => Err(self.unsupported(
                other.span(),
                "assignment target must be a name or member path",
            )),
        }
    }

    /// Assignment through a member path: `a.b = v`, `a[k] = v`, nested paths.
    pub(crate) fn assign_member(&mut self, member: &MemberExpr, right: &Expr) -> LowerResult<()> {
        let base = self.member_base(member)?;
        let lhs = Triple::iden(&base);

        // `a[e - 1]` writes at the un-adjusted 1-indexed position
        if member.computed {
            if let Expr::Binary(b) = &member.property {
                if b.op == BinOp::Sub && is_num_literal(&b.right, 1.0) {
                    let subs = self.lower_value(&b.left, false)?;
                    let rhs = self.lower_value(right, true)?;
                    self.add_reassign(lhs, Some(subs), rhs);
                    return Ok(());
                }
            }
            return match &member.property {
                Expr::Str(s) => {
                    let rhs = self.lower_value(right, true)?;
                    self.add_reassign(lhs, Some(Triple::str_lit(&s.value)), rhs);
                    Ok(())
                }
                Expr::Num(n) => {
                    let rhs = self.lower_value(right, true)?;
                    self.add_reassign(lhs, Some(Triple::num(n.value + 1.0)), rhs);
                    Ok(())
                }
                dynamic => {
                    let key = self.lower_value(dynamic, false)?;
                    let rhs = self.lower_value(right, false)?;
                    self.index_assign(lhs, key, rhs);
                    self.emit(Op::Discard);
                    Ok(())
                }
            };
        }

        let Some(prop) = member.property.as_ident() else {
            return Err(self.unsupported(member.span, "member property must be a name"));
        };
        let subs = Triple::str_lit(prop);
        let rhs = self.lower_value(right, true)?;
        self.add_reassign(lhs, Some(subs), rhs);
        Ok(())
    }

    /// The base container name of a member path, staging nested objects to a
    /// fresh temporary first.
    pub(crate) fn member_base(&mut self, member: &MemberExpr) -> LowerResult<String> {
        match &member.object {
            Expr::Ident(id) => Ok(id.name.clone()),
            Expr::This(_) => Ok("this".to_string()),
            Expr::Member(_) | Expr::Call(_) => {
                let staged = self.lower_value(&member.object, false)?;
                match staged.value {
                    Value::Iden(name) => Ok(name),
                    _ => Err(self.unsupported(
                        member.object.span(),
                        "member base must reduce to a name",
                    )),
                }
            }
            other => Err(self.unsupported(other.span(), "member base must be a name")),
        }
    }

    // ========================================================================
    // Calls in statement position
    // ========================================================================

    /// Statement-level call lowering with the target-specific recognitions.
    /// `dest` is the declared name when the call is a declaration initializer.
    pub(crate) fn lower_call_stmt(
        &mut self,
        call: &CallExpr,
        dest: Option<&str>,
    ) -> LowerResult<()> {
        if let Expr::Member(member) = &call.callee {
            if !member.computed && member.object.as_ident() == Some("console") {
                self.lower_print(&call.arguments)?;
                if let Some(name) = dest {
                    self.add_var(vec![name.to_string()], vec![], Type::Object);
                }
                return Ok(());
            }

            if !member.computed && member.property.as_ident() == Some("push") {
                let Some(container) = member.object.as_ident() else {
                    return Err(self.unsupported(
                        member.object.span(),
                        "push target must be a named container",
                    ));
                };
                let container = container.to_string();
                let values = self.lower_args(&call.arguments)?;
                self.emit(Op::Push { container: container.clone(), values, pos: Some(call.span) });
                if let Some(name) = dest {
                    self.emit(Op::Length { container });
                    self.bind_slot(name, Type::Number);
                }
                return Ok(());
            }

            if let Some(containers) = concat_chain(call) {
                self.emit(Op::Cat { containers, pos: Some(call.span) });
                return self.finish_call_stmt(dest, Type::Container);
            }

            if let Some(container) = slice_rest(call) {
                self.emit(Op::Subscript {
                    container,
                    value: Triple::new(Value::Ctnr(CtnrOp::Rest)),
                });
                return self.finish_call_stmt(dest, Type::Container);
            }
        }

        self.lower_call_universal(call)?;
        self.finish_call_stmt(dest, Type::Object)
    }

    fn finish_call_stmt(&mut self, dest: Option<&str>, ty: Type) -> LowerResult<()> {
        match dest {
            Some(name) => self.bind_slot(name, ty),
            None => self.emit(Op::Discard),
        }
        Ok(())
    }

    /// Bind the staged slot value to `name`: a naming for a new name, a
    /// reassignment for an existing one.
    fn bind_slot(&mut self, name: &str, ty: Type) {
        if self.symbols.contains(name) {
            self.add_reassign(Triple::iden(name), None, Triple::ans());
        } else {
            self.symbols.insert(name, ty);
            self.emit(Op::Name { names: vec![name.to_string()] });
        }
    }

    // ========================================================================
    // Print
    // ========================================================================

    /// `console.*(...)`: stage the arguments, then print. A lone argument
    /// already in the slot skips staging; a run of single-use arguments whose
    /// producers are the trailing ops sheds their names instead of re-staging.
    pub(crate) fn lower_print(&mut self, args: &[Expr]) -> LowerResult<()> {
        if args.len() == 1 {
            let triple = self.lower_value(&args[0], true)?;
            if !triple.is_ans() {
                let ty = self.type_of_triple(&triple)?;
                self.emit(Op::Var { names: vec![], values: vec![triple], ty });
            }
            self.emit(Op::Print);
            return Ok(());
        }

        if self.shed_print_names(args) {
            self.emit(Op::Print);
            return Ok(());
        }

        let triples = self.lower_args(args)?;
        let ty = match triples.first() {
            Some(first) => self.type_of_triple(first)?,
            None => Type::String,
        };
        self.emit(Op::Var { names: vec![], values: triples, ty });
        self.emit(Op::Print);
        Ok(())
    }

    /// If every argument is a single-use name produced by the trailing ops in
    /// order, strip those names so the values stay staged for the print.
    fn shed_print_names(&mut self, args: &[Expr]) -> bool {
        let n = args.len();
        if n == 0 || self.ops.len() < n {
            return false;
        }

        let start = self.ops.len() - n;
        for (j, arg) in args.iter().enumerate() {
            let Some(name) = arg.as_ident() else { return false };
            if !self.single_use.contains(name) {
                return false;
            }
            let produced = match &self.ops[start + j] {
                Op::Var { names, values, .. } => {
                    names.len() == 1 && names[0] == name && !values.is_empty()
                }
                Op::Name { names } => names.len() == 1 && names[0] == name,
                _ => false,
            };
            if !produced {
                return false;
            }
        }

        for j in (0..n).rev() {
            let idx = start + j;
            if matches!(self.ops[idx], Op::Name { .. }) {
                self.ops.remove(idx);
            } else if let Op::Var { names, .. } = &mut self.ops[idx] {
                names.clear();
            }
        }
        true
    }

    // ========================================================================
    // Return and updates
    // ========================================================================

    pub(crate) fn lower_return(&mut self, stmt: &ReturnStmt) -> LowerResult<()> {
        let value = match &stmt.argument {
            Some(expr) => Some(self.lower_value(expr, false)?),
            None => None,
        };
        self.emit(Op::Return { value, pos: Some(stmt.span) });
        Ok(())
    }

    /// Execute an update's side effect now: bump the binding, write it back.
    pub(crate) fn apply_update(&mut self, update: &UpdateExpr) -> LowerResult<()> {
        let (ir_op, ast_op) = match update.op {
            UpdateOp::Incr => (IrBinOp::Add, BinOp::Add),
            UpdateOp::Decr => (IrBinOp::Sub, BinOp::Sub),
        };
        match &update.argument {
            Expr::Ident(id) => {
                self.emit(Op::Binary {
                    op: ir_op,
                    lhs: Triple::at(Value::Iden(id.name.clone()), id.span),
                    rhs: Triple::num(1.0),
                    pos: Some(update.span),
                });
                self.add_reassign(Triple::iden(&id.name), None, Triple::ans());
                Ok(())
            }
            Expr::Member(member) => {
                let rhs = Expr::Binary(Box::new(BinaryExpr {
                    op: ast_op,
                    left: Expr::Member(member.clone()),
                    right: Expr::Num(NumLit { value: 1.0, span: update.span }),
                    span: update.span,
                }));
                self.assign_member(member, &rhs)
            }
            other => {
                Err(self.unsupported(other.span(), "update target must be a name or member"))
            }
        }
    }
}

/// `a.concat(b).concat(c)` with bare-identifier links collapses to one
/// ordered concatenation.
pub(crate) fn concat_chain(call: &CallExpr) -> Option<Vec<String>> {
    let mut containers = Vec::new();
    let mut current = call;
    loop {
        let Expr::Member(member) = &current.callee else { return None };
        if member.computed || member.property.as_ident() != Some("concat") {
            return None;
        }
        if current.arguments.len() != 1 {
            return None;
        }
        containers.push(current.arguments[0].as_ident()?.to_string());
        match &member.object {
            Expr::Call(inner) => current = inner,
            Expr::Ident(id) => {
                containers.push(id.name.clone());
                containers.reverse();
                return Some(containers);
            }
            _ => return None,
        }
    }
}

/// `a.slice(1)`: everything after the first element.
pub(crate) fn slice_rest(call: &CallExpr) -> Option<String> {
    let Expr::Member(member) = &call.callee else { return None };
    if member.computed || member.property.as_ident() != Some("slice") {
        return None;
    }
    let base = member.object.as_ident()?;
    if call.arguments.len() == 1 && is_num_literal(&call.arguments[0], 1.0) {
        Some(base.to_string())
    } else {
        None
    }
}

pub(crate) fn is_num_literal(expr: &Expr, value: f64) -> bool {
    matches!(expr, Expr::Num(n) if n.value == value)
}
