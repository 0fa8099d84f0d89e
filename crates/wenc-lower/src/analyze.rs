//! Pre-lowering analysis
//!
//! Whole-program identifier census feeding the single-use inliner, plus a
//! reassignment probe used by the counting-loop recognizer.
//!
//! The census counts every identifier occurrence, including the declaration
//! itself, so a name referenced exactly once after declaration has a count
//! of two. Occurrences inside condition tests and loop update clauses are
//! weighted triple: those positions may be re-evaluated, so folding their
//! producers away is not safe. Call arguments need no such guard because
//! argument operands are always materialized to names before the call.

use rustc_hash::{FxHashMap, FxHashSet};
use wenc_ast::*;

const HOT_WEIGHT: usize = 3;

/// Names that occur exactly twice in the whole program under the weighted
/// census: once at declaration, once at a foldable read.
pub fn names_used_once(program: &Program) -> FxHashSet<String> {
    let mut census = Census::default();
    for stmt in &program.body {
        census.stmt(stmt);
    }
    census
        .counts
        .into_iter()
        .filter(|(_, count)| *count == 2)
        .map(|(name, _)| name)
        .collect()
}

#[derive(Default)]
struct Census {
    counts: FxHashMap<String, usize>,
    weight: usize,
}

impl Census {
    fn record(&mut self, name: &str) {
        let weight = self.weight.max(1);
        *self.counts.entry(name.to_string()).or_insert(0) += weight;
    }

    fn hot(&mut self, expr: &Expr) {
        let saved = self.weight;
        self.weight = HOT_WEIGHT;
        self.expr(expr);
        self.weight = saved;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => {
                for d in &decl.declarators {
                    self.record(&d.name.name);
                    if let Some(init) = &d.init {
                        self.expr(init);
                    }
                }
            }
            Stmt::Expr(s) => self.expr(&s.expr),
            Stmt::If(s) => {
                self.hot(&s.test);
                self.block(&s.consequent);
                if let Some(alt) = &s.alternate {
                    self.block(alt);
                }
            }
            Stmt::While(s) => {
                self.hot(&s.test);
                self.block(&s.body);
            }
            Stmt::DoWhile(s) => {
                self.block(&s.body);
                self.hot(&s.test);
            }
            Stmt::For(s) => {
                if let Some(init) = &s.init {
                    for d in &init.declarators {
                        self.record(&d.name.name);
                        if let Some(e) = &d.init {
                            self.expr(e);
                        }
                    }
                }
                if let Some(test) = &s.test {
                    self.hot(test);
                }
                if let Some(update) = &s.update {
                    self.hot(update);
                }
                self.block(&s.body);
            }
            Stmt::ForOf(s) => {
                self.record(&s.binding.name);
                self.expr(&s.iterable);
                self.block(&s.body);
            }
            Stmt::Return(s) => {
                if let Some(arg) = &s.argument {
                    self.expr(arg);
                }
            }
            Stmt::FunctionDecl(f) => {
                self.record(&f.name.name);
                for p in &f.params {
                    self.record(&p.name);
                }
                self.block(&f.body);
            }
            Stmt::Break(_) | Stmt::Empty(_) => {}
        }
    }

    fn block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.stmt(stmt);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(id) => self.record(&id.name),
            Expr::Num(_) | Expr::Str(_) | Expr::Bool(_) | Expr::This(_) => {}
            Expr::Array(a) => {
                for e in &a.elements {
                    self.expr(e);
                }
            }
            Expr::Object(o) => {
                for p in &o.properties {
                    self.expr(&p.value);
                }
            }
            Expr::Function(f) => {
                if let Some(name) = &f.name {
                    self.record(&name.name);
                }
                for p in &f.params {
                    self.record(&p.name);
                }
                self.block(&f.body);
            }
            Expr::Binary(b) => {
                self.expr(&b.left);
                self.expr(&b.right);
            }
            Expr::Unary(u) => self.expr(&u.argument),
            Expr::Update(u) => self.expr(&u.argument),
            Expr::Assign(a) => {
                self.expr(&a.left);
                self.expr(&a.right);
            }
            Expr::Call(c) => {
                self.expr(&c.callee);
                for arg in &c.arguments {
                    self.expr(arg);
                }
            }
            Expr::New(n) => {
                self.expr(&n.callee);
                for arg in &n.arguments {
                    self.expr(arg);
                }
            }
            Expr::Member(m) => {
                self.expr(&m.object);
                self.expr(&m.property);
            }
            Expr::Seq(s) => {
                for e in &s.exprs {
                    self.expr(e);
                }
            }
        }
    }
}

/// True if `name` is the target of an assignment or update anywhere in
/// `block` (nested statements included).
pub fn reassigns(name: &str, block: &Block) -> bool {
    block.statements.iter().any(|stmt| stmt_reassigns(name, stmt))
}

fn stmt_reassigns(name: &str, stmt: &Stmt) -> bool {
    match stmt {
        Stmt::VarDecl(decl) => decl
            .declarators
            .iter()
            .any(|d| d.init.as_ref().is_some_and(|e| expr_reassigns(name, e))),
        Stmt::Expr(s) => expr_reassigns(name, &s.expr),
        Stmt::If(s) => {
            expr_reassigns(name, &s.test)
                || reassigns(name, &s.consequent)
                || s.alternate.as_ref().is_some_and(|alt| reassigns(name, alt))
        }
        Stmt::While(s) => expr_reassigns(name, &s.test) || reassigns(name, &s.body),
        Stmt::DoWhile(s) => expr_reassigns(name, &s.test) || reassigns(name, &s.body),
        Stmt::For(s) => {
            s.test.as_ref().is_some_and(|e| expr_reassigns(name, e))
                || s.update.as_ref().is_some_and(|e| expr_reassigns(name, e))
                || reassigns(name, &s.body)
        }
        Stmt::ForOf(s) => s.binding.name == name || reassigns(name, &s.body),
        Stmt::Return(s) => s.argument.as_ref().is_some_and(|e| expr_reassigns(name, e)),
        Stmt::FunctionDecl(f) => reassigns(name, &f.body),
        Stmt::Break(_) | Stmt::Empty(_) => false,
    }
}

fn expr_reassigns(name: &str, expr: &Expr) -> bool {
    match expr {
        Expr::Assign(a) => {
            a.left.as_ident() == Some(name)
                || expr_reassigns(name, &a.left)
                || expr_reassigns(name, &a.right)
        }
        Expr::Update(u) => u.argument.as_ident() == Some(name),
        Expr::Binary(b) => expr_reassigns(name, &b.left) || expr_reassigns(name, &b.right),
        Expr::Unary(u) => expr_reassigns(name, &u.argument),
        Expr::Call(c) => {
            expr_reassigns(name, &c.callee)
                || c.arguments.iter().any(|a| expr_reassigns(name, a))
        }
        Expr::New(n) => {
            expr_reassigns(name, &n.callee)
                || n.arguments.iter().any(|a| expr_reassigns(name, a))
        }
        Expr::Member(m) => expr_reassigns(name, &m.object) || expr_reassigns(name, &m.property),
        Expr::Array(a) => a.elements.iter().any(|e| expr_reassigns(name, e)),
        Expr::Object(o) => o.properties.iter().any(|p| expr_reassigns(name, &p.value)),
        Expr::Seq(s) => s.exprs.iter().any(|e| expr_reassigns(name, e)),
        Expr::Function(f) => reassigns(name, &f.body),
        Expr::Num(_) | Expr::Str(_) | Expr::Bool(_) | Expr::Ident(_) | Expr::This(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wenc_ast::build::*;

    #[test]
    fn test_single_use_detected() {
        // let a = 1; let b = a + 2;  →  a occurs twice
        let program = program(vec![
            let_("a", num(1.0)),
            let_("b", binary(BinOp::Add, ident("a"), num(2.0))),
        ]);
        let once = names_used_once(&program);
        assert!(once.contains("a"));
        assert!(!once.contains("b"));
    }

    #[test]
    fn test_hot_positions_weighted() {
        // a's second occurrence is in an if test, weighted triple
        let program = program(vec![
            let_("a", num(1.0)),
            if_(ident("a"), vec![]),
        ]);
        let once = names_used_once(&program);
        assert!(!once.contains("a"));
    }

    #[test]
    fn test_call_argument_stays_single_use() {
        let program = program(vec![
            let_("a", num(1.0)),
            expr_stmt(call(ident("f"), vec![ident("a")])),
        ]);
        assert!(names_used_once(&program).contains("a"));
    }

    #[test]
    fn test_while_test_weighted() {
        let program = program(vec![
            let_("a", num(1.0)),
            while_(ident("a"), vec![]),
        ]);
        assert!(!names_used_once(&program).contains("a"));
    }

    #[test]
    fn test_reassigns_probe() {
        let body = block(vec![expr_stmt(assign(ident("i"), num(0.0)))]);
        assert!(reassigns("i", &body));
        assert!(!reassigns("j", &body));

        let update_body = block(vec![expr_stmt(post_incr("i"))]);
        assert!(reassigns("i", &update_body));
    }
}
