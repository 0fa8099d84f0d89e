//! Tree-to-IR lowering
//!
//! The `Lowerer` is the mutable context threaded through the whole pass: the
//! op sequence under construction, the separately collected polyfill block,
//! the symbol table, the single-use name set, the deferred postfix-update
//! queue, and the temporary-name source. One context per invocation; nothing
//! is shared across runs.
//!
//! Statement dispatch lives in `stmt`, expression lowering in `expr`,
//! conditionals and loops in `control`, and wrapper synthesis in `polyfill`.

mod control;
mod expr;
mod polyfill;
mod stmt;

use crate::analyze;
use crate::error::{LowerError, LowerResult, Phase};
use crate::inline;
use crate::ir::{Op, Triple, Type, Value};
use crate::names::{NameSource, StemNames};
use crate::symbols::SymbolTable;
use rustc_hash::{FxHashMap, FxHashSet};
use wenc_ast::{Program, Span, UpdateExpr};

/// The lowering context.
pub struct Lowerer<'src> {
    source: &'src str,
    ops: Vec<Op>,
    polyfills: Vec<Op>,
    symbols: SymbolTable,
    single_use: FxHashSet<String>,
    deferred: Vec<UpdateExpr>,
    handled_updates: FxHashSet<Span>,
    signatures: FxHashMap<String, String>,
    minted: FxHashSet<String>,
    names: Box<dyn NameSource>,
}

impl<'src> Lowerer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_name_source(source, Box::new(StemNames::new()))
    }

    /// Use an external fresh-name generator instead of the default stems.
    pub fn with_name_source(source: &'src str, names: Box<dyn NameSource>) -> Self {
        let mut minted = FxHashSet::default();
        for reserved in polyfill::RESERVED_NAMES {
            minted.insert(reserved.to_string());
        }
        Self {
            source,
            ops: Vec::new(),
            polyfills: Vec::new(),
            symbols: SymbolTable::new(),
            single_use: FxHashSet::default(),
            deferred: Vec::new(),
            handled_updates: FxHashSet::default(),
            signatures: FxHashMap::default(),
            minted,
            names,
        }
    }

    /// Lower a whole program to its op sequence. Consumes the context; every
    /// invocation starts from a fresh one.
    pub fn lower(mut self, program: &Program) -> LowerResult<Vec<Op>> {
        self.single_use = analyze::names_used_once(program);
        for stmt in &program.body {
            self.lower_stmt(stmt)?;
            self.drain_deferred()?;
        }

        let mut result = if self.polyfills.is_empty() {
            self.ops
        } else {
            let mut out = self.polyfills;
            out.push(Op::Comment { text: "=================================".to_string() });
            out.extend(self.ops);
            out
        };

        inline::inline_single_use(&mut result)?;
        Ok(result)
    }

    // ========================================================================
    // Emission helpers
    // ========================================================================

    pub(crate) fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Declare bindings and register their names.
    pub(crate) fn add_var(&mut self, names: Vec<String>, values: Vec<Triple>, ty: Type) {
        for name in &names {
            self.symbols.insert(name, ty);
        }
        self.emit(Op::Var { names, values, ty });
    }

    /// Bind the staged slot value to names and register them.
    pub(crate) fn add_naming(&mut self, names: Vec<String>) {
        for name in &names {
            self.symbols.insert(name, Type::Object);
        }
        self.emit(Op::Name { names });
    }

    pub(crate) fn add_reassign(&mut self, lhs: Triple, lhssubs: Option<Triple>, rhs: Triple) {
        self.emit(Op::Reassign { lhs, lhssubs, rhs });
    }

    /// The staged slot value, either used directly or bound to a fresh name
    /// when the caller cannot consume the slot.
    pub(crate) fn seal(&mut self, can_use_slot: bool) -> Triple {
        if can_use_slot {
            Triple::ans()
        } else {
            let name = self.fresh_name();
            self.add_naming(vec![name.clone()]);
            Triple::iden(&name)
        }
    }

    /// Mint a temporary name disjoint from every user binding and every
    /// previously minted or reserved name.
    pub(crate) fn fresh_name(&mut self) -> String {
        loop {
            let name = self.names.next_name();
            if !self.symbols.contains(&name) && !self.minted.contains(&name) {
                self.minted.insert(name.clone());
                return name;
            }
        }
    }

    /// Slot elision: a single-use identifier read may fold its trailing
    /// producer instead of re-referencing the name.
    pub(crate) fn try_compress(&mut self, name: &str) -> Option<Triple> {
        if !self.single_use.contains(name) {
            return None;
        }

        enum Action {
            ElideVarName,
            PopName,
            PopReassign,
        }

        let action = match self.ops.last()? {
            Op::Var { names, values, .. }
                if names.last().map(String::as_str) == Some(name) && !values.is_empty() =>
            {
                Action::ElideVarName
            }
            Op::Name { names } if names.len() == 1 && names[0] == name => Action::PopName,
            Op::Reassign { lhs, lhssubs: None, .. } if lhs.as_iden() == Some(name) => {
                Action::PopReassign
            }
            _ => return None,
        };

        match action {
            Action::ElideVarName => {
                if let Some(Op::Var { names, .. }) = self.ops.last_mut() {
                    names.pop();
                }
                Some(Triple::ans())
            }
            Action::PopName => {
                self.ops.pop();
                Some(Triple::ans())
            }
            Action::PopReassign => match self.ops.pop() {
                Some(Op::Reassign { rhs, .. }) => Some(rhs),
                _ => None,
            },
        }
    }

    /// The declaration type tag of a triple. Identifier triples must already
    /// be registered; anything slot- or marker-valued has no tag.
    pub(crate) fn type_of_triple(&self, triple: &Triple) -> LowerResult<Type> {
        match &triple.value {
            Value::Iden(name) => self.symbols.get(name).ok_or_else(|| {
                LowerError::invariant(
                    Phase::Lowering,
                    format!("identifier {name} read before any registration"),
                )
            }),
            Value::Num(_) => Ok(Type::Number),
            Value::Str(_) => Ok(Type::String),
            Value::Bool(_) => Ok(Type::Boolean),
            Value::Ans | Value::Ctnr(_) | Value::Cmp(_) | Value::Data(_) => {
                Err(LowerError::invariant(
                    Phase::Lowering,
                    "no declaration type for a non-value triple".to_string(),
                ))
            }
        }
    }

    pub(crate) fn unsupported(&self, span: Span, note: &str) -> LowerError {
        LowerError::unsupported(self.source, span, note)
    }

    // ========================================================================
    // Deferred postfix updates
    // ========================================================================

    /// Run every queued postfix update, in source order. Applying one may
    /// queue another (member targets re-lower their subtree), so loop until
    /// the queue stays empty.
    pub(crate) fn drain_deferred(&mut self) -> LowerResult<()> {
        while !self.deferred.is_empty() {
            let pending = std::mem::take(&mut self.deferred);
            for update in pending {
                self.apply_update(&update)?;
            }
        }
        self.handled_updates.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wenc_ast::build;

    #[test]
    fn test_fresh_names_skip_user_bindings() {
        let mut lowerer = Lowerer::new("");
        lowerer.symbols.insert("甲", Type::Number);
        let name = lowerer.fresh_name();
        assert_eq!(name, "乙");
    }

    #[test]
    fn test_compress_requires_single_use() {
        let mut lowerer = Lowerer::new("");
        lowerer.add_var(vec!["x".into()], vec![Triple::num(1.0)], Type::Number);
        assert!(lowerer.try_compress("x").is_none());

        lowerer.single_use.insert("x".to_string());
        let t = lowerer.try_compress("x").unwrap();
        assert!(t.is_ans());
        match &lowerer.ops[0] {
            Op::Var { names, .. } => assert!(names.is_empty()),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_lower_is_per_invocation() {
        let program = build::program(vec![build::let_("x", build::num(1.0))]);
        let ops = Lowerer::new("").lower(&program).unwrap();
        assert_eq!(ops.len(), 1);
    }
}
