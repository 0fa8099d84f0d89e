//! Single-use inlining post-pass
//!
//! Lowering stages intermediate results to fresh names whenever the implicit
//! slot is unavailable. Many of those names are consumed exactly once by the
//! very next op; this pass folds the producer into the consumer and splices
//! the producer out, so the printed program reads through the slot instead of
//! a chain of throwaway bindings.
//!
//! A fold is legal only when the consumer reads exactly one distinct
//! identifier and the whole-program occurrence count of that identifier
//! permits it: a `Var` or `Name` producer folds at count one, a subscript-free
//! `Reassign` producer at count two (the target plus this read). Counts
//! include write targets, so a name that is reassigned later never folds.

use crate::error::{LowerError, LowerResult, Phase};
use crate::ir::{Op, Triple, Value};
use rustc_hash::FxHashMap;

pub fn inline_single_use(ops: &mut Vec<Op>) -> LowerResult<()> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for op in ops.iter() {
        for triple in op.triples() {
            if let Value::Iden(name) = &triple.value {
                *counts.entry(name.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut i = 1;
    while i < ops.len() {
        let Some((name, replacement)) = fold_candidate(&ops[i], &ops[i - 1], &counts) else {
            i += 1;
            continue;
        };

        replace_read(&mut ops[i], &name, replacement)?;
        ops.remove(i - 1);
        counts.insert(name, 0);

        // the splice may expose a new adjacency just behind the cursor
        if i > 1 {
            i -= 1;
        }
    }
    Ok(())
}

/// If the op just before `consumer` produces the single identifier `consumer`
/// reads, the triple to substitute for that read.
fn fold_candidate(
    consumer: &Op,
    producer: &Op,
    counts: &FxHashMap<String, usize>,
) -> Option<(String, Triple)> {
    let mut candidate: Option<&str> = None;
    for triple in consumer.read_triples() {
        if let Value::Iden(name) = &triple.value {
            match candidate {
                None => candidate = Some(name),
                Some(seen) if seen == name => {}
                Some(_) => return None,
            }
        }
    }
    let name = candidate?;
    let count = *counts.get(name)?;

    match producer {
        Op::Var { names, values, .. }
            if count == 1 && names.len() == 1 && names[0] == name && values.len() == 1 =>
        {
            Some((name.to_string(), values[0].clone()))
        }
        Op::Name { names } if count == 1 && names.len() == 1 && names[0] == name => {
            Some((name.to_string(), Triple::ans()))
        }
        Op::Reassign { lhs, lhssubs: None, rhs }
            if count == 2 && lhs.as_iden() == Some(name) =>
        {
            Some((name.to_string(), rhs.clone()))
        }
        _ => None,
    }
}

fn replace_read(op: &mut Op, name: &str, replacement: Triple) -> LowerResult<()> {
    for triple in op.read_triples_mut() {
        if let Value::Iden(read) = &triple.value {
            if read == name {
                *triple = replacement;
                return Ok(());
            }
        }
    }
    Err(LowerError::invariant(
        Phase::PostProcess,
        format!("no read of {name} to replace in its consumer"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinOp, Type};

    fn var(name: &str, value: Triple) -> Op {
        Op::Var { names: vec![name.to_string()], values: vec![value], ty: Type::Number }
    }

    #[test]
    fn test_var_producer_folds_into_consumer() {
        let mut ops = vec![
            var("t", Triple::num(1.0)),
            Op::Binary {
                op: BinOp::Add,
                lhs: Triple::iden("t"),
                rhs: Triple::num(2.0),
                pos: None,
            },
        ];
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Op::Binary { lhs, .. } => assert_eq!(lhs.value, Value::Num(1.0)),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_name_producer_folds_to_slot() {
        let mut ops = vec![
            Op::Binary {
                op: BinOp::Add,
                lhs: Triple::num(1.0),
                rhs: Triple::num(2.0),
                pos: None,
            },
            Op::Name { names: vec!["t".to_string()] },
            Op::Binary {
                op: BinOp::Mul,
                lhs: Triple::iden("t"),
                rhs: Triple::num(3.0),
                pos: None,
            },
        ];
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops.len(), 2);
        match &ops[1] {
            Op::Binary { lhs, .. } => assert!(lhs.is_ans()),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_later_reassignment_blocks_fold() {
        // let x = 1; foo(x); x = 2;  →  x must stay named
        let mut ops = vec![
            var("x", Triple::num(1.0)),
            Op::Call { fun: "foo".to_string(), args: vec![Triple::iden("x")], pos: None },
            Op::Reassign { lhs: Triple::iden("x"), lhssubs: None, rhs: Triple::num(2.0) },
        ];
        let before = ops.clone();
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops, before);
    }

    #[test]
    fn test_reassign_producer_folds_at_count_two() {
        let mut ops = vec![
            Op::Reassign { lhs: Triple::iden("x"), lhssubs: None, rhs: Triple::num(5.0) },
            Op::Call { fun: "foo".to_string(), args: vec![Triple::iden("x")], pos: None },
        ];
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Op::Call { args, .. } => assert_eq!(args[0].value, Value::Num(5.0)),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_two_distinct_reads_block_fold() {
        let mut ops = vec![
            var("a", Triple::num(1.0)),
            Op::Binary {
                op: BinOp::Add,
                lhs: Triple::iden("a"),
                rhs: Triple::iden("b"),
                pos: None,
            },
        ];
        let before = ops.clone();
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops, before);
    }

    #[test]
    fn test_pass_is_idempotent() {
        let mut ops = vec![
            var("t", Triple::num(1.0)),
            Op::Binary {
                op: BinOp::Add,
                lhs: Triple::iden("t"),
                rhs: Triple::num(2.0),
                pos: None,
            },
            Op::Name { names: vec!["u".to_string()] },
            Op::Call { fun: "foo".to_string(), args: vec![Triple::iden("u")], pos: None },
        ];
        inline_single_use(&mut ops).unwrap();
        let once = ops.clone();
        inline_single_use(&mut ops).unwrap();
        assert_eq!(ops, once);
    }
}
