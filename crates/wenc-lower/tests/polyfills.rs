//! Wrapper-function generation for native operations

use wenc_ast::build::*;
use wenc_lower::{lower_program, Op, Value};

fn lower(stmts: Vec<wenc_ast::Stmt>) -> Vec<Op> {
    lower_program(&program(stmts), "").expect("lowering failed")
}

#[test]
fn test_construction_call_binds_declared_name() {
    // let d = new Date(); console.log(d);
    let ops = lower(vec![
        let_("d", new_(ident("Date"), vec![])),
        expr_stmt(call(member(ident("console"), "log"), vec![ident("d")])),
    ]);

    assert!(ops.iter().any(|op| matches!(
        op,
        Op::Call { fun, args, .. }
            if fun == "造物" && args.first().map(|a| &a.value) == Some(&Value::Iden("Date".into()))
    )));
    assert!(matches!(ops.last(), Some(Op::Print)));
}

#[test]
fn test_dynamic_index_write_routes_through_wrapper() {
    // let o = {}; let k = "a"; o[k] = 1;
    let ops = lower(vec![
        let_("o", object(vec![])),
        let_("k", str_("a")),
        expr_stmt(assign(index(ident("o"), ident("k")), num(1.0))),
    ]);

    let at = ops
        .iter()
        .position(|op| matches!(op, Op::Call { fun, .. } if fun == "賦值"))
        .expect("expected the index-assign wrapper call");
    match &ops[at] {
        Op::Call { args, .. } => {
            assert_eq!(args.len(), 3);
            assert_eq!(args[0].value, Value::Iden("o".into()));
            assert_eq!(args[2].value, Value::Num(1.0));
        }
        _ => unreachable!(),
    }
    assert!(matches!(ops[at + 1], Op::Discard));
}

#[test]
fn test_ambient_wrapper_body_is_call_signature() {
    let ops = lower(vec![expr_stmt(call(ident("alert"), vec![num(1.0)]))]);

    let payload = ops
        .iter()
        .find_map(|op| match op {
            Op::Return { value: Some(t), .. } => match &t.value {
                Value::Data(s) => Some(s.as_str()),
                _ => None,
            },
            _ => None,
        })
        .expect("expected a wrapper body payload");
    assert_eq!(payload, "alert(_a0,)");
}

#[test]
fn test_dotted_ambient_path_keeps_its_segments() {
    let ops = lower(vec![expr_stmt(call(
        member(member(ident("JSON"), "parse"), "call"),
        vec![str_("{}")],
    ))]);

    assert!(ops.iter().any(|op| matches!(
        op,
        Op::Return { value: Some(t), .. }
            if t.value == Value::Data("JSON.parse.call(_a0,)".into())
    )));
}

#[test]
fn test_wrapper_block_separated_by_comment() {
    let ops = lower(vec![
        let_("x", num(1.0)),
        expr_stmt(call(ident("alert"), vec![ident("x")])),
    ]);

    let comment = ops
        .iter()
        .position(|op| matches!(op, Op::Comment { .. }))
        .expect("expected a separator comment");
    // everything before the separator is wrapper machinery
    for op in &ops[..comment] {
        assert!(
            matches!(
                op,
                Op::Var { .. } | Op::Fun { .. } | Op::FunBody | Op::Return { .. } | Op::FunEnd
            ),
            "unexpected op before separator: {op:?}"
        );
    }
}
