//! End-to-end lowering tests for declarations, prints, and calls

use wenc_ast::build::*;
use wenc_ast::BinOp;
use wenc_lower::{lower_program, Op, Triple, Type, Value};

fn lower(stmts: Vec<wenc_ast::Stmt>) -> Vec<Op> {
    lower_program(&program(stmts), "").expect("lowering failed")
}

#[test]
fn test_single_use_value_prints_through_slot() {
    // let a = 1 + 2; console.log(a);
    let ops = lower(vec![
        let_("a", binary(BinOp::Add, num(1.0), num(2.0))),
        expr_stmt(call(member(ident("console"), "log"), vec![ident("a")])),
    ]);

    assert_eq!(ops.len(), 2, "no staging expected: {ops:?}");
    assert!(matches!(ops[0], Op::Binary { .. }));
    assert!(matches!(ops[1], Op::Print));
}

#[test]
fn test_reused_value_keeps_its_name() {
    // let a = 1 + 2; console.log(a); console.log(a);
    let log = |e| expr_stmt(call(member(ident("console"), "log"), vec![e]));
    let ops = lower(vec![
        let_("a", binary(BinOp::Add, num(1.0), num(2.0))),
        log(ident("a")),
        log(ident("a")),
    ]);

    assert!(
        ops.iter().any(|op| matches!(op, Op::Name { names } if names == &["a".to_string()])),
        "a is read twice and must stay named: {ops:?}"
    );
}

#[test]
fn test_container_push_and_length() {
    // let arr = []; arr.push(1); arr.push(2); console.log(arr.length);
    let push = |v| expr_stmt(call(member(ident("arr"), "push"), vec![v]));
    let ops = lower(vec![
        let_("arr", array(vec![])),
        push(num(1.0)),
        push(num(2.0)),
        expr_stmt(call(
            member(ident("console"), "log"),
            vec![member(ident("arr"), "length")],
        )),
    ]);

    assert_eq!(ops.len(), 5, "{ops:?}");
    assert!(matches!(&ops[0], Op::Var { ty: Type::Container, .. }));
    assert!(matches!(&ops[1], Op::Push { container, .. } if container == "arr"));
    assert!(matches!(&ops[2], Op::Push { .. }));
    assert!(matches!(&ops[3], Op::Length { container } if container == "arr"));
    assert!(matches!(ops[4], Op::Print));
}

#[test]
fn test_array_literal_with_elements_pushes_once() {
    let ops = lower(vec![let_("xs", array(vec![num(1.0), num(2.0), num(3.0)]))]);

    assert_eq!(ops.len(), 2);
    match &ops[1] {
        Op::Push { container, values, .. } => {
            assert_eq!(container, "xs");
            assert_eq!(values.len(), 3);
        }
        other => panic!("expected push, got {other:?}"),
    }
}

#[test]
fn test_function_declaration_and_direct_call() {
    // function add(a, b) { return a + b; } let s = add(1, 2); console.log(s);
    let ops = lower(vec![
        func_decl(
            "add",
            &["a", "b"],
            vec![ret(Some(binary(BinOp::Add, ident("a"), ident("b"))))],
        ),
        let_("s", call(ident("add"), vec![num(1.0), num(2.0)])),
        expr_stmt(call(member(ident("console"), "log"), vec![ident("s")])),
    ]);

    assert!(matches!(&ops[0], Op::Var { ty: Type::Function, names, .. } if names == &["add".to_string()]));
    assert!(matches!(&ops[1], Op::Fun { arity: 2, .. }));

    // the staged sum folds into the return
    let ret_op = ops
        .iter()
        .find_map(|op| match op {
            Op::Return { value, .. } => value.as_ref(),
            _ => None,
        })
        .expect("no return op");
    assert!(ret_op.is_ans(), "{ops:?}");

    assert!(ops
        .iter()
        .any(|op| matches!(op, Op::Call { fun, args, .. } if fun == "add" && args.len() == 2)));
    assert!(matches!(ops.last(), Some(Op::Print)));
    assert!(
        !ops.iter().any(|op| matches!(op, Op::Name { .. })),
        "every staging name should fold away: {ops:?}"
    );
}

#[test]
fn test_object_property_write_and_read() {
    // let o = {}; o.x = 5; console.log(o.x);
    let ops = lower(vec![
        let_("o", object(vec![])),
        expr_stmt(assign(member(ident("o"), "x"), num(5.0))),
        expr_stmt(call(
            member(ident("console"), "log"),
            vec![member(ident("o"), "x")],
        )),
    ]);

    assert!(matches!(&ops[0], Op::Var { ty: Type::Object, .. }));
    match &ops[1] {
        Op::Reassign { lhs, lhssubs: Some(subs), rhs } => {
            assert_eq!(lhs.value, Value::Iden("o".into()));
            assert_eq!(subs.value, Value::Str(Some("x".into())));
            assert_eq!(rhs.value, Value::Num(5.0));
        }
        other => panic!("expected subscripted reassign, got {other:?}"),
    }
    assert!(matches!(&ops[2], Op::Subscript { container, .. } if container == "o"));
}

#[test]
fn test_compound_assignment_desugars_through_slot() {
    // let n = 1; n += 2;
    let ops = lower(vec![
        let_("n", num(1.0)),
        expr_stmt(compound_assign(BinOp::Add, ident("n"), num(2.0))),
    ]);

    assert!(matches!(&ops[1], Op::Binary { op, .. } if *op == wenc_lower::BinOp::Add));
    match &ops[2] {
        Op::Reassign { lhs, lhssubs: None, rhs } => {
            assert_eq!(lhs.value, Value::Iden("n".into()));
            assert!(rhs.is_ans());
        }
        other => panic!("expected reassign from slot, got {other:?}"),
    }
}

#[test]
fn test_concat_chain_collapses_to_cat() {
    // let all = a.concat(b).concat(c);
    let inner = call(member(ident("a"), "concat"), vec![ident("b")]);
    let outer = call(member(inner, "concat"), vec![ident("c")]);
    let ops = lower(vec![
        let_("a", array(vec![])),
        let_("b", array(vec![])),
        let_("c", array(vec![])),
        let_("all", outer),
    ]);

    match &ops[3] {
        Op::Cat { containers, .. } => {
            assert_eq!(containers, &["a".to_string(), "b".to_string(), "c".to_string()]);
        }
        other => panic!("expected cat, got {other:?}"),
    }
    assert!(matches!(&ops[4], Op::Name { names } if names == &["all".to_string()]));
}

#[test]
fn test_slice_rest_lowers_to_rest_subscript() {
    // let rest = xs.slice(1);
    let ops = lower(vec![
        let_("xs", array(vec![num(1.0), num(2.0)])),
        let_("rest", call(member(ident("xs"), "slice"), vec![num(1.0)])),
    ]);

    assert!(ops.iter().any(|op| matches!(
        op,
        Op::Subscript { container, value }
            if container == "xs" && matches!(value.value, Value::Ctnr(wenc_lower::CtnrOp::Rest))
    )));
}

#[test]
fn test_literal_subscript_shifts_to_one_indexed() {
    // let x = xs[0];
    let ops = lower(vec![
        let_("xs", array(vec![num(9.0)])),
        let_("x", index(ident("xs"), num(0.0))),
    ]);

    assert!(ops.iter().any(|op| matches!(
        op,
        Op::Subscript { value, .. } if value.value == Value::Num(1.0)
    )));
}

#[test]
fn test_multi_argument_print_stages_values_unnamed() {
    // let a = 1; let b = 2; console.log(a, b); with both reused later
    let ops = lower(vec![
        let_("a", num(1.0)),
        let_("b", num(2.0)),
        expr_stmt(call(
            member(ident("console"), "log"),
            vec![ident("a"), ident("b")],
        )),
        expr_stmt(assign(ident("a"), ident("b"))),
    ]);

    let staging = ops
        .iter()
        .find_map(|op| match op {
            Op::Var { names, values, .. } if names.is_empty() => Some(values),
            _ => None,
        })
        .expect("expected an unnamed staging declaration");
    assert_eq!(staging.len(), 2);
}

#[test]
fn test_lower_to_json_round_trips() {
    let prog = program(vec![
        let_("a", num(1.0)),
        expr_stmt(call(member(ident("console"), "log"), vec![ident("a")])),
    ]);
    let ops = lower_program(&prog, "").unwrap();
    let json = wenc_lower::lower_to_json(&prog, "").unwrap();
    let back: Vec<Op> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ops);
}

#[test]
fn test_empty_string_declares_bare_binding() {
    let ops = lower(vec![let_("s", str_(""))]);
    match &ops[0] {
        Op::Var { names, values, ty } => {
            assert_eq!(names, &["s".to_string()]);
            assert!(values.is_empty());
            assert_eq!(*ty, Type::String);
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn test_triple_positions_survive_serialization() {
    let t = Triple::num(3.0);
    let json = serde_json::to_string(&t).unwrap();
    let back: Triple = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
