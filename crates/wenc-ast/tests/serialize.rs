//! JSON interchange tests for the tree contract

use wenc_ast::build::*;
use wenc_ast::{BinOp, Program, Stmt};

#[test]
fn test_program_round_trips_through_json() {
    let prog = program(vec![
        let_("a", binary(BinOp::Add, num(1.0), num(2.0))),
        expr_stmt(call(member(ident("console"), "log"), vec![ident("a")])),
        for_count("i", num(3.0), vec![expr_stmt(post_incr("i"))]),
    ]);
    let json = serde_json::to_string(&prog).unwrap();
    let back: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(back, prog);
}

#[test]
fn test_front_end_payload_deserializes() {
    // the shape an external parser ships: externally tagged nodes, spans as
    // byte offsets
    let json = r#"{
        "body": [
            {
                "VarDecl": {
                    "declarators": [
                        {
                            "name": { "name": "x", "span": { "start": 4, "end": 5 } },
                            "init": { "Num": { "value": 1.0, "span": { "start": 8, "end": 9 } } },
                            "span": { "start": 4, "end": 9 }
                        }
                    ],
                    "span": { "start": 0, "end": 10 }
                }
            }
        ]
    }"#;
    let prog: Program = serde_json::from_str(json).unwrap();
    assert_eq!(prog.body.len(), 1);
    let Stmt::VarDecl(decl) = &prog.body[0] else { panic!("expected a declaration") };
    assert_eq!(decl.declarators[0].name.name, "x");
}
