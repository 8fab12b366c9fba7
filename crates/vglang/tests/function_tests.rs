use std::rc::Rc;

use pretty_assertions::assert_eq;
use vglang::ast::*;
use vglang::{Builtin, Interpreter, RuntimeError, Value};

fn run(stmts: Vec<Stmt>) -> Interpreter {
    let mut interp = Interpreter::new();
    interp
        .run(&Program { body: stmts })
        .expect("program should run");
    interp
}

fn get(interp: &Interpreter, name: &str) -> Value {
    interp.read_variable(name).expect("variable should exist")
}

fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::default())
}

fn fn_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::FnDecl {
        name: name.into(),
        params: params.iter().map(|p| p.to_string()).collect(),
        body,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Declaration and invocation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn declared_function_is_callable() {
    let interp = run(vec![
        fn_decl(
            "add",
            &["a", "b"],
            vec![Stmt::ret(Some(bin(
                BinOp::Add,
                Expr::ident("a"),
                Expr::ident("b"),
            )))],
        ),
        Stmt::var("r", Expr::call("add", vec![Expr::int(2), Expr::int(3)])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(5));
}

#[test]
fn falling_through_returns_null() {
    let interp = run(vec![
        fn_decl("noop", &[], vec![Stmt::var("local", Expr::int(1))]),
        Stmt::var("r", Expr::call("noop", vec![])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Null);
}

#[test]
fn return_without_expression_yields_null() {
    let interp = run(vec![
        fn_decl("f", &[], vec![Stmt::ret(None)]),
        Stmt::var("r", Expr::call("f", vec![])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Null);
}

#[test]
fn return_exits_early() {
    let interp = run(vec![
        Stmt::var("after", Expr::bool(false)),
        fn_decl(
            "f",
            &[],
            vec![
                Stmt::ret(Some(Expr::int(1))),
                Stmt::assign("after", Expr::bool(true)),
            ],
        ),
        Stmt::var("r", Expr::call("f", vec![])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(1));
    assert_eq!(get(&interp, "after"), Value::Bool(false));
}

#[test]
fn wrong_argument_count_reports_expected_and_actual() {
    let mut interp = Interpreter::new();
    let err = interp
        .run(&Program {
            body: vec![
                fn_decl("f", &["a", "b"], vec![]),
                Stmt::expr(Expr::call("f", vec![Expr::int(1)])),
            ],
        })
        .unwrap_err();
    match err {
        RuntimeError::ArgumentCount {
            name,
            expected,
            actual,
            ..
        } => {
            assert_eq!(name, "f");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn argument_count_message_is_friendly() {
    let err = RuntimeError::ArgumentCount {
        name: "f".into(),
        expected: 2,
        actual: 1,
        span: None,
    };
    assert_eq!(
        err.to_string(),
        "function 'f' expects 2 arguments, got 1 (1 too few)"
    );
}

#[test]
fn calling_an_undefined_function_is_a_name_error() {
    let mut interp = Interpreter::new();
    let err = interp
        .eval_expression(&Expr::call("ghost", vec![]))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UndefinedName { .. }));
}

#[test]
fn recursion_works() {
    let interp = run(vec![
        fn_decl(
            "fact",
            &["n"],
            vec![
                stmt(StmtKind::If {
                    cond: bin(BinOp::Le, Expr::ident("n"), Expr::int(1)),
                    then: vec![Stmt::ret(Some(Expr::int(1)))],
                    elifs: vec![],
                    else_body: None,
                }),
                Stmt::ret(Some(bin(
                    BinOp::Mul,
                    Expr::ident("n"),
                    Expr::call(
                        "fact",
                        vec![bin(BinOp::Sub, Expr::ident("n"), Expr::int(1))],
                    ),
                ))),
            ],
        ),
        Stmt::var("r", Expr::call("fact", vec![Expr::int(6)])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(720));
}

#[test]
fn runaway_recursion_hits_the_depth_limit() {
    let mut interp = Interpreter::new();
    interp.set_max_call_depth(50);
    let err = interp
        .run(&Program {
            body: vec![
                fn_decl("loop_forever", &[], vec![Stmt::ret(Some(Expr::call(
                    "loop_forever",
                    vec![],
                )))]),
                Stmt::expr(Expr::call("loop_forever", vec![])),
            ],
        })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::StackOverflow { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Dynamic scope resolution
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn function_sees_callers_locals() {
    // Name resolution scans the live scope stack, so `probe` reads the
    // local that `caller` declared, not a captured environment.
    let interp = run(vec![
        fn_decl("probe", &[], vec![Stmt::ret(Some(Expr::ident("secret")))]),
        fn_decl(
            "caller",
            &[],
            vec![
                Stmt::var("secret", Expr::int(99)),
                Stmt::ret(Some(Expr::call("probe", vec![]))),
            ],
        ),
        Stmt::var("r", Expr::call("caller", vec![])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(99));
}

#[test]
fn parameter_shadows_callers_binding() {
    let interp = run(vec![
        Stmt::var("x", Expr::int(1)),
        fn_decl("f", &["x"], vec![Stmt::ret(Some(Expr::ident("x")))]),
        Stmt::var("r", Expr::call("f", vec![Expr::int(2)])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(2));
    assert_eq!(get(&interp, "x"), Value::Int(1));
}

#[test]
fn function_locals_do_not_leak_into_the_caller() {
    let interp = run(vec![
        fn_decl("f", &[], vec![Stmt::var("local", Expr::int(1))]),
        Stmt::expr(Expr::call("f", vec![])),
    ]);
    assert!(interp.read_variable("local").is_err());
}

#[test]
fn scope_is_popped_even_when_the_body_raises() {
    let mut interp = Interpreter::new();
    let result = interp.run(&Program {
        body: vec![
            fn_decl(
                "bad",
                &["x"],
                vec![Stmt::expr(bin(BinOp::Div, Expr::int(1), Expr::int(0)))],
            ),
            Stmt::expr(Expr::call("bad", vec![Expr::int(5)])),
        ],
    });
    assert!(result.is_err());
    // The parameter binding must be gone after the failed call
    assert!(interp.read_variable("x").is_err());
    assert_eq!(interp.environment().depth(), 1);
    assert_eq!(interp.environment().call_depth(), 0);
}

#[test]
fn const_assignment_fails_from_inside_a_function() {
    let mut interp = Interpreter::new();
    let err = interp
        .run(&Program {
            body: vec![
                Stmt::new(
                    StmtKind::ConstDecl {
                        name: "LIMIT".into(),
                        init: Expr::int(10),
                    },
                    Span::default(),
                ),
                fn_decl("f", &[], vec![Stmt::assign("LIMIT", Expr::int(0))]),
                Stmt::expr(Expr::call("f", vec![])),
            ],
        })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ConstAssignment { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Functions as values
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn functions_can_be_stored_and_called_through_variables() {
    let interp = run(vec![
        fn_decl("double_it", &["n"], vec![Stmt::ret(Some(bin(
            BinOp::Mul,
            Expr::ident("n"),
            Expr::int(2),
        )))]),
        Stmt::var("op", Expr::ident("double_it")),
        Stmt::var("r", Expr::call("op", vec![Expr::int(21)])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(42));
}

#[test]
fn calling_a_non_function_value_fails() {
    let mut interp = Interpreter::new();
    let err = interp
        .run(&Program {
            body: vec![
                Stmt::var("n", Expr::int(5)),
                Stmt::expr(Expr::call("n", vec![])),
            ],
        })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Function references (callback handles)
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn function_reference_prepends_captured_arguments() {
    let mut interp = Interpreter::new();
    interp
        .run(&Program {
            body: vec![fn_decl(
                "join",
                &["a", "b", "c"],
                vec![Stmt::ret(Some(bin(
                    BinOp::Add,
                    bin(BinOp::Add, Expr::ident("a"), Expr::ident("b")),
                    Expr::ident("c"),
                )))],
            )],
        })
        .unwrap();

    // Build the reference the way an event-source registration would:
    // two arguments bound now, one supplied at fire time.
    let reference = interp
        .eval_expression(&Expr::new(
            ExprKind::FunctionRef {
                path: vec!["join".into()],
                captured: vec![Expr::str("x"), Expr::str("y")],
            },
            Span::default(),
        ))
        .unwrap();

    let Value::FunctionRef(reference) = reference else {
        panic!("expected a function reference");
    };
    let result = interp
        .call_reference(&reference, vec![Value::string("z")])
        .unwrap();
    assert_eq!(result, Value::string("xyz"));
}

#[test]
fn function_reference_is_callable_inside_programs() {
    let interp = run(vec![
        fn_decl("add", &["a", "b"], vec![Stmt::ret(Some(bin(
            BinOp::Add,
            Expr::ident("a"),
            Expr::ident("b"),
        )))]),
        Stmt::var(
            "add_ten",
            Expr::new(
                ExprKind::FunctionRef {
                    path: vec!["add".into()],
                    captured: vec![Expr::int(10)],
                },
                Span::default(),
            ),
        ),
        Stmt::var("r", Expr::call("add_ten", vec![Expr::int(5)])),
    ]);
    assert_eq!(get(&interp, "r"), Value::Int(15));
}

// ═══════════════════════════════════════════════════════════════════════
// Builtins
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn registered_builtin_is_callable_like_a_function() {
    let mut interp = Interpreter::new();
    interp.register_builtin(Builtin::new("host_square", 1, |_, args| {
        match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n * n)),
            _ => Err(RuntimeError::type_mismatch("host_square expects an int")),
        }
    }));
    interp
        .run(&Program {
            body: vec![Stmt::var(
                "r",
                Expr::call("host_square", vec![Expr::int(9)]),
            )],
        })
        .unwrap();
    assert_eq!(interp.read_variable("r").unwrap(), Value::Int(81));
}

#[test]
fn builtin_arity_is_checked() {
    let mut interp = Interpreter::new();
    let err = interp
        .eval_expression(&Expr::call("instanceOf", vec![Expr::int(1)]))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ArgumentCount { .. }));
}

#[test]
fn instance_of_on_a_non_instance_is_false() {
    let mut interp = Interpreter::new();
    let r = interp
        .eval_expression(&Expr::call(
            "instanceOf",
            vec![Expr::int(1), Expr::str("A")],
        ))
        .unwrap();
    assert_eq!(r, Value::Bool(false));
}

#[test]
fn host_can_call_vg_functions_directly() {
    let mut interp = Interpreter::new();
    interp
        .run(&Program {
            body: vec![fn_decl("twice", &["n"], vec![Stmt::ret(Some(bin(
                BinOp::Mul,
                Expr::ident("n"),
                Expr::int(2),
            )))])],
        })
        .unwrap();

    let Value::Function(func) = interp.read_variable("twice").unwrap() else {
        panic!("expected a function value");
    };
    let func = Rc::clone(&func);
    assert_eq!(
        interp.call_function(&func, vec![Value::Int(8)]).unwrap(),
        Value::Int(16)
    );
    // Arity violations surface the same way for host calls
    assert!(matches!(
        interp.call_function(&func, vec![]),
        Err(RuntimeError::ArgumentCount { .. })
    ));
}
