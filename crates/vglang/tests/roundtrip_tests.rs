use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use vglang::ast::*;
use vglang::{Interpreter, Value};

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::default())
}

/// A deterministic program exercising functions, a loop, a class, and
/// printing: computes sum of squares 1..=4 plus a method call result.
fn sample_program() -> Program {
    let mut counter = ClassDecl {
        name: "Acc".into(),
        superclass: None,
        fields: vec![FieldDecl {
            name: "total".into(),
            default: Some(Expr::int(0)),
            private: false,
            is_static: false,
            is_const: false,
        }],
        constructors: vec![],
        methods: vec![],
    };
    counter.methods.push(MethodDecl {
        name: "add".into(),
        params: vec!["n".into()],
        body: vec![stmt(StmtKind::Assign {
            target: AssignTarget::Field {
                object: Expr::new(ExprKind::This, Span::default()),
                field: "total".into(),
            },
            value: Expr::binary(
                BinOp::Add,
                Expr::member(Expr::new(ExprKind::This, Span::default()), "total"),
                Expr::ident("n"),
            ),
        })],
        private: false,
        is_static: false,
        is_const: false,
        span: Span::default(),
    });

    Program {
        body: vec![
            stmt(StmtKind::FnDecl {
                name: "square".into(),
                params: vec!["n".into()],
                body: vec![Stmt::ret(Some(Expr::binary(
                    BinOp::Mul,
                    Expr::ident("n"),
                    Expr::ident("n"),
                )))],
            }),
            stmt(StmtKind::ClassDecl(counter)),
            Stmt::var(
                "acc",
                Expr::new(
                    ExprKind::New {
                        class: "Acc".into(),
                        args: vec![],
                    },
                    Span::default(),
                ),
            ),
            stmt(StmtKind::For {
                init: Some(Box::new(Stmt::var("i", Expr::int(1)))),
                cond: Some(Expr::binary(BinOp::Le, Expr::ident("i"), Expr::int(4))),
                update: Some(Box::new(Stmt::assign(
                    "i",
                    Expr::binary(BinOp::Add, Expr::ident("i"), Expr::int(1)),
                ))),
                body: vec![stmt(StmtKind::Expr(Expr::new(
                    ExprKind::Call {
                        callee: Box::new(Expr::member(Expr::ident("acc"), "add")),
                        args: vec![Expr::call("square", vec![Expr::ident("i")])],
                    },
                    Span::default(),
                )))],
            }),
            Stmt::var("result", Expr::member(Expr::ident("acc"), "total")),
            stmt(StmtKind::Print(Expr::binary(
                BinOp::Add,
                Expr::str("result="),
                Expr::ident("result"),
            ))),
        ],
    }
}

fn run_capturing(program: &Program) -> (Value, String) {
    let buf = SharedBuf::default();
    let mut interp = Interpreter::with_output(Box::new(buf.clone()));
    interp.run(program).expect("program should run");
    (interp.read_variable("result").unwrap(), buf.contents())
}

#[test]
fn syntax_tree_survives_serialization() {
    let program = sample_program();
    let json = serde_json::to_string(&program).unwrap();
    let restored: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(program, restored);
}

#[test]
fn reevaluating_a_roundtripped_tree_yields_identical_output() {
    let program = sample_program();
    let json = serde_json::to_string(&program).unwrap();
    let restored: Program = serde_json::from_str(&json).unwrap();

    let (value_a, out_a) = run_capturing(&program);
    let (value_b, out_b) = run_capturing(&restored);

    // 1 + 4 + 9 + 16
    assert_eq!(value_a, Value::Int(30));
    assert_eq!(value_a, value_b);
    assert_eq!(out_a, "result=30\n");
    assert_eq!(out_a, out_b);
}

#[test]
fn spans_roundtrip_too() {
    let s = Stmt::new(
        StmtKind::Expr(Expr::new(
            ExprKind::Ident("x".into()),
            Span::new(17, 3),
        )),
        Span::new(17, 0),
    );
    let json = serde_json::to_string(&s).unwrap();
    let restored: Stmt = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.span, Span::new(17, 0));
    assert_eq!(s, restored);
}
