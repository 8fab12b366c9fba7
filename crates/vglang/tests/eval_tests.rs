use vglang::ast::{BinOp, Expr, ExprKind, Span, UnaryOp};
use vglang::{Interpreter, RuntimeError, Value};

// Helper to evaluate an expression in a fresh interpreter
fn eval(expr: Expr) -> Result<Value, RuntimeError> {
    Interpreter::new().eval_expression(&expr)
}

fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        Span::default(),
    )
}

fn index(target: Expr, idx: Expr) -> Expr {
    Expr::new(
        ExprKind::Index {
            target: Box::new(target),
            index: Box::new(idx),
        },
        Span::default(),
    )
}

fn array(elements: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Array(elements), Span::default())
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic and coercion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn int_addition_stays_int() {
    assert_eq!(
        eval(bin(BinOp::Add, Expr::int(1), Expr::int(2))).unwrap(),
        Value::Int(3)
    );
}

#[test]
fn mixed_addition_widens_to_double() {
    assert_eq!(
        eval(bin(BinOp::Add, Expr::int(1), Expr::double(2.0))).unwrap(),
        Value::Double(3.0)
    );
    assert_eq!(
        eval(bin(BinOp::Mul, Expr::double(1.5), Expr::int(2))).unwrap(),
        Value::Double(3.0)
    );
}

#[test]
fn plus_concatenates_when_either_side_is_string() {
    assert_eq!(
        eval(bin(BinOp::Add, Expr::str("a"), Expr::int(1))).unwrap(),
        Value::string("a1")
    );
    assert_eq!(
        eval(bin(BinOp::Add, Expr::int(1), Expr::str("a"))).unwrap(),
        Value::string("1a")
    );
    assert_eq!(
        eval(bin(BinOp::Add, Expr::str("x"), Expr::double(2.5))).unwrap(),
        Value::string("x2.5")
    );
    assert_eq!(
        eval(bin(BinOp::Add, Expr::str("v="), Expr::null())).unwrap(),
        Value::string("v=null")
    );
}

#[test]
fn minus_on_strings_is_a_type_error() {
    assert!(matches!(
        eval(bin(BinOp::Sub, Expr::str("a"), Expr::int(1))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn integer_division_truncates() {
    assert_eq!(
        eval(bin(BinOp::Div, Expr::int(7), Expr::int(2))).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        eval(bin(BinOp::Div, Expr::double(7.0), Expr::int(2))).unwrap(),
        Value::Double(3.5)
    );
}

#[test]
fn division_by_zero_is_fatal() {
    assert!(matches!(
        eval(bin(BinOp::Div, Expr::int(5), Expr::int(0))),
        Err(RuntimeError::DivisionByZero { .. })
    ));
    assert!(matches!(
        eval(bin(BinOp::Div, Expr::double(5.0), Expr::double(0.0))),
        Err(RuntimeError::DivisionByZero { .. })
    ));
}

#[test]
fn remainder_works_and_rejects_zero() {
    assert_eq!(
        eval(bin(BinOp::Rem, Expr::int(5), Expr::int(2))).unwrap(),
        Value::Int(1)
    );
    assert!(matches!(
        eval(bin(BinOp::Rem, Expr::int(5), Expr::int(0))),
        Err(RuntimeError::DivisionByZero { .. })
    ));
}

#[test]
fn arithmetic_on_arrays_is_rejected() {
    assert!(matches!(
        eval(bin(BinOp::Add, array(vec![]), Expr::int(1))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Relational and equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn relational_compares_mixed_numerics() {
    assert_eq!(
        eval(bin(BinOp::Lt, Expr::int(1), Expr::double(1.5))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(BinOp::Ge, Expr::int(2), Expr::int(2))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(BinOp::Gt, Expr::int(1), Expr::int(3))).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn relational_requires_numbers() {
    assert!(matches!(
        eval(bin(BinOp::Lt, Expr::str("a"), Expr::int(1))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn equality_is_value_equality() {
    assert_eq!(
        eval(bin(BinOp::Eq, Expr::int(1), Expr::int(1))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(BinOp::Eq, Expr::str("a"), Expr::str("a"))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(BinOp::Eq, Expr::null(), Expr::null())).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(
            BinOp::Eq,
            array(vec![Expr::int(1), Expr::int(2)]),
            array(vec![Expr::int(1), Expr::int(2)]),
        ))
        .unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn int_and_double_are_never_equal() {
    assert_eq!(
        eval(bin(BinOp::Eq, Expr::int(1), Expr::double(1.0))).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        eval(bin(BinOp::Ne, Expr::int(1), Expr::double(1.0))).unwrap(),
        Value::Bool(true)
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Logical operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn logical_results_are_booleans() {
    assert_eq!(
        eval(bin(BinOp::And, Expr::int(1), Expr::int(2))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(bin(BinOp::Or, Expr::int(0), Expr::str(""))).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn and_short_circuits_on_falsy_left() {
    // The right operand is an undefined variable; it must not be evaluated
    assert_eq!(
        eval(bin(BinOp::And, Expr::bool(false), Expr::ident("nope"))).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn or_short_circuits_on_truthy_left() {
    assert_eq!(
        eval(bin(BinOp::Or, Expr::bool(true), Expr::ident("nope"))).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn truthiness_follows_coercion_rules() {
    // "0" is a non-empty string, hence truthy
    assert_eq!(
        eval(unary(UnaryOp::Not, Expr::str("0"))).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        eval(unary(UnaryOp::Not, Expr::int(0))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(unary(UnaryOp::Not, Expr::double(0.0))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(unary(UnaryOp::Not, Expr::str(""))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(unary(UnaryOp::Not, Expr::null())).unwrap(),
        Value::Bool(true)
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Unary operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn unary_negation() {
    assert_eq!(eval(unary(UnaryOp::Neg, Expr::int(5))).unwrap(), Value::Int(-5));
    assert_eq!(
        eval(unary(UnaryOp::Neg, Expr::double(2.5))).unwrap(),
        Value::Double(-2.5)
    );
}

#[test]
fn unary_plus_requires_number() {
    assert_eq!(eval(unary(UnaryOp::Plus, Expr::int(5))).unwrap(), Value::Int(5));
    assert!(matches!(
        eval(unary(UnaryOp::Plus, Expr::str("x"))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Indexing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn indexing_reads_elements() {
    let arr = array(vec![Expr::int(10), Expr::int(20), Expr::int(30)]);
    assert_eq!(eval(index(arr, Expr::int(1))).unwrap(), Value::Int(20));
}

#[test]
fn index_out_of_range() {
    let arr = array(vec![Expr::int(10)]);
    let err = eval(index(arr.clone(), Expr::int(3))).unwrap_err();
    match err {
        RuntimeError::IndexOutOfBounds { index: 3, len: 1, .. } => {}
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(matches!(
        eval(index(arr, Expr::int(-1))),
        Err(RuntimeError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn index_must_be_integer() {
    let arr = array(vec![Expr::int(10)]);
    assert!(matches!(
        eval(index(arr, Expr::double(0.5))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn indexing_non_array_fails() {
    assert!(matches!(
        eval(index(Expr::int(1), Expr::int(0))),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Names and members
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn undefined_variable_is_a_name_error() {
    assert!(matches!(
        eval(Expr::ident("missing")),
        Err(RuntimeError::UndefinedName { .. })
    ));
}

#[test]
fn true_and_false_resolve_as_constants() {
    assert_eq!(eval(Expr::ident("true")).unwrap(), Value::Bool(true));
    assert_eq!(eval(Expr::ident("false")).unwrap(), Value::Bool(false));
}

#[test]
fn dot_operator_rejected_on_primitives() {
    assert!(matches!(
        eval(Expr::member(Expr::int(1), "length")),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn this_outside_class_context_fails() {
    let this = Expr::new(ExprKind::This, Span::default());
    assert!(matches!(
        eval(this),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}
