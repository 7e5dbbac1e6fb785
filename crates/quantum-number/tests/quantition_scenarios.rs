//! End-to-end Quantition scenarios through the public API.

use quantum_number::{
    create_function, create_leaf, create_operation, create_variable, has_variables, height,
    node_count, quantition, simplify, substitute, AtomicUnit, Bindings, Engine, EvalState,
    Expression, FunctionKind, Node, NodePath, OperationKind, QnError, QuantitionCache, StepKind,
};

fn int(n: i32) -> Node {
    create_leaf(AtomicUnit::from(n))
}

fn binary(kind: OperationKind, lhs: Node, rhs: Node) -> Node {
    create_operation(kind, vec![lhs, rhs]).unwrap()
}

// =============================================================================
// Tree Metrics
// =============================================================================

#[test]
fn leaf_metrics() {
    let leaf = int(7);
    assert_eq!(height(&leaf), 1);
    assert_eq!(node_count(&leaf), 1);
    assert!(!has_variables(&leaf));
}

#[test]
fn binary_metrics() {
    let tree = binary(OperationKind::Add, int(1), int(2));
    assert_eq!(height(&tree), 2);
    assert_eq!(node_count(&tree), 3);
}

#[test]
fn node_count_recurses() {
    // -(sqrt(x) × (1 - 2))
    let tree = Node::neg(binary(
        OperationKind::Multiply,
        create_function(FunctionKind::Sqrt, create_variable("x")),
        binary(OperationKind::Subtract, int(1), int(2)),
    ));
    let children: usize = tree.children().iter().map(node_count).sum();
    assert_eq!(node_count(&tree), 1 + children);
    assert_eq!(node_count(&tree), 7);
    assert_eq!(height(&tree), 4);
    assert!(has_variables(&tree));
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn operation_arity_is_checked() {
    assert_eq!(
        create_operation(OperationKind::Add, vec![int(1)]),
        Err(QnError::Arity {
            kind: OperationKind::Add,
            expected: 2,
            found: 1
        })
    );
    assert!(create_operation(OperationKind::Negate, vec![int(1), int(2)]).is_err());
    assert!(create_operation(OperationKind::Negate, vec![int(1)]).is_ok());
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn end_to_end_arithmetic() {
    assert_eq!(quantition(&binary(OperationKind::Add, int(1), int(2))), Ok(AtomicUnit::from(3)));
    assert_eq!(quantition(&binary(OperationKind::Subtract, int(5), int(3))), Ok(AtomicUnit::from(2)));
    assert_eq!(quantition(&binary(OperationKind::Multiply, int(4), int(3))), Ok(AtomicUnit::from(12)));
}

#[test]
fn substitution_resolves_parametric_tree() {
    let tree = binary(OperationKind::Add, create_variable("x"), int(1));
    assert!(matches!(quantition(&tree), Err(QnError::UnboundVariable { name }) if name == "x"));

    let bound = substitute(&tree, "x", AtomicUnit::from(41));
    assert!(!has_variables(&bound));
    assert_eq!(quantition(&bound), Ok(AtomicUnit::from(42)));
    // the original tree is untouched
    assert!(has_variables(&tree));
}

#[test]
fn quantition_is_deterministic() {
    let tree = binary(
        OperationKind::Divide,
        binary(OperationKind::Multiply, int(-9), int(4)),
        create_function(FunctionKind::Abs, int(-5)),
    );
    let first = quantition(&tree);
    for _ in 0..10 {
        assert_eq!(quantition(&tree), first);
    }
    assert_eq!(first, Ok(AtomicUnit::from(-7)));
}

#[test]
fn divide_by_zero_flows_through_as_sentinel() {
    let tree = binary(
        OperationKind::Add,
        binary(OperationKind::Divide, int(1), int(0)),
        int(5),
    );
    let value = quantition(&tree).unwrap();
    assert!(value.is_symbolic_undefined());
    assert!(value.verify());
}

#[test]
fn reserved_functions_fail() {
    for kind in FunctionKind::ALL.into_iter().filter(|k| !k.is_supported()) {
        let tree = create_function(kind, int(1));
        assert_eq!(quantition(&tree), Err(QnError::UnsupportedOperation { kind }));
    }
}

#[test]
fn complex_values_flow_through() {
    let tree = create_function(
        FunctionKind::Conjugate,
        binary(
            OperationKind::Add,
            create_leaf(AtomicUnit::complex(1, 2)),
            create_leaf(AtomicUnit::complex(2, 1)),
        ),
    );
    assert_eq!(quantition(&tree), Ok(AtomicUnit::complex(3, -3)));
}

// =============================================================================
// Engine Configuration
// =============================================================================

#[test]
fn bindings_cache_and_simplification_together() {
    // ((x × 1) + 0) × (x + y)
    let x_plus_y = binary(OperationKind::Add, create_variable("x"), create_variable("y"));
    let tree = binary(
        OperationKind::Multiply,
        binary(
            OperationKind::Add,
            binary(OperationKind::Multiply, create_variable("x"), create_leaf(AtomicUnit::one())),
            int(0),
        ),
        x_plus_y,
    );
    let bindings: Bindings = [("x", AtomicUnit::from(3)), ("y", AtomicUnit::from(4))]
        .into_iter()
        .collect();
    let mut cache = QuantitionCache::new();

    let value = Engine::new()
        .with_bindings(&bindings)
        .with_cache(&mut cache)
        .simplify_first(true)
        .quantition(&tree);
    assert_eq!(value, Ok(AtomicUnit::from(21)));
    // x × (x + y): two internal nodes once simplified
    assert_eq!(cache.len(), 2);

    let again = Engine::new()
        .with_bindings(&bindings)
        .with_cache(&mut cache)
        .simplify_first(true)
        .quantition(&tree);
    assert_eq!(again, value);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn simplify_preserves_value() {
    // (-(12 / 1) × 1) - 0
    let tree = binary(
        OperationKind::Subtract,
        binary(
            OperationKind::Multiply,
            Node::neg(binary(OperationKind::Divide, int(12), create_leaf(AtomicUnit::one()))),
            create_leaf(AtomicUnit::one()),
        ),
        int(0),
    );
    let simplified = simplify(&tree);
    assert_eq!(simplified, Node::neg(int(12)));
    assert_eq!(simplify(&simplified), simplified);
    // Negative zeros in slots `b` through `l` survive the rewrite.
    let value = quantition(&tree).unwrap();
    assert_eq!(value, -AtomicUnit::from(12));
    assert_eq!(quantition(&simplified), Ok(value));
}

#[test]
fn simplify_keeps_leading_zero_subtraction() {
    // 0 - 3 is a positive-zero unit; -(3) would carry negative zeros.
    let tree = binary(OperationKind::Subtract, int(0), int(3));
    assert_eq!(simplify(&tree), tree);
    let plain = quantition(&tree);
    assert_eq!(plain, Ok(AtomicUnit::from(-3)));
    assert_eq!(Engine::new().simplify_first(true).quantition(&tree), plain);
}

// =============================================================================
// Derivations and Expressions
// =============================================================================

#[test]
fn derivation_records_post_order_with_paths() {
    // (1 + 2) × -(3)
    let tree = binary(
        OperationKind::Multiply,
        binary(OperationKind::Add, int(1), int(2)),
        Node::neg(int(3)),
    );
    let (value, derivation) = Engine::new().trace(&tree).unwrap();
    assert_eq!(value, AtomicUnit::from(-9));
    assert_eq!(
        derivation.kinds(),
        [
            StepKind::Operation(OperationKind::Add),
            StepKind::Operation(OperationKind::Negate),
            StepKind::Operation(OperationKind::Multiply),
        ]
    );
    let paths: Vec<String> = derivation.steps().iter().map(|s| s.path.to_string()).collect();
    assert_eq!(paths, ["/0", "/1", "/"]);
    assert_eq!(derivation.steps()[0].path.parent(), Some(NodePath::root()));
    assert_eq!(derivation.steps()[0].result, AtomicUnit::from(3));
}

#[test]
fn equal_evaluations_share_derivation_ids() {
    let tree = binary(OperationKind::Add, int(1), int(2));
    let (_, a) = Engine::new().trace(&tree).unwrap();
    let (_, b) = Engine::new().trace(&tree.clone()).unwrap();
    assert_eq!(a.id(), b.id());

    let other = binary(OperationKind::Add, int(2), int(2));
    let (_, c) = Engine::new().trace(&other).unwrap();
    assert_ne!(a.id(), c.id());
}

#[test]
fn expression_lifecycle() {
    // 8 + (5 × 0)
    let expression = Expression::from(binary(
        OperationKind::Add,
        int(8),
        binary(OperationKind::Multiply, int(5), int(0)),
    ));
    assert_eq!(expression.state(), EvalState::Unevaluated);

    let simplified = expression.simplify();
    assert_eq!(simplified.state(), EvalState::Simplified);
    assert_eq!(simplified.root(), &int(8));
    assert_eq!(simplified.quantition(), Ok(AtomicUnit::from(8)));
    assert_eq!(simplified.state(), EvalState::Resolved);
    assert!(simplified.derivation().unwrap().is_empty());

    assert_eq!(expression.quantition(), simplified.quantition());
    assert_eq!(expression.derivation().unwrap().len(), 2);
}
