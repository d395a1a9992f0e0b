use serde_json::json;
use verdict::predicates::{equals, equals_field, in_range};
use verdict::{
    Constraint, Document, FieldRule, LazyConstraint, Node, NullContext, Selector,
    ValidationResult, Validator,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn field_must_equal_another_field() {
    init_logging();
    let validator =
        Validator::new().with_rule(FieldRule::new("a", equals_field("b").unwrap()).unwrap());

    let agreeing = Document::new(json!({ "a": 5, "b": 5 }));
    let disagreeing = Document::new(json!({ "a": 5, "b": 6 }));

    assert!(validator.validate(&NullContext, &agreeing).is_valid());
    assert!(!validator.validate(&NullContext, &disagreeing).is_valid());
}

#[test]
fn the_failure_trail_shows_the_resolved_dependency() {
    init_logging();
    let validator =
        Validator::new().with_rule(FieldRule::new("a", equals_field("b").unwrap()).unwrap());
    let document = Document::new(json!({ "a": 5, "b": 6 }));
    let result = validator.validate(&NullContext, &document);
    assert!(!result.is_valid());

    let trail = result.to_string();
    assert!(trail.contains("$.b"), "missing dependency location in:\n{trail}");
    assert!(trail.contains('6'), "missing dependency value in:\n{trail}");
}

#[test]
fn one_rule_instance_works_across_documents() {
    // The dependency is resolved from the tested document's own root on every
    // evaluation, so a single rule serves many unrelated documents.
    let validator = Validator::new()
        .with_rule(FieldRule::new("confirm", equals_field("password").unwrap()).unwrap());

    for (confirm, password, expected) in [
        ("hunter2", "hunter2", true),
        ("hunter2", "hunter3", false),
    ] {
        let document = Document::new(json!({ "password": password, "confirm": confirm }));
        assert_eq!(
            validator.validate(&NullContext, &document).is_valid(),
            expected
        );
    }
}

#[test]
fn a_factory_can_build_arbitrary_constraints_from_the_dependency() {
    init_logging();
    // Each line's quantity must not exceed the document-level cap.
    let cap_constraint = Constraint::Lazy(LazyConstraint::new(
        Selector::parse("limits.max_quantity").unwrap(),
        |cap: Option<&Node<'_>>| match cap.and_then(|n| n.value().as_f64()) {
            Some(max) => in_range(0.0, max),
            None => in_range(0.0, f64::MAX),
        },
    ));
    let validator = Validator::new()
        .with_rule(FieldRule::new("lines[*].quantity", cap_constraint).unwrap());

    let within = Document::new(json!({
        "limits": { "max_quantity": 10 },
        "lines": [{ "quantity": 3 }, { "quantity": 10 }]
    }));
    let beyond = Document::new(json!({
        "limits": { "max_quantity": 10 },
        "lines": [{ "quantity": 3 }, { "quantity": 11 }]
    }));

    assert!(validator.validate(&NullContext, &within).is_valid());
    assert!(!validator.validate(&NullContext, &beyond).is_valid());
}

#[test]
fn ambiguous_dependencies_resolve_to_the_first_match() {
    init_logging();
    // `items[*].id` matches several nodes; the first one wins (logged as a
    // warning rather than raised).
    let constraint = Constraint::Lazy(LazyConstraint::new(
        Selector::parse("items[*].id").unwrap(),
        |dep: Option<&Node<'_>>| match dep {
            Some(node) => equals(node.value().clone()),
            None => equals(json!(null)),
        },
    ));
    let validator = Validator::new().with_rule(FieldRule::new("primary", constraint).unwrap());

    let document = Document::new(json!({
        "primary": "first",
        "items": [{ "id": "first" }, { "id": "second" }]
    }));
    assert!(validator.validate(&NullContext, &document).is_valid());
}

#[test]
fn delegated_results_carry_the_resolved_node() {
    let document = Document::new(json!({ "a": 1, "b": 2 }));
    let a = document.select_one(&Selector::parse("a").unwrap()).unwrap();
    let lazy = LazyConstraint::new(
        Selector::parse("b").unwrap(),
        |dep: Option<&Node<'_>>| match dep {
            Some(node) => equals(node.value().clone()),
            None => equals(json!(null)),
        },
    );
    match lazy.evaluate(Some(&a), &NullContext) {
        ValidationResult::Delegated { resolved, inner, .. } => {
            assert_eq!(resolved.unwrap().value(), &json!(2));
            assert!(!inner.is_valid());
        }
        other => panic!("expected a delegated result, got {other:?}"),
    }
}
