//! Property-based tests: generated sources with independently computed
//! expected values.

use proptest::prelude::*;
use trellis_expression::{parse, tokenize};
use trellis_value::Value;

fn arb_op() -> impl Strategy<Value = char> {
    prop_oneof![Just('+'), Just('-'), Just('*')]
}

/// Fully parenthesized arithmetic trees paired with the value they
/// fold to. Depth is capped so products stay finite.
fn arb_arithmetic() -> impl Strategy<Value = (String, f64)> {
    let leaf = (0i32..100).prop_map(|n| (n.to_string(), f64::from(n)));
    leaf.prop_recursive(4, 32, 2, |inner| {
        (inner.clone(), arb_op(), inner).prop_map(|((ls, lv), op, (rs, rv))| {
            let value = match op {
                '+' => lv + rv,
                '-' => lv - rv,
                _ => lv * rv,
            };
            (format!("({ls} {op} {rs})"), value)
        })
    })
}

fn eval_source(source: &str) -> Value {
    parse(source)
        .unwrap_or_else(|e| panic!("parse({source:?}) failed: {e}"))
        .evaluate(&Value::Undefined)
        .unwrap_or_else(|e| panic!("evaluate({source:?}) failed: {e}"))
}

proptest! {
    #[test]
    fn prop_parenthesized_arithmetic((source, expected) in arb_arithmetic()) {
        prop_assert_eq!(eval_source(&source), Value::Number(expected));
    }

    #[test]
    fn prop_sums_fold_left(values in proptest::collection::vec(-100i32..100, 1..20)) {
        let source = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        let expected: f64 = values.iter().map(|&v| f64::from(v)).sum();
        prop_assert_eq!(eval_source(&source), Value::Number(expected));
    }

    #[test]
    fn prop_scanner_is_total(input in "[ -~]{0,40}") {
        // any printable input either scans or reports an error
        let _ = tokenize(&input);
    }

    #[test]
    fn prop_string_literals_round_trip(text in "[a-zA-Z0-9_ ]{0,20}") {
        let source = format!("'{text}'");
        prop_assert_eq!(eval_source(&source), Value::String(text));
    }

    #[test]
    fn prop_member_chains_collapse_to_one_path(
        segments in proptest::collection::vec("[a-z][a-z0-9]{0,5}", 1..5)
            .prop_filter("head must not be a keyword", |segments| {
                !matches!(
                    segments[0].as_str(),
                    "true" | "false" | "null" | "undefined"
                )
            })
    ) {
        let source = segments.join(".");
        let compiled = parse(&source)
            .unwrap_or_else(|e| panic!("parse({source:?}) failed: {e}"));
        let identifiers: Vec<_> = compiled.identifiers().iter().cloned().collect();
        prop_assert_eq!(identifiers, vec![source.clone()]);
    }
}
