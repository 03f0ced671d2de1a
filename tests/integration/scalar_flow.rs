use flexval::domain::rules::Messages;
use flexval::engine::rule::{alnum, compose_rules, no_whitespace, not_blank};
use flexval::engine::validator::{RuleSpecOptions, Rules, Validator, ValidatorOptions};
use serde_json::json;

fn messages(entries: &[(&str, &str)]) -> Messages {
    entries
        .iter()
        .map(|(id, message)| (id.to_string(), message.to_string()))
        .collect()
}

fn listed_validator() -> Validator {
    Validator::with_options(Messages::new(), ValidatorOptions::default().disable_rule_names())
}

#[test]
fn grouped_scalar_reports_under_the_group() {
    let mut validator = listed_validator();
    let rules: Rules = compose_rules([not_blank()]).into();

    let value = validator
        .validate(
            &json!(""),
            &rules,
            Some("group"),
            &messages(&[("notBlank", "The value should not be blank.")]),
        )
        .expect("valid spec");

    assert_eq!(value, json!(""));
    assert_eq!(
        validator.error("group"),
        Some(&json!("The value should not be blank."))
    );
    assert_eq!(validator.values(), &json!({"group": ""}));
}

#[test]
fn ungrouped_scalar_reports_under_index_zero() {
    let mut validator = listed_validator();
    let rules: Rules = compose_rules([not_blank(), alnum("_"), no_whitespace()]).into();

    let value = validator
        .validate(&json!("Flex Validator"), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(value, json!("Flex Validator"));
    assert!(!validator.is_valid());
    assert_eq!(
        validator.error("0"),
        Some(&json!("\"Flex Validator\" must not contain whitespace"))
    );
}

#[test]
fn call_group_wins_over_options_group() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().use_dot_error_keys());
    let rules: Rules = RuleSpecOptions::new(vec![no_whitespace()])
        .with_group("specificGroup")
        .into();

    let value = validator
        .validate(&json!("a b"), &rules, Some("global"), &Messages::new())
        .expect("valid spec");

    assert_eq!(value, json!("a b"));
    assert_eq!(validator.value("global"), Some(&json!("a b")));
    assert_eq!(
        validator.errors(),
        &json!({"global": {"noWhitespace": "\"a b\" must not contain whitespace"}})
    );
    assert_eq!(validator.value("specificGroup"), None);
}

#[test]
fn options_group_applies_without_call_group() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().use_dot_error_keys());
    let rules: Rules = RuleSpecOptions::new(vec![no_whitespace()])
        .with_group("specificGroup")
        .into();

    let value = validator
        .validate(&json!("a b"), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(value, json!("a b"));
    assert_eq!(
        validator.errors(),
        &json!({"specificGroup": {"noWhitespace": "\"a b\" must not contain whitespace"}})
    );
}

#[test]
fn call_group_applies_when_options_have_none() {
    let mut validator = Validator::default();
    let rules: Rules = RuleSpecOptions::new(vec![not_blank()])
        .with_message("notBlank", "required")
        .into();

    validator
        .validate(&json!(null), &rules, Some("global"), &Messages::new())
        .expect("valid spec");

    assert_eq!(validator.errors_at("global"), json!({"notBlank": "required"}));
    assert_eq!(validator.value("global"), Some(&json!(null)));
}

#[test]
fn empty_group_counts_as_absent() {
    let mut validator = Validator::default();
    let rules: Rules = RuleSpecOptions::new(vec![not_blank()]).with_group("").into();

    validator
        .validate(&json!("ok"), &rules, Some(""), &Messages::new())
        .expect("valid spec");

    assert_eq!(validator.values(), &json!({"0": "ok"}));
}

#[test]
fn stores_accumulate_across_calls_until_reset() {
    let mut validator = listed_validator();
    let rules: Rules = compose_rules([not_blank()]).into();

    validator
        .validate(&json!(""), &rules, Some("first"), &Messages::new())
        .expect("valid spec");
    validator
        .validate(&json!("filled"), &rules, Some("second"), &Messages::new())
        .expect("valid spec");

    assert_eq!(validator.values(), &json!({"first": "", "second": "filled"}));
    assert_eq!(
        validator.errors_at("first"),
        json!(["\"\" must not be blank"])
    );

    validator.reset();
    assert!(validator.is_valid());
    assert_eq!(validator.values(), &json!({}));
}
