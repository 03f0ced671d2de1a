use flexval::domain::rules::Messages;
use flexval::engine::rule::{compose_rules, length, no_whitespace, not_blank, numeric};
use flexval::engine::validator::{FieldRules, RuleSpecOptions, Rules, Validator, ValidatorOptions};
use serde_json::{Value, json};

fn sample_data() -> Value {
    json!({
        "name": "Iulian Popa",
        "contact": {
            "phone": "",
            "address": {
                "number": 192,
                "street": "Parks Road"
            }
        }
    })
}

fn grouped_rules() -> Rules {
    FieldRules::new()
        .field(
            "name",
            RuleSpecOptions::new(vec![not_blank(), no_whitespace()]).with_group("identity"),
        )
        .field("contact.phone", RuleSpecOptions::new(vec![not_blank()]))
        .into()
}

fn has_key(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|map| map.contains_key(key))
}

#[test]
fn nested_mode_decomposes_dotted_field_keys() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field("contact.phone", RuleSpecOptions::new(vec![not_blank()]))
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert!(has_key(validator.errors(), "contact"));
    assert!(!has_key(validator.errors(), "contact.phone"));
    assert!(has_key(&validator.errors_at("contact.phone"), "notBlank"));
}

#[test]
fn dot_mode_keeps_dotted_field_keys_literal() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().use_dot_error_keys());
    let rules: Rules = FieldRules::new()
        .field("contact.phone", RuleSpecOptions::new(vec![not_blank()]))
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert!(has_key(validator.errors(), "contact.phone"));
    assert!(!has_key(validator.errors(), "contact"));
    assert!(has_key(&validator.errors_at("contact.phone"), "notBlank"));
}

#[test]
fn field_group_nests_errors_under_the_group() {
    let mut validator = Validator::default();

    validator
        .validate(&sample_data(), &grouped_rules(), None, &Messages::new())
        .expect("valid spec");

    assert!(has_key(validator.errors(), "identity"));
    assert!(has_key(&validator.errors_at("identity"), "name"));
    assert!(has_key(&validator.errors_at("identity.name"), "noWhitespace"));
    assert!(has_key(validator.errors(), "contact"));
    assert!(has_key(&validator.errors_at("contact"), "phone"));
    assert!(has_key(&validator.errors_at("contact.phone"), "notBlank"));
}

#[test]
fn call_group_applies_only_to_fields_without_their_own() {
    let mut validator = Validator::default();

    validator
        .validate(&sample_data(), &grouped_rules(), Some("global"), &Messages::new())
        .expect("valid spec");

    assert!(has_key(validator.errors(), "identity"));
    assert!(has_key(&validator.errors_at("identity.name"), "noWhitespace"));
    assert!(has_key(validator.errors(), "global"));
    assert!(has_key(
        &validator.errors_at("global.contact.phone"),
        "notBlank"
    ));
    assert_eq!(
        validator.values(),
        &json!({
            "identity": {"name": "Iulian Popa"},
            "global": {"contact": {"phone": ""}}
        })
    );
}

#[test]
fn dot_mode_with_call_group_uses_joined_literal_keys() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().use_dot_error_keys());
    let rules: Rules = FieldRules::new()
        .field(
            "name",
            RuleSpecOptions::new(vec![not_blank(), no_whitespace()]).with_group("identity"),
        )
        .field("contact.phone", RuleSpecOptions::new(vec![not_blank(), numeric()]))
        .field(
            "contact.address.number",
            RuleSpecOptions::new(vec![not_blank(), numeric(), length(Some(4), None)]),
        )
        .into();

    validator
        .validate(&sample_data(), &rules, Some("global"), &Messages::new())
        .expect("valid spec");

    assert!(has_key(validator.errors(), "identity.name"));
    assert!(has_key(&validator.errors_at("identity.name"), "noWhitespace"));
    assert!(has_key(validator.errors(), "global.contact.phone"));
    assert!(has_key(
        &validator.errors_at("global.contact.phone"),
        "notBlank"
    ));
    assert_eq!(
        validator.errors_at("global.contact.address.number"),
        json!({"length": "192 must have a length greater than 4"})
    );
}

#[test]
fn both_modes_expose_the_same_message_for_a_grouped_field() {
    let rules: Rules = FieldRules::new()
        .field("name", compose_rules([no_whitespace()]))
        .into();

    let mut nested = Validator::default();
    nested
        .validate(&sample_data(), &rules, Some("form"), &Messages::new())
        .expect("valid spec");
    let mut dotted =
        Validator::with_options(Messages::new(), ValidatorOptions::default().use_dot_error_keys());
    dotted
        .validate(&sample_data(), &rules, Some("form"), &Messages::new())
        .expect("valid spec");

    assert_eq!(nested.errors_at("form.name"), dotted.errors_at("form.name"));
    assert_eq!(nested.error("form.name"), dotted.error("form.name"));
    assert_eq!(
        nested.errors_at("form")["name"],
        dotted.errors()["form.name"]
    );
}

#[test]
fn values_are_returned_for_passing_and_failing_fields() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field("name", RuleSpecOptions::new(vec![not_blank()]))
        .into();

    let values = validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert!(validator.is_valid());
    assert!(has_key(&values, "name"));
    assert!(!has_key(&values, "contact"));
    assert_eq!(validator.value("name"), Some(&json!("Iulian Popa")));
}
