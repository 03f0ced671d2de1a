use flexval::domain::rules::Messages;
use flexval::engine::rule::{
    alpha, compose_rules, length, no_whitespace, not_blank, numeric, one_of, optional,
};
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

fn messages(entries: &[(&str, &str)]) -> Messages {
    entries
        .iter()
        .map(|(id, message)| (id.to_string(), message.to_string()))
        .collect()
}

#[test]
fn constructor_defaults_override_engine_messages() {
    let mut validator = Validator::with_options(
        messages(&[("notBlank", "The value should not be empty.")]),
        ValidatorOptions::default()
            .disable_rule_names()
            .use_dot_error_keys(),
    );
    let rules: Rules = FieldRules::new()
        .field("contact.phone", compose_rules([not_blank()]))
        .into();

    validator
        .validate(
            &json!({"contact": {"phone": ""}}),
            &rules,
            None,
            &Messages::new(),
        )
        .expect("valid spec");

    assert_eq!(
        validator.error("contact.phone"),
        Some(&json!("The value should not be empty."))
    );
}

#[test]
fn priority_is_engine_then_defaults_then_global_then_field() {
    let defaults = messages(&[
        ("notBlank", "default blank"),
        ("numeric", "default numeric"),
        ("length", "default length"),
    ]);
    let global = messages(&[("numeric", "global numeric"), ("length", "global length")]);
    let mut validator = Validator::new(defaults);
    let rules: Rules = FieldRules::new()
        .field(
            "contact.phone",
            RuleSpecOptions::new(vec![
                not_blank(),
                numeric(),
                length(Some(4), None),
                no_whitespace(),
            ])
            .with_message("length", "field length"),
        )
        .into();

    validator
        .validate(&sample_data(), &rules, None, &global)
        .expect("valid spec");

    assert_eq!(
        validator.errors_at("contact.phone"),
        json!({
            "notBlank": "default blank",
            "numeric": "global numeric",
            "length": "field length"
        })
    );
}

#[test]
fn field_messages_apply_per_field() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().disable_rule_names());
    let rules: Rules = FieldRules::new()
        .field(
            "name",
            RuleSpecOptions::new(vec![not_blank(), no_whitespace()])
                .with_message("noWhitespace", "The name should not contain spaces."),
        )
        .field(
            "contact.phone",
            RuleSpecOptions::new(vec![not_blank()])
                .with_message("notBlank", "The phone number should not be blank."),
        )
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(
        validator.error("name"),
        Some(&json!("The name should not contain spaces."))
    );
    assert_eq!(
        validator.error("contact.phone"),
        Some(&json!("The phone number should not be blank."))
    );
}

#[test]
fn rule_names_key_entries_unless_disabled() {
    let rules: Rules = FieldRules::new()
        .field("name", RuleSpecOptions::new(vec![not_blank(), no_whitespace()]))
        .into();

    let mut named = Validator::default();
    named
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");
    assert!(!named.is_valid());
    assert_eq!(
        named.errors_at("name"),
        json!({"noWhitespace": "\"Iulian Popa\" must not contain whitespace"})
    );

    let mut listed =
        Validator::with_options(Messages::new(), ValidatorOptions::default().disable_rule_names());
    listed
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");
    assert_eq!(
        listed.errors_at("name"),
        json!(["\"Iulian Popa\" must not contain whitespace"])
    );
}

#[test]
fn one_of_reports_each_branch_with_overrides() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field(
            "name",
            RuleSpecOptions::new(vec![one_of([numeric(), length(Some(0), Some(2))])])
                .with_message("numeric", "Test message")
                .with_message("length", "Test message2"),
        )
        .field(
            "contact.phone",
            RuleSpecOptions::new(vec![one_of([numeric(), length(Some(4), Some(9))])])
                .with_message("numeric", "Numeric message"),
        )
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(
        validator.error("contact.phone.numeric"),
        Some(&json!("Numeric message"))
    );
    assert_eq!(
        validator.error("contact.phone.length"),
        Some(&json!("\"\" must have a length between 4 and 9"))
    );
    assert_eq!(validator.error("name.numeric"), Some(&json!("Test message")));
    assert_eq!(validator.error("name.length"), Some(&json!("Test message2")));
}

#[test]
fn optional_wrapper_reports_inner_rule() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field(
            "name",
            RuleSpecOptions::new(vec![optional(numeric())])
                .with_message("numeric", "Test overwrite wrapper message"),
        )
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(
        validator.error("name.numeric"),
        Some(&json!("Test overwrite wrapper message"))
    );
}

#[test]
fn same_rule_twice_keeps_both_failures() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field(
            "username",
            RuleSpecOptions::new(compose_rules([alpha("_"), alpha(",")])),
        )
        .into();

    validator
        .validate(
            &json!({"username": "iulian.popa"}),
            &rules,
            None,
            &Messages::new(),
        )
        .expect("valid spec");

    assert_eq!(
        validator.errors_at("username"),
        json!({
            "alpha": "\"iulian.popa\" must contain only letters (a-z) and \"_\"",
            "alpha#2": "\"iulian.popa\" must contain only letters (a-z) and \",\""
        })
    );
    assert_eq!(
        validator.error("username.alpha"),
        Some(&json!(
            "\"iulian.popa\" must contain only letters (a-z) and \"_\""
        ))
    );
}

#[test]
fn bare_rule_name_override_covers_repeats() {
    let mut validator =
        Validator::with_options(Messages::new(), ValidatorOptions::default().disable_rule_names());
    let rules: Rules = FieldRules::new()
        .field(
            "username",
            RuleSpecOptions::new(compose_rules([alpha("_"), alpha(",")]))
                .with_message("alpha", "letters only")
                .with_message("alpha#2", "letters and commas only"),
        )
        .into();

    validator
        .validate(
            &json!({"username": "iulian.popa"}),
            &rules,
            None,
            &Messages::new(),
        )
        .expect("valid spec");

    assert_eq!(
        validator.errors_at("username"),
        json!(["letters only", "letters and commas only"])
    );
}

#[test]
fn first_error_of_a_subtree_is_its_first_entry() {
    let mut validator = Validator::default();
    let rules: Rules = FieldRules::new()
        .field("contact.phone", RuleSpecOptions::new(vec![not_blank()]))
        .into();

    validator
        .validate(&sample_data(), &rules, None, &Messages::new())
        .expect("valid spec");

    assert_eq!(
        validator.error("contact"),
        Some(&json!({"notBlank": "\"\" must not be blank"}))
    );
    assert_eq!(validator.error("missing"), None);
    assert_eq!(validator.errors_at("missing"), json!({}));
}
