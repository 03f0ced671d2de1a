use regex::Regex;
use serde_json::Value;

use super::{Rule, RuleNode};

/// Rejects `null`, `false`, blank strings and empty collections.
#[derive(Debug, Clone, Copy)]
pub struct NotBlank;

impl Rule for NotBlank {
    fn name(&self) -> &'static str {
        "notBlank"
    }

    fn check(&self, input: &Value) -> bool {
        match input {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(_) => true,
            Value::String(text) => !text.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }

    fn template(&self) -> String {
        "{{name}} must not be blank".to_string()
    }
}

/// Rejects `null`, `""` and empty collections. Whitespace counts as content.
#[derive(Debug, Clone, Copy)]
pub struct NotEmpty;

impl Rule for NotEmpty {
    fn name(&self) -> &'static str {
        "notEmpty"
    }

    fn check(&self, input: &Value) -> bool {
        match input {
            Value::Null => false,
            Value::String(text) => !text.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    fn template(&self) -> String {
        "{{name}} must not be empty".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoWhitespace;

impl Rule for NoWhitespace {
    fn name(&self) -> &'static str {
        "noWhitespace"
    }

    fn check(&self, input: &Value) -> bool {
        match input {
            Value::String(text) => !text.chars().any(char::is_whitespace),
            Value::Array(_) | Value::Object(_) => false,
            _ => true,
        }
    }

    fn template(&self) -> String {
        "{{name}} must not contain whitespace".to_string()
    }
}

/// Numbers, or strings that parse as one.
#[derive(Debug, Clone, Copy)]
pub struct Numeric;

impl Rule for Numeric {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn check(&self, input: &Value) -> bool {
        match input {
            Value::Number(_) => true,
            Value::String(text) => {
                let trimmed = text.trim();
                !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
            }
            _ => false,
        }
    }

    fn template(&self) -> String {
        "{{name}} must be numeric".to_string()
    }
}

/// Character class check shared by `alpha` and `alnum`. Whitespace is allowed.
#[derive(Debug, Clone)]
pub struct CharClass {
    name: &'static str,
    digits: bool,
    extra: String,
}

impl CharClass {
    pub fn alpha(extra: impl Into<String>) -> Self {
        Self {
            name: "alpha",
            digits: false,
            extra: extra.into(),
        }
    }

    pub fn alnum(extra: impl Into<String>) -> Self {
        Self {
            name: "alnum",
            digits: true,
            extra: extra.into(),
        }
    }

    fn accepts(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic()
            || (self.digits && ch.is_ascii_digit())
            || ch.is_whitespace()
            || self.extra.contains(ch)
    }
}

impl Rule for CharClass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, input: &Value) -> bool {
        let text = match input {
            Value::String(text) => text.clone(),
            Value::Number(number) if self.digits => number.to_string(),
            _ => return false,
        };
        !text.is_empty() && text.chars().all(|ch| self.accepts(ch))
    }

    fn template(&self) -> String {
        let class = if self.digits {
            "letters (a-z) and digits (0-9)"
        } else {
            "letters (a-z)"
        };
        if self.extra.is_empty() {
            format!("{{{{name}}}} must contain only {class}")
        } else {
            format!("{{{{name}}}} must contain only {class} and \"{}\"", self.extra)
        }
    }
}

/// Inclusive length bounds over strings, collections and number text.
#[derive(Debug, Clone, Copy)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Length {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    fn measure(input: &Value) -> Option<usize> {
        match input {
            Value::String(text) => Some(text.chars().count()),
            Value::Number(number) => Some(number.to_string().chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            Value::Null | Value::Bool(_) => None,
        }
    }
}

impl Rule for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn check(&self, input: &Value) -> bool {
        let Some(len) = Self::measure(input) else {
            return false;
        };
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }

    fn template(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("{{{{name}}}} must have a length between {min} and {max}")
            }
            (Some(min), None) => format!("{{{{name}}}} must have a length greater than {min}"),
            (None, Some(max)) => format!("{{{{name}}}} must have a length lower than {max}"),
            (None, None) => "{{name}} must have a length".to_string(),
        }
    }
}

/// Strings matching a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl Rule for Pattern {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn check(&self, input: &Value) -> bool {
        input
            .as_str()
            .is_some_and(|text| self.regex.is_match(text))
    }

    fn template(&self) -> String {
        format!(
            "{{{{name}}}} must validate against \"{}\"",
            self.regex.as_str()
        )
    }
}

pub fn not_blank() -> RuleNode {
    RuleNode::leaf(NotBlank)
}

pub fn not_empty() -> RuleNode {
    RuleNode::leaf(NotEmpty)
}

pub fn no_whitespace() -> RuleNode {
    RuleNode::leaf(NoWhitespace)
}

pub fn numeric() -> RuleNode {
    RuleNode::leaf(Numeric)
}

pub fn alpha(extra: impl Into<String>) -> RuleNode {
    RuleNode::leaf(CharClass::alpha(extra))
}

pub fn alnum(extra: impl Into<String>) -> RuleNode {
    RuleNode::leaf(CharClass::alnum(extra))
}

pub fn length(min: Option<usize>, max: Option<usize>) -> RuleNode {
    RuleNode::leaf(Length::new(min, max))
}

pub fn regex(pattern: &str) -> Result<RuleNode, regex::Error> {
    Pattern::new(pattern).map(RuleNode::leaf)
}
