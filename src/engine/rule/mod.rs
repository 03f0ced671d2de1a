//! Built-in rule engine.
//!
//! Leaf rules are predicates over a JSON value. They are combined into a
//! [`Composite`] which asserts a value and reports every violated leaf as a
//! [`NestedFailure`].

pub mod builtin;
pub mod config;
pub mod failure;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use builtin::{alnum, alpha, length, no_whitespace, not_blank, not_empty, numeric, regex};
pub use failure::{NestedFailure, RuleFailure};

/// A named leaf predicate.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Rule name, used as the base of its identifier.
    fn name(&self) -> &'static str;

    /// Returns `true` when `input` satisfies the rule.
    fn check(&self, input: &Value) -> bool;

    /// Default message. `{{name}}` renders as the JSON encoding of the input.
    fn template(&self) -> String;
}

/// One node of a rule tree.
#[derive(Debug, Clone)]
pub enum RuleNode {
    Leaf(LeafRule),
    Composite(Composite),
    /// Passes on `null` or `""`, otherwise delegates.
    Optional(Box<RuleNode>),
}

impl RuleNode {
    pub fn leaf<R>(rule: R) -> Self
    where
        R: Rule + 'static,
    {
        let id = rule.name().to_string();
        Self::Leaf(LeafRule {
            id,
            rule: Arc::new(rule),
        })
    }

    fn evaluate(&self, input: &Value, failures: &mut Vec<RuleFailure>) -> bool {
        match self {
            Self::Leaf(leaf) => {
                if leaf.rule.check(input) {
                    return true;
                }
                failures.push(RuleFailure::new(
                    leaf.id.clone(),
                    leaf.rule.name(),
                    leaf.rule.template(),
                ));
                false
            }
            Self::Composite(composite) => composite.evaluate(input, failures),
            Self::Optional(inner) => {
                if is_absent(input) {
                    return true;
                }
                inner.evaluate(input, failures)
            }
        }
    }

    fn visit_leaves<F>(&self, visit: &mut F)
    where
        F: FnMut(&LeafRule),
    {
        match self {
            Self::Leaf(leaf) => visit(leaf),
            Self::Composite(composite) => {
                for child in &composite.children {
                    child.visit_leaves(visit);
                }
            }
            Self::Optional(inner) => inner.visit_leaves(visit),
        }
    }

    fn visit_leaves_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut LeafRule),
    {
        match self {
            Self::Leaf(leaf) => visit(leaf),
            Self::Composite(composite) => {
                for child in &mut composite.children {
                    child.visit_leaves_mut(visit);
                }
            }
            Self::Optional(inner) => inner.visit_leaves_mut(visit),
        }
    }
}

impl From<Composite> for RuleNode {
    fn from(value: Composite) -> Self {
        Self::Composite(value)
    }
}

/// A leaf rule together with its identifier inside the enclosing composite.
#[derive(Debug, Clone)]
pub struct LeafRule {
    id: String,
    rule: Arc<dyn Rule>,
}

impl LeafRule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &'static str {
        self.rule.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Every child must pass; all failures are reported.
    AllOf,
    /// At least one child must pass.
    OneOf,
}

/// A combination of rules asserted as one.
///
/// Leaf identifiers are assigned on construction: the first occurrence of a
/// rule name keeps the bare name, the n-th repeat becomes `name#n`.
#[derive(Debug, Clone)]
pub struct Composite {
    mode: CompositeMode,
    children: Vec<RuleNode>,
}

impl Composite {
    pub fn new(mode: CompositeMode, children: impl IntoIterator<Item = RuleNode>) -> Self {
        let mut composite = Self {
            mode,
            children: children.into_iter().collect(),
        };
        composite.assign_identifiers();
        composite
    }

    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Identifiers of all leaves in declaration order.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers = Vec::new();
        for child in &self.children {
            child.visit_leaves(&mut |leaf| identifiers.push(leaf.id.clone()));
        }
        identifiers
    }

    /// Asserts `input`, returning every violated leaf on failure.
    pub fn assert(&self, input: &Value) -> Result<(), NestedFailure> {
        let mut failures = Vec::new();
        if self.evaluate(input, &mut failures) {
            return Ok(());
        }
        Err(NestedFailure::new(input.clone(), failures))
    }

    fn evaluate(&self, input: &Value, failures: &mut Vec<RuleFailure>) -> bool {
        match self.mode {
            CompositeMode::AllOf => {
                let mut passed = true;
                for child in &self.children {
                    passed &= child.evaluate(input, failures);
                }
                passed
            }
            CompositeMode::OneOf => {
                if self.children.is_empty() {
                    return true;
                }
                let mut branch_failures = Vec::new();
                for child in &self.children {
                    if child.evaluate(input, &mut branch_failures) {
                        return true;
                    }
                }
                failures.extend(branch_failures);
                false
            }
        }
    }

    fn assign_identifiers(&mut self) {
        let mut seen: HashMap<&'static str, usize> = HashMap::new();
        for child in &mut self.children {
            child.visit_leaves_mut(&mut |leaf| {
                let name = leaf.rule.name();
                let count = seen.entry(name).or_insert(0);
                *count += 1;
                leaf.id = if *count == 1 {
                    name.to_string()
                } else {
                    format!("{name}#{count}")
                };
            });
        }
    }
}

/// Builds the all-must-pass composite used for a list of named rules.
pub fn compose_rules(rules: impl IntoIterator<Item = RuleNode>) -> Composite {
    Composite::new(CompositeMode::AllOf, rules)
}

pub fn all_of(rules: impl IntoIterator<Item = RuleNode>) -> RuleNode {
    Composite::new(CompositeMode::AllOf, rules).into()
}

pub fn one_of(rules: impl IntoIterator<Item = RuleNode>) -> RuleNode {
    Composite::new(CompositeMode::OneOf, rules).into()
}

pub fn optional(rule: RuleNode) -> RuleNode {
    RuleNode::Optional(Box::new(rule))
}

fn is_absent(input: &Value) -> bool {
    match input {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
