use crate::domain::rules::{RuleConfig, RuleExpr};

use super::{
    Composite, RuleNode, all_of, alnum, alpha, compose_rules, length, no_whitespace, not_blank,
    not_empty, numeric, one_of, optional, regex,
};

/// Builds the composite for a deserialized rule expression.
///
/// A single rule is wrapped in an all-of composite so every definition
/// asserts through the same entry point.
pub fn build_composite(expr: &RuleExpr) -> Result<Composite, String> {
    match expr {
        RuleExpr::List(items) => build_list(items).map(compose_rules),
        RuleExpr::Rule(RuleConfig::AllOf(items)) => build_list(items).map(compose_rules),
        single => build_node(single).map(|node| compose_rules([node])),
    }
}

/// Number of rules an expression declares at its top level.
pub fn declared_len(expr: &RuleExpr) -> usize {
    match expr {
        RuleExpr::List(items) | RuleExpr::Rule(RuleConfig::AllOf(items)) => items.len(),
        RuleExpr::Rule(_) => 1,
    }
}

fn build_list(items: &[RuleExpr]) -> Result<Vec<RuleNode>, String> {
    items.iter().map(build_node).collect()
}

fn build_node(expr: &RuleExpr) -> Result<RuleNode, String> {
    let config = match expr {
        RuleExpr::List(items) => return build_list(items).map(all_of),
        RuleExpr::Rule(config) => config,
    };

    let node = match config {
        RuleConfig::NotBlank => not_blank(),
        RuleConfig::NotEmpty => not_empty(),
        RuleConfig::NoWhitespace => no_whitespace(),
        RuleConfig::Numeric => numeric(),
        RuleConfig::Alpha(extra) => alpha(extra.as_str()),
        RuleConfig::Alnum(extra) => alnum(extra.as_str()),
        RuleConfig::Length(bounds) => {
            if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
                if min > max {
                    return Err(format!("length.min ({min}) must be <= length.max ({max})"));
                }
            }
            length(bounds.min, bounds.max)
        }
        RuleConfig::Regex(pattern) => {
            regex(pattern).map_err(|err| format!("invalid regex `{pattern}`: {err}"))?
        }
        RuleConfig::AllOf(items) => build_list(items).map(all_of)?,
        RuleConfig::OneOf(items) => build_list(items).map(one_of)?,
        RuleConfig::Optional(inner) => optional(build_node(inner)?),
    };
    Ok(node)
}
