use serde_json::Value;

use crate::domain::rules::Messages;

const NAME_PLACEHOLDER: &str = "{{name}}";

/// One violated leaf rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    id: String,
    name: &'static str,
    template: String,
}

impl RuleFailure {
    pub(crate) fn new(id: String, name: &'static str, template: String) -> Self {
        Self { id, name, template }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Result of a failed composite assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedFailure {
    input: Value,
    failures: Vec<RuleFailure>,
}

impl NestedFailure {
    pub(crate) fn new(input: Value, failures: Vec<RuleFailure>) -> Self {
        Self { input, failures }
    }

    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    /// Identifiers of violated leaves in evaluation order. May repeat.
    pub fn failed_rule_identifiers(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(RuleFailure::id)
    }

    /// Default messages for `identifiers`, in the order given.
    ///
    /// Identifiers that did not fail are skipped.
    pub fn find_messages<'a, I>(&self, identifiers: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        identifiers
            .into_iter()
            .filter_map(|id| {
                self.failure(id)
                    .map(|failure| (id.to_string(), self.render(&failure.template)))
            })
            .collect()
    }

    /// Messages from `table` for the failed identifiers, in failure order.
    ///
    /// An entry keyed by the full identifier wins over one keyed by the bare
    /// rule name, so `alpha` covers `alpha#2` unless `alpha#2` is listed.
    pub fn render_messages(&self, table: &Messages) -> Vec<(String, String)> {
        let mut rendered: Vec<(String, String)> = Vec::new();
        for failure in &self.failures {
            if rendered.iter().any(|(id, _)| id == &failure.id) {
                continue;
            }
            let template = table
                .get(&failure.id)
                .or_else(|| table.get(failure.name));
            if let Some(template) = template {
                rendered.push((failure.id.clone(), self.render(template)));
            }
        }
        rendered
    }

    fn failure(&self, id: &str) -> Option<&RuleFailure> {
        self.failures.iter().find(|failure| failure.id == id)
    }

    fn render(&self, template: &str) -> String {
        if !template.contains(NAME_PLACEHOLDER) {
            return template.to_string();
        }
        let name = serde_json::to_string(&self.input).unwrap_or_else(|_| "input".to_string());
        template.replace(NAME_PLACEHOLDER, &name)
    }
}
