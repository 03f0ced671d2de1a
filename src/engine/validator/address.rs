/// Address of an ungrouped scalar in both stores.
pub const SCALAR_ADDRESS: &str = "0";

/// Resolves the store address for a field `key` under an optional `group`.
///
/// | group | key | address       |
/// |-------|-----|---------------|
/// | yes   | yes | `group.key`   |
/// | yes   | no  | `group`       |
/// | no    | no  | `0`           |
/// | no    | yes | `key`         |
pub fn resolve(key: Option<&str>, group: Option<&str>) -> String {
    match (group, key) {
        (Some(group), Some(key)) => format!("{group}.{key}"),
        (Some(group), None) => group.to_string(),
        (None, None) => SCALAR_ADDRESS.to_string(),
        (None, Some(key)) => key.to_string(),
    }
}
