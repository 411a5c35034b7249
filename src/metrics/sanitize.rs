/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// One input character maps to exactly one output character, so the result
/// lines up positionally with the input (counted in chars). Underscores are
/// never collapsed or trimmed. The function is total and idempotent.
///
/// ```
/// use cluster_spec_registry::sanitize_metric_name;
///
/// assert_eq!(sanitize_metric_name("restore/nodes=4/duration"), "restore_nodes_4_duration");
/// ```
pub fn sanitize_metric_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Whether `name` is already stable under [`sanitize_metric_name`].
pub fn is_sanitized(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` can prefix metric names: non-empty, sanitized, and not
/// starting with a digit.
pub fn is_valid_namespace(name: &str) -> bool {
    match name.chars().next() {
        Some(first) => !first.is_ascii_digit() && is_sanitized(name),
        None => false,
    }
}
