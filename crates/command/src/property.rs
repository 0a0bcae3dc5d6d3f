//! Property references inside aggregation pipelines.
//!
//! Pipeline stages address document fields as `@name`. JSONPath expressions
//! (`$.a.b`) are passed through untouched.

/// Prefix `name` with `@` unless it already carries `@` or is a JSONPath.
pub fn property(name: &str) -> String {
    if name.starts_with('@') || name.starts_with('$') {
        name.to_string()
    } else {
        format!("@{}", name)
    }
}
