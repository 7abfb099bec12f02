//! Rendering helpers for the active-filters summary

use graphsieve_core::PropertyValue;

const MAX_SUMMARY_TEXT: usize = 20;
const TRUNCATED_PREFIX: usize = 17;

/// Render a bound value for a summary line.
///
/// Long strings are cut to keep summary lines short.
pub fn render_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::String(s) if s.chars().count() > MAX_SUMMARY_TEXT => {
            let head: String = s.chars().take(TRUNCATED_PREFIX).collect();
            format!("{}...", head)
        }
        PropertyValue::List(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        other => other.to_string(),
    }
}

/// `"Type: A, B"`-style line for a set of names
pub fn names_line(title: &str, names: &[String]) -> String {
    format!("{}: {}", title, names.join(", "))
}
