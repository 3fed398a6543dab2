//! Shared helpers for tool use cases.

use neighborly_domain::tool::entities::ToolCall;
use neighborly_domain::util::preview;

/// Short preview of a tool call's arguments for log lines.
///
/// Prefers well-known keys, then the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["query", "businessId", "date", "title", "startTime"];
    for key in &keys {
        if let Some(s) = call.get_string(key) {
            return preview(s, 50);
        }
    }
    let mut values: Vec<_> = call.arguments.iter().collect();
    values.sort_by(|a, b| a.0.cmp(b.0));
    values
        .into_iter()
        .find_map(|(_, v)| v.as_str())
        .map(|s| preview(s, 50))
        .unwrap_or_default()
}

/// Strip a Markdown code fence around a JSON answer, if present.
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((info, content)) if !info.trim_start().starts_with('{') => content.trim(),
        _ => body.trim(),
    }
}
