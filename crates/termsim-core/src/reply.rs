//! Helpers for decoding text returned by the generation collaborator.

use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").expect("static regex is valid")
});

/// Strips surrounding whitespace and a single Markdown code fence, if present.
/// Anything else is returned as-is for the strict decoder to judge.
pub fn extract_json_payload(reply: &str) -> &str {
    let trimmed = reply.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}
