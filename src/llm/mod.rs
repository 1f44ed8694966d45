//! Clients for the hosted generation APIs.
//!
//! `gemini` covers text generation (campaign variants), `imagen` covers
//! image generation behind the `ImageModel` seam with a single-fallback
//! policy. Both speak Google's REST surfaces directly.

pub mod gemini;
pub mod imagen;

use thiserror::Error;

/// Base URL for the Generative Language API.
pub(crate) const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The two failure kinds that matter here: the upstream call failed, or the
/// model answered with something we cannot use. Neither is retried, except
/// for the single image-model fallback attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed model output: {reason} (response preview: {preview})")]
    Malformed { reason: String, preview: String },

    #[error("image generation failed on {primary} and fallback {fallback}: {source}")]
    FallbackExhausted {
        primary: String,
        fallback: String,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    pub(crate) fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        Self::Malformed {
            reason: reason.into(),
            preview: preview(raw),
        }
    }
}

/// First 200 characters of a raw response, for error messages and logs.
fn preview(raw: &str) -> String {
    raw.chars().take(200).collect()
}

/// Strip markdown code fences from a string.
pub(crate) fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();

    // Try ```json ... ```
    if let Some(rest) = trimmed.strip_prefix("```json") {
        if let Some(json) = rest.strip_suffix("```") {
            return json.trim();
        }
    }
    // Try ``` ... ```
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(json) = rest.strip_suffix("```") {
            return json.trim();
        }
    }

    trimmed
}

/// Extract the first balanced `{...}` or `[...]` block from a string.
pub(crate) fn extract_json_block(s: &str) -> Option<&str> {
    let (open_char, close_char, start) = {
        let brace_pos = s.find('{');
        let bracket_pos = s.find('[');

        match (brace_pos, bracket_pos) {
            (Some(b), Some(k)) if b < k => ('{', '}', b),
            (Some(_), Some(k)) => ('[', ']', k),
            (Some(b), None) => ('{', '}', b),
            (None, Some(k)) => ('[', ']', k),
            (None, None) => return None,
        }
    };

    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for i in start..bytes.len() {
        let ch = bytes[i] as char;

        if escape_next {
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            escape_next = true;
            continue;
        }

        if ch == '"' {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        if ch == open_char {
            depth += 1;
        } else if ch == close_char {
            depth -= 1;
            if depth == 0 {
                return Some(&s[start..=i]);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_code_fences("```json\n[{}]\n```"), "[{}]");
        assert_eq!(strip_code_fences("```\n[{}]\n```"), "[{}]");
        assert_eq!(strip_code_fences("  [{}]  "), "[{}]");
    }

    #[test]
    fn test_extract_array_block() {
        let text = "Here you go:\n[{\"slogan\": \"Go big\"}]\nHope that helps!";
        assert_eq!(extract_json_block(text), Some("[{\"slogan\": \"Go big\"}]"));
    }

    #[test]
    fn test_extract_object_before_array() {
        let text = "{\"a\": [1, 2]} trailing";
        assert_eq!(extract_json_block(text), Some("{\"a\": [1, 2]}"));
    }

    #[test]
    fn test_extract_handles_strings_with_braces() {
        let text = "[{\"slogan\": \"curly { inside\"}]";
        assert_eq!(extract_json_block(text), Some(text));
    }

    #[test]
    fn test_extract_none_without_json() {
        assert_eq!(extract_json_block("no structure here"), None);
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(500);
        assert_eq!(preview(&long).len(), 200);
    }
}
