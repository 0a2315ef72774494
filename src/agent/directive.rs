//! Parsing of model replies into directives.
//!
//! The model is instructed to answer with a single JSON object, but replies
//! routinely arrive wrapped in code fences or surrounding prose. We extract
//! the first balanced JSON object from the reply and deserialize it; anything
//! else is a parse failure handled by the dispatch loop's retry budget.

use serde::Deserialize;

/// What the model asked the loop to do next.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Directive {
    /// Invoke a registered tool with a text input.
    Tool { tool: String, input: String },
    /// Finish the turn with this answer.
    Final { answer: String },
}

/// Parse a model reply into a directive, or `None` if no directive is found.
pub fn parse_directive(reply: &str) -> Option<Directive> {
    let mut rest = reply;
    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        if let Some(end) = balanced_object_end(candidate) {
            if let Ok(directive) = serde_json::from_str::<Directive>(&candidate[..=end]) {
                return Some(directive);
            }
            rest = &candidate[end + 1..];
        } else {
            // Unbalanced from here on; no further object can start earlier.
            return None;
        }
    }
    None
}

/// Byte offset of the `}` closing the object that starts at `s[0] == '{'`.
/// String literals and escapes are respected so braces inside values don't
/// confuse the scan.
fn balanced_object_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_tool_directive() {
        let directive =
            parse_directive(r#"{"action": "tool", "tool": "calculator", "input": "5 * 6"}"#)
                .unwrap();
        assert_eq!(
            directive,
            Directive::Tool {
                tool: "calculator".to_string(),
                input: "5 * 6".to_string(),
            }
        );
    }

    #[test]
    fn parses_final_directive_in_code_fence() {
        let reply = "Here is my answer:\n```json\n{\"action\": \"final\", \"answer\": \"42\"}\n```";
        let directive = parse_directive(reply).unwrap();
        assert_eq!(
            directive,
            Directive::Final {
                answer: "42".to_string(),
            }
        );
    }

    #[test]
    fn skips_leading_non_directive_objects() {
        let reply = r#"{"note": "thinking"} then {"action": "final", "answer": "done"}"#;
        let directive = parse_directive(reply).unwrap();
        assert!(matches!(directive, Directive::Final { .. }));
    }

    #[test]
    fn braces_inside_strings_do_not_break_the_scan() {
        let reply = r#"{"action": "final", "answer": "set notation: {1, 2}"}"#;
        let directive = parse_directive(reply).unwrap();
        assert_eq!(
            directive,
            Directive::Final {
                answer: "set notation: {1, 2}".to_string(),
            }
        );
    }

    #[test]
    fn prose_without_json_is_not_a_directive() {
        assert_eq!(parse_directive("I think the answer is 4."), None);
        assert_eq!(parse_directive(""), None);
    }

    #[test]
    fn object_with_wrong_shape_is_not_a_directive() {
        assert_eq!(parse_directive(r#"{"tool": "calculator"}"#), None);
        assert_eq!(parse_directive(r#"{"action": "dance"}"#), None);
    }
}
