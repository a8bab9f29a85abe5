//! JSON-with-comments handling.
//!
//! Settings files are JSON in name only: users add `//` and `/* */` comments
//! and leave trailing commas behind. [`strip_jsonc`] turns such text into
//! plain JSON without validating it; parse errors surface later, from
//! `serde_json`.

use crate::error::JsoncError;
use serde_json::Value;

pub mod sections;

pub use sections::{
    parse_hooks, parse_mcp_servers, resolve_section, section_value, HookEntry, McpServerEntry,
    HOOKS_KEY, MCP_SERVERS_KEY,
};

/// Remove comments and trailing commas, leaving everything else untouched.
///
/// Works on `char`s so multi-byte characters are never split. String
/// contents, including comment-like text inside them, are copied verbatim.
/// The result is stable: running it twice gives the same text as once.
pub fn strip_jsonc(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if in_string {
            out.push(ch);
            if ch == '\\' && i + 1 < chars.len() {
                i += 1;
                out.push(chars[i]);
            } else if ch == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => i = skip_line_comment(&chars, i),
            '/' if chars.get(i + 1) == Some(&'*') => i = skip_block_comment(&chars, i),
            ',' if closes_after(&chars, i + 1) => i += 1,
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    out
}

/// Normalize and parse in one step.
pub fn parse_jsonc(input: &str) -> Result<Value, JsoncError> {
    Ok(serde_json::from_str(&strip_jsonc(input))?)
}

/// Pretty-print JSONC content, or return it unchanged when it does not parse.
pub fn format_jsonc(input: &str) -> String {
    parse_jsonc(input)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| input.to_string())
}

/// Index of the newline ending the comment (the newline itself is kept).
fn skip_line_comment(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

/// Index just past `*/`, or the end of input for an unterminated comment.
fn skip_block_comment(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// Whether only whitespace, comments and further commas stand between
/// `start` and a closing bracket.
fn closes_after(chars: &[char], start: usize) -> bool {
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' | '\n' | '\r' | ',' => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => i = skip_line_comment(chars, i),
            '/' if chars.get(i + 1) == Some(&'*') => i = skip_block_comment(chars, i),
            ']' | '}' => return true,
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_comments_and_trailing_commas() {
        let cases = [
            ("{\"a\":1,//c\n\"b\":2,}", "{\"a\":1,\n\"b\":2}"),
            ("{/* lead */\"a\":1}", "{\"a\":1}"),
            ("[1,2,\n  ]", "[1,2\n  ]"),
            ("{\"a\":[1,],}", "{\"a\":[1]}"),
            ("{\"a\":1} // trailing", "{\"a\":1} "),
        ];
        for (input, want) in cases {
            assert_eq!(strip_jsonc(input), want, "input: {input:?}");
        }
    }

    #[test]
    fn normalized_text_parses_like_clean_json() {
        let parsed = parse_jsonc("{\"a\":1,//c\n\"b\":2,}").expect("parse");
        let clean: Value = serde_json::from_str("{\"a\":1,\"b\":2}").expect("clean");
        assert_eq!(parsed, clean);
    }

    #[test]
    fn string_contents_are_untouched() {
        let input = r#"{"url":"http://x.test/*not*/","s":"a,]","q":"say \"//hi\""}"#;
        assert_eq!(strip_jsonc(input), input);
    }

    #[test]
    fn escaped_backslash_before_quote_closes_string() {
        let input = "{\"p\":\"C:\\\\\", // tail\n}";
        assert_eq!(strip_jsonc(input), "{\"p\":\"C:\\\\\" \n}");
    }

    #[test]
    fn multibyte_characters_survive() {
        let input = "{\"이름\":\"값\", /* 주석 */ \"emoji\":\"⚡\",}";
        let parsed = parse_jsonc(input).expect("parse");
        assert_eq!(parsed, json!({"이름": "값", "emoji": "⚡"}));
    }

    #[test]
    fn trailing_comma_behind_comment_or_extra_comma() {
        assert_eq!(strip_jsonc("[1, /*x*/ ]"), "[1  ]");
        assert_eq!(strip_jsonc("[1,,]"), "[1]");
        assert_eq!(strip_jsonc("[1, // x\n]"), "[1 \n]");
    }

    #[test]
    fn unterminated_block_comment_drops_rest() {
        assert_eq!(strip_jsonc("{\"a\":1 /* open"), "{\"a\":1 ");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            "{}",
            "{\"a\":1,//c\n\"b\":2,}",
            "[1, /*x*/ ]",
            "[1,,]",
            "/,/*c*/]",
            "{\"s\":\"unterminated",
            "{\"a\": [1, 2, /* c */ , ], // x\n}",
            "a/**//b",
            "\"\\\"\" , }",
            "/* only a comment",
            "{\"k\":\"\\\\\"}, ]",
        ];
        for input in inputs {
            let once = strip_jsonc(input);
            assert_eq!(strip_jsonc(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn clean_json_is_unchanged() {
        let clean = "{\n  \"permissions\": {\"allow\": [\"Bash(ls)\"]},\n  \"model\": \"x\"\n}";
        assert_eq!(strip_jsonc(clean), clean);
    }

    #[test]
    fn malformed_input_fails_downstream_only() {
        let stripped = strip_jsonc("{\"a\": }}");
        assert_eq!(stripped, "{\"a\": }}");
        assert!(parse_jsonc("{\"a\": }}").is_err());
    }

    #[test]
    fn format_falls_back_to_raw() {
        assert_eq!(format_jsonc("not json"), "not json");
        assert_eq!(format_jsonc("{\"a\":1,}"), "{\n  \"a\": 1\n}");
    }
}
