//! Post-processing: deterministic cleanup of model replies.
//!
//! The reformatter is told to "produce fixed output text only, with no
//! additional narrative or escapes", and the proofreader's reply is printed
//! as-is. Models still wrap answers in code fences, emit `\r\n` or pad
//! lines with trailing spaces. These rules undo that without touching the
//! wording.
//!
//! A backslash followed by `n` is always left alone. The reformatter often
//! copies the line-break markers from its prompt examples, but the same two
//! characters appear in paths and notation (`C:\new`, `\nabla`).
//!
//! ## Rule Order
//!
//! Fences are stripped first so the remaining rules see the bare reply.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply every cleanup rule to a model reply.
///
/// Rules (applied in order):
/// 1. Strip a code fence wrapping the whole reply
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 6. Trim leading and trailing blank lines
pub fn clean_reply(input: &str) -> String {
    let s = strip_wrapping_fence(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    trim_blank_lines(&s)
}

// ── Rule 1: Strip a wrapping fence ───────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\r?\n(.*?)\r?\n```\s*$").unwrap());

fn strip_wrapping_fence(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCE.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 5: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 6: Trim surrounding blank lines ────────────────────────────────────

fn trim_blank_lines(input: &str) -> String {
    input.trim_matches('\n').to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_with_lang() {
        let input = "```text\n1 Section 4\nNear-Term Responses\n```";
        assert_eq!(strip_wrapping_fence(input), "1 Section 4\nNear-Term Responses");
    }

    #[test]
    fn test_strip_fence_no_lang() {
        let input = "```\nHello\nWorld\n```\n";
        assert_eq!(strip_wrapping_fence(input), "Hello\nWorld");
    }

    #[test]
    fn test_inner_fence_passthrough() {
        let input = "Fix:\n```\nteh -> the\n```";
        assert_eq!(strip_wrapping_fence(input), input);
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello   \nworld  "),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn reply_is_fully_cleaned() {
        let input = "```\r\n1 Section 4\r\nNear-Term Responses   \r\n\r\n\r\n\r\n\r\nEnd\r\n```";
        assert_eq!(
            clean_reply(input),
            "1 Section 4\nNear-Term Responses\n\n\nEnd"
        );
    }

    #[test]
    fn backslash_n_in_content_is_preserved() {
        let input = r"Gradient \nabla f over C:\new\notes";
        assert_eq!(clean_reply(input), input);
    }

    #[test]
    fn copied_prompt_markers_are_left_for_the_reader() {
        let input = "43\\nCurrent Status and Trends  \n";
        assert_eq!(clean_reply(input), r"43\nCurrent Status and Trends");
    }

    #[test]
    fn proofread_reply_keeps_literal_markers() {
        let input = "\n\n**\"line\\nbreak\"**: stray escape  \n";
        assert_eq!(clean_reply(input), "**\"line\\nbreak\"**: stray escape");
    }
}
