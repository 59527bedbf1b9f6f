//! String rewriting steps used to turn raw docstrings and signatures into
//! Markdown-safe text.
//!
//! Each step is a pure `&str -> String` function. A [`Transform`] value names
//! one step with its parameters so that a chain can be declared as a slice and
//! folded over the input: the first element is applied first and the last one
//! ends up outermost.

use regex::{Captures, Regex};

/// Markup fragments shared by the node renderers and the document assembler
pub mod tag {
    pub const CR: &str = "\n";
    pub const HTML_CR: &str = "<br />";
    pub const BEG_STR: &str = "^";
    pub const END_STR: &str = "$";
    pub const END_STRH: &str = ":$";
    pub const BEG_B: &str = "<b>";
    pub const END_BH: &str = ":</b>";
    pub const BEG_TITLE: &str = "# ";
    pub const END_TITLE: &str = ":";
    pub const BEG_PY: &str = "```python\n";
    pub const END_PY: &str = "\n```";
    pub const BEG_CO: &str = "\n```\n";
    pub const END_CO: &str = "\n```\n";
    pub const BEG_PRE: &str = "<pre>";
    pub const END_PRE: &str = "</pre>";
    pub const FENCE: &str = "```";
    pub const TAB: &str = "    ";
    pub const HTML_TAB: &str = "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;  ";
    pub const QUOTE: &str = "> ";
}

const EXAMPLES_LINE: &str = "\nExamples:\n";

/// One parameterised rewriting step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Wrap {
        prefix: &'static str,
        suffix: &'static str,
    },
    ReplaceLiteral {
        old: &'static str,
        new: &'static str,
    },
    ReplaceSpan {
        begin_pattern: &'static str,
        end_pattern: &'static str,
        begin_tag: &'static str,
        end_tag: &'static str,
    },
    Dedent,
    EscapeHtml,
    ColorizeExamples,
}

impl Transform {
    pub const fn wrap(prefix: &'static str, suffix: &'static str) -> Self {
        Transform::Wrap { prefix, suffix }
    }

    pub const fn replace_literal(old: &'static str, new: &'static str) -> Self {
        Transform::ReplaceLiteral { old, new }
    }

    pub const fn replace_span(
        begin_pattern: &'static str,
        end_pattern: &'static str,
        begin_tag: &'static str,
        end_tag: &'static str,
    ) -> Self {
        Transform::ReplaceSpan {
            begin_pattern,
            end_pattern,
            begin_tag,
            end_tag,
        }
    }

    /// Apply this step to `text`
    pub fn apply(&self, text: &str) -> String {
        match self {
            Transform::Wrap { prefix, suffix } => wrap(text, prefix, suffix),
            Transform::ReplaceLiteral { old, new } => replace_literal(text, old, new),
            Transform::ReplaceSpan {
                begin_pattern,
                end_pattern,
                begin_tag,
                end_tag,
            } => replace_span(text, begin_pattern, end_pattern, begin_tag, end_tag),
            Transform::Dedent => dedent(text),
            Transform::EscapeHtml => escape_html(text),
            Transform::ColorizeExamples => colorize_example_block(text),
        }
    }
}

/// Fold `chain` over `text`, first step first
pub fn apply_chain(text: &str, chain: &[Transform]) -> String {
    chain
        .iter()
        .fold(text.to_string(), |acc, step| step.apply(&acc))
}

pub fn wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, text, suffix)
}

pub fn replace_literal(text: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return text.to_string();
    }
    text.replace(old, new)
}

/// Replace the boundaries of every `begin_pattern<content>end_pattern` span.
///
/// Patterns are regex fragments evaluated in multi-line mode, so `^` and `$`
/// anchor on each line. The captured content must start with a non-blank
/// character; blank lines are left alone.
pub fn replace_span(
    text: &str,
    begin_pattern: &str,
    end_pattern: &str,
    begin_tag: &str,
    end_tag: &str,
) -> String {
    let pattern = format!(r"(?m){}(\S.*){}", begin_pattern, end_pattern);
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(text, |caps: &Captures| {
                format!("{}{}{}", begin_tag, &caps[1], end_tag)
            })
            .into_owned(),
        Err(e) => {
            tracing::warn!("invalid span pattern {}: {}", pattern, e);
            text.to_string()
        }
    }
}

/// Remove the whitespace prefix shared by every non-blank line.
///
/// Whitespace-only lines are emptied and do not take part in the margin.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map(|((i, c), _)| i + c.len_utf8())
        .unwrap_or(0);
    &a[..len]
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a docstring in `<pre>`, switching to a python code fence at an
/// `Examples:` line.
pub fn colorize_example_block(text: &str) -> String {
    if text.contains(EXAMPLES_LINE) {
        let wrapped = format!("{}\n{}\n\n{}", tag::BEG_PRE, text, tag::FENCE);
        return wrapped.replacen(
            EXAMPLES_LINE,
            &format!("\n{}{}{}", tag::END_PRE, EXAMPLES_LINE, tag::BEG_PY),
            1,
        );
    }
    format!("{}\n{}\n{}", tag::BEG_PRE, text, tag::END_PRE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("test", "__", "__"), "__test__");
    }

    #[test]
    fn test_replace_literal() {
        assert_eq!(
            replace_literal("my function docstring", "docstring", "is ok !"),
            "my function is ok !"
        );
        assert_eq!(replace_literal("abc", "", "x"), "abc");
    }

    #[test]
    fn test_replace_span_every_line() {
        assert_eq!(
            replace_span("my function docstring", "^", "$", ">", "<br />"),
            ">my function docstring<br />"
        );
        assert_eq!(
            replace_span("one\n\ntwo", "^", "$", "> ", "<br />"),
            "> one<br />\n\n> two<br />"
        );
    }

    #[test]
    fn test_replace_span_colon_lines_only() {
        let text = "Summary.\nArgs:\n    x: value\nReturns:";
        assert_eq!(
            replace_span(text, tag::BEG_STR, tag::END_STRH, tag::BEG_B, tag::END_BH),
            "Summary.\n<b>Args:</b>\n    x: value\n<b>Returns:</b>"
        );
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("    a\n      b\n    c"), "a\n  b\nc");
        assert_eq!(dedent("  a\n   \n  b"), "a\n\nb");
        assert_eq!(dedent("a\n    b"), "a\n    b");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_dedent_mixed_indent_characters() {
        assert_eq!(dedent("\t a\n\t b"), "a\nb");
        assert_eq!(dedent("\ta\n b"), "\ta\n b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_colorize_without_examples() {
        assert_eq!(colorize_example_block("doc"), "<pre>\ndoc\n</pre>");
    }

    #[test]
    fn test_colorize_with_examples() {
        let text = "\nSummary.\nExamples:\n>>> f()\n1\n";
        assert_eq!(
            colorize_example_block(text),
            "<pre>\n\nSummary.\n</pre>\nExamples:\n```python\n>>> f()\n1\n\n\n```"
        );
    }

    #[test]
    fn test_chain_order_is_first_to_last() {
        let chain = [Transform::wrap("(", ")"), Transform::wrap("[", "]")];
        assert_eq!(apply_chain("x", &chain), "[(x)]");
        let reversed = [Transform::wrap("[", "]"), Transform::wrap("(", ")")];
        assert_eq!(apply_chain("x", &reversed), "([x])");
    }

    #[test]
    fn test_chain_does_not_touch_input() {
        let input = String::from("    a\n    b");
        let out = apply_chain(&input, &[Transform::Dedent, Transform::EscapeHtml]);
        assert_eq!(out, "a\nb");
        assert_eq!(input, "    a\n    b");
    }

    #[test]
    fn test_module_heading_chain() {
        let chain = [
            Transform::replace_span(
                tag::BEG_STR,
                tag::END_STRH,
                tag::BEG_TITLE,
                tag::END_TITLE,
            ),
            Transform::Dedent,
        ];
        assert_eq!(apply_chain("Title:", &chain), "# Title:");
        assert_eq!(
            apply_chain("Pkg:\nSome text.\n    indented:", &chain),
            "# Pkg:\nSome text.\n    indented:"
        );
    }
}
