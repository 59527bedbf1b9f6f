// Python parser using tree-sitter

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::path::Path;
use tracing::warn;
use tree_sitter::{Node, Parser, Tree};

/// Tab stop used when cleaning docstrings
const TAB_SIZE: usize = 8;

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse Python source code.
    ///
    /// Syntax errors do not fail the parse: the tree keeps `ERROR` nodes and
    /// the remaining definitions are still reachable.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;
        if tree.root_node().has_error() {
            warn!("source contains syntax errors, extraction may be incomplete");
        }
        Ok(tree)
    }
}

/// Source text with `\r\n` and lone `\r` line endings turned into `\n`
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if !source.contains('\r') {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Convert file path to Python module name
pub fn path_to_module_name(path: &Path) -> String {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    if stem == "__init__" {
        path.parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| stem.to_string())
    } else {
        stem.to_string()
    }
}

/// Docstring of a module, or of the `body` block of a class or function.
///
/// The first statement must be a plain string literal (f-strings and bytes
/// do not count). The text is decoded and cleaned the way Python's
/// `inspect.cleandoc` does.
pub fn docstring_of(body: Node, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let literal = first.named_child(0)?;
    let raw = match literal.kind() {
        "string" => decode_literal(literal.utf8_text(source).ok()?)?,
        "concatenated_string" => {
            let mut inner = literal.walk();
            let parts = literal
                .named_children(&mut inner)
                .filter(|part| part.kind() == "string")
                .map(|part| part.utf8_text(source).ok().and_then(decode_literal))
                .collect::<Option<Vec<_>>>()?;
            parts.concat()
        }
        _ => return None,
    };
    Some(cleandoc(&raw))
}

/// Value of a string literal token, `None` for f-strings and bytes
pub fn decode_literal(token: &str) -> Option<String> {
    let quote_at = token.find(['\'', '"'])?;
    let prefix = token[..quote_at].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let quoted = &token[quote_at..];
    let delim_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        3
    } else {
        1
    };
    if quoted.len() < delim_len * 2 {
        return None;
    }
    let body = &quoted[delim_len..quoted.len() - delim_len];
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Decode backslash escapes of a non-raw literal. Unknown escapes are kept.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded = (digits.len() == width
                    && digits.chars().all(|d| d.is_ascii_hexdigit()))
                .then(|| u32::from_str_radix(&digits, 16).ok())
                .flatten()
                .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Expand tabs to the next multiple of `TAB_SIZE` columns
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Clean up docstring indentation: strip the first line, remove the common
/// margin of the other lines, drop leading and trailing empty lines
pub fn cleandoc(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if margin > 0 {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading);

    lines.join("\n")
}
