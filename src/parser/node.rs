// Documentation nodes produced by one extraction pass

use crate::output::transform::{apply_chain, tag, Transform};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tree_sitter::Node;

/// Replacement text for a missing docstring
pub const DOCSTRING_EMPTY: &str = "Docstring empty";

/// Title prefix of `@property` getters
pub const PROPERTY_TAG: &str = "@Property";

/// Heading depth of a level 0 node
pub const HEADING_OFFSET: usize = 2;

static DUNDER_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([a-zA-Z_]*)__\(").expect("valid regex"));
static NON_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\- ]+").expect("valid regex"));

/// How function docstrings are laid out in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    /// `<pre>` block, `Examples:` sections as python code
    #[default]
    Pre,
    /// Blockquote with `<br />` line breaks
    Quote,
}

impl DocstringStyle {
    fn chain(self) -> &'static [Transform] {
        match self {
            DocstringStyle::Pre => PRE_CHAIN,
            DocstringStyle::Quote => QUOTE_CHAIN,
        }
    }
}

impl std::str::FromStr for DocstringStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pre" => Ok(DocstringStyle::Pre),
            "quote" => Ok(DocstringStyle::Quote),
            other => Err(format!("unknown docstring style: {}", other)),
        }
    }
}

const PRE_CHAIN: &[Transform] = &[
    Transform::wrap(tag::CR, tag::CR),
    Transform::ColorizeExamples,
    Transform::replace_span(tag::BEG_STR, tag::END_STRH, tag::BEG_B, tag::END_BH),
];

const QUOTE_CHAIN: &[Transform] = &[
    Transform::wrap(tag::CR, tag::CR),
    Transform::replace_literal(tag::TAB, tag::HTML_TAB),
    Transform::replace_span(tag::BEG_STR, tag::END_STRH, tag::BEG_B, tag::END_BH),
    Transform::replace_span(tag::BEG_STR, tag::END_STR, tag::QUOTE, tag::HTML_CR),
];

const CLASS_CHAIN: &[Transform] = &[Transform::wrap(tag::BEG_CO, tag::END_CO)];

const MODULE_CHAIN: &[Transform] = &[
    Transform::replace_span(tag::BEG_STR, tag::END_STRH, tag::BEG_TITLE, tag::END_TITLE),
    Transform::Dedent,
];

const DEFINITION_CHAIN: &[Transform] = &[Transform::wrap(tag::BEG_PY, tag::END_PY)];

/// What kind of source object a node describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Class,
    /// Functions, methods and properties
    Function(DocstringStyle),
}

/// One documented object: a module, a class or a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNode {
    pub kind: NodeKind,
    pub title: String,
    pub definition: String,
    pub docstring: String,
    pub level: usize,
}

impl SourceNode {
    pub fn new(
        kind: NodeKind,
        title: impl Into<String>,
        definition: impl Into<String>,
        docstring: Option<String>,
        level: usize,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            definition: definition.into(),
            docstring: docstring.unwrap_or_else(|| DOCSTRING_EMPTY.to_string()),
            level,
        }
    }

    /// Module docstring node, always at level 0
    pub fn module(docstring: Option<String>) -> Self {
        Self::new(NodeKind::Module, "", "", docstring, 0)
    }

    pub fn is_module(&self) -> bool {
        self.kind == NodeKind::Module
    }

    /// Markdown heading: `#` repeated `level + 2` times, then the title
    pub fn get_title(&self) -> String {
        format!("{} {}", "#".repeat(self.level + HEADING_OFFSET), self.title)
    }

    /// Definition as a python code block
    pub fn get_definition(&self) -> String {
        apply_chain(&self.definition, DEFINITION_CHAIN)
    }

    pub fn get_docstring(&self) -> String {
        let chain = match self.kind {
            NodeKind::Module => MODULE_CHAIN,
            NodeKind::Class => CLASS_CHAIN,
            NodeKind::Function(style) => style.chain(),
        };
        apply_chain(&self.docstring, chain)
    }

    /// Full Markdown block for this node.
    ///
    /// A module contributes only its formatted docstring.
    pub fn get_summary(&self) -> String {
        if self.is_module() {
            return self.get_docstring();
        }
        format!(
            "{}{}{}{}{}",
            self.get_title(),
            tag::CR,
            self.get_definition(),
            tag::CR,
            self.get_docstring()
        )
    }

    /// Table of contents line, `None` for modules
    pub fn get_toc_entry(&self) -> Option<String> {
        if self.is_module() {
            return None;
        }
        Some(format!("[{}](#{}){}", self.title, self.anchor(), tag::HTML_CR))
    }

    /// In-document anchor generated for the title
    pub fn anchor(&self) -> String {
        make_anchor(&self.title)
    }
}

/// Turn a heading title into its anchor: dunder wrappers stripped, spaces to
/// hyphens, lowercased, anything but word characters, `-` and ` ` dropped
pub fn make_anchor(title: &str) -> String {
    let stripped = DUNDER_CALL.replace(title, "${1}(");
    let lowered = stripped.replace(' ', "-").to_lowercase();
    NON_ANCHOR.replace_all(&lowered, "").into_owned()
}

/// Position of a definition in the tree: its depth and enclosing definition
#[derive(Debug, Clone, Copy)]
pub struct NodeLink<'tree> {
    pub level: usize,
    pub parent: Option<Node<'tree>>,
}
