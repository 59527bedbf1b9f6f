//! Extraction engine: walks a parsed module and emits documentation nodes.
//!
//! Extraction runs in two passes over the tree. The link pass records, for
//! every class and function, its nesting level and the enclosing definition.
//! The visit pass then walks the tree in declaration order and builds one
//! [`SourceNode`] per documented object, using the link table to rebuild
//! qualified names. Statements that are not definitions (`if`, `try`, `with`,
//! decorators...) are transparent for both passes.

use crate::error::Result;
use crate::parser::node::{DocstringStyle, NodeKind, NodeLink, SourceNode, PROPERTY_TAG};
use crate::parser::python::{docstring_of, normalize_newlines, PythonParser};
use crate::parser::values::{
    render_in, text, ANNOTATION, BASE_CLASS, DECORATOR_ARG, DEFAULT_VALUE, RETURN_ANNOTATION,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use tree_sitter::{Node, Tree};

const COMA: &str = ", ";

/// Options of one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOptions {
    /// Emit the module docstring as the first node
    pub include_module_docstring: bool,
    /// Emit functions whose name starts with `__`
    pub include_private_members: bool,
    pub docstring_style: DocstringStyle,
}

/// Parse `source` and extract its documentation nodes
pub fn extract(source: &str, options: ExtractionOptions) -> Result<Vec<SourceNode>> {
    let source = normalize_newlines(source);
    let mut parser = PythonParser::new()?;
    let tree = parser.parse(&source)?;
    Ok(ObjVisitor::new(&source, options).visit(&tree))
}

fn is_definition(node: Node) -> bool {
    matches!(node.kind(), "class_definition" | "function_definition")
}

/// Tree walker owning the link table of one extraction pass
pub struct ObjVisitor<'tree, 'src> {
    options: ExtractionOptions,
    source: &'src [u8],
    links: HashMap<usize, NodeLink<'tree>>,
    nodes: Vec<SourceNode>,
}

impl<'tree, 'src> ObjVisitor<'tree, 'src> {
    pub fn new(source: &'src str, options: ExtractionOptions) -> Self {
        Self {
            options,
            source: source.as_bytes(),
            links: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Run both passes and return the nodes in emission order
    pub fn visit(mut self, tree: &'tree Tree) -> Vec<SourceNode> {
        let root = tree.root_node();
        self.links.insert(root.id(), NodeLink { level: 0, parent: None });
        self.link(root, root, 0);
        debug!("linked {} definitions", self.links.len() - 1);

        self.visit_node(root);
        self.nodes
    }

    // -------------------------------------------------------------------------
    // Link pass
    // -------------------------------------------------------------------------

    fn link(&mut self, node: Node<'tree>, owner: Node<'tree>, owner_level: usize) {
        let mut cursor = node.walk();
        let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
        for child in children {
            if is_definition(child) {
                let level = owner_level + 1;
                self.links.insert(
                    child.id(),
                    NodeLink {
                        level,
                        parent: Some(owner),
                    },
                );
                self.link(child, child, level);
            } else {
                self.link(child, owner, owner_level);
            }
        }
    }

    fn level_of(&self, node: Node<'tree>) -> usize {
        self.links.get(&node.id()).map_or(0, |link| link.level)
    }

    /// Dotted name from the module down to `node`
    fn full_name(&self, node: Node<'tree>) -> String {
        let mut parts = vec![self.name_of(node)];
        let mut current = self.links.get(&node.id()).and_then(|link| link.parent);
        while let Some(parent) = current {
            if parent.kind() == "module" {
                break;
            }
            parts.push(self.name_of(parent));
            current = self.links.get(&parent.id()).and_then(|link| link.parent);
        }
        parts.reverse();
        parts.join(".")
    }

    fn name_of(&self, node: Node<'tree>) -> String {
        node.child_by_field_name("name")
            .map(|name| text(name, self.source).to_string())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Visit pass
    // -------------------------------------------------------------------------

    fn visit_node(&mut self, node: Node<'tree>) {
        match node.kind() {
            "module" => self.visit_module(node),
            "class_definition" => self.visit_class(node),
            "function_definition" => self.visit_function(node),
            _ => {}
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit_node(child);
        }
    }

    fn push(&mut self, node: SourceNode) {
        debug!(
            "new {:?} - title: {} / def: {} / lvl: {}",
            node.kind, node.title, node.definition, node.level
        );
        self.nodes.push(node);
    }

    // -------------------------------------------------------------------------
    // Module
    // -------------------------------------------------------------------------

    fn visit_module(&mut self, node: Node<'tree>) {
        if self.options.include_module_docstring {
            self.push(SourceNode::module(docstring_of(node, self.source)));
        }
    }

    // -------------------------------------------------------------------------
    // Class
    // -------------------------------------------------------------------------

    fn visit_class(&mut self, node: Node<'tree>) {
        let name = self.name_of(node);
        let definition = format!("class {}({}):", name, self.class_bases(node));
        let docstring = node
            .child_by_field_name("body")
            .and_then(|body| docstring_of(body, self.source));
        let class = SourceNode::new(
            NodeKind::Class,
            format!("{}()", name),
            definition,
            docstring,
            self.level_of(node),
        );
        self.push(class);
    }

    fn class_bases(&self, node: Node<'tree>) -> String {
        let Some(bases) = node.child_by_field_name("superclasses") else {
            return String::new();
        };
        let mut cursor = bases.walk();
        let rendered: Vec<String> = bases
            .named_children(&mut cursor)
            .filter(|base| !matches!(base.kind(), "keyword_argument" | "comment"))
            .filter_map(|base| render_in(base, self.source, BASE_CLASS))
            .collect();
        rendered.join(COMA)
    }

    // -------------------------------------------------------------------------
    // Function
    // -------------------------------------------------------------------------

    fn visit_function(&mut self, node: Node<'tree>) {
        let name = self.name_of(node);
        if name.starts_with("__") && !self.options.include_private_members {
            debug!("skip private function {}", name);
            return;
        }
        let full_name = self.full_name(node);

        let decorators = self.decorators(node);
        let title = if decorators.iter().any(|d| d == "@property") {
            format!("{} {}()", PROPERTY_TAG, full_name)
        } else {
            format!("{}()", full_name)
        };
        let docstring = node
            .child_by_field_name("body")
            .and_then(|body| docstring_of(body, self.source));
        let function = SourceNode::new(
            NodeKind::Function(self.options.docstring_style),
            title,
            self.function_definition(node, &full_name, &decorators),
            docstring,
            self.level_of(node),
        );
        self.push(function);
    }

    fn function_definition(&self, node: Node<'tree>, full_name: &str, decorators: &[String]) -> String {
        let deco = if decorators.is_empty() {
            String::new()
        } else {
            format!("{}\n", decorators.join("\n"))
        };
        let is_async = node.child(0).is_some_and(|first| first.kind() == "async");
        format!(
            "{}{}def {}({}){}:",
            deco,
            if is_async { "async " } else { "" },
            full_name,
            self.arguments(node),
            self.return_annotation(node)
        )
    }

    fn arguments(&self, node: Node<'tree>) -> String {
        let Some(params) = node.child_by_field_name("parameters") else {
            return String::new();
        };
        let mut cursor = params.walk();
        let rendered: Vec<String> = params
            .named_children(&mut cursor)
            .filter_map(|param| self.argument(param))
            .collect();
        rendered.join(COMA)
    }

    fn argument(&self, param: Node<'tree>) -> Option<String> {
        let src = self.source;
        let annotation = |field: &str| {
            param
                .child_by_field_name(field)
                .and_then(|ty| render_in(ty, src, ANNOTATION))
                .map(|ty| format!(": {}", ty))
                .unwrap_or_default()
        };
        let default = || {
            param
                .child_by_field_name("value")
                .and_then(|value| render_in(value, src, DEFAULT_VALUE))
                .map(|value| format!(" = {}", value))
                .unwrap_or_default()
        };

        let rendered = match param.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" | "tuple_pattern" => {
                text(param, src).to_string()
            }
            "keyword_separator" => "*".to_string(),
            "positional_separator" => "/".to_string(),
            "typed_parameter" => {
                let name = param.named_child(0).map(|n| text(n, src)).unwrap_or_default();
                format!("{}{}", name, annotation("type"))
            }
            "default_parameter" => {
                let name = param
                    .child_by_field_name("name")
                    .map(|n| text(n, src))
                    .unwrap_or_default();
                format!("{}{}", name, default())
            }
            "typed_default_parameter" => {
                let name = param
                    .child_by_field_name("name")
                    .map(|n| text(n, src))
                    .unwrap_or_default();
                format!("{}{}{}", name, annotation("type"), default())
            }
            "comment" => return None,
            other => {
                debug!("unknown parameter kind {}: {}", other, text(param, src));
                text(param, src).to_string()
            }
        };
        Some(rendered)
    }

    fn return_annotation(&self, node: Node<'tree>) -> String {
        node.child_by_field_name("return_type")
            .and_then(|ret| render_in(ret, self.source, RETURN_ANNOTATION))
            .map(|ret| format!(" -> {}", ret))
            .unwrap_or_default()
    }

    /// Decorators of a function, `@name` or `@name(args)`, top to bottom
    fn decorators(&self, node: Node<'tree>) -> Vec<String> {
        let Some(parent) = node.parent().filter(|p| p.kind() == "decorated_definition") else {
            return Vec::new();
        };
        let mut cursor = parent.walk();
        let decorators: Vec<Node<'tree>> = parent
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .collect();
        decorators
            .into_iter()
            .map(|decorator| format!("@{}", self.decorator_body(decorator)))
            .collect()
    }

    fn decorator_body(&self, decorator: Node<'tree>) -> String {
        let mut cursor = decorator.walk();
        let Some(expr) = decorator
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment")
        else {
            return String::new();
        };
        if expr.kind() != "call" {
            return render_in(expr, self.source, DECORATOR_ARG).unwrap_or_default();
        }

        let name = expr
            .child_by_field_name("function")
            .and_then(|func| render_in(func, self.source, DECORATOR_ARG))
            .unwrap_or_default();
        let args = match expr.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "argument_list" => {
                let mut inner = arguments.walk();
                let rendered: Vec<String> = arguments
                    .named_children(&mut inner)
                    .filter(|arg| arg.kind() != "comment")
                    .filter_map(|arg| render_in(arg, self.source, DECORATOR_ARG))
                    .collect();
                rendered.join(COMA)
            }
            _ => String::new(),
        };
        format!("{}({})", name, args)
    }
}
