// Rendering of the expression forms that can appear in a signature

use tracing::{debug, warn};
use tree_sitter::Node;

/// Closed set of expression forms understood when rebuilding signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `x`
    Name,
    /// Literals: numbers, strings, `True`, `None`, `...`
    Constant,
    /// `a.b.c`
    Attribute,
    /// `List[int]`, `Dict[str, a.B]`
    Subscript,
    /// `[int, str]`
    List,
    /// `-x`, `-1`
    UnaryNeg,
    Other,
}

/// Forms accepted at one place of a signature
#[derive(Debug, Clone, Copy)]
pub struct Allowed {
    pub label: &'static str,
    pub shapes: &'static [Shape],
}

pub const ANNOTATION: Allowed = Allowed {
    label: "annotation",
    shapes: &[Shape::Name, Shape::Attribute, Shape::Subscript],
};

pub const DEFAULT_VALUE: Allowed = Allowed {
    label: "default value",
    shapes: &[Shape::Constant, Shape::Name, Shape::Attribute, Shape::UnaryNeg],
};

pub const RETURN_ANNOTATION: Allowed = Allowed {
    label: "return annotation",
    shapes: &[Shape::Name, Shape::Constant, Shape::Attribute, Shape::Subscript],
};

pub const BASE_CLASS: Allowed = Allowed {
    label: "base class",
    shapes: &[Shape::Name, Shape::Attribute],
};

pub const DECORATOR_ARG: Allowed = Allowed {
    label: "decorator argument",
    shapes: &[Shape::Name, Shape::Attribute],
};

pub fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

/// Strip the `type` wrapper the grammar puts around annotations
pub fn unwrap_type(node: Node) -> Node {
    if node.kind() == "type" && node.named_child_count() == 1 {
        if let Some(inner) = node.named_child(0) {
            return inner;
        }
    }
    node
}

pub fn shape_of(node: Node, source: &[u8]) -> Shape {
    let node = unwrap_type(node);
    match node.kind() {
        "identifier" => Shape::Name,
        "string" | "concatenated_string" | "integer" | "float" | "true" | "false" | "none"
        | "ellipsis" => Shape::Constant,
        "attribute" | "member_type" => Shape::Attribute,
        "subscript" | "generic_type" => Shape::Subscript,
        "list" => Shape::List,
        "unary_operator" => match node.child_by_field_name("operator") {
            Some(op) if text(op, source) == "-" => Shape::UnaryNeg,
            _ => Shape::Other,
        },
        _ => Shape::Other,
    }
}

/// Render `node` if its form is accepted at this place, `None` otherwise
pub fn render_in(node: Node, source: &[u8], allowed: Allowed) -> Option<String> {
    let shape = shape_of(node, source);
    if allowed.shapes.contains(&shape) {
        return Some(render(node, source));
    }
    if shape == Shape::Other {
        warn!(
            "unsupported {} omitted: {} ({})",
            allowed.label,
            text(node, source),
            node.kind()
        );
    } else {
        debug!("{:?} not accepted as {}: {}", shape, allowed.label, text(node, source));
    }
    None
}

/// Render any known form; unknown forms are logged and give an empty string
pub fn render(node: Node, source: &[u8]) -> String {
    let node = unwrap_type(node);
    match shape_of(node, source) {
        Shape::Name | Shape::Constant => text(node, source).to_string(),
        Shape::Attribute => render_attribute(node, source),
        Shape::Subscript => render_subscript(node, source),
        Shape::List => {
            let mut cursor = node.walk();
            let elts: Vec<String> = node
                .named_children(&mut cursor)
                .filter(|elt| elt.kind() != "comment")
                .map(|elt| render(elt, source))
                .filter(|elt| !elt.is_empty())
                .collect();
            format!("[{}]", elts.join(", "))
        }
        Shape::UnaryNeg => render_unary(node, source),
        Shape::Other => {
            warn!("unknown type of node: {} ({})", text(node, source), node.kind());
            String::new()
        }
    }
}

fn render_attribute(node: Node, source: &[u8]) -> String {
    if node.kind() == "member_type" {
        let mut cursor = node.walk();
        let parts: Vec<String> = node
            .named_children(&mut cursor)
            .map(|part| render(part, source))
            .collect();
        return parts.join(".");
    }
    let object = node.child_by_field_name("object").map(|n| render(n, source));
    let attribute = node.child_by_field_name("attribute").map(|n| text(n, source));
    match (object, attribute) {
        (Some(object), Some(attribute)) if !object.is_empty() => {
            format!("{}.{}", object, attribute)
        }
        _ => String::new(),
    }
}

fn render_subscript(node: Node, source: &[u8]) -> String {
    if node.kind() == "generic_type" {
        let mut cursor = node.walk();
        let mut name = String::new();
        let mut params = Vec::new();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_parameter" => {
                    let mut inner = child.walk();
                    params.extend(
                        child
                            .named_children(&mut inner)
                            .map(|p| render(p, source))
                            .filter(|p| !p.is_empty()),
                    );
                }
                _ => name = render(child, source),
            }
        }
        return format!("{}[{}]", name, params.join(", "));
    }

    let value = match node.child_by_field_name("value") {
        Some(value) => render(value, source),
        None => return String::new(),
    };
    let mut cursor = node.walk();
    let elts: Vec<String> = node
        .children_by_field_name("subscript", &mut cursor)
        .map(|elt| render(elt, source))
        .filter(|elt| !elt.is_empty())
        .collect();
    format!("{}[{}]", value, elts.join(", "))
}

fn render_unary(node: Node, source: &[u8]) -> String {
    match node.child_by_field_name("argument") {
        Some(arg)
            if matches!(
                shape_of(arg, source),
                Shape::Name | Shape::Constant | Shape::Attribute
            ) =>
        {
            format!("-{}", render(arg, source))
        }
        _ => {
            warn!("unknown type of node: {}", text(node, source));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::python::PythonParser;

    /// Render the default value of the single parameter of `def f(...)`
    fn with_param<T>(params: &str, check: impl FnOnce(Node, &[u8]) -> T) -> T {
        let source = format!("def f({}):\n    pass\n", params);
        let mut parser = PythonParser::new().unwrap();
        let tree = parser.parse(&source).unwrap();
        let func = tree.root_node().named_child(0).unwrap();
        let parameters = func.child_by_field_name("parameters").unwrap();
        let param = parameters.named_child(0).unwrap();
        check(param, source.as_bytes())
    }

    fn default_of(params: &str) -> Option<String> {
        with_param(params, |param, src| {
            render_in(param.child_by_field_name("value").unwrap(), src, DEFAULT_VALUE)
        })
    }

    fn annotation_of(params: &str) -> Option<String> {
        with_param(params, |param, src| {
            render_in(param.child_by_field_name("type").unwrap(), src, ANNOTATION)
        })
    }

    #[test]
    fn test_constant_defaults() {
        assert_eq!(default_of("x=1").as_deref(), Some("1"));
        assert_eq!(default_of("x=2.5").as_deref(), Some("2.5"));
        assert_eq!(default_of("x=None").as_deref(), Some("None"));
        assert_eq!(default_of("x=True").as_deref(), Some("True"));
        assert_eq!(default_of("x='abc'").as_deref(), Some("'abc'"));
    }

    #[test]
    fn test_name_and_attribute_defaults() {
        assert_eq!(default_of("x=DEFAULT").as_deref(), Some("DEFAULT"));
        assert_eq!(default_of("x=os.sep").as_deref(), Some("os.sep"));
        assert_eq!(default_of("x=a.b.c").as_deref(), Some("a.b.c"));
    }

    #[test]
    fn test_negative_defaults() {
        assert_eq!(default_of("x=-1").as_deref(), Some("-1"));
        assert_eq!(default_of("x=-LIMIT").as_deref(), Some("-LIMIT"));
        assert_eq!(default_of("x=not y"), None);
    }

    #[test]
    fn test_unsupported_defaults_are_omitted() {
        assert_eq!(default_of("x=[]"), None);
        assert_eq!(default_of("x=dict()"), None);
        assert_eq!(default_of("x=lambda: 0"), None);
    }

    #[test]
    fn test_annotations() {
        assert_eq!(annotation_of("x: int").as_deref(), Some("int"));
        assert_eq!(annotation_of("x: pathlib.Path").as_deref(), Some("pathlib.Path"));
        assert_eq!(
            annotation_of("x: Dict[str, int]").as_deref(),
            Some("Dict[str, int]")
        );
        assert_eq!(
            annotation_of("x: Callable[[int, str], bool]").as_deref(),
            Some("Callable[[int, str], bool]")
        );
        assert_eq!(annotation_of("x: 'Forward'"), None);
    }

    #[test]
    fn test_shape_of_unwraps_type() {
        with_param("x: int", |param, src| {
            let ty = param.child_by_field_name("type").unwrap();
            assert_eq!(shape_of(ty, src), Shape::Name);
        });
    }
}
