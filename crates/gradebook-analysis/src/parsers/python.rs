//! Python parser: tree-sitter-python CST normalized into [`SyntaxNode`].

use std::path::Path;

use gradebook_core::errors::ParseError;
use tree_sitter::{Language, Node, Parser};

use super::error_tolerant::count_errors;
use super::syntax::{ClassDef, Decorator, FunctionDef, Parameter, ParameterKind, SyntaxNode};

/// Read and parse a file. Unreadable files surface as [`ParseError::Io`].
pub fn parse_file(path: &Path) -> Result<SyntaxNode, ParseError> {
    let source = std::fs::read(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_source(&source)
}

/// Parse raw source bytes. Any ERROR or MISSING node rejects the whole file.
pub fn parse_source(source: &[u8]) -> Result<SyntaxNode, ParseError> {
    std::str::from_utf8(source).map_err(|e| ParseError::Decode {
        message: e.to_string(),
    })?;

    let language: Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::Grammar {
            message: e.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();
    if root.has_error() {
        let (count, first_line) = count_errors(root);
        tracing::debug!(count, first_line, "rejecting source with syntax errors");
        return Err(ParseError::Syntax {
            count: count.max(1),
            first_line,
        });
    }

    Ok(PythonNormalizer.normalize_node(&root, source))
}

struct PythonNormalizer;

impl PythonNormalizer {
    fn normalize_node(&self, node: &Node, source: &[u8]) -> SyntaxNode {
        match node.kind() {
            "module" => SyntaxNode::Module {
                body: self.normalize_children(node, source),
            },
            "function_definition" => {
                SyntaxNode::FunctionDef(self.normalize_function(node, source, Vec::new()))
            }
            "class_definition" => {
                SyntaxNode::ClassDef(self.normalize_class(node, source, Vec::new()))
            }
            "decorated_definition" => self.normalize_decorated(node, source),
            "subscript" => {
                let value = self.normalize_field(node, "value", source);
                let mut cursor = node.walk();
                let slice = node
                    .children_by_field_name("subscript", &mut cursor)
                    .map(|child| self.normalize_node(&child, source))
                    .collect();
                SyntaxNode::Subscript {
                    value: Box::new(value),
                    slice,
                }
            }
            "generic_type" => self.normalize_generic_type(node, source),
            "union_type" => {
                let mut cursor = node.walk();
                let mut parts = node.named_children(&mut cursor);
                match (parts.next(), parts.next()) {
                    (Some(left), Some(right)) => SyntaxNode::Union {
                        left: Box::new(self.normalize_node(&left, source)),
                        right: Box::new(self.normalize_node(&right, source)),
                    },
                    _ => self.normalize_other(node, source),
                }
            }
            "binary_operator" => {
                let is_pipe = node
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "|")
                    .unwrap_or(false);
                match (
                    is_pipe,
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (true, Some(left), Some(right)) => SyntaxNode::Union {
                        left: Box::new(self.normalize_node(&left, source)),
                        right: Box::new(self.normalize_node(&right, source)),
                    },
                    _ => self.normalize_other(node, source),
                }
            }
            // Annotation wrapper; the interesting expression is its only child.
            "type" => match node.named_child(0) {
                Some(inner) => self.normalize_node(&inner, source),
                None => self.normalize_other(node, source),
            },
            "identifier" => SyntaxNode::Name(text(node, source)),
            "attribute" => {
                let value = self.normalize_field(node, "object", source);
                let attr = node
                    .child_by_field_name("attribute")
                    .map(|n| text(&n, source))
                    .unwrap_or_default();
                SyntaxNode::Attribute {
                    value: Box::new(value),
                    attr,
                }
            }
            "member_type" => {
                let mut cursor = node.walk();
                let parts: Vec<Node> = node.named_children(&mut cursor).collect();
                match parts.as_slice() {
                    [value, .., attr] => SyntaxNode::Attribute {
                        value: Box::new(self.normalize_node(value, source)),
                        attr: text(attr, source),
                    },
                    _ => self.normalize_other(node, source),
                }
            }
            "call" => {
                let func = self.normalize_field(node, "function", source);
                let args = node
                    .child_by_field_name("arguments")
                    .map(|a| self.normalize_children(&a, source))
                    .unwrap_or_default();
                SyntaxNode::Call {
                    func: Box::new(func),
                    args,
                }
            }
            _ => self.normalize_other(node, source),
        }
    }

    fn normalize_children(&self, node: &Node, source: &[u8]) -> Vec<SyntaxNode> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| self.normalize_node(&child, source))
            .collect()
    }

    fn normalize_other(&self, node: &Node, source: &[u8]) -> SyntaxNode {
        SyntaxNode::Other {
            kind: node.kind().to_string(),
            children: self.normalize_children(node, source),
        }
    }

    fn normalize_field(&self, node: &Node, field: &str, source: &[u8]) -> SyntaxNode {
        match node.child_by_field_name(field) {
            Some(child) => self.normalize_node(&child, source),
            None => SyntaxNode::Other {
                kind: format!("missing_{field}"),
                children: Vec::new(),
            },
        }
    }

    fn normalize_decorated(&self, node: &Node, source: &[u8]) -> SyntaxNode {
        let mut cursor = node.walk();
        let decorators: Vec<Decorator> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|child| child.named_child(0))
            .map(|expr| Decorator {
                expression: self.normalize_node(&expr, source),
            })
            .collect();

        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "function_definition" => {
                SyntaxNode::FunctionDef(self.normalize_function(&def, source, decorators))
            }
            Some(def) if def.kind() == "class_definition" => {
                SyntaxNode::ClassDef(self.normalize_class(&def, source, decorators))
            }
            _ => self.normalize_other(node, source),
        }
    }

    fn normalize_function(
        &self,
        node: &Node,
        source: &[u8],
        decorators: Vec<Decorator>,
    ) -> FunctionDef {
        let name = node
            .child_by_field_name("name")
            .map(|n| text(&n, source))
            .unwrap_or_default();
        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.normalize_parameters(&p, source))
            .unwrap_or_default();
        let returns = node
            .child_by_field_name("return_type")
            .map(|r| Box::new(self.normalize_node(&r, source)));
        let body = node
            .child_by_field_name("body")
            .map(|b| self.normalize_children(&b, source))
            .unwrap_or_default();

        FunctionDef {
            name,
            is_async,
            decorators,
            params,
            returns,
            body,
            line: line_of(node),
        }
    }

    fn normalize_class(&self, node: &Node, source: &[u8], decorators: Vec<Decorator>) -> ClassDef {
        let name = node
            .child_by_field_name("name")
            .map(|n| text(&n, source))
            .unwrap_or_default();
        let bases = node
            .child_by_field_name("superclasses")
            .map(|s| self.normalize_children(&s, source))
            .unwrap_or_default();
        let body = node
            .child_by_field_name("body")
            .map(|b| self.normalize_children(&b, source))
            .unwrap_or_default();

        ClassDef {
            name,
            decorators,
            bases,
            body,
            line: line_of(node),
        }
    }

    /// `X[...]` in annotation position: base name plus the bracketed types.
    fn normalize_generic_type(&self, node: &Node, source: &[u8]) -> SyntaxNode {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        let Some(base) = children.first() else {
            return self.normalize_other(node, source);
        };
        let slice = children
            .iter()
            .find(|c| c.kind() == "type_parameter")
            .map(|params| self.normalize_children(params, source))
            .unwrap_or_default();
        SyntaxNode::Subscript {
            value: Box::new(self.normalize_node(base, source)),
            slice,
        }
    }

    fn normalize_parameters(&self, node: &Node, source: &[u8]) -> Vec<Parameter> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter_map(|child| self.normalize_parameter(&child, source))
            .collect()
    }

    fn normalize_parameter(&self, node: &Node, source: &[u8]) -> Option<Parameter> {
        let annotation = node
            .child_by_field_name("type")
            .map(|t| self.normalize_node(&t, source));
        let default = node
            .child_by_field_name("value")
            .map(|v| self.normalize_node(&v, source));

        let (name, kind) = match node.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                parameter_target(node, source)
            }
            "typed_parameter" => parameter_target(&node.named_child(0)?, source),
            "default_parameter" | "typed_default_parameter" => {
                parameter_target(&node.child_by_field_name("name")?, source)
            }
            // `*` and `/` separators, comments
            _ => return None,
        };

        Some(Parameter {
            name,
            kind,
            annotation,
            default,
        })
    }
}

fn parameter_target(node: &Node, source: &[u8]) -> (String, ParameterKind) {
    let kind = match node.kind() {
        "list_splat_pattern" => ParameterKind::VarPositional,
        "dictionary_splat_pattern" => ParameterKind::VarKeyword,
        _ => ParameterKind::Positional,
    };
    let name = match kind {
        ParameterKind::Positional => text(node, source),
        _ => node
            .named_child(0)
            .map(|inner| text(&inner, source))
            .unwrap_or_default(),
    };
    (name, kind)
}

fn text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn line_of(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}
