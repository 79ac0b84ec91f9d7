//! Typed syntax tree consumed by the rule engine.
//!
//! Only the node kinds the rules inspect get their own variant; everything
//! else is kept as [`SyntaxNode::Other`] so that a full walk still reaches
//! every expression in the file. The tree is immutable once built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyntaxNode {
    Module {
        body: Vec<SyntaxNode>,
    },
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    /// `base[...]`, both in expressions and in type annotations.
    Subscript {
        value: Box<SyntaxNode>,
        slice: Vec<SyntaxNode>,
    },
    /// `left | right` in a type position.
    Union {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    Name(String),
    /// `value.attr`
    Attribute {
        value: Box<SyntaxNode>,
        attr: String,
    },
    Call {
        func: Box<SyntaxNode>,
        args: Vec<SyntaxNode>,
    },
    Other {
        kind: String,
        children: Vec<SyntaxNode>,
    },
}

/// `def` / `async def`, with any decorators applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub is_async: bool,
    pub decorators: Vec<Decorator>,
    pub params: Vec<Parameter>,
    pub returns: Option<Box<SyntaxNode>>,
    pub body: Vec<SyntaxNode>,
    /// 1-based line of the `def` keyword.
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub bases: Vec<SyntaxNode>,
    pub body: Vec<SyntaxNode>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    pub expression: SyntaxNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Positional,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<SyntaxNode>,
    pub default: Option<SyntaxNode>,
}

impl Decorator {
    /// The decorator's target with any call stripped: `@a.b(x)` → `a.b`.
    pub fn target(&self) -> &SyntaxNode {
        match &self.expression {
            SyntaxNode::Call { func, .. } => func,
            other => other,
        }
    }
}

impl SyntaxNode {
    /// Final segment of a `Name` or dotted `Attribute` chain.
    pub fn terminal_name(&self) -> Option<&str> {
        match self {
            SyntaxNode::Name(name) => Some(name),
            SyntaxNode::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    /// Dotted rendering of a `Name`/`Attribute` chain, e.g. `typing.Dict`.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            SyntaxNode::Name(name) => Some(name.clone()),
            SyntaxNode::Attribute { value, attr } => {
                value.qualified_name().map(|base| format!("{base}.{attr}"))
            }
            _ => None,
        }
    }

    /// Visit this node and every descendant, pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        match self {
            SyntaxNode::Module { body } => walk_all(body, visit),
            SyntaxNode::FunctionDef(func) => {
                for decorator in &func.decorators {
                    decorator.expression.walk(visit);
                }
                for param in &func.params {
                    if let Some(annotation) = &param.annotation {
                        annotation.walk(visit);
                    }
                    if let Some(default) = &param.default {
                        default.walk(visit);
                    }
                }
                if let Some(returns) = &func.returns {
                    returns.walk(visit);
                }
                walk_all(&func.body, visit);
            }
            SyntaxNode::ClassDef(class) => {
                for decorator in &class.decorators {
                    decorator.expression.walk(visit);
                }
                walk_all(&class.bases, visit);
                walk_all(&class.body, visit);
            }
            SyntaxNode::Subscript { value, slice } => {
                value.walk(visit);
                walk_all(slice, visit);
            }
            SyntaxNode::Union { left, right } => {
                left.walk(visit);
                right.walk(visit);
            }
            SyntaxNode::Name(_) => {}
            SyntaxNode::Attribute { value, .. } => value.walk(visit),
            SyntaxNode::Call { func, args } => {
                func.walk(visit);
                walk_all(args, visit);
            }
            SyntaxNode::Other { children, .. } => walk_all(children, visit),
        }
    }
}

fn walk_all<'a>(nodes: &'a [SyntaxNode], visit: &mut impl FnMut(&'a SyntaxNode)) {
    for node in nodes {
        node.walk(visit);
    }
}
