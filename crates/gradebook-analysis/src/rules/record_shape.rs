//! Method signatures should take and return record types, not generic maps.
//!
//! - Parameters: a bare map (`dict`) is a violation; a parameterized map
//!   (`dict[str, Any]`) is allowed.
//! - Returns: any map is a violation, except inside a record-type class,
//!   whose methods may return maps (e.g. `to_dict`).
//! - Unions are checked branch by branch with the same allowances.
//!
//! Record-type membership is lexical: it is threaded through the walk as a
//! [`Scope`] value, so sibling and nested classes never see each other's.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::parsers::{parse_file, FunctionDef, SyntaxNode};

use super::RuleSettings;

/// Where in a signature a map type was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum SignatureSlot {
    Parameter(String),
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeViolation {
    pub function: String,
    pub line: u32,
    pub slot: SignatureSlot,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            SignatureSlot::Parameter(name) => write!(
                f,
                "line {}: {}() parameter `{}` is a bare map",
                self.line, self.function, name
            ),
            SignatureSlot::Return => {
                write!(f, "line {}: {}() returns a map", self.line, self.function)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_record: bool,
}

/// Per-walk state: created for one file, dropped after the walk.
struct VisitorState<'s> {
    settings: &'s RuleSettings,
    violations: Vec<ShapeViolation>,
}

impl<'s> VisitorState<'s> {
    fn new(settings: &'s RuleSettings) -> Self {
        Self {
            settings,
            violations: Vec::new(),
        }
    }

    fn visit(&mut self, node: &SyntaxNode, scope: Scope) {
        match node {
            SyntaxNode::Module { body } => self.visit_all(body, scope),
            SyntaxNode::FunctionDef(func) => {
                self.check_signature(func, scope);
                self.visit_all(&func.body, scope);
            }
            SyntaxNode::ClassDef(class) => {
                let inner = Scope {
                    in_record: self.settings.is_record_class(class),
                };
                self.visit_all(&class.body, inner);
            }
            SyntaxNode::Other { children, .. } => self.visit_all(children, scope),
            // Expressions cannot contain definitions.
            SyntaxNode::Subscript { .. }
            | SyntaxNode::Union { .. }
            | SyntaxNode::Name(_)
            | SyntaxNode::Attribute { .. }
            | SyntaxNode::Call { .. } => {}
        }
    }

    fn visit_all(&mut self, nodes: &[SyntaxNode], scope: Scope) {
        for node in nodes {
            self.visit(node, scope);
        }
    }

    fn check_signature(&mut self, func: &FunctionDef, scope: Scope) {
        for param in &func.params {
            if self.settings.is_receiver(param) {
                continue;
            }
            if let Some(annotation) = &param.annotation {
                if self.param_violates(annotation) {
                    self.record(func, SignatureSlot::Parameter(param.name.clone()));
                }
            }
        }
        if let Some(returns) = &func.returns {
            if !scope.in_record && self.return_violates(returns) {
                self.record(func, SignatureSlot::Return);
            }
        }
    }

    fn param_violates(&self, annotation: &SyntaxNode) -> bool {
        match annotation {
            SyntaxNode::Union { left, right } => {
                self.param_violates(left) || self.param_violates(right)
            }
            other => self.settings.is_map_name(other),
        }
    }

    fn return_violates(&self, annotation: &SyntaxNode) -> bool {
        match annotation {
            SyntaxNode::Union { left, right } => {
                self.return_violates(left) || self.return_violates(right)
            }
            SyntaxNode::Subscript { value, .. } => self.settings.is_map_name(value),
            other => self.settings.is_map_name(other),
        }
    }

    fn record(&mut self, func: &FunctionDef, slot: SignatureSlot) {
        self.violations.push(ShapeViolation {
            function: func.name.clone(),
            line: func.line,
            slot,
        });
    }
}

/// Every map-typed signature slot in the tree, in source order.
pub fn find_shape_violations(tree: &SyntaxNode, settings: &RuleSettings) -> Vec<ShapeViolation> {
    let mut state = VisitorState::new(settings);
    state.visit(tree, Scope::default());
    state.violations
}

/// Tree form of [`check_methods_use_records`].
pub fn methods_use_records(tree: &SyntaxNode, settings: &RuleSettings) -> bool {
    find_shape_violations(tree, settings).is_empty()
}

/// `true` if no signature in the file uses a disallowed map type.
///
/// Missing, undecodable, or unparsable files return `false`.
pub fn check_methods_use_records(path: &Path, settings: &RuleSettings) -> bool {
    match parse_file(path) {
        Ok(tree) => methods_use_records(&tree, settings),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "record-shape rule: not analyzable");
            false
        }
    }
}
