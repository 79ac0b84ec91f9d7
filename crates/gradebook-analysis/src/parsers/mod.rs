//! Parser collaborator: tree-sitter-python source → [`SyntaxNode`] tree.

pub mod error_tolerant;
pub mod python;
pub mod syntax;

pub use python::{parse_file, parse_source};
pub use syntax::{ClassDef, Decorator, FunctionDef, Parameter, ParameterKind, SyntaxNode};
