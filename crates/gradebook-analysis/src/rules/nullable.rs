//! Nullable types must be written `X | None`, never `Optional[X]`.

use std::path::Path;

use crate::parsers::{parse_file, SyntaxNode};

use super::RuleSettings;

/// `true` if the file never subscripts an optional wrapper.
///
/// Missing, undecodable, or unparsable files return `false`.
pub fn check_uses_union_none_syntax(path: &Path, settings: &RuleSettings) -> bool {
    match parse_file(path) {
        Ok(tree) => uses_union_none_syntax(&tree, settings),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "nullable rule: not analyzable");
            false
        }
    }
}

/// Tree form of [`check_uses_union_none_syntax`].
pub fn uses_union_none_syntax(tree: &SyntaxNode, settings: &RuleSettings) -> bool {
    let mut wrapped = false;
    tree.walk(&mut |node| {
        if let SyntaxNode::Subscript { value, .. } = node {
            wrapped |= settings.is_optional_wrapper(value);
        }
    });
    !wrapped
}
