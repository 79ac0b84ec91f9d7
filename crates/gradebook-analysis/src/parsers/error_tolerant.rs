//! ERROR/MISSING node accounting for trees that failed to parse cleanly.

use tree_sitter::Node;

/// Count ERROR and MISSING nodes; also returns the 1-based line of the first.
pub fn count_errors(root: Node) -> (u32, u32) {
    let mut count = 0u32;
    let mut first_line = None;
    collect_errors(root, &mut count, &mut first_line);
    (count, first_line.unwrap_or(0))
}

fn collect_errors(node: Node, count: &mut u32, first_line: &mut Option<u32>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        if first_line.is_none() {
            *first_line = Some(node.start_position().row as u32 + 1);
        }
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, count, first_line);
    }
}
