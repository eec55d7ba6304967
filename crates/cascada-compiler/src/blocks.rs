use crate::error::CompileError;
use cascada_ast::{Literal, Node, NodeId, NodeKind, Position};
use indexmap::IndexMap;

/// Walks the whole tree collecting `{% block name %}` definitions
/// (`spec.md` §7: "Block defined more than once" is a `TemplateError`).
pub fn collect_blocks(root: &Node) -> Result<IndexMap<String, NodeId>, CompileError> {
    let mut seen: IndexMap<String, Position> = IndexMap::new();
    let mut blocks = IndexMap::new();
    walk(root, &mut seen, &mut blocks)?;
    Ok(blocks)
}

fn walk(
    node: &Node,
    seen: &mut IndexMap<String, Position>,
    blocks: &mut IndexMap<String, NodeId>,
) -> Result<(), CompileError> {
    if let NodeKind::Block { name, .. } = &node.kind {
        if let Some(first) = seen.get(name) {
            return Err(CompileError::DuplicateBlock {
                name: name.clone(),
                first: *first,
                second: node.pos,
            });
        }
        seen.insert(name.clone(), node.pos);
        blocks.insert(name.clone(), node.id);
    }
    for child in node.kind.children() {
        walk(child, seen, blocks)?;
    }
    Ok(())
}

/// The top-level statement list a template's root is made of — just `root`
/// itself if it isn't a `Root` node, so a bare single-statement tree (handy
/// in tests) is still a valid compile input.
fn top_level(root: &Node) -> Vec<&Node> {
    match &root.kind {
        NodeKind::Root(items) => items.iter().collect(),
        _ => vec![root],
    }
}

/// `{% extends %}` must be the template's first statement, matching the
/// conventional Jinja-family rule `spec.md` assumes but never states
/// outright (it only describes what `Extends` does at runtime, not where it
/// may appear) — recorded as an Open Question Decision in `DESIGN.md`.
/// Returns the statically-known template name if an `extends` was found.
pub fn find_extends(root: &Node) -> Result<Option<String>, CompileError> {
    let items = top_level(root);
    for (idx, item) in items.iter().enumerate() {
        if let NodeKind::Extends(name_node) = &item.kind {
            if idx != 0 {
                return Err(CompileError::ExtendsNotFirst(item.pos));
            }
            return match &name_node.kind {
                NodeKind::Literal(Literal::Str(s)) => Ok(Some(s.clone())),
                _ => Err(CompileError::DynamicExtends(name_node.pos)),
            };
        }
    }
    Ok(None)
}
