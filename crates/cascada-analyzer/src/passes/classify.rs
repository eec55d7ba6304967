use crate::analysis::{OpKind, SequenceOps};
use cascada_ast::{Literal, Node, NodeId, NodeKind};
use indexmap::{IndexMap, IndexSet};

/// Pass 3 (`spec.md` §4.4): tags each node's statically-known sequence-lock
/// reads/calls, merging bottom-up to find contention between a `!`-marked
/// call and a plain read (or two `!`-marked calls) on the same key —
/// `eval_funcall` consults the result to decide whether a given call must
/// go through `sequenced_call` rather than running directly.
pub fn classify(root: &Node, declared: &IndexSet<String>) -> IndexMap<NodeId, SequenceOps> {
    let mut ops_map = IndexMap::new();
    bottom_up(root, declared, &mut ops_map);
    ops_map
}

/// Re-decomposes a node as a static path (ignoring markers — pass 2 already
/// validated those) so this pass can test whether a plain read lines up
/// with a declared lock key.
fn static_path(node: &Node) -> Option<Vec<String>> {
    match &node.kind {
        NodeKind::Symbol { name, .. } => Some(vec![name.clone()]),
        NodeKind::LookupVal { target, key, .. } => {
            let mut base = static_path(target)?;
            match &key.kind {
                NodeKind::Literal(Literal::Str(s)) => {
                    base.push(s.clone());
                    Some(base)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// This node's own tag, before merging in children: `Lock(key)` if it is
/// the `FunCall` whose callee carries the `!` marker for `key`; `Path(key)`
/// if it is a plain read whose static path is a prefix of a declared key
/// (so it could race with that key's lock holder).
fn own_tag(node: &Node, declared: &IndexSet<String>) -> Option<(String, OpKind)> {
    match &node.kind {
        NodeKind::FunCall { callee, .. } => {
            let segs = static_path_with_marker(callee)?;
            let marker_idx = segs.iter().position(|(_, m)| *m)?;
            let key = format!(
                "!{}",
                segs[..=marker_idx]
                    .iter()
                    .map(|(s, _)| s.as_str())
                    .collect::<Vec<_>>()
                    .join("!")
            );
            declared.contains(&key).then_some((key, OpKind::Lock))
        }
        NodeKind::Symbol { .. } | NodeKind::LookupVal { .. } => {
            let path = static_path(node)?;
            declared.iter().find_map(|key| {
                let key_segs: Vec<&str> = key.trim_start_matches('!').split('!').collect();
                let matches = path.len() <= key_segs.len()
                    && path.iter().zip(key_segs.iter()).all(|(a, b)| a == b);
                matches.then(|| (key.clone(), OpKind::Path))
            })
        }
        _ => None,
    }
}

fn static_path_with_marker(node: &Node) -> Option<Vec<(String, bool)>> {
    match &node.kind {
        NodeKind::Symbol {
            name,
            sequence_marker,
        } => Some(vec![(name.clone(), *sequence_marker)]),
        NodeKind::LookupVal {
            target,
            key,
            sequence_marker,
        } => {
            let mut base = static_path_with_marker(target)?;
            match &key.kind {
                NodeKind::Literal(Literal::Str(s)) => {
                    base.push((s.clone(), *sequence_marker));
                    Some(base)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn bottom_up(node: &Node, declared: &IndexSet<String>, ops_map: &mut IndexMap<NodeId, SequenceOps>) {
    let children = node.kind.children();
    for child in &children {
        bottom_up(child, declared, ops_map);
    }

    let mut merged: SequenceOps = IndexMap::new();
    let mut source: IndexMap<String, Option<NodeId>> = IndexMap::new();
    if let Some((key, kind)) = own_tag(node, declared) {
        merged.insert(key.clone(), kind);
        source.insert(key, None);
    }

    for child in &children {
        let Some(child_ops) = ops_map.get(&child.id).cloned() else {
            continue;
        };
        for (key, kind) in child_ops {
            match source.get(&key).cloned() {
                Some(_) => {
                    merged.insert(key.clone(), OpKind::Contended);
                }
                None => {
                    merged.insert(key.clone(), kind);
                    source.insert(key, Some(child.id));
                }
            }
        }
    }

    ops_map.insert(node.id, merged);
}
