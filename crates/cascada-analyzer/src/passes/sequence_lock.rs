use crate::error::AnalysisError;
use crate::scope::ScopeStack;
use cascada_ast::{ForTarget, Literal, Node, NodeKind, Position};
use indexmap::IndexSet;

struct PathSeg {
    /// `None` when this segment's key is a dynamically computed expression
    /// rather than a literal string.
    name: Option<String>,
    marker: bool,
    pos: Position,
}

/// Walks `callee` as a chain of `Symbol` / static-`LookupVal` nodes, root
/// first. Returns `None` if the callee is not rooted in a bare `Symbol`
/// (e.g. it is itself a call result) — such callees are never eligible for
/// a sequence lock, which is not an error, just a no-op for this pass.
fn decompose(node: &Node) -> Option<Vec<PathSeg>> {
    match &node.kind {
        NodeKind::Symbol {
            name,
            sequence_marker,
        } => Some(vec![PathSeg {
            name: Some(name.clone()),
            marker: *sequence_marker,
            pos: node.pos,
        }]),
        NodeKind::LookupVal {
            target,
            key,
            sequence_marker,
        } => {
            let mut base = decompose(target)?;
            let name = match &key.kind {
                NodeKind::Literal(Literal::Str(s)) => Some(s.clone()),
                _ => None,
            };
            base.push(PathSeg {
                name,
                marker: *sequence_marker,
                pos: node.pos,
            });
            Some(base)
        }
        _ => None,
    }
}

/// Pass 2 (`spec.md` §4.4): discovers every `!`-declared sequence-lock key
/// and validates the constraints listed there. Returns the full set of
/// declared keys in first-seen order, or the first validation failure.
pub fn declare(root: &Node) -> Result<IndexSet<String>, AnalysisError> {
    let mut declared = IndexSet::new();
    let mut scope = ScopeStack::new();
    scope.push();
    walk(root, &mut scope, &mut declared)?;
    scope.pop();
    Ok(declared)
}

fn walk(
    node: &Node,
    scope: &mut ScopeStack,
    declared: &mut IndexSet<String>,
) -> Result<(), AnalysisError> {
    if let NodeKind::FunCall { callee, .. } = &node.kind {
        check_call(callee, scope, declared)?;
    }

    match &node.kind {
        NodeKind::Macro { params, body, .. } => {
            scope.push();
            scope.enter_macro();
            for p in params {
                scope.declare(&p.name);
            }
            walk(body, scope, declared)?;
            scope.leave_macro();
            scope.pop();
            return Ok(());
        }
        NodeKind::Caller { params, body } => {
            scope.push();
            for p in params {
                scope.declare(&p.name);
            }
            walk(body, scope, declared)?;
            scope.pop();
            return Ok(());
        }
        NodeKind::For {
            target,
            iter,
            body,
            else_branch,
        } => {
            walk(iter, scope, declared)?;
            scope.push();
            match target {
                ForTarget::Single(name) => scope.declare(name),
                ForTarget::Pair(k, v) => {
                    scope.declare(k);
                    scope.declare(v);
                }
            }
            walk(body, scope, declared)?;
            scope.pop();
            if let Some(e) = else_branch {
                walk(e, scope, declared)?;
            }
            return Ok(());
        }
        NodeKind::Set {
            targets,
            value,
            body,
        } => {
            for t in targets {
                if let NodeKind::Symbol { name, .. } = &t.kind {
                    scope.declare(name);
                }
            }
            if let Some(v) = value {
                walk(v, scope, declared)?;
            }
            if let Some(b) = body {
                scope.push();
                walk(b, scope, declared)?;
                scope.pop();
            }
            return Ok(());
        }
        NodeKind::Capture { target, body } => {
            scope.push();
            walk(body, scope, declared)?;
            scope.pop();
            if let Some(name) = target {
                scope.declare(name);
            }
            return Ok(());
        }
        NodeKind::Import { name, target } => {
            walk(name, scope, declared)?;
            scope.declare(target);
            return Ok(());
        }
        NodeKind::FromImport { name, names, .. } => {
            walk(name, scope, declared)?;
            for (imported, alias) in names {
                scope.declare(alias.as_deref().unwrap_or(imported.as_str()));
            }
            return Ok(());
        }
        _ => {}
    }

    for child in node.kind.children() {
        walk(child, scope, declared)?;
    }
    Ok(())
}

fn check_call(
    callee: &Node,
    scope: &ScopeStack,
    declared: &mut IndexSet<String>,
) -> Result<(), AnalysisError> {
    let Some(segs) = decompose(callee) else {
        return Ok(());
    };
    let marker_count = segs.iter().filter(|s| s.marker).count();
    if marker_count == 0 {
        return Ok(());
    }
    if marker_count > 1 {
        return Err(AnalysisError::MultipleMarkers(callee.pos));
    }
    let marker_idx = segs.iter().position(|s| s.marker).unwrap();

    if segs[marker_idx].name.is_none() {
        return Err(AnalysisError::NonStaticMarker(segs[marker_idx].pos));
    }
    if let Some(dynamic) = segs[..marker_idx].iter().find(|s| s.name.is_none()) {
        return Err(AnalysisError::DynamicPrefix(dynamic.pos));
    }

    let root = &segs[0];
    let root_name = root.name.as_ref().expect("validated static above");
    if scope.in_macro() {
        return Err(AnalysisError::InsideMacro(root.pos));
    }
    if scope.is_declared(root_name) {
        return Err(AnalysisError::LocalRoot {
            name: root_name.clone(),
            pos: root.pos,
        });
    }

    let key = format!(
        "!{}",
        segs[..=marker_idx]
            .iter()
            .map(|s| s.name.as_deref().unwrap())
            .collect::<Vec<_>>()
            .join("!")
    );
    declared.insert(key);
    Ok(())
}
