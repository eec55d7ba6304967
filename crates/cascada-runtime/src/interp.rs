//! The tree-walking interpreter (C5): a single recursive `eval` over
//! `cascada_ast::NodeKind`, rather than a second emitted representation.
//! `cascada_ir::Program`'s own docs already make this call — "the emitted
//! program is the analyzed AST itself" — so there is nothing left for an
//! emitter to translate into; evaluating the tree directly, with awaits
//! placed exactly where `spec.md` §4.5/§5 says a given construct suspends,
//! plays the role C5 was named for.
//!
//! Concurrency comes only from the safe gather combinators
//! (`cascada_ir::join_all`/`resolve_all`/`resolve_duo`) over work the
//! analyzer or a local scan has already shown cannot conflict: `Output`
//! children, literal array/dict entries, call argument lists, `Do`
//! children, and for-loop iterations whose body contains no `Set`. The one
//! place a real [`crate::async_frame::AsyncFrame`] snapshot is built is the
//! opposite case — a loop body that does write — where `spec.md` §4.5
//! mandates strictly sequential iterations instead.

use crate::async_frame::AsyncFrame;
use crate::context::Context;
use crate::env::{is_top_level, Env, EvalCtx, TemplateLoader};
use crate::frame::{self, Frame, Scope};
use crate::macro_value::MacroHandle;
use crate::registry::Registry;
use crate::scheduler::{wait_all_closures, Scheduler};
use crate::sequence_lock::sequenced_call;
use crate::values::{RtArray, RtDict};
use cascada_analyzer::OpKind;
use cascada_ast::ops::{ArithOp, BoolOp, CompareOp, UnaryOp};
use cascada_ast::{CallArgs, ForTarget, Literal, Node, NodeKind, Position};
use cascada_ir::{
    ensure_defined, flatten_buffer, join_all, resolve, resolve_all, resolve_duo,
    resolve_object_properties, suppress_value, BlockId, EntityRef, Program, RenderError,
    Scalar, Value,
};
use indexmap::{IndexMap, IndexSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, trace};

/// The recursive evaluator. Boxed because `NodeKind` is itself recursive —
/// every nested `eval` call has to be able to return a future of unknown,
/// mutually-recursive size — and pinned since the future may legitimately
/// self-borrow across an `.await` (the `scope`/`ctx` locals a match arm
/// builds before recursing).
pub fn eval<'a>(
    node: &'a Node,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
) -> Pin<Box<dyn Future<Output = Result<Value, RenderError>> + 'a>> {
    Box::pin(async move {
        let env = ctx.env.clone();
        match &node.kind {
            NodeKind::Literal(lit) => Ok(literal_value(lit)),
            NodeKind::Symbol { name, .. } => Ok(lookup_name(&scope, &env, name)),
            NodeKind::Group(inner) => eval(inner, scope, ctx).await,

            NodeKind::Array(items) => {
                let mut raw = Vec::with_capacity(items.len());
                for item in items {
                    raw.push(eval(item, scope.clone(), ctx.clone()).await?);
                }
                let values = resolve_all(raw).await?;
                Ok(Value::Scalar(Scalar::Object(Rc::new(RtArray::new(values)))))
            }

            NodeKind::Dict(pairs) => {
                let mut raw = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    raw.push((key.clone(), eval(value, scope.clone(), ctx.clone()).await?));
                }
                let entries = resolve_object_properties(raw).await?;
                Ok(Value::Scalar(Scalar::Object(Rc::new(RtDict::new(entries)))))
            }

            NodeKind::Pair(a, b) => {
                let (av, bv) = resolve_duo(
                    eval(a, scope.clone(), ctx.clone()).await?,
                    eval(b, scope.clone(), ctx.clone()).await?,
                )
                .await?;
                Ok(Value::Scalar(Scalar::Object(Rc::new(RtArray::new(vec![
                    av, bv,
                ])))))
            }

            NodeKind::Arith { op, lhs, rhs } => {
                let (a, b) = resolve_duo(
                    eval(lhs, scope.clone(), ctx.clone()).await?,
                    eval(rhs, scope.clone(), ctx.clone()).await?,
                )
                .await?;
                Ok(eval_arith(*op, &a, &b))
            }

            NodeKind::Unary { op, operand } => {
                let v = resolve(eval(operand, scope, ctx).await?).await?;
                Ok(eval_unary(*op, &v))
            }

            NodeKind::Compare { op, lhs, rhs } => {
                let (a, b) = resolve_duo(
                    eval(lhs, scope.clone(), ctx.clone()).await?,
                    eval(rhs, scope.clone(), ctx.clone()).await?,
                )
                .await?;
                Ok(Value::bool(eval_compare(*op, &a, &b)))
            }

            NodeKind::Bool { op, lhs, rhs } => {
                let a = resolve(eval(lhs, scope.clone(), ctx.clone()).await?).await?;
                match (op, a.is_truthy()) {
                    (BoolOp::And, false) => Ok(a),
                    (BoolOp::Or, true) => Ok(a),
                    _ => resolve(eval(rhs, scope, ctx).await?).await,
                }
            }

            NodeKind::Not(inner) => {
                let v = resolve(eval(inner, scope, ctx).await?).await?;
                Ok(Value::bool(!v.is_truthy()))
            }

            NodeKind::In { needle, haystack } => {
                let (n, h) = resolve_duo(
                    eval(needle, scope.clone(), ctx.clone()).await?,
                    eval(haystack, scope.clone(), ctx.clone()).await?,
                )
                .await?;
                Ok(Value::bool(eval_in(&n, &h)))
            }

            NodeKind::Is { target, test, args } => {
                let target_v = resolve(eval(target, scope.clone(), ctx.clone()).await?).await?;
                let extra = eval_arg_list(args, scope, ctx.clone()).await?;
                let mut call_args = vec![target_v];
                call_args.extend(extra);
                let test_fn = env.registry.test(test).ok_or_else(|| {
                    RenderError::new(format!("no such test: {test}"))
                        .at(node.pos)
                        .with_context("Is")
                })?;
                let result = test_fn(&call_args)
                    .map_err(|e| e.into_render_error(node.pos, "Is"))?;
                Ok(Value::bool(result))
            }

            NodeKind::CondExpr {
                cond,
                then_branch,
                else_branch,
            } => {
                let c = resolve(eval(cond, scope.clone(), ctx.clone()).await?).await?;
                if c.is_truthy() {
                    eval(then_branch, scope, ctx).await
                } else {
                    match else_branch {
                        Some(e) => eval(e, scope, ctx).await,
                        None => Ok(Value::UNDEFINED),
                    }
                }
            }

            NodeKind::LookupVal { target, key, .. } => {
                let t = resolve(eval(target, scope.clone(), ctx.clone()).await?).await?;
                let k = resolve(eval(key, scope, ctx).await?).await?;
                Ok(lookup_index(&t, &k))
            }

            NodeKind::FunCall { .. } => eval_funcall(node, scope, ctx, Vec::new()).await,

            NodeKind::Filter { name, target, args } => {
                let t = resolve(eval(target, scope.clone(), ctx.clone()).await?).await?;
                let extra = eval_arg_list(args, scope, ctx).await?;
                apply_filter(&env, name, t, extra, node.pos)
            }

            NodeKind::Caller { params, body } => Ok(MacroHandle::new(
                params.clone(),
                (**body).clone(),
                scope,
                env,
            )),

            NodeKind::Root(items) => eval_sequence(items, scope, ctx).await,
            NodeKind::TemplateData(s) => Ok(Value::safe(s.clone())),
            NodeKind::Output(o) => eval_output(&o.children, scope, ctx).await,

            NodeKind::Set {
                targets,
                value,
                body,
            } => eval_set(targets, value.as_deref(), body.as_deref(), scope, ctx).await,

            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let c = resolve(eval(cond, scope.clone(), ctx.clone()).await?).await?;
                if c.is_truthy() {
                    eval(then_branch, scope, ctx).await
                } else {
                    match else_branch {
                        Some(e) => eval(e, scope, ctx).await,
                        None => Ok(Value::UNDEFINED),
                    }
                }
            }

            NodeKind::Switch {
                discriminant,
                cases,
                default,
            } => {
                let d = resolve(eval(discriminant, scope.clone(), ctx.clone()).await?).await?;
                for case in cases {
                    let cv = resolve(eval(&case.value, scope.clone(), ctx.clone()).await?).await?;
                    if value_eq(&d, &cv) {
                        return eval(&case.body, scope, ctx).await;
                    }
                }
                match default {
                    Some(d) => eval(d, scope, ctx).await,
                    None => Ok(Value::UNDEFINED),
                }
            }

            NodeKind::For { .. } => eval_for(node, scope, ctx).await,
            NodeKind::Block { name, body } => eval_block(name, body, scope, ctx).await,
            NodeKind::Extends(_) => Ok(Value::UNDEFINED),
            NodeKind::Super => eval_super(node, scope, ctx).await,

            NodeKind::Include {
                name,
                ignore_missing,
            } => eval_include(node, name, *ignore_missing, scope, ctx).await,

            NodeKind::Import { name, target } => {
                eval_import(node, name, target, scope, ctx).await
            }

            NodeKind::FromImport {
                name,
                names,
                with_context,
            } => eval_from_import(node, name, names, *with_context, scope, ctx).await,

            NodeKind::Macro {
                name,
                params,
                body,
            } => {
                let value = MacroHandle::new(params.clone(), (**body).clone(), scope.clone(), env.clone());
                frame::set(&scope, name, value.clone(), false);
                if is_top_level(&scope, &env) {
                    env.context.set(name, value);
                }
                Ok(Value::UNDEFINED)
            }

            NodeKind::Call { call, caller_body } => {
                let extra = match caller_body {
                    Some(cb) => {
                        let caller_v = eval(cb, scope.clone(), ctx.clone()).await?;
                        vec![("caller".to_string(), caller_v)]
                    }
                    None => Vec::new(),
                };
                eval_funcall(call, scope, ctx, extra).await
            }

            NodeKind::Capture { target, body } => {
                let v = resolve(eval(body, scope.clone(), ctx.clone()).await?).await?;
                let result = Value::safe(flatten_buffer(&v)?);
                if let Some(name) = target {
                    frame::set(&scope, name, result.clone(), true);
                    if is_top_level(&scope, &env) {
                        env.context.set(name, result.clone());
                    }
                }
                Ok(result)
            }

            NodeKind::Do(items) => {
                let mut raw = Vec::with_capacity(items.len());
                for item in items {
                    raw.push(eval(item, scope.clone(), ctx.clone()).await?);
                }
                resolve_all(raw).await?;
                Ok(Value::UNDEFINED)
            }

            NodeKind::FilterBlock { name, args, body } => {
                let v = resolve(eval(body, scope.clone(), ctx.clone()).await?).await?;
                let text = flatten_buffer(&v)?;
                let extra = eval_arg_list(args, scope, ctx).await?;
                apply_filter(&env, name, Value::str(text), extra, node.pos)
            }
        }
    })
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Str(s) => Value::str(s.clone()),
        Literal::Num(n) => Value::num(*n),
        Literal::Bool(b) => Value::bool(*b),
        Literal::Null => Value::NULL,
    }
}

/// `Symbol`/`LookupVal` lookups pass through raw (`spec.md` §5): a pending
/// `Value::Future` bound in context is returned as-is, resolved only at
/// whichever use site needs a concrete value.
fn lookup_name(scope: &Rc<dyn Scope>, env: &Env, name: &str) -> Value {
    if let Some(v) = frame::lookup(scope, name) {
        return v;
    }
    let (head, rest) = name.split_once('.').unwrap_or((name, ""));
    match env.context.get(head) {
        Some(base) => frame::resolve_path(base, rest).unwrap_or(Value::UNDEFINED),
        None => Value::UNDEFINED,
    }
}

fn lookup_index(target: &Value, key: &Value) -> Value {
    match target {
        Value::Scalar(Scalar::Object(o)) => o.get_index(key).unwrap_or(Value::UNDEFINED),
        Value::Str(s) | Value::Safe(s) => match key {
            Value::Scalar(Scalar::Num(n)) if *n >= 0.0 => s
                .chars()
                .nth(*n as usize)
                .map(|c| Value::str(c.to_string()))
                .unwrap_or(Value::UNDEFINED),
            _ => Value::UNDEFINED,
        },
        _ => Value::UNDEFINED,
    }
}

fn is_strlike(v: &Value) -> bool {
    matches!(v, Value::Str(_) | Value::Safe(_))
}

/// Best-effort numeric coercion for arithmetic/ordering (`spec.md` §6): a
/// non-numeric, non-numeric-string value coerces to `NaN` rather than
/// failing the render, matching every Jinja-family engine's leniency here.
fn as_num(v: &Value) -> f64 {
    match v {
        Value::Scalar(Scalar::Num(n)) => *n,
        Value::Scalar(Scalar::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Str(s) | Value::Safe(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// `+` concatenates when either side is string-like, otherwise every
/// `Arith` op is numeric (`spec.md` §6).
fn eval_arith(op: ArithOp, a: &Value, b: &Value) -> Value {
    if matches!(op, ArithOp::Add) && (is_strlike(a) || is_strlike(b)) {
        let mut s = a.coerce_str().to_string();
        s.push_str(&b.coerce_str());
        return Value::str(s);
    }
    let x = as_num(a);
    let y = as_num(b);
    let r = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
        ArithOp::FloorDiv => (x / y).floor(),
        ArithOp::Mod => x - y * (x / y).floor(),
        ArithOp::Pow => x.powf(y),
    };
    Value::num(r)
}

fn eval_unary(op: UnaryOp, v: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::num(-as_num(v)),
        UnaryOp::Pos => Value::num(as_num(v)),
        UnaryOp::Not => Value::bool(!v.is_truthy()),
    }
}

fn cmp_lt(a: &Value, b: &Value) -> bool {
    if is_strlike(a) && is_strlike(b) {
        a.coerce_str() < b.coerce_str()
    } else {
        as_num(a) < as_num(b)
    }
}

fn eval_compare(op: CompareOp, a: &Value, b: &Value) -> bool {
    match op {
        CompareOp::Eq | CompareOp::StrictEq => value_eq(a, b),
        CompareOp::Ne | CompareOp::StrictNe => !value_eq(a, b),
        CompareOp::Lt => cmp_lt(a, b),
        CompareOp::Gt => cmp_lt(b, a),
        CompareOp::Le => !cmp_lt(b, a),
        CompareOp::Ge => !cmp_lt(a, b),
    }
}

/// `==`/`===` are collapsed to one notion of equality: cross-type
/// comparisons are simply `false` rather than coercing, so there is no
/// separate "loose" mode to implement (documented simplification).
fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(x) | Value::Safe(x), Value::Str(y) | Value::Safe(y)) => x == y,
        (Value::Scalar(x), Value::Scalar(y)) => match (x, y) {
            (Scalar::Num(x), Scalar::Num(y)) => x == y,
            (Scalar::Bool(x), Scalar::Bool(y)) => x == y,
            (Scalar::Null, Scalar::Null) | (Scalar::Undefined, Scalar::Undefined) => true,
            (Scalar::Object(x), Scalar::Object(y)) => Rc::ptr_eq(x, y),
            _ => false,
        },
        _ => false,
    }
}

fn eval_in(needle: &Value, haystack: &Value) -> bool {
    match haystack {
        Value::Str(s) | Value::Safe(s) => s.contains(&*needle.coerce_str()),
        Value::Scalar(Scalar::Object(o)) => {
            if let Some(pairs) = o.pairs() {
                let key = needle.coerce_str();
                pairs.map(|(k, _)| k).any(|k| k == *key)
            } else if let Some(it) = o.iter() {
                it.map(|v| value_eq(&v, needle)).any(|eq| eq)
            } else {
                false
            }
        }
        _ => false,
    }
}

async fn eval_arg_list(args: &CallArgs, scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Vec<Value>, RenderError> {
    let mut raw = Vec::with_capacity(args.positional.len() + args.keyword.len());
    for p in &args.positional {
        raw.push(eval(p, scope.clone(), ctx.clone()).await?);
    }
    for kw in &args.keyword {
        raw.push(eval(&kw.value, scope.clone(), ctx.clone()).await?);
    }
    resolve_all(raw).await
}

/// Filters/tests are flat positional callables (`crate::registry`); keyword
/// arguments are gathered and resolved like positional ones (so side
/// effects/order still hold) but arrive at the callable with their names
/// erased — a deliberate simplification of `spec.md`'s "black-box callable"
/// framing, noted in `DESIGN.md`.
fn apply_filter(
    env: &Env,
    name: &str,
    target: Value,
    args: Vec<Value>,
    pos: Position,
) -> Result<Value, RenderError> {
    let filter_fn = env.registry.filter(name).ok_or_else(|| {
        RenderError::new(format!("no such filter: {name}"))
            .at(pos)
            .with_context("Filter")
    })?;
    let mut call_args = vec![target];
    call_args.extend(args);
    filter_fn(&call_args).map_err(|e| e.into_render_error(pos, "Filter"))
}

async fn eval_sequence(items: &[Node], scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Value, RenderError> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(eval(item, scope.clone(), ctx.clone()).await?);
    }
    Ok(Value::BufferFragment(values.into()))
}

/// `Output` resolves, `ensureDefined`s and escapes each child independently,
/// gathered concurrently (`spec.md` §4.5): buffer order follows source
/// order regardless of which child's future settles first.
async fn eval_output(children: &[Node], scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Value, RenderError> {
    let env = ctx.env.clone();
    let mut futs: Vec<Pin<Box<dyn Future<Output = Result<Value, RenderError>> + '_>>> =
        Vec::with_capacity(children.len());
    for child in children {
        let scope = scope.clone();
        let ctx = ctx.clone();
        let env = env.clone();
        futs.push(Box::pin(async move {
            if let NodeKind::TemplateData(s) = &child.kind {
                return Ok(Value::safe(s.clone()));
            }
            let v = resolve(eval(child, scope, ctx).await?).await?;
            let v = if env.program.options.throw_on_undefined {
                ensure_defined(v, child.pos)?
            } else {
                v
            };
            Ok(suppress_value(v, env.program.options.autoescape))
        }));
    }
    let results: Vec<Result<Value, RenderError>> = join_all(futs).await;
    let values: Vec<Value> = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(Value::BufferFragment(values.into()))
}

/// Plain-value `set` stores the raw (possibly pending) right-hand side
/// unresolved — `spec.md` §5's suspension-point list omits `Set` — while
/// set-block/`{% set x %}...{% endset %}` form resolves and flattens, same
/// as `Capture`.
async fn eval_set(
    targets: &[Node],
    value: Option<&Node>,
    body: Option<&Node>,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
) -> Result<Value, RenderError> {
    let env = ctx.env.clone();
    let val = if let Some(v) = value {
        eval(v, scope.clone(), ctx.clone()).await?
    } else if let Some(b) = body {
        let bv = resolve(eval(b, scope.clone(), ctx.clone()).await?).await?;
        Value::safe(flatten_buffer(&bv)?)
    } else {
        Value::UNDEFINED
    };
    for target in targets {
        let name = match &target.kind {
            NodeKind::Symbol { name, .. } => name,
            _ => {
                return Err(RenderError::new("invalid assignment target")
                    .at(target.pos)
                    .with_context("Set"))
            }
        };
        frame::set(&scope, name, val.clone(), true);
        let (head, _) = name.split_once('.').unwrap_or((name.as_str(), ""));
        if is_top_level(&scope, &env) {
            let exported = frame::lookup(&scope, head).unwrap_or(Value::UNDEFINED);
            env.context.set(head, exported);
        }
        if let Some(af) = &ctx.actx {
            af.track_write(head, val.clone());
        }
    }
    Ok(Value::UNDEFINED)
}

enum LoopItem {
    One(Value),
    Pair(Value, Value),
}

fn materialize(v: &Value, target: &ForTarget) -> Vec<LoopItem> {
    match target {
        ForTarget::Pair(..) => {
            if let Value::Scalar(Scalar::Object(o)) = v {
                if let Some(pairs) = o.pairs() {
                    return pairs
                        .map(|(k, val)| LoopItem::Pair(Value::str(k), val))
                        .collect();
                }
            }
            Vec::new()
        }
        ForTarget::Single(_) => match v {
            Value::Scalar(Scalar::Object(o)) => {
                if let Some(it) = o.iter() {
                    it.map(LoopItem::One).collect()
                } else if let Some(pairs) = o.pairs() {
                    pairs.map(|(k, _)| LoopItem::One(Value::str(k))).collect()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        },
    }
}

fn bind_loop_vars(scope: &Rc<dyn Scope>, target: &ForTarget, item: &LoopItem, idx: usize, n: usize) {
    match (target, item) {
        (ForTarget::Single(name), LoopItem::One(v)) => frame::set(scope, name, v.clone(), false),
        (ForTarget::Pair(k, v), LoopItem::Pair(kv, vv)) => {
            frame::set(scope, k, kv.clone(), false);
            frame::set(scope, v, vv.clone(), false);
        }
        _ => {}
    }
    let loop_obj = RtDict::new(vec![
        ("index".to_string(), Value::num((idx + 1) as f64)),
        ("index0".to_string(), Value::num(idx as f64)),
        ("revindex".to_string(), Value::num((n - idx) as f64)),
        ("revindex0".to_string(), Value::num((n - idx - 1) as f64)),
        ("first".to_string(), Value::bool(idx == 0)),
        ("last".to_string(), Value::bool(idx == n - 1)),
        ("length".to_string(), Value::num(n as f64)),
    ]);
    frame::set(
        scope,
        "loop",
        Value::Scalar(Scalar::Object(Rc::new(loop_obj))),
        false,
    );
}

/// A conservative "does this loop body ever assign" scan (`spec.md` §4.5:
/// "if the loop body contains any writes, the loop runs sequentially").
/// Descends into nested constructs (including a nested `for`) rather than
/// trying to prove those writes land outside the current iteration's scope
/// — always safe, only ever costs concurrency it didn't have to.
fn contains_set(node: &Node) -> bool {
    if matches!(node.kind, NodeKind::Set { .. }) {
        return true;
    }
    node.kind.children().iter().any(|c| contains_set(c))
}

/// The set of names a sequential async block needs snapshotted at
/// construction time: every name it reads, including ones it also writes
/// (a read-modify-write `{% set total = total + i %}` needs the pre-block
/// value of `total` to compute its new one). Does not track *write* counts
/// — the owning frame for each write is resolved dynamically by
/// `crate::frame::set`'s `resolve_up` walk, not precomputed here.
fn collect_deps(node: &Node, reads: &mut IndexSet<String>) {
    match &node.kind {
        NodeKind::Set {
            targets: _,
            value,
            body,
        } => {
            if let Some(v) = value {
                collect_deps(v, reads);
            }
            if let Some(b) = body {
                collect_deps(b, reads);
            }
        }
        NodeKind::Symbol { name, .. } => {
            reads.insert(name.split('.').next().unwrap_or(name).to_string());
        }
        NodeKind::For {
            target,
            iter,
            body,
            else_branch,
        } => {
            collect_deps(iter, reads);
            collect_deps(body, reads);
            if let Some(e) = else_branch {
                collect_deps(e, reads);
            }
            match target {
                ForTarget::Single(n) => {
                    reads.shift_remove(n);
                }
                ForTarget::Pair(a, b) => {
                    reads.shift_remove(a);
                    reads.shift_remove(b);
                }
            }
            reads.shift_remove("loop");
        }
        other => {
            for child in other.children() {
                collect_deps(child, reads);
            }
        }
    }
}

fn collect_read_vars(node: &Node) -> Vec<String> {
    let mut reads = IndexSet::new();
    collect_deps(node, &mut reads);
    reads.into_iter().collect()
}

async fn eval_for(node: &Node, scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Value, RenderError> {
    let (target, iter, body, else_branch) = match &node.kind {
        NodeKind::For {
            target,
            iter,
            body,
            else_branch,
        } => (target, iter.as_ref(), body.as_ref(), else_branch.as_deref()),
        _ => unreachable!(),
    };
    let env = ctx.env.clone();
    let iter_val = resolve(eval(iter, scope.clone(), ctx.clone()).await?).await?;
    let items = materialize(&iter_val, target);
    if items.is_empty() {
        return match else_branch {
            Some(e) => eval(e, scope, ctx).await,
            None => Ok(Value::UNDEFINED),
        };
    }
    let n = items.len();
    if contains_set(body) {
        trace!(n, "for-loop body writes, running iterations sequentially");
        let mut results = Vec::with_capacity(n);
        let reads = collect_read_vars(body);
        for (idx, item) in items.into_iter().enumerate() {
            let child: Rc<dyn Scope> = Frame::push(scope.clone(), false);
            bind_loop_vars(&child, target, &item, idx, n);
            let block_id = BlockId::new(body.id.index());
            env.scheduler.enter_async_block();
            let af = AsyncFrame::snapshot(child, ctx.actx.clone(), block_id, &reads, false);
            let iter_ctx = ctx.with_async(af.clone());
            let v = eval(body, af.clone() as Rc<dyn Scope>, iter_ctx).await;
            env.scheduler.leave_async_block();
            wait_all_closures(env.scheduler.clone(), 0).await;
            af.dispose();
            results.push(v?);
        }
        Ok(Value::BufferFragment(results.into()))
    } else {
        let mut futs: Vec<Pin<Box<dyn Future<Output = Result<Value, RenderError>> + '_>>> =
            Vec::with_capacity(n);
        for (idx, item) in items.into_iter().enumerate() {
            let child: Rc<dyn Scope> = Frame::push(scope.clone(), false);
            bind_loop_vars(&child, target, &item, idx, n);
            let iter_ctx = ctx.clone();
            futs.push(eval(body, child, iter_ctx));
        }
        let results: Vec<Result<Value, RenderError>> = join_all(futs).await;
        let results: Vec<Value> = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Value::BufferFragment(results.into()))
    }
}

/// The effective top-level tree for a render: the outermost `{% extends %}`
/// ancestor's own root, so statements outside any named block come from the
/// base template while named blocks are still resolved most-derived-first
/// (`eval_block` below consults `env.program`, which stays pointed at the
/// original, most-derived `Program`, not this one).
fn effective_root(program: &Program) -> &Node {
    match &program.parent {
        Some(parent) => effective_root(parent),
        None => &program.root,
    }
}

async fn eval_block(name: &str, own_body: &Node, scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Value, RenderError> {
    let env = ctx.env.clone();
    let chain = env.program.super_chain(name);
    let effective: Node = chain.first().map(|n| (*n).clone()).unwrap_or_else(|| own_body.clone());
    let block_ctx = ctx.with_block(name.to_string(), 0);
    eval(&effective, scope, block_ctx).await
}

async fn eval_super(node: &Node, scope: Rc<dyn Scope>, ctx: EvalCtx) -> Result<Value, RenderError> {
    let (name, idx) = match &ctx.current_block {
        Some(b) => (b.0.clone(), b.1),
        None => {
            return Err(RenderError::new("super() called outside a block")
                .at(node.pos)
                .with_context("Super"))
        }
    };
    let env = ctx.env.clone();
    let chain = env.program.super_chain(&name);
    match chain.get(idx + 1) {
        Some(n) => {
            let body: Node = (*n).clone();
            let block_ctx = ctx.with_block(name, idx + 1);
            eval(&body, scope, block_ctx).await
        }
        None => Ok(Value::safe("")),
    }
}

/// Runs `name` (evaluated in the caller's scope) as a fresh sub-render
/// sharing the same scheduler (`spec.md` §4.6: closure-count bookkeeping
/// stays global to one render) but a fresh `Context`, so its exports don't
/// leak into the including template. Returns the rendered text and the
/// exports it produced — `include` uses the former, `import`/`from import`
/// the latter.
async fn run_subtemplate(
    node: &Node,
    name: &Node,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
    initial_vars: IndexMap<String, Value>,
) -> Result<(String, IndexMap<String, Value>), RenderError> {
    let env = ctx.env.clone();
    let name_v = resolve(eval(name, scope, ctx.clone()).await?).await?;
    let tmpl_name = name_v.coerce_str().to_string();
    let loader = env.loader.clone().ok_or_else(|| {
        RenderError::new("no template loader configured")
            .at(node.pos)
            .with_context(node.kind_name())
    })?;
    let sub_program = loader.load(&tmpl_name)?;
    let sub_context = Rc::new(Context::new(initial_vars));
    let sub_root: Rc<dyn Scope> = Frame::root();
    let sub_env = env.with_program(sub_program.clone(), sub_context.clone(), sub_root.clone());
    let root_node = effective_root(&sub_program).clone();
    let sub_ctx = EvalCtx::new(sub_env);
    let value = resolve(eval(&root_node, sub_root, sub_ctx).await?).await?;
    let text = flatten_buffer(&value)?;
    Ok((text, sub_context.exports()))
}

async fn eval_include(
    node: &Node,
    name: &Node,
    ignore_missing: bool,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
) -> Result<Value, RenderError> {
    let vars = ctx.env.context.variables();
    match run_subtemplate(node, name, scope, ctx, vars).await {
        Ok((text, _)) => Ok(Value::safe(text)),
        Err(e) if ignore_missing => {
            debug!(error = %e.message(), "ignoring missing include");
            Ok(Value::safe(""))
        }
        Err(e) => Err(e),
    }
}

async fn eval_import(
    node: &Node,
    name: &Node,
    target: &str,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
) -> Result<Value, RenderError> {
    let env = ctx.env.clone();
    let (_, exports) = run_subtemplate(node, name, scope.clone(), ctx.clone(), IndexMap::new()).await?;
    let value = Value::Scalar(Scalar::Object(Rc::new(RtDict::new(exports.into_iter().collect()))));
    frame::set(&scope, target, value.clone(), false);
    if is_top_level(&scope, &env) {
        env.context.set(target, value);
    }
    Ok(Value::UNDEFINED)
}

async fn eval_from_import(
    node: &Node,
    name: &Node,
    names: &[(String, Option<String>)],
    with_context: bool,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
) -> Result<Value, RenderError> {
    let env = ctx.env.clone();
    let vars = if with_context {
        env.context.variables()
    } else {
        IndexMap::new()
    };
    let (_, exports) = run_subtemplate(node, name, scope.clone(), ctx.clone(), vars).await?;
    for (src, alias) in names {
        let value = exports.get(src).cloned().unwrap_or(Value::UNDEFINED);
        let bind_name = alias.clone().unwrap_or_else(|| src.clone());
        frame::set(&scope, &bind_name, value.clone(), false);
        if is_top_level(&scope, &env) {
            env.context.set(&bind_name, value);
        }
    }
    Ok(Value::UNDEFINED)
}

async fn call_object(callee: &Value, positional: Vec<Value>, keyword: Vec<(String, Value)>, pos: Position) -> Result<Value, RenderError> {
    match callee {
        Value::Scalar(Scalar::Object(o)) => match o.call(positional, keyword) {
            Some(fut) => fut.await,
            None => Err(RenderError::new("value is not callable")
                .at(pos)
                .with_context("FunCall")),
        },
        _ => Err(RenderError::new("value is not callable")
            .at(pos)
            .with_context("FunCall")),
    }
}

/// Shared by a plain `FunCall` and a `{% call %}` block (the latter passing
/// a synthetic `caller` keyword argument) — both ultimately invoke the same
/// underlying `FunCall` node, only the extra keyword arguments differ.
/// Routes through [`sequenced_call`] when the analyzer tagged this call
/// site with a `Lock` op for some canonical key (`spec.md` §3 "Sequence
/// Operation").
async fn eval_funcall(
    node: &Node,
    scope: Rc<dyn Scope>,
    ctx: EvalCtx,
    extra_kwargs: Vec<(String, Value)>,
) -> Result<Value, RenderError> {
    let (callee, args) = match &node.kind {
        NodeKind::FunCall { callee, args } => (callee.as_ref(), args),
        _ => unreachable!(),
    };
    let env = ctx.env.clone();
    let callee_val = resolve(eval(callee, scope.clone(), ctx.clone()).await?).await?;

    let mut positional_raw = Vec::with_capacity(args.positional.len());
    for p in &args.positional {
        positional_raw.push(eval(p, scope.clone(), ctx.clone()).await?);
    }
    let positional = resolve_all(positional_raw).await?;

    let mut keyword = Vec::with_capacity(args.keyword.len() + extra_kwargs.len());
    for kw in &args.keyword {
        let v = resolve(eval(&kw.value, scope.clone(), ctx.clone()).await?).await?;
        keyword.push((kw.name.clone(), v));
    }
    keyword.extend(extra_kwargs);

    let lock_key = env.program.analysis.ops_for(node.id).and_then(|ops| {
        ops.iter()
            .find(|(_, kind)| matches!(kind, OpKind::Lock))
            .map(|(k, _)| k.clone())
    });

    match lock_key {
        Some(key) => {
            sequenced_call(&env, &key, call_object(&callee_val, positional, keyword, node.pos)).await
        }
        None => call_object(&callee_val, positional, keyword, node.pos).await,
    }
}

/// Synchronous entry point, for hosts that don't otherwise run an async
/// executor — blocks the current thread on the same future `render` would
/// hand to one.
pub fn render_sync(
    program: Rc<Program>,
    context_vars: IndexMap<String, Value>,
    registry: Rc<dyn Registry>,
    loader: Option<Rc<dyn TemplateLoader>>,
) -> Result<String, RenderError> {
    futures_lite::future::block_on(render(program, context_vars, registry, loader))
}

/// Renders `program` to completion: evaluates the effective top-level tree,
/// awaits every outstanding async block (`spec.md` §4.6 `waitAllClosures(0)`
/// at the render root), and flattens the result buffer into one string.
#[tracing::instrument(skip_all)]
pub async fn render(
    program: Rc<Program>,
    context_vars: IndexMap<String, Value>,
    registry: Rc<dyn Registry>,
    loader: Option<Rc<dyn TemplateLoader>>,
) -> Result<String, RenderError> {
    debug!(vars = context_vars.len(), "starting render");
    let scheduler = Scheduler::new();
    let context = Rc::new(Context::new(context_vars));
    let root_frame: Rc<dyn Scope> = Frame::root();
    let env = Env::new(program.clone(), registry, scheduler.clone(), context, loader, root_frame.clone());
    let root_node = effective_root(&program).clone();
    let ctx = EvalCtx::new(env);
    let result = eval(&root_node, root_frame, ctx).await?;
    let result = resolve(result).await?;
    wait_all_closures(scheduler, 0).await;
    flatten_buffer(&result)
}
