//! The facade's default filter/test library (`SPEC_FULL.md` "Supplemented
//! features"): just enough entries to exercise every emitter contract
//! end to end, not "the large library of built-in filters" `spec.md` §1
//! keeps out of scope.

use cascada_ir::{html_escape, Scalar, Value};
use cascada_runtime::{MapRegistry, Registry, RuntimeError};
use std::rc::Rc;

fn arg0<'a>(args: &'a [Value], filter: &str) -> Result<&'a Value, RuntimeError> {
    args.first()
        .ok_or_else(|| RuntimeError::Template(format!("{filter}: missing target value")))
}

fn as_num(v: &Value) -> f64 {
    match v {
        Value::Scalar(Scalar::Num(n)) => *n,
        _ => v.coerce_str().trim().parse().unwrap_or(f64::NAN),
    }
}

pub fn default_registry() -> Rc<dyn Registry> {
    let registry = MapRegistry::new()
        .with_filter(
            "upper",
            Rc::new(|args: &[Value]| Ok(Value::str(arg0(args, "upper")?.coerce_str().to_uppercase()))),
        )
        .with_filter(
            "lower",
            Rc::new(|args: &[Value]| Ok(Value::str(arg0(args, "lower")?.coerce_str().to_lowercase()))),
        )
        .with_filter(
            "default",
            Rc::new(|args: &[Value]| {
                let target = arg0(args, "default")?;
                if matches!(target, Value::Scalar(Scalar::Undefined)) {
                    Ok(args.get(1).cloned().unwrap_or(Value::str("")))
                } else {
                    Ok(target.clone())
                }
            }),
        )
        .with_filter(
            "safe",
            Rc::new(|args: &[Value]| Ok(Value::safe(arg0(args, "safe")?.coerce_str()))),
        )
        .with_filter(
            "escape",
            Rc::new(|args: &[Value]| {
                Ok(Value::safe(html_escape(&arg0(args, "escape")?.coerce_str())))
            }),
        )
        .with_test(
            "even",
            Rc::new(|args: &[Value]| Ok(as_num(arg0(args, "even")?) % 2.0 == 0.0)),
        )
        .with_test(
            "odd",
            Rc::new(|args: &[Value]| Ok(as_num(arg0(args, "odd")?).rem_euclid(2.0) == 1.0)),
        );
    Rc::new(registry)
}
