//! Bound macros and `{% call %}` blocks as first-class values (`spec.md`
//! §4.5 `makeMacro`). A macro is just another `Scalar::Object` — callable
//! through the `Object::call` capability `cascada-ir` added for exactly
//! this — so it can flow through variables, imports and dict entries like
//! any other value, matching `minijinja`'s dynamic-object story for
//! callables rather than inventing a separate `Value::Fn` variant.

use crate::env::{Env, EvalCtx};
use crate::frame::{self, Frame, Scope};
use cascada_ast::{MacroParam, Node};
use cascada_ir::{flatten_buffer, resolve, Object, RenderError, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

pub struct MacroHandle {
    params: Vec<MacroParam>,
    body: Node,
    closure: Rc<dyn Scope>,
    env: Rc<Env>,
}

impl MacroHandle {
    pub fn new(params: Vec<MacroParam>, body: Node, closure: Rc<dyn Scope>, env: Rc<Env>) -> Value {
        Value::Scalar(cascada_ir::Scalar::Object(Rc::new(MacroHandle {
            params,
            body,
            closure,
            env,
        })))
    }
}

impl fmt::Debug for MacroHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Macro(..)")
    }
}

impl Object for MacroHandle {
    fn call(
        &self,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Option<Pin<Box<dyn Future<Output = Result<Value, RenderError>>>>> {
        let params = self.params.clone();
        let body = self.body.clone();
        let closure = self.closure.clone();
        let env = self.env.clone();
        Some(Box::pin(async move {
            let frame = Frame::push(closure.clone(), true);
            let scope: Rc<dyn Scope> = frame;
            for (i, param) in params.iter().enumerate() {
                let bound = positional
                    .get(i)
                    .cloned()
                    .or_else(|| {
                        keyword
                            .iter()
                            .find(|(k, _)| k == &param.name)
                            .map(|(_, v)| v.clone())
                    });
                let value = match bound {
                    Some(v) => v,
                    None => match &param.default {
                        Some(default_expr) => {
                            let ctx = EvalCtx::new(env.clone());
                            resolve(crate::interp::eval(default_expr, closure.clone(), ctx).await?)
                                .await?
                        }
                        None => Value::UNDEFINED,
                    },
                };
                frame::set(&scope, &param.name, value, false);
            }
            for (name, value) in &keyword {
                if !params.iter().any(|p| &p.name == name) {
                    frame::set(&scope, name, value.clone(), false);
                }
            }
            let ctx = EvalCtx::new(env.clone());
            let result = crate::interp::eval(&body, scope, ctx).await?;
            let result = resolve(result).await?;
            Ok(Value::safe(flatten_buffer(&result)?))
        }))
    }
}
