use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;

use crate::core::{core_ns, Namespace, SpecialForm};
use crate::env::Env;
use crate::error::Error;
use crate::value::{Closure, Value};

/// Result of executing a single trampoline step.
enum Step {
    /// Evaluation finished with a value.
    Value(Value),
    /// Evaluation continues with `form` in `env`. The loop in
    /// [`Evaluator::eval`] picks it up instead of recursing, which keeps the
    /// Rust stack flat for calls in tail position.
    Tail { form: Value, env: Env },
}

pub type EvalResult<T> = Result<T, Error>;

/// A trampoline interpreter over `(form, env)` pairs.
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub native_fns: &'static Namespace,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self { native_fns: core_ns() }
    }

    /// A fresh global environment holding every built-in function.
    pub fn root_env(&self) -> Env {
        Env::root(self.native_fns)
    }

    /// Evaluates `form` in `env`.
    ///
    /// `let*` bodies, `if` branches and closure bodies are continued by this
    /// loop rather than by a recursive call.
    pub fn eval(&self, form: &Value, env: &Env) -> EvalResult<Value> {
        let mut current_form = form.clone();
        let mut current_env = env.clone();

        loop {
            match self.eval_step(&current_form, &current_env)? {
                Step::Value(value) => return Ok(value),
                Step::Tail { form: next_form, env: next_env } => {
                    trace!("tail: {}", next_form);
                    current_form = next_form;
                    current_env = next_env;
                }
            }
        }
    }

    /// Applies a function or closure to already evaluated arguments and runs
    /// it to completion.
    pub fn apply(&self, callable: &Value, args: &[Value]) -> EvalResult<Value> {
        match callable {
            Value::Function { f, .. } => f(args),
            Value::Closure(closure) => {
                let call_env = Env::create(&closure.env, &closure.params, args)?;
                self.eval(&closure.body, &call_env)
            }
            other => Err(not_callable(other)),
        }
    }

    fn eval_step(&self, form: &Value, env: &Env) -> EvalResult<Step> {
        match form {
            Value::List(items) if !items.is_empty() => self.eval_list(items, env),
            // Empty list evaluates to itself
            Value::List(_) => Ok(Step::Value(form.clone())),
            other => self.eval_ast(other, env).map(Step::Value),
        }
    }

    /// Evaluates a form without special-form dispatch: symbols are looked up,
    /// collections are evaluated element-wise, everything else evaluates to
    /// itself.
    fn eval_ast(&self, form: &Value, env: &Env) -> EvalResult<Value> {
        match form {
            Value::Symbol(name) => env.get(name),
            Value::List(items) => Ok(Value::list(self.eval_seq(items, env)?)),
            Value::Vector(items) => Ok(Value::vector(self.eval_seq(items, env)?)),
            Value::Hashmap(map) => {
                let mut evaluated = FxHashMap::default();
                for (key, value) in map.iter() {
                    evaluated.insert(key.clone(), self.eval(value, env)?);
                }
                Ok(Value::Hashmap(Rc::new(evaluated)))
            }
            Value::Number(_)
            | Value::String(_)
            | Value::Keyword(_)
            | Value::Literal(_)
            | Value::Function { .. }
            | Value::Closure(_) => Ok(form.clone()),
        }
    }

    fn eval_seq(&self, items: &[Value], env: &Env) -> EvalResult<Vec<Value>> {
        items.iter().map(|form| self.eval(form, env)).collect()
    }

    fn eval_list(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        if let Some(form) = items[0].as_symbol().and_then(SpecialForm::from_symbol) {
            return self.eval_special_form(form, items, env);
        }

        let evaluated = self.eval_seq(items, env)?;
        let (head, args) = match evaluated.split_first() {
            Some(split) => split,
            None => return Ok(Step::Value(Value::list(vec![]))),
        };

        match head {
            // Native functions end the tail chain here
            Value::Function { f, .. } => f(args).map(Step::Value),
            Value::Closure(closure) => {
                trace!("entering closure with {} args", args.len());
                let call_env = Env::create(&closure.env, &closure.params, args)?;
                Ok(Step::Tail { form: closure.body.clone(), env: call_env })
            }
            other => Err(not_callable(other)),
        }
    }

    fn eval_special_form(
        &self,
        form: SpecialForm,
        items: &[Value],
        env: &Env,
    ) -> EvalResult<Step> {
        match form {
            SpecialForm::Def => self.eval_def(items, env),
            SpecialForm::Let => self.eval_let(items, env),
            SpecialForm::Do => self.eval_do(items, env),
            SpecialForm::If => self.eval_if(items, env),
            SpecialForm::Fn => self.eval_fn(items, env),
        }
    }

    /// `(def! sym expr)`
    fn eval_def(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        expect_len(SpecialForm::Def, items, 3)?;
        let name = items[1].as_symbol().ok_or_else(|| {
            Error::ShapeError(format!(
                "first argument to def! must be a symbol, got {}",
                items[1].type_name()
            ))
        })?;

        let value = self.eval(&items[2], env)?;
        env.set(name, value.clone());
        Ok(Step::Value(value))
    }

    /// `(let* (sym expr ...) body)`
    fn eval_let(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        expect_len(SpecialForm::Let, items, 3)?;
        let bindings = match &items[1] {
            Value::List(bindings) => bindings,
            other => {
                return Err(Error::ShapeError(format!(
                    "let* bindings must be a list, got {}",
                    other.type_name()
                )));
            }
        };
        if bindings.len() % 2 != 0 {
            return Err(Error::ShapeError(format!(
                "let* bindings require an even number of forms, got {}",
                bindings.len()
            )));
        }

        let local_env = Env::new(Some(env.clone()));
        for pair in bindings.chunks(2) {
            let name = pair[0].as_symbol().ok_or_else(|| {
                Error::ShapeError(format!(
                    "let* binding names must be symbols, got {}",
                    pair[0].type_name()
                ))
            })?;
            // Later bindings see earlier ones
            let value = self.eval(&pair[1], &local_env)?;
            local_env.set(name, value);
        }

        Ok(Step::Tail { form: items[2].clone(), env: local_env })
    }

    /// `(do expr ...)` evaluates every form, returning the last value.
    fn eval_do(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        let mut result = Value::NIL;
        for form in &items[1..] {
            result = self.eval(form, env)?;
        }
        Ok(Step::Value(result))
    }

    /// `(if cond then else?)`
    fn eval_if(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        if items.len() != 3 && items.len() != 4 {
            return Err(Error::ShapeError(format!(
                "if requires 2 or 3 arguments, got {}",
                items.len() - 1
            )));
        }

        let condition = self.eval(&items[1], env)?;
        let branch = if condition.is_truthy() {
            items[2].clone()
        } else {
            items.get(3).cloned().unwrap_or(Value::NIL)
        };
        Ok(Step::Tail { form: branch, env: env.clone() })
    }

    /// `(fn* (params ...) body)`
    fn eval_fn(&self, items: &[Value], env: &Env) -> EvalResult<Step> {
        expect_len(SpecialForm::Fn, items, 3)?;
        let params = match &items[1] {
            Value::List(params) => params.clone(),
            other => {
                return Err(Error::ShapeError(format!(
                    "fn* parameters must be a list, got {}",
                    other.type_name()
                )));
            }
        };
        let non_symbol = params.iter().enumerate().find(|(_, p)| p.as_symbol().is_none());
        if let Some((idx, param)) = non_symbol {
            return Err(Error::ShapeError(format!(
                "fn* parameter {} must be a symbol, got {}",
                idx,
                param.type_name()
            )));
        }

        Ok(Step::Value(Value::Closure(Rc::new(Closure {
            params,
            body: items[2].clone(),
            env: env.clone(),
        }))))
    }
}

//===----------------------------------------------------------------------===//
// Helper functions
//===----------------------------------------------------------------------===//

/// Checks the total element count of a special form, head included.
fn expect_len(form: SpecialForm, items: &[Value], len: usize) -> EvalResult<()> {
    if items.len() == len {
        Ok(())
    } else {
        Err(Error::ShapeError(format!(
            "{} requires {} arguments, got {}",
            form.name(),
            len - 1,
            items.len() - 1
        )))
    }
}

fn not_callable(value: &Value) -> Error {
    Error::NotCallableError(format!("{} is a {}", value, value.type_name()))
}
