use std::io;
use std::thread;

use crate::env::Env;
use crate::error::Diagnostic;
use crate::eval::Evaluator;
use crate::printer;
use crate::reader;
use crate::value::Value;

/// Stack reserved for the evaluation thread. Only non-tail recursion in user
/// code consumes it.
pub const EVAL_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Runs `f` on a thread with an [`EVAL_STACK_SIZE`] stack and waits for it.
pub fn run_with_large_stack<F, T>(f: F) -> io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = thread::Builder::new()
        .name("mal-eval".to_string())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(f)?;
    handle.join().map_err(|_| io::Error::other("evaluation thread panicked"))
}

/// An evaluator together with the global environment it evaluates in.
/// Definitions persist across calls to [`Runtime::rep`].
#[derive(Debug)]
pub struct Runtime {
    pub evaluator: Evaluator,
    env: Env,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        let evaluator = Evaluator::new();
        let env = evaluator.root_env();
        Self { evaluator, env }
    }

    /// Reads the first form of `input` and evaluates it.
    pub fn rep(&self, input: &str) -> Result<Value, Diagnostic> {
        let ast = reader::read(input).map_err(|e| Diagnostic::from_spanned(e, input))?;
        self.eval(&ast, input)
    }

    /// Like [`Runtime::rep`], rendering the result readably.
    pub fn rep_to_string(&self, input: &str) -> Result<String, Diagnostic> {
        self.rep(input).map(|value| printer::pr_str(&value, true))
    }

    /// Evaluates every form of `input` in order, returning the last value
    /// (`nil` for input without forms).
    pub fn rep_all(&self, input: &str) -> Result<Value, Diagnostic> {
        let forms = reader::read_all(input).map_err(|e| Diagnostic::from_spanned(e, input))?;
        self.eval_all(&forms, input)
    }

    /// Evaluates already read forms in order, returning the last value.
    pub fn eval_all(&self, forms: &[Value], input: &str) -> Result<Value, Diagnostic> {
        let mut last = Value::NIL;
        for form in forms {
            last = self.eval(form, input)?;
        }
        Ok(last)
    }

    /// Evaluates an already read form. `input` is the source it came from.
    pub fn eval(&self, ast: &Value, input: &str) -> Result<Value, Diagnostic> {
        self.evaluator.eval(ast, &self.env).map_err(|e| Diagnostic::new(e, input))
    }
}
