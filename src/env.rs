use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::core::Namespace;
use crate::error::Error;
use crate::value::Value;

/// Marks the rest parameter in a parameter list: `(a & rest)`.
pub const VARIADIC_MARKER: &str = "&";

struct Scope {
    outer: Option<Env>,
    bindings: RefCell<FxHashMap<String, Value>>,
}

/// A shared handle to a lexical scope. Cloning the handle shares the scope.
#[derive(Clone)]
pub struct Env(Rc<Scope>);

impl Env {
    pub fn new(outer: Option<Env>) -> Self {
        Env(Rc::new(Scope { outer, bindings: RefCell::new(FxHashMap::default()) }))
    }

    /// The global scope, holding every entry of `ns`.
    pub fn root(ns: &Namespace) -> Self {
        let env = Env::new(None);
        for (name, value) in ns.entries() {
            env.set(name, value);
        }
        env
    }

    pub fn outer(&self) -> Option<&Env> {
        self.0.outer.as_ref()
    }

    /// Binds `sym` in this scope only, replacing any previous local binding.
    pub fn set(&self, sym: &str, value: Value) {
        self.0.bindings.borrow_mut().insert(sym.to_string(), value);
    }

    /// The innermost scope, starting from this one, in which `sym` is bound.
    pub fn find(&self, sym: &str) -> Option<Env> {
        let mut current = self;
        loop {
            if current.0.bindings.borrow().contains_key(sym) {
                return Some(current.clone());
            }
            current = current.outer()?;
        }
    }

    pub fn get(&self, sym: &str) -> Result<Value, Error> {
        let env = self.find(sym).ok_or_else(|| Error::LookupError(sym.to_string()))?;
        let value = env.0.bindings.borrow().get(sym).cloned();
        value.ok_or_else(|| Error::LookupError(sym.to_string()))
    }

    /// Builds a child of `outer` binding each formal parameter to the argument
    /// in the same position. A `&` in second-to-last position binds the last
    /// parameter to the remaining arguments as a list.
    pub fn create(outer: &Env, params: &[Value], args: &[Value]) -> Result<Env, Error> {
        let mut names = Vec::with_capacity(params.len());
        for (idx, param) in params.iter().enumerate() {
            match param.as_symbol() {
                Some(name) => names.push(name),
                None => {
                    return Err(Error::BindingError(format!(
                        "parameter {} must be a symbol, got {}",
                        idx, param
                    )));
                }
            }
        }

        let misplaced = names
            .iter()
            .enumerate()
            .find(|(idx, name)| **name == VARIADIC_MARKER && idx + 2 != names.len());
        if let Some((pos, _)) = misplaced {
            return Err(Error::BindingError(format!(
                "'{}' must be the second-to-last parameter, found at position {}",
                VARIADIC_MARKER, pos
            )));
        }
        let variadic = names.len() >= 2 && names[names.len() - 2] == VARIADIC_MARKER;

        let env = Env::new(Some(outer.clone()));
        if variadic {
            let fixed = names.len() - 2;
            if args.len() < fixed {
                return Err(Error::BindingError(format!(
                    "arity mismatch: expected at least {} arguments, got {}",
                    fixed,
                    args.len()
                )));
            }
            for (name, arg) in names[..fixed].iter().zip(args) {
                env.set(name, arg.clone());
            }
            env.set(names[fixed + 1], Value::list(args[fixed..].to_vec()));
        } else {
            if args.len() != names.len() {
                return Err(Error::BindingError(format!(
                    "arity mismatch: expected {} arguments, got {}",
                    names.len(),
                    args.len()
                )));
            }
            for (name, arg) in names.iter().zip(args) {
                env.set(name, arg.clone());
            }
        }
        Ok(env)
    }
}

// Only the local names: values may be closures that refer back to this scope.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bindings = self.0.bindings.borrow();
        let mut names: Vec<&String> = bindings.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("root", &self.0.outer.is_none())
            .finish()
    }
}
