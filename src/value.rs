use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::env::Env;
use crate::error::Error;
use crate::printer;

/// Signature shared by every built-in function.
pub type NativeFn = fn(&[Value]) -> Result<Value, Error>;

#[derive(Debug, Clone)]
pub enum Value {
    Number(i64),
    String(String),
    // Stored without the leading ':'
    Keyword(String),
    Symbol(String),
    Literal(Literal),

    // Collections
    List(Rc<Vec<Value>>),
    Vector(Rc<Vec<Value>>),
    Hashmap(Rc<FxHashMap<HashKey, Value>>),

    Function { name: &'static str, f: NativeFn },
    Closure(Rc<Closure>),
}

/// The three singleton literals. Condition tests compare against these
/// exact values, never structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Nil,
    True,
    False,
}

impl Literal {
    pub fn name(self) -> &'static str {
        match self {
            Literal::Nil => "nil",
            Literal::True => "true",
            Literal::False => "false",
        }
    }
}

/// Hashmap keys are restricted to strings and keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    String(String),
    Keyword(String),
}

impl TryFrom<Value> for HashKey {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(HashKey::String(s)),
            Value::Keyword(k) => Ok(HashKey::Keyword(k)),
            other => Err(Error::ShapeError(format!(
                "hashmap keys must be strings or keywords, got {}",
                other.type_name()
            ))),
        }
    }
}

/// A user-defined function. Holds only data: the evaluator rebuilds the call
/// from the parameter list, body and captured environment.
pub struct Closure {
    pub params: Rc<Vec<Value>>,
    pub body: Value,
    pub env: Env,
}

// The captured environment may contain the closure itself.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Value {
    pub const NIL: Value = Value::Literal(Literal::Nil);
    pub const TRUE: Value = Value::Literal(Literal::True);
    pub const FALSE: Value = Value::Literal(Literal::False);

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(Rc::new(items))
    }

    pub fn bool(value: bool) -> Self {
        if value {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Builds a hashmap from a flat `k1 v1 k2 v2 ...` sequence.
    pub fn hashmap_from_sequence(seq: Vec<Value>) -> Result<Self, Error> {
        if seq.len() % 2 != 0 {
            return Err(Error::ShapeError(format!(
                "hashmap requires an even number of forms, got {}",
                seq.len()
            )));
        }
        let mut map = FxHashMap::default();
        let mut iter = seq.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            map.insert(HashKey::try_from(key)?, value);
        }
        Ok(Value::Hashmap(Rc::new(map)))
    }

    /// `false` and `nil` are the only falsy values.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Literal(Literal::False | Literal::Nil))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Symbol(_) => "symbol",
            Value::Literal(Literal::Nil) => "nil",
            Value::Literal(_) => "boolean",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Hashmap(_) => "hashmap",
            Value::Function { .. } => "function",
            Value::Closure(_) => "closure",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Literal(a), Value::Literal(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Hashmap(a), Value::Hashmap(b)) => a == b,
            (Value::Function { name: a, .. }, Value::Function { name: b, .. }) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self, true))
    }
}

//===----------------------------------------------------------------------===//
// Macros
//===----------------------------------------------------------------------===//

#[macro_export]
macro_rules! list {
    () => (
        $crate::value::Value::list(vec![])
    );
    ($($args:expr),* $(,)?) => {{
        let v: Vec<$crate::value::Value> = vec![$($args),*];
        $crate::value::Value::list(v)
    }};
}

#[macro_export]
macro_rules! vector {
    () => (
        $crate::value::Value::vector(vec![])
    );
    ($($args:expr),* $(,)?) => {{
        let v: Vec<$crate::value::Value> = vec![$($args),*];
        $crate::value::Value::vector(v)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_false_and_nil_are_falsy() {
        assert!(!Value::NIL.is_truthy());
        assert!(!Value::FALSE.is_truthy());
        assert!(Value::TRUE.is_truthy());
        assert!(Value::Number(0).is_truthy());
        assert!(list![].is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn list_and_vector_are_distinct() {
        let l = list![Value::Number(1)];
        let v = vector![Value::Number(1)];
        assert_ne!(l, v);
        assert_eq!(l, list![Value::Number(1)]);
    }

    #[test]
    fn hashmap_rejects_non_string_keys() {
        let err = Value::hashmap_from_sequence(vec![Value::Number(1), Value::Number(2)])
            .unwrap_err();
        assert!(matches!(err, Error::ShapeError(_)));
    }

    #[test]
    fn hashmap_rejects_odd_sequences() {
        let err = Value::hashmap_from_sequence(vec![Value::Keyword("a".into())]).unwrap_err();
        assert!(matches!(err, Error::ShapeError(_)));
    }

    #[test]
    fn hashmap_from_sequence_keeps_pairs() {
        let map = Value::hashmap_from_sequence(vec![
            Value::Keyword("a".into()),
            Value::Number(1),
            Value::String("b".into()),
            Value::Number(2),
        ])
        .unwrap();
        match map {
            Value::Hashmap(m) => {
                assert_eq!(m.get(&HashKey::Keyword("a".into())), Some(&Value::Number(1)));
                assert_eq!(m.get(&HashKey::String("b".into())), Some(&Value::Number(2)));
            }
            other => panic!("Expected Hashmap, got {:?}", other),
        }
    }
}
