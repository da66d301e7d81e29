//! Renders values back to text.
//!
//! `readable` output quotes and escapes strings so that the reader can parse
//! it back; non-readable output emits string contents verbatim.

use itertools::Itertools;

use crate::value::{HashKey, Value};

pub fn pr_str(value: &Value, readable: bool) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if readable => format!("\"{}\"", escape_string(s)),
        Value::String(s) => s.clone(),
        Value::Keyword(k) => format!(":{}", k),
        Value::Symbol(s) => s.clone(),
        Value::Literal(lit) => lit.name().to_string(),
        Value::List(items) => pr_seq(items, "(", ")", readable),
        Value::Vector(items) => pr_seq(items, "[", "]", readable),
        Value::Hashmap(map) => {
            let body = map
                .iter()
                .map(|(k, v)| format!("{} {}", pr_key(k, readable), pr_str(v, readable)))
                .join(" ");
            format!("{{{}}}", body)
        }
        Value::Function { name, .. } => format!("#<function {}>", name),
        Value::Closure(_) => "#<closure>".to_string(),
    }
}

fn pr_seq(seq: &[Value], start: &str, end: &str, readable: bool) -> String {
    format!("{}{}{}", start, seq.iter().map(|v| pr_str(v, readable)).join(" "), end)
}

fn pr_key(key: &HashKey, readable: bool) -> String {
    match key {
        HashKey::String(s) if readable => format!("\"{}\"", escape_string(s)),
        HashKey::String(s) => s.clone(),
        HashKey::Keyword(k) => format!(":{}", k),
    }
}

/// Inverse of the reader's unescaping.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\x00"),
            _ => out.push(ch),
        }
    }
    out
}
