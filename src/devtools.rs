use crate::printer::escape_string;
use crate::value::{HashKey, Value};

/// Pretty-prints an AST (Value) one node per line, children indented by two
/// spaces and each node tagged with its variant.
pub fn pretty_print_ast(value: &Value) -> String {
    pretty_print_ast_with_indent(value, 0)
}

fn pretty_print_ast_with_indent(value: &Value, indent: usize) -> String {
    match value {
        Value::Number(n) => format!("Number:{}", n),
        Value::String(s) => format!("String:\"{}\"", escape_string(s)),
        Value::Symbol(s) => format!("Symbol:{}", s),
        Value::Keyword(k) => format!("Keyword::{}", k),
        Value::Literal(lit) => format!("Literal:{}", lit.name()),
        Value::List(items) => pretty_print_seq("List", "(", ")", items, indent),
        Value::Vector(items) => pretty_print_seq("Vector", "[", "]", items, indent),
        Value::Hashmap(map) => {
            if map.is_empty() {
                return "Hashmap:{}".to_string();
            }
            let indent_str = "  ".repeat(indent);
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}  {} {}",
                        indent_str,
                        pretty_print_key(k),
                        pretty_print_ast_with_indent(v, indent + 1)
                    )
                })
                .collect();
            format!("Hashmap:{{\n{}\n{}}}", entries.join("\n"), indent_str)
        }
        Value::Function { name, .. } => format!("Function:{}", name),
        Value::Closure(closure) => format!(
            "Closure:{} -> {}",
            Value::List(closure.params.clone()),
            closure.body
        ),
    }
}

fn pretty_print_seq(tag: &str, open: &str, close: &str, items: &[Value], indent: usize) -> String {
    if items.is_empty() {
        return format!("{}:{}{}", tag, open, close);
    }
    let indent_str = "  ".repeat(indent);
    let children: Vec<String> = items
        .iter()
        .map(|item| format!("{}  {}", indent_str, pretty_print_ast_with_indent(item, indent + 1)))
        .collect();
    format!("{}:{}\n{}\n{}{}", tag, open, children.join("\n"), indent_str, close)
}

fn pretty_print_key(key: &HashKey) -> String {
    match key {
        HashKey::String(s) => format!("String:\"{}\"", escape_string(s)),
        HashKey::Keyword(k) => format!("Keyword::{}", k),
    }
}
