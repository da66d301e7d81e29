use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::core::native_fns;
use crate::value::{NativeFn, Value};

/// The fixed table of built-in functions injected into every root
/// environment.
#[derive(Debug)]
pub struct Namespace {
    fns: FxHashMap<&'static str, NativeFn>,
}

static CORE_NS: Lazy<Namespace> = Lazy::new(|| {
    let mut fns: FxHashMap<&'static str, NativeFn> = FxHashMap::default();
    fns.insert("+", native_fns::add as NativeFn);
    fns.insert("-", native_fns::sub as NativeFn);
    fns.insert("*", native_fns::mul as NativeFn);
    fns.insert("/", native_fns::div as NativeFn);
    fns.insert("=", native_fns::equal as NativeFn);
    fns.insert("<", native_fns::lt as NativeFn);
    fns.insert("<=", native_fns::le as NativeFn);
    fns.insert(">", native_fns::gt as NativeFn);
    fns.insert(">=", native_fns::ge as NativeFn);
    fns.insert("list", native_fns::list as NativeFn);
    Namespace { fns }
});

/// The process-wide built-in table, built on first use.
pub fn core_ns() -> &'static Namespace {
    &CORE_NS
}

impl Namespace {
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Value)> + '_ {
        self.fns.iter().map(|(name, f)| (*name, Value::Function { name: *name, f: *f }))
    }
}
