//! A small Lisp interpreter.
//!
//! Text is turned into a [`value::Value`] tree by the [`reader`], evaluated by
//! the [`eval::Evaluator`] against a chain of [`env::Env`] scopes, and rendered
//! back to text by the [`printer`].

pub mod core;
pub mod devtools;
pub mod env;
pub mod error;
pub mod eval;
pub mod printer;
pub mod reader;
pub mod repl;
pub mod runtime;
pub mod value;
