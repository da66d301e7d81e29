//! The language core: special forms and the built-in function table.

pub mod namespace;
pub mod native_fns;
pub mod special_forms;

pub use namespace::{core_ns, Namespace};
pub use special_forms::SpecialForm;
