pub mod env;
pub mod template;

pub use env::{Vars, VariableTable, VARIABLE_NAMES};
pub use template::{substitute, substitute_file};
