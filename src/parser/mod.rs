mod ast;
mod local_variables;
mod parser;

pub use ast::*;
pub use local_variables::LocalVar;
pub use parser::*;
