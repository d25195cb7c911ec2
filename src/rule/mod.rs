//! Rule parsing, combining and evaluation
//!
//! This module turns rule strings like `"(age > 30 AND department = 'Sales')"`
//! into ASTs, ANDs several of them together, and evaluates the result against
//! a [`Context`] of field values.

mod ast;
pub mod cache;
pub mod combiner;
pub mod evaluator;
pub mod parser;
pub mod tokenizer;
mod value;


pub use ast::*;
pub use cache::*;
pub use combiner::*;
pub use evaluator::*;
pub use parser::*;
pub use tokenizer::*;
pub use value::*;
