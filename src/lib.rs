//! Crate root: wires together the compilation pipeline.
//!
//! Each stage fully consumes its input before the next one starts:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the program AST.
//! - `codegen` lowers the AST into the three-address assembly IR.
//! - `printer` renders the AST and IR for debugging.
//! - `error` holds the typed failures of every stage.

pub mod assembly;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod printer;
pub mod tokenizer;
pub mod ty;

pub use codegen::lower;
pub use error::{CompileError, CompileResult, LexError, LoweringError, SyntaxError};
pub use parser::parse;
pub use tokenizer::tokenize;

/// Compile a source string into assembly IR.
pub fn compile(source: &str) -> CompileResult<assembly::Program> {
  let tokens = tokenizer::tokenize(source)?;
  let program = parser::parse(tokens)?;
  Ok(codegen::lower(program)?)
}
