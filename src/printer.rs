//! Debug dumps of the AST and the assembly IR.
//!
//! Both render as JSON objects with a `"type"` entry on every variant node and
//! two spaces of indentation per level. The layout is for humans reading
//! compiler output and may change between versions.

use crate::{assembly, ast};

pub fn dump_ast(program: &ast::Program) -> serde_json::Result<String> {
  serde_json::to_string_pretty(program)
}

pub fn dump_assembly(program: &assembly::Program) -> serde_json::Result<String> {
  serde_json::to_string_pretty(program)
}
