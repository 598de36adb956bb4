//! Syntax tree produced by the parser.
//!
//! Every node owns its children outright; nothing points back up the tree.
//! The `Serialize` derives exist for the debug dump in `printer` only.

use serde::Serialize;

use crate::ty::Type;

/// Unary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOpKind {
  /// `-`
  Negate,
  /// `~`
  Complement,
  /// `!`
  LogicalNot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
  Constant {
    value: i32,
  },
  Unary {
    op: UnaryOpKind,
    #[serde(rename = "expression")]
    inner: Box<Expression>,
  },
}

impl Expression {
  pub fn constant(value: i32) -> Self {
    Self::Constant { value }
  }

  pub fn unary(op: UnaryOpKind, inner: Expression) -> Self {
    Self::Unary {
      op,
      inner: Box::new(inner),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
  #[serde(rename = "ReturnStmt")]
  Return { expression: Expression },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
  pub name: String,
  pub return_type: Type,
  pub body: Statement,
}

/// Root of the tree. The grammar produces exactly one function; the slot is
/// optional only so the lowering pass can reject a hand-built empty program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
  pub function: Option<Function>,
}

impl Program {
  pub fn new(function: Function) -> Self {
    Self {
      function: Some(function),
    }
  }
}
