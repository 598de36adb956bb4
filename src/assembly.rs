//! Assembly IR: the flat three-address form the lowering pass emits.
//!
//! Instructions are kept in evaluation order; a backend must consume them in
//! sequence.

use serde::Serialize;

use crate::ast::UnaryOpKind;

/// Operand of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Val {
  Constant { value: i32 },
  Var { name: String },
}

impl Val {
  pub fn constant(value: i32) -> Self {
    Self::Constant { value }
  }

  pub fn var(name: impl Into<String>) -> Self {
    Self::Var { name: name.into() }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
  Negate,
  Complement,
  Not,
}

impl From<UnaryOpKind> for UnaryOp {
  fn from(kind: UnaryOpKind) -> Self {
    match kind {
      UnaryOpKind::Negate => Self::Negate,
      UnaryOpKind::Complement => Self::Complement,
      UnaryOpKind::LogicalNot => Self::Not,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Instruction {
  /// Returns a value to the caller.
  Return { value: Val },
  /// Applies `op` to `src`, storing the result in `dest`.
  ///
  /// `dest` is always a `Val::Var`.
  Unary { op: UnaryOp, src: Val, dest: Val },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
  pub name: String,
  pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
  #[serde(rename = "function_def")]
  pub function: Function,
}
