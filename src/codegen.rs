//! Code generation: lower the parsed AST into assembly IR.
//!
//! Expressions are lowered post-order. Every unary operation writes into a
//! fresh temporary, so for `op1(op2(C))` the instruction for `op2` is emitted
//! before the one for `op1` and the caller sees the outermost temporary.

use tracing::{debug, trace};

use crate::assembly::{self, Instruction, Val};
use crate::ast::{self, Expression, Statement};
use crate::error::{LoweringError, MissingFunctionSnafu};

/// Lower a parsed program into assembly IR.
pub fn lower(program: ast::Program) -> Result<assembly::Program, LoweringError> {
  let Some(function) = program.function else {
    return MissingFunctionSnafu.fail();
  };

  Ok(assembly::Program {
    function: lower_function(function),
  })
}

fn lower_function(function: ast::Function) -> assembly::Function {
  let mut builder = FunctionBuilder::default();
  builder.emit_stmt(function.body);

  debug!(
    function = %function.name,
    instructions = builder.instructions.len(),
    temporaries = builder.tmp_count,
    "lowered function"
  );

  assembly::Function {
    name: function.name,
    body: builder.instructions,
  }
}

/// Per-function lowering state. The temporary counter restarts at zero for
/// every function.
#[derive(Debug, Default)]
struct FunctionBuilder {
  instructions: Vec<Instruction>,
  tmp_count: usize,
}

impl FunctionBuilder {
  fn new_tmp(&mut self) -> Val {
    let tmp = Val::var(format!("tmp{}", self.tmp_count));
    self.tmp_count += 1;
    tmp
  }

  fn push(&mut self, instruction: Instruction) {
    trace!(?instruction, "emit");
    self.instructions.push(instruction);
  }

  fn emit_stmt(&mut self, stmt: Statement) {
    match stmt {
      Statement::Return { expression } => {
        let value = self.emit_expr(expression);
        self.push(Instruction::Return { value });
      }
    }
  }

  /// Emit the instructions computing `expr` and return the value holding it.
  fn emit_expr(&mut self, expr: Expression) -> Val {
    match expr {
      Expression::Constant { value } => Val::constant(value),
      Expression::Unary { op, inner } => {
        let src = self.emit_expr(*inner);
        let dest = self.new_tmp();
        self.push(Instruction::Unary {
          op: op.into(),
          src,
          dest: dest.clone(),
        });
        dest
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assembly::UnaryOp;
  use crate::ast::UnaryOpKind;
  use crate::ty::Type;

  fn program(expression: Expression) -> ast::Program {
    ast::Program::new(ast::Function {
      name: "main".to_string(),
      return_type: Type::Int,
      body: Statement::Return { expression },
    })
  }

  #[test]
  fn negated_constant_uses_one_temporary() {
    let ir = lower(program(Expression::unary(
      UnaryOpKind::Negate,
      Expression::constant(2),
    )))
    .unwrap();

    assert_eq!(
      ir,
      assembly::Program {
        function: assembly::Function {
          name: "main".to_string(),
          body: vec![
            Instruction::Unary {
              op: UnaryOp::Negate,
              src: Val::constant(2),
              dest: Val::var("tmp0"),
            },
            Instruction::Return {
              value: Val::var("tmp0"),
            },
          ],
        },
      }
    );
  }

  #[test]
  fn constant_return_emits_no_temporaries() {
    let ir = lower(program(Expression::constant(7))).unwrap();
    assert_eq!(
      ir.function.body,
      vec![Instruction::Return {
        value: Val::constant(7)
      }]
    );
  }

  #[test]
  fn innermost_operation_is_emitted_first() {
    // ~-5
    let ir = lower(program(Expression::unary(
      UnaryOpKind::Complement,
      Expression::unary(UnaryOpKind::Negate, Expression::constant(5)),
    )))
    .unwrap();

    assert_eq!(
      ir.function.body,
      vec![
        Instruction::Unary {
          op: UnaryOp::Negate,
          src: Val::constant(5),
          dest: Val::var("tmp0"),
        },
        Instruction::Unary {
          op: UnaryOp::Complement,
          src: Val::var("tmp0"),
          dest: Val::var("tmp1"),
        },
        Instruction::Return {
          value: Val::var("tmp1"),
        },
      ]
    );
  }

  #[test]
  fn logical_not_lowers_to_not() {
    let ir = lower(program(Expression::unary(
      UnaryOpKind::LogicalNot,
      Expression::constant(0),
    )))
    .unwrap();
    assert!(matches!(
      ir.function.body[0],
      Instruction::Unary {
        op: UnaryOp::Not,
        ..
      }
    ));
  }

  #[test]
  fn every_source_was_defined_earlier() {
    let mut expr = Expression::constant(1);
    for op in [
      UnaryOpKind::Negate,
      UnaryOpKind::Complement,
      UnaryOpKind::LogicalNot,
    ]
    .into_iter()
    .cycle()
    .take(30)
    {
      expr = Expression::unary(op, expr);
    }

    let body = lower(program(expr)).unwrap().function.body;
    assert_eq!(body.len(), 31);

    let mut defined: Vec<&str> = Vec::new();
    for instruction in &body {
      let used = match instruction {
        Instruction::Unary { src, .. } => src,
        Instruction::Return { value } => value,
      };
      if let Val::Var { name } = used {
        assert!(defined.contains(&name.as_str()), "{name} used before defined");
      }
      if let Instruction::Unary {
        dest: Val::Var { name },
        ..
      } = instruction
      {
        assert!(!defined.contains(&name.as_str()), "{name} defined twice");
        defined.push(name.as_str());
      }
    }
  }

  #[test]
  fn empty_program_is_rejected() {
    let err = lower(ast::Program { function: None }).unwrap_err();
    assert_eq!(err, LoweringError::MissingFunction);
  }
}
