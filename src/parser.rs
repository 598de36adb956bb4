//! Recursive-descent parser producing the program AST.
//!
//! One routine per grammar rule, one token of lookahead, no backtracking:
//!
//! ```text
//! Program    := Function EOF
//! Function   := "fn" IDENTIFIER "(" ["void"] ")" ":" Type "{" Statement "}"
//! Type       := "int"
//! Statement  := "return" Expression ";"
//! Expression := UnaryOp Expression | "--" Expression | "(" Expression ")" | INTEGER
//! UnaryOp    := "-" | "~" | "!"
//! ```
//!
//! The first token that does not fit stops parsing; there is no recovery.

use std::iter::Peekable;
use std::vec;

use tracing::debug;

use crate::ast::{Expression, Function, Program, Statement, UnaryOpKind};
use crate::error::{IntegerOutOfRangeSnafu, SyntaxError, UnexpectedEndSnafu, UnexpectedTokenSnafu};
use crate::tokenizer::{Token, TokenKind};
use crate::ty::Type;

/// Parse a whole program from the token stream.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
  let mut stream = TokenStream::new(tokens);

  let function = parse_function(&mut stream)?;
  stream.skip(TokenKind::Eof)?;

  debug!(function = %function.name, "parsed program");
  Ok(Program::new(function))
}

fn parse_function(stream: &mut TokenStream) -> Result<Function, SyntaxError> {
  stream.skip(TokenKind::Fn)?;
  let name = stream.skip(TokenKind::Identifier)?.text;

  stream.skip(TokenKind::LParen)?;
  stream.equal(TokenKind::Void);
  stream.skip(TokenKind::RParen)?;

  stream.skip(TokenKind::Colon)?;
  let return_type = parse_type(stream)?;

  stream.skip(TokenKind::LBrace)?;
  let body = parse_stmt(stream)?;
  stream.skip(TokenKind::RBrace)?;

  Ok(Function {
    name,
    return_type,
    body,
  })
}

fn parse_type(stream: &mut TokenStream) -> Result<Type, SyntaxError> {
  match stream.peek_kind().and_then(Type::from_keyword) {
    Some(ty) => {
      stream.advance();
      Ok(ty)
    }
    None => Err(stream.unexpected(TokenKind::KInt)),
  }
}

fn parse_stmt(stream: &mut TokenStream) -> Result<Statement, SyntaxError> {
  // The only statement form today is `return`.
  stream.skip(TokenKind::Return)?;
  let expression = parse_expr(stream)?;
  stream.skip(TokenKind::Semicolon)?;
  Ok(Statement::Return { expression })
}

fn parse_expr(stream: &mut TokenStream) -> Result<Expression, SyntaxError> {
  match stream.peek_kind() {
    Some(TokenKind::Minus) => parse_unary(stream, UnaryOpKind::Negate),
    Some(TokenKind::Bitwise) => parse_unary(stream, UnaryOpKind::Complement),
    Some(TokenKind::Not) => parse_unary(stream, UnaryOpKind::LogicalNot),
    Some(TokenKind::Decrement) => {
      // `--` is lexed as one token but there is no decrement operator.
      let inner = parse_unary(stream, UnaryOpKind::Negate)?;
      Ok(Expression::unary(UnaryOpKind::Negate, inner))
    }
    Some(TokenKind::LParen) => {
      stream.advance();
      let node = parse_expr(stream)?;
      stream.skip(TokenKind::RParen)?;
      Ok(node)
    }
    _ => parse_constant(stream),
  }
}

/// Consume the operator token, then the operand it applies to.
fn parse_unary(stream: &mut TokenStream, op: UnaryOpKind) -> Result<Expression, SyntaxError> {
  stream.advance();
  let inner = parse_expr(stream)?;
  Ok(Expression::unary(op, inner))
}

fn parse_constant(stream: &mut TokenStream) -> Result<Expression, SyntaxError> {
  let token = stream.skip(TokenKind::Integer)?;
  let Ok(value) = token.text.parse::<i32>() else {
    return IntegerOutOfRangeSnafu {
      text: token.text,
      position: token.position,
    }
    .fail();
  };
  Ok(Expression::constant(value))
}

/// Forward-only cursor over the token vector.
struct TokenStream {
  tokens: Peekable<vec::IntoIter<Token>>,
}

impl TokenStream {
  /// Take ownership of the tokens; consumed tokens are never seen again.
  fn new(tokens: Vec<Token>) -> Self {
    Self {
      tokens: tokens.into_iter().peekable(),
    }
  }

  fn peek_kind(&mut self) -> Option<TokenKind> {
    self.tokens.peek().map(|token| token.kind)
  }

  fn advance(&mut self) {
    self.tokens.next();
  }

  /// Consume the current token if it is of the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    self.tokens.next_if(|token| token.kind == kind).is_some()
  }

  /// Consume and return the current token, which must be of kind `expected`.
  /// On a mismatch nothing is consumed.
  fn skip(&mut self, expected: TokenKind) -> Result<Token, SyntaxError> {
    match self.tokens.next_if(|token| token.kind == expected) {
      Some(token) => Ok(token),
      None => Err(self.unexpected(expected)),
    }
  }

  fn unexpected(&mut self, expected: TokenKind) -> SyntaxError {
    match self.tokens.peek() {
      Some(token) => UnexpectedTokenSnafu {
        expected,
        actual: token.kind,
        position: token.position,
      }
      .build(),
      None => UnexpectedEndSnafu { expected }.build(),
    }
  }
}
