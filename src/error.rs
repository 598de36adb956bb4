//! Typed failures for every stage of the pipeline.
//!
//! Each stage owns one error type so callers can match on exactly what went
//! wrong; `CompileError` wraps all of them for the `compile` entry point and
//! knows how to point at the offending byte with a caret, chibicc style.

use snafu::Snafu;

use crate::tokenizer::{Position, TokenKind};

pub type CompileResult<T> = Result<T, CompileError>;

/// Raised by the tokenizer when no rule matches at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LexError {
  #[snafu(display("unknown character '{character}' at line {line}, column {column}"))]
  UnknownCharacter {
    character: char,
    line: usize,
    column: usize,
  },
}

impl LexError {
  pub fn character(&self) -> char {
    match self {
      Self::UnknownCharacter { character, .. } => *character,
    }
  }

  pub fn position(&self) -> Position {
    match self {
      Self::UnknownCharacter { line, column, .. } => Position::new(*line, *column),
    }
  }
}

/// Raised by the parser on the first token that does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyntaxError {
  #[snafu(display("expected {expected}, found {actual} at {position}"))]
  UnexpectedToken {
    expected: TokenKind,
    actual: TokenKind,
    position: Position,
  },

  #[snafu(display("integer literal '{text}' does not fit in an int at {position}"))]
  IntegerOutOfRange { text: String, position: Position },

  #[snafu(display("token stream ended before {expected}"))]
  UnexpectedEnd { expected: TokenKind },
}

impl SyntaxError {
  pub fn position(&self) -> Option<Position> {
    match self {
      Self::UnexpectedToken { position, .. } | Self::IntegerOutOfRange { position, .. } => {
        Some(*position)
      }
      Self::UnexpectedEnd { .. } => None,
    }
  }
}

/// Raised by the lowering pass when the AST is not shaped like a program.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoweringError {
  #[snafu(display("program has no function to lower"))]
  MissingFunction,
}

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(context(false), display("lexical error: {source}"))]
  Lex { source: LexError },

  #[snafu(context(false), display("syntax error: {source}"))]
  Syntax { source: SyntaxError },

  #[snafu(context(false), display("lowering error: {source}"))]
  Lowering { source: LoweringError },
}

impl CompileError {
  /// Source location the error refers to, when there is one.
  pub fn position(&self) -> Option<Position> {
    match self {
      Self::Lex { source } => Some(source.position()),
      Self::Syntax { source } => source.position(),
      Self::Lowering { .. } => None,
    }
  }

  /// Format the error under the source line it points at, with a caret
  /// marking the reported column.
  pub fn render(&self, src: &str) -> String {
    let Some(position) = self.position() else {
      return format!("error: {self}");
    };

    let line_text = src
      .lines()
      .nth(position.line.saturating_sub(1))
      .unwrap_or_default();
    let gutter = format!("{:>4} | ", position.line);
    let marker = format!(
      "{:>width$}{}^",
      "|",
      " ".repeat(position.column.saturating_sub(1) + 1),
      width = gutter.len() - 1
    );
    format!("{gutter}{line_text}\n{marker} {self}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lex_error_reports_character_and_position() {
    let err = LexError::UnknownCharacter {
      character: '@',
      line: 2,
      column: 7,
    };
    assert_eq!(err.character(), '@');
    assert_eq!(err.position(), Position::new(2, 7));
    assert_eq!(
      err.to_string(),
      "unknown character '@' at line 2, column 7"
    );
  }

  #[test]
  fn render_points_caret_at_column() {
    let src = "fn main() : int {\n  return @;\n}";
    let err = CompileError::from(LexError::UnknownCharacter {
      character: '@',
      line: 2,
      column: 10,
    });
    let rendered = err.render(src);
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("   2 |   return @;"));
    let marker = lines.next().unwrap_or_default();
    assert_eq!(marker.find('^'), Some("   2 |   return ".len()));
  }

  #[test]
  fn render_without_position_is_plain() {
    let err = CompileError::from(LoweringError::MissingFunction);
    assert_eq!(
      err.render("whatever"),
      "error: lowering error: program has no function to lower"
    );
  }
}
