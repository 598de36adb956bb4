use serde::Serialize;

use crate::tokenizer::TokenKind;

/// Return types a function may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Type {
  #[serde(rename = "int")]
  Int,
}

impl Type {
  /// Map a type keyword to its type. `float` is lexed but not yet accepted.
  pub fn from_keyword(kind: TokenKind) -> Option<Self> {
    match kind {
      TokenKind::KInt => Some(Self::Int),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_int_keyword_is_a_type() {
    assert_eq!(Type::from_keyword(TokenKind::KInt), Some(Type::Int));
    assert_eq!(Type::from_keyword(TokenKind::KFloat), None);
    assert_eq!(Type::from_keyword(TokenKind::Identifier), None);
  }
}
