//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! Punctuators and operators are dispatched directly on the current
//! character, with one character of lookahead for the two-character forms.
//! Everything else goes through an ordered table of anchored patterns; the
//! first pattern that matches wins, so the table order is the precedence.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{LexError, UnknownCharacterSnafu};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Eof,
  Identifier,
  Integer,
  Float,
  LParen,
  RParen,
  LBrace,
  RBrace,
  LBracket,
  RBracket,
  Semicolon,
  Comma,
  Colon,

  Assign,
  Equal,
  Gt,
  GtEqual,
  Lt,
  LtEqual,

  Minus,
  Plus,
  Increment,
  Decrement,
  Mult,
  Div,
  Bitwise,
  Not,

  Void,
  Return,
  KInt,
  KFloat,
  Const,
  Var,
  Fn,
  If,
  Elif,
  Else,
  For,
  And,
  Or,
}

impl TokenKind {
  /// Upper-case name used in diagnostics and the token dump.
  pub fn name(self) -> &'static str {
    match self {
      Self::Eof => "EOF",
      Self::Identifier => "IDENTIFIER",
      Self::Integer => "INTEGER",
      Self::Float => "FLOAT",
      Self::LParen => "LPAREN",
      Self::RParen => "RPAREN",
      Self::LBrace => "LBRACE",
      Self::RBrace => "RBRACE",
      Self::LBracket => "LBRACKET",
      Self::RBracket => "RBRACKET",
      Self::Semicolon => "SEMICOLON",
      Self::Comma => "COMMA",
      Self::Colon => "COLON",
      Self::Assign => "ASSIGN",
      Self::Equal => "EQUAL",
      Self::Gt => "GT",
      Self::GtEqual => "GTEQUAL",
      Self::Lt => "LT",
      Self::LtEqual => "LTEQUAL",
      Self::Minus => "MINUS",
      Self::Plus => "PLUS",
      Self::Increment => "INCREMENT",
      Self::Decrement => "DECREMENT",
      Self::Mult => "MULT",
      Self::Div => "DIV",
      Self::Bitwise => "BITWISE",
      Self::Not => "NOT",
      Self::Void => "VOID",
      Self::Return => "RETURN",
      Self::KInt => "KINT",
      Self::KFloat => "KFLOAT",
      Self::Const => "CONST",
      Self::Var => "VAR",
      Self::Fn => "FN",
      Self::If => "IF",
      Self::Elif => "ELIF",
      Self::Else => "ELSE",
      Self::For => "FOR",
      Self::And => "AND",
      Self::Or => "OR",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// One-based line and column of a character in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
  pub line: usize,
  pub column: usize,
}

impl Position {
  pub fn new(line: usize, column: usize) -> Self {
    Self { line, column }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "line {}, column {}", self.line, self.column)
  }
}

/// A classified slice of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub position: Position,
}

impl Token {
  /// Convenience constructor to keep the `tokenize` loop readable.
  pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
    Self {
      kind,
      text: text.into(),
      position,
    }
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(Token: {}, Content: '{}')", self.kind, self.text)
  }
}

const KEYWORDS: [(&str, TokenKind); 13] = [
  ("void", TokenKind::Void),
  ("return", TokenKind::Return),
  ("int", TokenKind::KInt),
  ("float", TokenKind::KFloat),
  ("const", TokenKind::Const),
  ("var", TokenKind::Var),
  ("fn", TokenKind::Fn),
  ("if", TokenKind::If),
  ("elif", TokenKind::Elif),
  ("else", TokenKind::Else),
  ("for", TokenKind::For),
  ("and", TokenKind::And),
  ("or", TokenKind::Or),
];

// Float must stay ahead of Integer: both start with digits.
const PATTERNS: [(TokenKind, &str); 3] = [
  (TokenKind::Float, r"^[0-9]+\.[0-9]+"),
  (TokenKind::Integer, r"^[0-9]+"),
  (TokenKind::Identifier, r"^[a-zA-Z_][a-zA-Z0-9_]*"),
];

#[derive(Debug)]
struct Pattern {
  kind: TokenKind,
  regex: Regex,
}

/// Tokenizer holding the keyword and pattern tables.
///
/// The tables are built once in [`Lexer::new`] and only read afterwards, so a
/// single `Lexer` can tokenize any number of sources.
#[derive(Debug)]
pub struct Lexer {
  keywords: HashMap<&'static str, TokenKind>,
  patterns: Vec<Pattern>,
}

impl Default for Lexer {
  fn default() -> Self {
    Self::new()
  }
}

impl Lexer {
  pub fn new() -> Self {
    let keywords = KEYWORDS.into_iter().collect();
    let patterns = PATTERNS
      .into_iter()
      .map(|(kind, pattern)| Pattern {
        kind,
        regex: Regex::new(pattern).expect("lexer patterns are valid regexes"),
      })
      .collect();
    Self { keywords, patterns }
  }

  /// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
  pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(input);

    while let Some(c) = cursor.peek() {
      if c.is_whitespace() {
        cursor.bump(c);
        continue;
      }

      let position = cursor.position();

      if let Some((kind, len)) = punctuator(c, cursor.lookahead()) {
        let text = cursor.take(len);
        trace!(%kind, text, line = position.line, column = position.column, "token");
        tokens.push(Token::new(kind, text, position));
        continue;
      }

      if let Some((kind, len)) = self.match_pattern(cursor.rest()) {
        let text = cursor.take(len);
        let kind = match kind {
          TokenKind::Identifier => self.keywords.get(text).copied().unwrap_or(kind),
          _ => kind,
        };
        trace!(%kind, text, line = position.line, column = position.column, "token");
        tokens.push(Token::new(kind, text, position));
        continue;
      }

      return UnknownCharacterSnafu {
        character: c,
        line: position.line,
        column: position.column,
      }
      .fail();
    }

    tokens.push(Token::new(TokenKind::Eof, "", cursor.position()));
    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
  }

  /// Try each pattern in declaration order, returning the first match length.
  fn match_pattern(&self, rest: &str) -> Option<(TokenKind, usize)> {
    self
      .patterns
      .iter()
      .find_map(|pattern| pattern.regex.find(rest).map(|m| (pattern.kind, m.end())))
  }
}

/// Lex `input` with a freshly built [`Lexer`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
  Lexer::new().tokenize(input)
}

/// Render one token per line, in the `(Token: KIND, Content: 'text')` form.
pub fn dump_tokens(tokens: &[Token]) -> String {
  tokens.iter().map(|token| format!("{token}\n")).collect()
}

fn punctuator(c: char, next: Option<char>) -> Option<(TokenKind, usize)> {
  let paired = |second: char, double: TokenKind, single: TokenKind| {
    if next == Some(second) {
      (double, 2)
    } else {
      (single, 1)
    }
  };

  let matched = match c {
    '(' => (TokenKind::LParen, 1),
    ')' => (TokenKind::RParen, 1),
    '{' => (TokenKind::LBrace, 1),
    '}' => (TokenKind::RBrace, 1),
    '[' => (TokenKind::LBracket, 1),
    ']' => (TokenKind::RBracket, 1),
    ':' => (TokenKind::Colon, 1),
    ';' => (TokenKind::Semicolon, 1),
    ',' => (TokenKind::Comma, 1),
    '*' => (TokenKind::Mult, 1),
    '/' => (TokenKind::Div, 1),
    '~' => (TokenKind::Bitwise, 1),
    '!' => (TokenKind::Not, 1),
    '=' => paired('=', TokenKind::Equal, TokenKind::Assign),
    '+' => paired('+', TokenKind::Increment, TokenKind::Plus),
    '-' => paired('-', TokenKind::Decrement, TokenKind::Minus),
    '<' => paired('=', TokenKind::LtEqual, TokenKind::Lt),
    '>' => paired('=', TokenKind::GtEqual, TokenKind::Gt),
    _ => return None,
  };
  Some(matched)
}

/// Forward-only position in the source, tracking line and column.
struct Cursor<'a> {
  input: &'a str,
  offset: usize,
  line: usize,
  column: usize,
}

impl<'a> Cursor<'a> {
  fn new(input: &'a str) -> Self {
    Self {
      input,
      offset: 0,
      line: 1,
      column: 1,
    }
  }

  fn rest(&self) -> &'a str {
    &self.input[self.offset..]
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  fn lookahead(&self) -> Option<char> {
    self.rest().chars().nth(1)
  }

  fn position(&self) -> Position {
    Position::new(self.line, self.column)
  }

  fn bump(&mut self, c: char) {
    self.offset += c.len_utf8();
    if c == '\n' {
      self.line += 1;
      self.column = 1;
    } else {
      self.column += 1;
    }
  }

  /// Consume `len` bytes and return the slice they covered.
  fn take(&mut self, len: usize) -> &'a str {
    let text = &self.input[self.offset..self.offset + len];
    for c in text.chars() {
      self.bump(c);
    }
    text
  }
}
