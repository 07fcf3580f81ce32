/*
  Free-text boolean expressions over vocabulary keywords, e.g.
  "staff and (laptop or not guest)". Operators are the words and/or/not
  in any case, or & | !; anything else is a keyword.
*/

use {
  std::{fmt, iter::Peekable, str::CharIndices},
  serde::{Serialize, Deserialize},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordExpr {
  Keyword(String),
  Not(Box<KeywordExpr>),
  All(Vec<KeywordExpr>),
  Any(Vec<KeywordExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at offset {offset}")]
pub struct ParseExprError {
  pub offset: usize,
  pub reason: String,
}

type Result<T> = std::result::Result<T, ParseExprError>;

/* Public */
impl KeywordExpr {
  pub fn keyword(k: impl Into<String>) -> Self {
    KeywordExpr::Keyword(k.into())
  }
  pub fn parse(text: &str) -> Result<Self> {
    let tokens = tokenize(text);
    let mut parser = Parser { tokens, pos: 0, end: text.len() };
    if parser.tokens.is_empty() {
      return Err(ParseExprError { offset: 0, reason: "expression is empty".into() })
    }
    let expr = parser.any()?;
    match parser.peek() {
      None => Ok(expr),
      Some((offset, token)) => Err(ParseExprError {
        offset,
        reason: format!("unexpected {}", token),
      }),
    }
  }
  /* Keywords in the order they appear */
  pub fn keywords(&self) -> Vec<&str> {
    let mut out = Vec::new();
    self.collect_keywords(&mut out);
    out
  }
}
impl std::str::FromStr for KeywordExpr {
  type Err = ParseExprError;
  fn from_str(s: &str) -> Result<Self> {
    KeywordExpr::parse(s)
  }
}
/* Canonical text; parsing it gives back the same tree */
impl fmt::Display for KeywordExpr {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      KeywordExpr::Keyword(k) => f.write_str(k),
      KeywordExpr::Not(inner) => {
        f.write_str("not ")?;
        write_operand(f, inner)
      },
      KeywordExpr::All(items) => write_joined(f, items, " and "),
      KeywordExpr::Any(items) => write_joined(f, items, " or "),
    }
  }
}

/* Private */
impl KeywordExpr {
  fn collect_keywords<'a>(&'a self, out: &mut Vec<&'a str>) {
    match self {
      KeywordExpr::Keyword(k) => out.push(k),
      KeywordExpr::Not(inner) => inner.collect_keywords(out),
      KeywordExpr::All(items) | KeywordExpr::Any(items) => {
        for item in items {
          item.collect_keywords(out);
        }
      },
    }
  }
}

fn write_operand(f: &mut fmt::Formatter, expr: &KeywordExpr) -> fmt::Result {
  match expr {
    KeywordExpr::All(_) | KeywordExpr::Any(_) => write!(f, "({})", expr),
    _ => write!(f, "{}", expr),
  }
}
fn write_joined(f: &mut fmt::Formatter, items: &[KeywordExpr], sep: &str) -> fmt::Result {
  for (i, item) in items.iter().enumerate() {
    if i > 0 { f.write_str(sep)?; }
    write_operand(f, item)?;
  }
  Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  And,
  Or,
  Not,
  Open,
  Close,
  Word(String),
}
impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Token::And => f.write_str("'and'"),
      Token::Or => f.write_str("'or'"),
      Token::Not => f.write_str("'not'"),
      Token::Open => f.write_str("'('"),
      Token::Close => f.write_str("')'"),
      Token::Word(w) => write!(f, "keyword {:?}", w),
    }
  }
}

fn tokenize(text: &str) -> Vec<(usize, Token)> {
  let mut tokens = Vec::new();
  let mut chars: Peekable<CharIndices> = text.char_indices().peekable();
  while let Some((offset, c)) = chars.next() {
    let token = match c {
      c if c.is_whitespace() => continue,
      '(' => Token::Open,
      ')' => Token::Close,
      '!' => Token::Not,
      '&' | '|' => {
        /* && and || are accepted as well */
        if chars.peek().map(|&(_, next)| next) == Some(c) {
          chars.next();
        }
        if c == '&' { Token::And } else { Token::Or }
      },
      _ => {
        let mut end = offset + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
          if next.is_whitespace() || "()!&|".contains(next) { break }
          end = i + next.len_utf8();
          chars.next();
        }
        let word = &text[offset..end];
        match word.to_lowercase().as_str() {
          "and" => Token::And,
          "or" => Token::Or,
          "not" => Token::Not,
          _ => Token::Word(word.to_string()),
        }
      },
    };
    tokens.push((offset, token));
  }
  tokens
}

struct Parser {
  tokens: Vec<(usize, Token)>,
  pos: usize,
  end: usize,
}
impl Parser {
  fn peek(&self) -> Option<(usize, &Token)> {
    self.tokens.get(self.pos).map(|(offset, token)| (*offset, token))
  }
  fn next(&mut self) -> Option<(usize, Token)> {
    let token = self.tokens.get(self.pos).cloned();
    if token.is_some() { self.pos += 1; }
    token
  }
  fn any(&mut self) -> Result<KeywordExpr> {
    let mut items = vec![self.all()?];
    while let Some((_, Token::Or)) = self.peek() {
      self.pos += 1;
      items.push(self.all()?);
    }
    Ok(if items.len() == 1 { items.remove(0) } else { KeywordExpr::Any(items) })
  }
  fn all(&mut self) -> Result<KeywordExpr> {
    let mut items = vec![self.unary()?];
    while let Some((_, Token::And)) = self.peek() {
      self.pos += 1;
      items.push(self.unary()?);
    }
    Ok(if items.len() == 1 { items.remove(0) } else { KeywordExpr::All(items) })
  }
  fn unary(&mut self) -> Result<KeywordExpr> {
    match self.next() {
      Some((_, Token::Not)) => Ok(KeywordExpr::Not(Box::new(self.unary()?))),
      Some((_, Token::Word(w))) => Ok(KeywordExpr::Keyword(w)),
      Some((offset, Token::Open)) => {
        let inner = self.any()?;
        match self.next() {
          Some((_, Token::Close)) => Ok(inner),
          Some((at, token)) => Err(ParseExprError { offset: at, reason: format!("expected ')' but found {}", token) }),
          None => Err(ParseExprError { offset, reason: "unclosed '('".into() }),
        }
      },
      Some((offset, token)) => Err(ParseExprError { offset, reason: format!("unexpected {}", token) }),
      None => Err(ParseExprError { offset: self.end, reason: "unexpected end of expression".into() }),
    }
  }
}
