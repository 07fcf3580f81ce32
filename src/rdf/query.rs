
use {
  std::fmt,
  crate::{
    rdf::builder::write_term,
    Term,
  },
};

#[derive(Clone, Debug, PartialEq)]
pub enum QueryUnit {
  Val(Term),
  Var(String),
}
/* "$name" is a variable, anything else an IRI */
impl<'a> From<&'a str> for QueryUnit {
  fn from(s: &str) -> Self {
    match s.chars().next() {
      Some('$') => QueryUnit::Var(s[1..].into()),
      _         => QueryUnit::Val(Term::named(s)),
    }
  }
}
impl From<Term> for QueryUnit {
  fn from(t: Term) -> Self {
    QueryUnit::Val(t)
  }
}
impl fmt::Display for QueryUnit {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      QueryUnit::Var(name) => write!(f, "?{}", name),
      QueryUnit::Val(term) => {
        let mut out = String::new();
        write_term(&mut out, term);
        f.write_str(&out)
      },
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GroupPattern {
  Triple([QueryUnit; 3]),
  Group(Vec<GroupPattern>),
  Union(Vec<GroupPattern>),
  NotExists(Box<GroupPattern>),
  Filter(String),
}
impl GroupPattern {
  pub fn triple<S, P, O>(s: S, p: P, o: O) -> Self
    where S: Into<QueryUnit>, P: Into<QueryUnit>, O: Into<QueryUnit> {
    GroupPattern::Triple([s.into(), p.into(), o.into()])
  }
}
impl fmt::Display for GroupPattern {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      GroupPattern::Triple([s, p, o]) => write!(f, "{} {} {} .", s, p, o),
      GroupPattern::Group(patterns) => {
        f.write_str("{")?;
        for pattern in patterns {
          write!(f, " {}", pattern)?;
        }
        f.write_str(" }")
      },
      GroupPattern::Union(patterns) => {
        for (i, pattern) in patterns.iter().enumerate() {
          if i > 0 { f.write_str(" UNION ")?; }
          match pattern {
            GroupPattern::Group(_) => write!(f, "{}", pattern)?,
            _ => write!(f, "{{ {} }}", pattern)?,
          }
        }
        Ok(())
      },
      GroupPattern::NotExists(pattern) => match &**pattern {
        GroupPattern::Group(_) => write!(f, "FILTER NOT EXISTS {}", pattern),
        _ => write!(f, "FILTER NOT EXISTS {{ {} }}", pattern),
      },
      GroupPattern::Filter(expr) => write!(f, "FILTER ({})", expr),
    }
  }
}

/* An ASK query over a flat list of group patterns:
let ask = Ask::new()
  .pattern(GroupPattern::triple("$user", "urn:role", Term::literal("admin")))
  .filter("?age > 18");
ask.to_string() == "ASK WHERE { ?user <urn:role> \"admin\" . FILTER (?age > 18) }" */
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Ask {
  pub patterns: Vec<GroupPattern>,
}
impl Ask {
  pub fn new() -> Self {
    Ask {
      patterns: Vec::new(),
    }
  }
  pub fn pattern(mut self, pattern: GroupPattern) -> Self {
    self.patterns.push(pattern);
    self
  }
  pub fn filter(mut self, expr: impl Into<String>) -> Self {
    self.patterns.push(GroupPattern::Filter(expr.into()));
    self
  }
}
impl fmt::Display for Ask {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("ASK WHERE {")?;
    for pattern in &self.patterns {
      write!(f, " {}", pattern)?;
    }
    f.write_str(" }")
  }
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  #[test]
  fn query_units_from_str() {
    assert_eq!(QueryUnit::from("$user"), QueryUnit::Var("user".into()));
    assert_eq!(QueryUnit::from("urn:x"), QueryUnit::Val(Term::named("urn:x")));
  }
  #[test]
  fn documented_example() {
    let ask = Ask::new()
      .pattern(GroupPattern::triple("$user", "urn:role", Term::literal("admin")))
      .filter("?age > 18");
    assert_eq!(ask.to_string(), "ASK WHERE { ?user <urn:role> \"admin\" . FILTER (?age > 18) }");
  }
  #[test]
  fn union_and_not_exists() {
    let a = GroupPattern::triple("$d", "urn:kind", Term::literal("laptop"));
    let b = GroupPattern::triple("$d", "urn:kind", Term::literal("phone"));
    let ask = Ask::new()
      .pattern(GroupPattern::Union(vec![a.clone(), b]))
      .pattern(GroupPattern::NotExists(Box::new(a)));
    assert_eq!(
      ask.to_string(),
      "ASK WHERE { { ?d <urn:kind> \"laptop\" . } UNION { ?d <urn:kind> \"phone\" . } \
       FILTER NOT EXISTS { ?d <urn:kind> \"laptop\" . } }"
    );
  }
}
