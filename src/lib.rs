/* Exports */

pub mod datastore;
pub mod rdf;
pub mod access;
pub mod config;
pub mod session;
pub mod errors;

pub use datastore::graph::Graph as Graph;
pub use datastore::collection::decode as decode_collection;
pub use rdf::prefix::PrefixTable as PrefixTable;
pub use access::compiler::AccessConditionCompiler as AccessConditionCompiler;
pub use access::facts::{AccessConditionFacts, Dimension, DimensionFact};
pub use session::EditingSession as EditingSession;
pub use config::SessionConfig as SessionConfig;
pub use errors::Error;

/* Common Definitions */

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize, Hash)]
pub enum Term {
  Named{ iri: String },
  Blank{ id: String },
  Literal{ val: String, datatype: Option<String>, lang: Option<String> },
}
impl Term {
  pub fn named(iri: impl Into<String>) -> Self {
    Term::Named{ iri: iri.into() }
  }
  pub fn blank(id: impl Into<String>) -> Self {
    Term::Blank{ id: id.into() }
  }
  pub fn literal(val: impl Into<String>) -> Self {
    Term::Literal{ val: val.into(), datatype: None, lang: None }
  }
  pub fn typed_literal(val: impl Into<String>, datatype: impl Into<String>) -> Self {
    Term::Literal{ val: val.into(), datatype: Some(datatype.into()), lang: None }
  }
  pub fn lang_literal(val: impl Into<String>, lang: impl Into<String>) -> Self {
    Term::Literal{ val: val.into(), datatype: None, lang: Some(lang.into()) }
  }
  pub fn is_literal(&self) -> bool {
    matches!(self, Term::Literal{..})
  }
  /* The lexical form of a literal */
  pub fn literal_value(&self) -> Option<&str> {
    match self {
      Term::Literal{ val, .. } => Some(val),
      _ => None,
    }
  }
  pub fn iri(&self) -> Option<&str> {
    match self {
      Term::Named{ iri } => Some(iri),
      _ => None,
    }
  }
}
impl std::convert::From<&str> for Term {
  fn from(s: &str) -> Self {
    Self::Named{ iri: s.to_string() }
  }
}
/* Same form as in the canonical text */
impl std::fmt::Display for Term {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut out = String::new();
    rdf::builder::write_term(&mut out, self);
    f.write_str(&out)
  }
}

/* Subjects are Named or Blank, predicates are Named.
Fields are private so a Triple can only be built valid
and is never changed in place. */
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
  subject: Term,
  predicate: Term,
  object: Term,
}
impl Triple {
  pub fn new(subject: Term, predicate: Term, object: Term) -> Result<Self, errors::TripleError> {
    use errors::TripleError::InvalidPosition;
    if subject.is_literal() {
      return Err(InvalidPosition{ position: "subject", term: subject })
    }
    if predicate.iri().is_none() {
      return Err(InvalidPosition{ position: "predicate", term: predicate })
    }
    use errors::TripleError::Unwritable;
    use rdf::builder::is_writable;
    if !is_writable(&subject) {
      return Err(Unwritable{ position: "subject", term: subject })
    }
    if !is_writable(&predicate) {
      return Err(Unwritable{ position: "predicate", term: predicate })
    }
    if !is_writable(&object) {
      return Err(Unwritable{ position: "object", term: object })
    }
    Ok(Triple{ subject, predicate, object })
  }
  /* For triples whose shape is fixed by the caller's own vocabulary */
  pub(crate) fn from_parts(subject: Term, predicate: &str, object: Term) -> Self {
    debug_assert!(!subject.is_literal());
    Triple{ subject, predicate: Term::named(predicate), object }
  }
  /* Rewrites the subject and object. `f` must map nodes to nodes */
  pub(crate) fn map_nodes<F: FnMut(Term) -> Term>(self, mut f: F) -> Self {
    let subject = f(self.subject);
    debug_assert!(!subject.is_literal());
    Triple{ subject, predicate: self.predicate, object: f(self.object) }
  }
  pub fn subject(&self) -> &Term { &self.subject }
  pub fn predicate(&self) -> &Term { &self.predicate }
  pub fn object(&self) -> &Term { &self.object }
  pub fn into_parts(self) -> [Term; 3] {
    [self.subject, self.predicate, self.object]
  }
}
impl std::fmt::Display for Triple {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
  }
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  #[test]
  fn literal_subject_is_rejected() {
    let res = Triple::new(Term::literal("x"), "http://p".into(), "http://o".into());
    assert_eq!(res, Err(errors::TripleError::InvalidPosition{
      position: "subject",
      term: Term::literal("x"),
    }));
  }
  #[test]
  fn blank_predicate_is_rejected() {
    let res = Triple::new("http://s".into(), Term::blank("b0"), "http://o".into());
    assert!(matches!(res, Err(errors::TripleError::InvalidPosition{ position: "predicate", .. })));
  }
  #[test]
  fn terms_the_text_form_cannot_hold_are_rejected() {
    use errors::TripleError::Unwritable;
    let res = Triple::new("urn:a b".into(), "urn:p".into(), "urn:o".into());
    assert!(matches!(res, Err(Unwritable{ position: "subject", .. })));
    let res = Triple::new("urn:a".into(), "urn:p".into(), "urn:o>x".into());
    assert!(matches!(res, Err(Unwritable{ position: "object", .. })));
    let res = Triple::new(Term::blank("a b"), "urn:p".into(), "urn:o".into());
    assert!(matches!(res, Err(Unwritable{ position: "subject", .. })));
    let res = Triple::new("urn:a".into(), "urn:p".into(), Term::lang_literal("hi", "en us"));
    assert!(matches!(res, Err(Unwritable{ position: "object", .. })));
  }
  #[test]
  fn terms_compare_structurally() {
    assert_eq!(Term::typed_literal("1", "http://dt"), Term::typed_literal("1", "http://dt"));
    assert_ne!(Term::literal("1"), Term::typed_literal("1", "http://dt"));
    assert_ne!(Term::blank("a"), Term::named("a"));
  }
  #[test]
  fn literal_display_uses_turtle_escapes() {
    assert_eq!(Term::literal("tab\there \"q\"").to_string(), "\"tab\\there \\\"q\\\"\"");
    assert_eq!(Term::typed_literal("5", "http://dt").to_string(), "\"5\"^^<http://dt>");
  }
  #[test]
  fn display_forms() {
    let t = Triple::new(Term::blank("b"), "http://p".into(), Term::lang_literal("hi", "en")).unwrap();
    assert_eq!(t.to_string(), "_:b <http://p> \"hi\"@en .");
  }
}
