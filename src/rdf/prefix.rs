
use {
  std::collections::BTreeMap,
  bimap::BiBTreeMap,
  crate::{
    errors::ConfigError as Error,
    rdf::{builder, vocab},
  },
};

type Result<T> = std::result::Result<T, Error>;

/* Prefix names <-> namespace IRIs, both sides unique.
   Names starting with '@' (@base, @vocab, ...) are bookkeeping
     entries carried along with the table; they are never
     written out as prefix declarations. */
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable(BiBTreeMap<String, String>);

/* Public */
impl PrefixTable {
  pub fn new() -> Self {
    PrefixTable(BiBTreeMap::new())
  }
  /* rdf, xsd and the access condition namespace */
  pub fn with_defaults() -> Self {
    let mut table = Self::new();
    table.0.insert("rdf".into(), vocab::rdf::NAMESPACE.into());
    table.0.insert("xsd".into(), vocab::xsd::NAMESPACE.into());
    table.0.insert("ac".into(), vocab::ac::NAMESPACE.into());
    table
  }
  /* Fails for names or namespaces a prefix declaration cannot hold,
  and for bindings that clash with an existing one */
  pub fn insert(&mut self, prefix: &str, namespace: &str) -> Result<()> {
    let writable_name = is_bookkeeping(prefix) || builder::is_writable_prefix(prefix);
    if !writable_name || !builder::is_writable_iri(namespace) {
      return Err(Error::InvalidPrefix{ prefix: prefix.to_string(), namespace: namespace.to_string() })
    }
    if self.0.get_by_left(&prefix.to_string()).map(String::as_str) == Some(namespace) {
      return Ok(())
    }
    self.0.insert_no_overwrite(prefix.to_string(), namespace.to_string())
      .map_err(|(prefix, _)| Error::DuplicatePrefix(prefix))
  }
  pub fn namespace(&self, prefix: &str) -> Option<&str> {
    self.0.get_by_left(&prefix.to_string()).map(String::as_str)
  }
  pub fn prefix(&self, namespace: &str) -> Option<&str> {
    self.0.get_by_right(&namespace.to_string()).map(String::as_str)
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  /* "ac:user" -> "urn:policy:context#user", None for unknown prefixes */
  pub fn expand(&self, curie: &str) -> Option<String> {
    let colon = curie.find(':')?;
    let (prefix, local) = (&curie[..colon], &curie[colon + 1..]);
    if is_bookkeeping(prefix) {
      return None
    }
    self.namespace(prefix).map(|ns| format!("{}{}", ns, local))
  }
  /* Inverse of expand, choosing the longest matching namespace */
  pub fn compact(&self, iri: &str) -> Option<String> {
    self.data_entries()
      .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(*ns))
      .max_by_key(|(_, ns)| ns.len())
      .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
  }
  /* Entries that are real prefix declarations, sorted by name */
  pub fn data_entries(&self) -> impl Iterator<Item=(&str, &str)> + '_ {
    self.0
      .iter()
      .filter(|(prefix, _)| !is_bookkeeping(prefix))
      .map(|(prefix, ns)| (prefix.as_str(), ns.as_str()))
  }
}
impl std::convert::TryFrom<BTreeMap<String, String>> for PrefixTable {
  type Error = Error;
  fn try_from(map: BTreeMap<String, String>) -> Result<Self> {
    let mut table = PrefixTable::new();
    for (prefix, namespace) in map.iter() {
      table.insert(prefix, namespace)?;
    }
    Ok(table)
  }
}

/* Utils */
pub fn is_bookkeeping(prefix: &str) -> bool {
  prefix.starts_with('@')
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  use std::convert::TryFrom;
  #[test]
  fn expand_and_compact() {
    let table = PrefixTable::with_defaults();
    assert_eq!(table.expand("ac:user"), Some(vocab::ac::USER.to_string()));
    assert_eq!(table.expand("nope:user"), None);
    assert_eq!(table.expand("no-colon"), None);
    assert_eq!(table.compact(vocab::rdf::TYPE), Some("rdf:type".to_string()));
    assert_eq!(table.compact("http://elsewhere/x"), None);
  }
  #[test]
  fn compact_prefers_longest_namespace() {
    let mut table = PrefixTable::new();
    table.insert("ex", "http://ex.org/").unwrap();
    table.insert("exv", "http://ex.org/vocab#").unwrap();
    assert_eq!(table.compact("http://ex.org/vocab#term"), Some("exv:term".to_string()));
    assert_eq!(table.compact("http://ex.org/thing"), Some("ex:thing".to_string()));
  }
  #[test]
  fn conflicting_bindings_are_rejected() {
    let mut table = PrefixTable::new();
    table.insert("ex", "http://ex.org/").unwrap();
    assert!(table.insert("ex", "http://ex.org/").is_ok());
    assert!(matches!(table.insert("ex", "http://other.org/"), Err(Error::DuplicatePrefix(_))));
    assert!(matches!(table.insert("ex2", "http://ex.org/"), Err(Error::DuplicatePrefix(_))));
    assert_eq!(table.namespace("ex"), Some("http://ex.org/"));
  }
  #[test]
  fn unwritable_declarations_are_rejected() {
    let mut table = PrefixTable::new();
    assert!(matches!(table.insert("ex ample", "http://ex.org/"), Err(Error::InvalidPrefix{ .. })));
    assert!(matches!(table.insert("ex", "http://ex.org/a b"), Err(Error::InvalidPrefix{ .. })));
    assert!(matches!(table.insert("ex", ""), Err(Error::InvalidPrefix{ .. })));
    assert!(table.is_empty());
    assert!(table.insert("", "http://ex.org/").is_ok());
  }
  #[test]
  fn bookkeeping_entries_are_hidden() {
    let mut map = BTreeMap::new();
    map.insert("@base".to_string(), "http://base/".to_string());
    map.insert("ex".to_string(), "http://ex.org/".to_string());
    let table = PrefixTable::try_from(map).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.data_entries().collect::<Vec<_>>(), vec![("ex", "http://ex.org/")]);
    assert_eq!(table.expand("@base:x"), None);
  }
}
