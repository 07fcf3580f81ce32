
use {
  std::collections::BTreeMap,
  crate::{
    access::facts::Dimension,
    Term,
  },
};

/* What a keyword stands for: the context must carry
`predicate` with `value` */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordBinding {
  pub predicate: String,
  pub value: Term,
}
impl KeywordBinding {
  pub fn new(predicate: impl Into<String>, value: Term) -> Self {
    KeywordBinding { predicate: predicate.into(), value }
  }
}

/* Closed keyword vocabularies of the user, device and environment
dimensions. Keywords are matched case-insensitively. The compiler
only ever reads it. */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordVocabulary(BTreeMap<Dimension, BTreeMap<String, KeywordBinding>>);

impl KeywordVocabulary {
  pub fn new() -> Self {
    KeywordVocabulary(BTreeMap::new())
  }
  /* Returns false (and stores nothing) for dimensions that are not
  keyword driven */
  pub fn insert(&mut self, dimension: Dimension, keyword: &str, binding: KeywordBinding) -> bool {
    if !dimension.is_keyword_driven() {
      return false
    }
    self.0
      .entry(dimension)
      .or_default()
      .insert(keyword.to_lowercase(), binding);
    true
  }
  pub fn with(mut self, dimension: Dimension, keyword: &str, binding: KeywordBinding) -> Self {
    self.insert(dimension, keyword, binding);
    self
  }
  pub fn lookup(&self, dimension: Dimension, keyword: &str) -> Option<&KeywordBinding> {
    self.0.get(&dimension)?.get(&keyword.to_lowercase())
  }
  pub fn keywords(&self, dimension: Dimension) -> impl Iterator<Item=&str> + '_ {
    self.0
      .get(&dimension)
      .into_iter()
      .flat_map(|entries| entries.keys().map(String::as_str))
  }
}
