/*
  Session configuration, read from JSON:

  {
    "base_iri": "http://example.org/",
    "format": "turtle",
    "date_format": "mm/dd/yyyy",
    "condition": "http://example.org/policy#condition",
    "prefixes": { "org": "urn:org#" },
    "vocabulary": {
      "user": { "staff": { "predicate": "org:role", "iri": "org:Staff" } },
      "device": { "laptop": { "predicate": "org:deviceType", "literal": "laptop" } }
    }
  }

  Every field is optional. Predicates and IRI values may be CURIEs,
  which are expanded through the default prefixes plus `prefixes`.
*/

use {
  std::{
    collections::BTreeMap,
    convert::TryFrom,
    fs,
    path::Path,
  },
  serde::Deserialize,
  tracing::debug,
  crate::{
    access::{
      compiler::AccessConditionCompiler,
      facts::{DateFormat, Dimension},
      vocabulary::{KeywordBinding, KeywordVocabulary},
    },
    errors::ConfigError as Error,
    rdf::{
      builder,
      parser::{TextFormat, TripleParser, DEFAULT_BASE_IRI},
      prefix::PrefixTable,
    },
    Term,
  },
};

type Result<T> = std::result::Result<T, Error>;

const DEFAULT_CONDITION: &str = "condition";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
  pub base_iri: String,
  pub format: TextFormat,
  pub date_format: DateFormat,
  pub condition: Term,
  pub prefixes: PrefixTable,
  pub vocabulary: KeywordVocabulary,
}

/* Public */
impl SessionConfig {
  pub fn from_json(text: &str) -> Result<Self> {
    let raw: RawConfig = serde_json::from_str(text)?;
    Self::try_from(raw)
  }
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
      .map_err(|e| Error::Io(Box::new(e), path.to_path_buf()))?;
    let config = Self::from_json(&text)?;
    debug!(path = %path.display(), keywords = config.keyword_count(), "loaded session config");
    Ok(config)
  }
  pub fn parser(&self) -> Box<dyn TripleParser> {
    self.format.parser(&self.base_iri)
  }
  pub fn compiler(&self) -> AccessConditionCompiler {
    AccessConditionCompiler::new(self.condition.clone(), self.vocabulary.clone(), self.date_format)
  }
}
impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig {
      base_iri: DEFAULT_BASE_IRI.to_string(),
      format: TextFormat::default(),
      date_format: DateFormat::default(),
      condition: Term::named(format!("{}{}", DEFAULT_BASE_IRI, DEFAULT_CONDITION)),
      prefixes: PrefixTable::with_defaults(),
      vocabulary: KeywordVocabulary::new(),
    }
  }
}

/* Private */
impl SessionConfig {
  fn keyword_count(&self) -> usize {
    Dimension::ALL.iter()
      .map(|&d| self.vocabulary.keywords(d).count())
      .sum()
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
  base_iri: Option<String>,
  format: TextFormat,
  date_format: Option<String>,
  condition: Option<String>,
  prefixes: BTreeMap<String, String>,
  vocabulary: BTreeMap<String, BTreeMap<String, RawBinding>>,
}

/* Exactly one of `iri` and `literal`; `datatype` and `lang` only
apply to literals */
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBinding {
  predicate: String,
  iri: Option<String>,
  literal: Option<String>,
  datatype: Option<String>,
  lang: Option<String>,
}

impl TryFrom<RawConfig> for SessionConfig {
  type Error = Error;
  fn try_from(raw: RawConfig) -> Result<Self> {
    let base_iri = raw.base_iri.unwrap_or_else(|| DEFAULT_BASE_IRI.to_string());
    let date_format = match raw.date_format {
      Some(pattern) => DateFormat::from_pattern(&pattern).ok_or(Error::DateFormat(pattern))?,
      None => DateFormat::default(),
    };
    let mut prefixes = PrefixTable::with_defaults();
    for (prefix, namespace) in raw.prefixes.iter() {
      prefixes.insert(prefix, namespace)?;
    }
    let condition = match raw.condition {
      Some(iri) => expand(&prefixes, &iri),
      None => format!("{}{}", base_iri, DEFAULT_CONDITION),
    };
    if !builder::is_writable_iri(&condition) {
      return Err(Error::InvalidIri(condition))
    }
    let condition = Term::named(condition);
    let mut vocabulary = KeywordVocabulary::new();
    for (name, entries) in raw.vocabulary {
      for (keyword, binding) in entries {
        let invalid = |reason: &str| Error::Vocabulary {
          dimension: name.clone(),
          keyword: keyword.clone(),
          reason: reason.to_string(),
        };
        let dimension = Dimension::from_name(&name)
          .ok_or_else(|| invalid("unknown dimension"))?;
        let binding = resolve(&prefixes, binding).map_err(|reason| invalid(reason))?;
        if !vocabulary.insert(dimension, &keyword, binding) {
          return Err(invalid("dimension takes no keywords"))
        }
      }
    }
    Ok(SessionConfig {
      base_iri,
      format: raw.format,
      date_format,
      condition,
      prefixes,
      vocabulary,
    })
  }
}

/* Utils */
/* CURIEs with a known prefix are expanded, anything else is taken
as a full IRI */
fn expand(prefixes: &PrefixTable, text: &str) -> String {
  prefixes.expand(text).unwrap_or_else(|| text.to_string())
}
fn resolve(prefixes: &PrefixTable, raw: RawBinding) -> std::result::Result<KeywordBinding, &'static str> {
  let predicate = expand(prefixes, &raw.predicate);
  if !builder::is_writable_iri(&predicate) {
    return Err("predicate is not a valid IRI")
  }
  let value = match (raw.iri, raw.literal) {
    (Some(iri), None) => {
      if raw.datatype.is_some() || raw.lang.is_some() {
        return Err("datatype and lang only apply to literals")
      }
      Term::named(expand(prefixes, &iri))
    },
    (None, Some(val)) => match (raw.datatype, raw.lang) {
      (None, None) => Term::literal(val),
      (Some(datatype), None) => Term::typed_literal(val, expand(prefixes, &datatype)),
      (None, Some(lang)) => Term::lang_literal(val, lang),
      (Some(_), Some(_)) => return Err("a literal has either a datatype or a lang"),
    },
    _ => return Err("expected exactly one of iri and literal"),
  };
  if !builder::is_writable(&value) {
    return Err("value cannot be written as turtle")
  }
  Ok(KeywordBinding::new(predicate, value))
}
