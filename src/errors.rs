use crate::Term;

type Source<E> = Box<E>;

/* Raised by the Graph facade. A failed removal never touches
either index. */
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
  #[error("no triple is stored under index {0}")]
  NotFound(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripleError {
  #[error("{term} cannot be used as the {position} of a triple")]
  InvalidPosition { position: &'static str, term: Term },
  /* The canonical text could not be read back by the parser */
  #[error("{term:?} in {position} position cannot be written as turtle")]
  Unwritable { position: &'static str, term: Term },
}

/* Malformed rdf:first/rdf:rest chains */
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
  #[error("list node {node} is missing its rdf:first or rdf:rest value")]
  IncompleteList { node: Term },
  #[error("list node {node} was reached twice while walking the list")]
  CircularList { node: Term },
}

/* Reported by the external grammar parser, passed through as-is */
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error{}: {message}", at_position(.position))]
pub struct SyntaxError {
  pub message: String,
  pub position: Option<usize>,
}
fn at_position(position: &Option<usize>) -> String {
  match position {
    Some(p) => format!(" at byte {}", p),
    None => String::new(),
  }
}
impl SyntaxError {
  pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
    SyntaxError { message: message.into(), position }
  }
}

/* A fact that cannot be compiled, addressed by field so the editor
can highlight it */
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
  pub field: String,
  pub reason: String,
}
impl ValidationError {
  pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
    ValidationError { field: field.into(), reason: reason.into() }
  }
  pub fn required(field: impl Into<String>) -> Self {
    Self::new(field, "is required")
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("could not read configuration at {1}: {0}")]
  Io(#[source] Source<std::io::Error>, std::path::PathBuf),
  #[error("configuration is not valid json: {0}")]
  Json(#[source] Source<serde_json::Error>),
  #[error("prefix {0:?} is bound to more than one namespace, or its namespace to more than one prefix")]
  DuplicatePrefix(String),
  #[error("unknown date format {0:?}, expected \"dd/mm/yyyy\" or \"mm/dd/yyyy\"")]
  DateFormat(String),
  #[error("prefix {prefix:?} <{namespace}> cannot be written as a turtle prefix declaration")]
  InvalidPrefix { prefix: String, namespace: String },
  #[error("{0:?} is not a writable IRI")]
  InvalidIri(String),
  #[error("vocabulary entry {dimension}.{keyword} is invalid: {reason}")]
  Vocabulary { dimension: String, keyword: String, reason: String },
}
impl From<serde_json::Error> for ConfigError {
  fn from(err: serde_json::Error) -> ConfigError {
    ConfigError::Json(Box::new(err))
  }
}

#[derive(Debug, thiserror::Error)]
#[error("rdf/xml export failed: {0}")]
pub struct ExportError(#[source] Source<rio_xml::RdfXmlError>);
impl From<rio_xml::RdfXmlError> for ExportError {
  fn from(err: rio_xml::RdfXmlError) -> ExportError {
    ExportError(Box::new(err))
  }
}

/* Everything the crate can raise, for callers that
don't care which stage failed */
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Graph(#[from] GraphError),
  #[error(transparent)]
  Triple(#[from] TripleError),
  #[error(transparent)]
  Collection(#[from] CollectionError),
  #[error(transparent)]
  Syntax(#[from] SyntaxError),
  #[error(transparent)]
  Validation(#[from] ValidationError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Export(#[from] ExportError),
}
