/*
  Adapters over the rio parsers. The grammar itself is not ours:
  callers only see the TripleParser contract, which either yields
  every triple of the document or the parser's syntax error.
*/

use {
  rio_api::{
    parser::TriplesParser,
    model::{
      Triple as RioTriple,
      NamedOrBlankNode,
      NamedNode, BlankNode,
      Term as RioTerm,
      Literal,
    },
  },
  serde::{Serialize, Deserialize},
  crate::{
    errors::SyntaxError as Error,
    Term, Triple,
  },
};

type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_BASE_IRI: &str = "http://localhost/";

pub trait TripleParser {
  /* Never partially succeeds */
  fn parse(&self, text: &str) -> Result<Vec<Triple>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFormat {
  Turtle,
  RdfXml,
}
impl Default for TextFormat {
  fn default() -> Self {
    TextFormat::Turtle
  }
}
impl TextFormat {
  pub fn parser(self, base_iri: &str) -> Box<dyn TripleParser> {
    match self {
      TextFormat::Turtle => Box::new(TurtleParser::new(base_iri)),
      TextFormat::RdfXml => Box::new(RdfXmlParser::new(base_iri)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurtleParser {
  base_iri: String,
}
impl TurtleParser {
  pub fn new(base_iri: &str) -> Self {
    TurtleParser { base_iri: base_iri.to_string() }
  }
}
impl Default for TurtleParser {
  fn default() -> Self {
    Self::new(DEFAULT_BASE_IRI)
  }
}
impl TripleParser for TurtleParser {
  fn parse(&self, text: &str) -> Result<Vec<Triple>> {
    use rio_turtle::{TurtleParser as RioParser, TurtleError};
    let mut triples: Vec<Triple> = Vec::new();
    RioParser::new(text.as_bytes(), &self.base_iri)
      .map_err(|e| syntax_error(&e))?
      .parse_all(&mut |t| {
        triples.push(from_rio(t));
        Ok(()) as std::result::Result<(), TurtleError>
      })
      .map_err(|e| syntax_error(&e))?;
    Ok(triples)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfXmlParser {
  base_iri: String,
}
impl RdfXmlParser {
  pub fn new(base_iri: &str) -> Self {
    RdfXmlParser { base_iri: base_iri.to_string() }
  }
}
impl TripleParser for RdfXmlParser {
  fn parse(&self, text: &str) -> Result<Vec<Triple>> {
    use rio_xml::{RdfXmlParser as RioParser, RdfXmlError};
    let mut triples: Vec<Triple> = Vec::new();
    RioParser::new(text.as_bytes(), &self.base_iri)
      .map_err(|e| syntax_error(&e))?
      .parse_all(&mut |t| {
        triples.push(from_rio(t));
        Ok(()) as std::result::Result<(), RdfXmlError>
      })
      .map_err(|e| syntax_error(&e))?;
    Ok(triples)
  }
}

/* Utils */
fn syntax_error<E: std::fmt::Display>(err: &E) -> Error {
  Error::new(err.to_string(), None)
}
fn from_rio(t: RioTriple) -> Triple {
  let subject = match t.subject {
    NamedOrBlankNode::NamedNode(NamedNode{ iri }) => Term::named(iri),
    NamedOrBlankNode::BlankNode(BlankNode{ id }) => Term::blank(id),
  };
  let NamedNode{ iri: predicate } = t.predicate;
  let object = match t.object {
    RioTerm::NamedNode(NamedNode{ iri }) => Term::named(iri),
    RioTerm::BlankNode(BlankNode{ id }) => Term::blank(id),
    RioTerm::Literal(Literal::Simple{ value }) => Term::literal(value),
    RioTerm::Literal(Literal::LanguageTaggedString{ value, language }) => Term::lang_literal(value, language),
    RioTerm::Literal(Literal::Typed{ value, datatype: NamedNode{ iri } }) => Term::typed_literal(value, iri),
  };
  Triple::from_parts(subject, predicate, object)
}
