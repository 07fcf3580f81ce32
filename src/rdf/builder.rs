/*
  Turns a Graph back into text: the canonical Turtle dump the
  editor displays and hands to persistence, and an RDF/XML export.
*/

use {
  std::fmt::Write as _,
  rio_api::{
    formatter::TriplesFormatter,
    model::{
      Triple as RioTriple,
      NamedNode, BlankNode, NamedOrBlankNode,
      Term as RioTerm,
      Literal as RioLiteral,
    },
  },
  rio_xml::RdfXmlFormatter,
  crate::{errors::ExportError, Graph, PrefixTable, Term, Triple},
};

/* One "@prefix" line per data prefix (sorted by name), then one
line per triple in index order. The same graph and table always
give the same bytes. */
pub fn serialize(graph: &Graph, prefixes: &PrefixTable) -> String {
  let mut out = String::new();
  for (prefix, namespace) in prefixes.data_entries() {
    let _ = writeln!(out, "@prefix {}: <{}> .", prefix, namespace);
  }
  if !out.is_empty() && !graph.is_empty() {
    out.push('\n');
  }
  for triple in graph.to_ordered_sequence() {
    write_triple(&mut out, triple);
  }
  out
}

pub fn write_triple(out: &mut String, triple: &Triple) {
  write_term(out, triple.subject());
  out.push(' ');
  write_term(out, triple.predicate());
  out.push(' ');
  write_term(out, triple.object());
  out.push_str(" .\n");
}

pub fn write_term(out: &mut String, term: &Term) {
  match term {
    Term::Named{ iri } => {
      let _ = write!(out, "<{}>", iri);
    },
    Term::Blank{ id } => {
      let _ = write!(out, "_:{}", id);
    },
    Term::Literal{ val, datatype, lang } => {
      if val.contains('\n') {
        out.push_str("\"\"\"");
        escape_into(out, val, true);
        out.push_str("\"\"\"");
      }
      else {
        out.push('"');
        escape_into(out, val, false);
        out.push('"');
      }
      if let Some(lang) = lang {
        let _ = write!(out, "@{}", lang);
      }
      else if let Some(datatype) = datatype {
        let _ = write!(out, "^^<{}>", datatype);
      }
    },
  }
}

/* Whether `write_term` output for `term` parses back to the same term */
pub fn is_writable(term: &Term) -> bool {
  match term {
    Term::Named{ iri } => is_writable_iri(iri),
    Term::Blank{ id } => is_writable_label(id),
    Term::Literal{ lang: Some(lang), .. } => is_writable_lang(lang),
    Term::Literal{ datatype: Some(datatype), .. } => is_writable_iri(datatype),
    Term::Literal{..} => true,
  }
}
/* Non-empty, with none of the characters an IRIREF cannot hold raw */
pub fn is_writable_iri(iri: &str) -> bool {
  !iri.is_empty()
    && !iri.chars().any(|c| c <= ' ' || "<>\"{}|^`\\".contains(c))
}
/* Blank node labels: name characters, dots allowed inside */
pub fn is_writable_label(id: &str) -> bool {
  match id.chars().next() {
    Some(first) if first.is_alphanumeric() || first == '_' => {
      !id.ends_with('.')
        && id.chars().all(|c| c.is_alphanumeric() || "_-.".contains(c))
    },
    _ => false,
  }
}
/* "en", "en-GB", "de-1996" */
pub fn is_writable_lang(lang: &str) -> bool {
  let mut parts = lang.split('-');
  let primary = parts.next().unwrap_or("");
  !primary.is_empty()
    && primary.chars().all(|c| c.is_ascii_alphabetic())
    && parts.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}
/* Prefix names of "@prefix name: <ns> ."; the empty name is allowed */
pub fn is_writable_prefix(name: &str) -> bool {
  match name.chars().next() {
    None => true,
    Some(first) => first.is_alphabetic()
      && !name.ends_with('.')
      && name.chars().all(|c| c.is_alphanumeric() || "_-.".contains(c)),
  }
}

/* Long ("""-quoted) strings keep their newlines verbatim */
fn escape_into(out: &mut String, val: &str, long: bool) {
  for c in val.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' if long => out.push('\n'),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c => out.push(c),
    }
  }
}

pub fn to_rdf_xml(graph: &Graph) -> Result<Vec<u8>, ExportError> {
  let mut formatter = RdfXmlFormatter::new(Vec::default())?;
  for triple in graph.to_ordered_sequence() {
    let subject = match triple.subject() {
      Term::Named{ iri } => NamedOrBlankNode::NamedNode(NamedNode{ iri }),
      Term::Blank{ id } => NamedOrBlankNode::BlankNode(BlankNode{ id }),
      Term::Literal{..} => continue,
    };
    let predicate = match triple.predicate() {
      Term::Named{ iri } => NamedNode{ iri },
      _ => continue,
    };
    let object = match triple.object() {
      Term::Named{ iri } => RioTerm::NamedNode(NamedNode{ iri }),
      Term::Blank{ id } => RioTerm::BlankNode(BlankNode{ id }),
      Term::Literal{ val, lang: Some(lang), .. } => RioTerm::Literal(RioLiteral::LanguageTaggedString{ value: val, language: lang }),
      Term::Literal{ val, datatype: Some(datatype), .. } => RioTerm::Literal(RioLiteral::Typed{ value: val, datatype: NamedNode{ iri: datatype } }),
      Term::Literal{ val, .. } => RioTerm::Literal(RioLiteral::Simple{ value: val }),
    };
    formatter.format(&RioTriple{ subject, predicate, object })?;
  }
  Ok(formatter.finish()?)
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  fn sample() -> Graph {
    let mut g = Graph::new();
    g.add(Triple::new("http://s".into(), "http://p".into(), "http://o".into()).unwrap());
    g.add(Triple::new("http://s".into(), "http://label".into(), Term::literal("say \"hi\"")).unwrap());
    g.add(Triple::new(Term::blank("b0"), "http://note".into(), Term::literal("two\nlines")).unwrap());
    g.add(Triple::new(Term::blank("b0"), "http://n".into(), Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#decimal")).unwrap());
    g.add(Triple::new(Term::blank("b0"), "http://name".into(), Term::lang_literal("chat", "fr")).unwrap());
    g
  }
  #[test]
  fn canonical_text() {
    let mut prefixes = PrefixTable::new();
    prefixes.insert("ex", "http://ex.org/").unwrap();
    prefixes.insert("@base", "http://base/").unwrap();
    let expected = "@prefix ex: <http://ex.org/> .\n\
      \n\
      <http://s> <http://p> <http://o> .\n\
      <http://s> <http://label> \"say \\\"hi\\\"\" .\n\
      _:b0 <http://note> \"\"\"two\nlines\"\"\" .\n\
      _:b0 <http://n> \"5\"^^<http://www.w3.org/2001/XMLSchema#decimal> .\n\
      _:b0 <http://name> \"chat\"@fr .\n";
    assert_eq!(serialize(&sample(), &prefixes), expected);
  }
  #[test]
  fn serialization_is_deterministic() {
    let g = sample();
    let prefixes = PrefixTable::with_defaults();
    let first = serialize(&g, &prefixes);
    for _ in 0..5 {
      assert_eq!(serialize(&g, &prefixes), first);
    }
  }
  #[test]
  fn removed_triples_disappear_from_text() {
    let mut g = sample();
    g.remove_by_index(1).unwrap();
    let text = serialize(&g, &PrefixTable::new());
    assert!(!text.contains("http://label"));
    /* four triples, one of them spanning two lines */
    assert_eq!(text.lines().count(), 5);
  }
  #[test]
  fn writable_terms() {
    assert!(is_writable(&Term::named("urn:policy:context#user")));
    assert!(is_writable(&Term::named("http://ex.org/caf\u{e9}")));
    assert!(!is_writable(&Term::named("urn:a b")));
    assert!(!is_writable(&Term::named("urn:o>x")));
    assert!(!is_writable(&Term::named("")));
    assert!(is_writable(&Term::blank("ac0")));
    assert!(!is_writable(&Term::blank("a b")));
    assert!(!is_writable(&Term::blank("ends.")));
    assert!(is_writable(&Term::lang_literal("hi", "en-GB")));
    assert!(!is_writable(&Term::lang_literal("hi", "en us")));
    assert!(!is_writable(&Term::typed_literal("1", "urn:bad type")));
    assert!(is_writable(&Term::literal("anything \" goes\n<>")));
    assert!(is_writable_prefix("") && is_writable_prefix("ex-2"));
    assert!(!is_writable_prefix("ex ample") && !is_writable_prefix("2ex"));
  }
  #[test]
  fn canonical_text_parses_back() {
    use crate::rdf::parser::{TripleParser, TurtleParser};
    let mut g = sample();
    g.add(Triple::new("http://ex.org/caf\u{e9}".into(), "http://p".into(), Term::literal("tab\t and \\ and \"")).unwrap());
    let mut prefixes = PrefixTable::with_defaults();
    prefixes.insert("ex", "http://ex.org/").unwrap();
    let text = serialize(&g, &prefixes);
    let parsed = TurtleParser::default().parse(&text).unwrap();
    let named: Vec<&Triple> = g.to_ordered_sequence().filter(|t| !matches!(t.subject(), Term::Blank{..})).collect();
    let named_back: Vec<&Triple> = parsed.iter().filter(|t| !matches!(t.subject(), Term::Blank{..})).collect();
    assert_eq!(named_back, named);
    assert_eq!(parsed.len(), g.len());
  }
  #[test]
  fn rdf_xml_export() {
    let xml = String::from_utf8(to_rdf_xml(&sample()).unwrap()).unwrap();
    assert!(xml.contains("http://s"));
  }
}
