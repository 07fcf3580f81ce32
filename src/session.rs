/*
  One policy being edited. The graph is the source of truth; the
  text view and the structured access condition facts are both
  derived from it and written back through it.
*/

use {
  std::collections::{BTreeMap, BTreeSet},
  tracing::{debug, warn},
  crate::{
    access::{compiler::AccessConditionCompiler, facts::{AccessConditionFacts, Dimension}},
    config::SessionConfig,
    errors::{CollectionError, Error, ExportError, GraphError, SyntaxError},
    rdf::{
      builder,
      parser::TripleParser,
      vocab::{ac, rdf},
    },
    Graph, PrefixTable, Term, Triple,
  },
};

const BLANK_PREFIX: &str = "ac";

pub struct EditingSession {
  graph: Graph,
  prefixes: PrefixTable,
  parser: Box<dyn TripleParser>,
  compiler: AccessConditionCompiler,
}

/* Public */
impl EditingSession {
  pub fn new(config: SessionConfig) -> Self {
    let parser = config.parser();
    let compiler = config.compiler();
    EditingSession {
      graph: Graph::new(),
      prefixes: config.prefixes,
      parser,
      compiler,
    }
  }
  /* Swap in another grammar, e.g. a stricter parser for imports */
  pub fn with_parser(mut self, parser: Box<dyn TripleParser>) -> Self {
    self.parser = parser;
    self
  }
  pub fn graph(&self) -> &Graph {
    &self.graph
  }
  pub fn prefixes(&self) -> &PrefixTable {
    &self.prefixes
  }
  pub fn compiler(&self) -> &AccessConditionCompiler {
    &self.compiler
  }
  /* Text view */
  pub fn text(&self) -> String {
    builder::serialize(&self.graph, &self.prefixes)
  }
  pub fn rdf_xml(&self) -> Result<Vec<u8>, ExportError> {
    builder::to_rdf_xml(&self.graph)
  }
  /* Replaces the graph with the parsed text. On a syntax error the
  current graph is kept as it is. */
  pub fn load_text(&mut self, text: &str) -> Result<usize, SyntaxError> {
    let triples = match self.parser.parse(text) {
      Ok(triples) => triples,
      Err(e) => {
        warn!(error = %e, "text did not parse, keeping current graph");
        return Err(e)
      },
    };
    self.graph = Graph::from_triples(triples);
    debug!(triples = self.graph.len(), "reloaded graph from text");
    Ok(self.graph.len())
  }
  /* Structured view */
  pub fn facts(&self) -> Result<AccessConditionFacts, CollectionError> {
    self.compiler.extract(&self.graph)
  }
  /* Compiles first, so invalid facts leave the graph untouched.
  The previous condition (the root's type and dimension links, and
  everything hanging off their blank nodes) is then replaced. Other
  statements about the root are kept. Compiled blank nodes are relabelled so they never share a label
  with a blank node that stays in the graph. */
  pub fn apply_facts(&mut self, facts: &AccessConditionFacts) -> Result<usize, Error> {
    let triples = self.compiler.compile(facts)?;
    let stale: Vec<usize> = self.condition_indices().into_iter().collect();
    self.graph.remove_all(&stale)?;
    let taken: BTreeSet<String> = self.graph
      .blank_labels()
      .into_iter()
      .map(str::to_string)
      .collect();
    let added = triples.len();
    for triple in relabel(triples, &taken) {
      self.graph.add(triple);
    }
    debug!(removed = stale.len(), added, "applied access condition");
    Ok(added)
  }
  /* Direct edits */
  pub fn add(&mut self, triple: Triple) -> usize {
    self.graph.add(triple)
  }
  pub fn remove_by_index(&mut self, index: usize) -> Result<Triple, GraphError> {
    self.graph.remove_by_index(index)
  }
}
impl Default for EditingSession {
  fn default() -> Self {
    Self::new(SessionConfig::default())
  }
}

/* Private */
impl EditingSession {
  fn condition_indices(&self) -> BTreeSet<usize> {
    let root = self.compiler.root();
    let mut indices = BTreeSet::new();
    let typed = self.graph.find_indexed(
      Some(root),
      Some(&Term::named(rdf::TYPE)),
      Some(&Term::named(ac::ACCESS_CONDITION)),
    );
    indices.extend(typed.into_iter().map(|(i, _)| i));
    for &dimension in Dimension::ALL.iter() {
      let link = Term::named(dimension.link());
      for (i, triple) in self.graph.find_indexed(Some(root), Some(&link), None) {
        indices.insert(i);
        if let Term::Blank{..} = triple.object() {
          indices.extend(self.graph.describe(triple.object()));
        }
      }
    }
    indices
  }
}

/* Utils */
/* Gives each blank node of `triples` the next "ac{n}" label that
is not in `taken` */
fn relabel(triples: Vec<Triple>, taken: &BTreeSet<String>) -> Vec<Triple> {
  let mut labels: BTreeMap<String, String> = BTreeMap::new();
  let mut next = 0;
  let mut fresh = |term: Term| match term {
    Term::Blank{ id } => {
      let label = labels.entry(id).or_insert_with(|| loop {
        let candidate = format!("{}{}", BLANK_PREFIX, next);
        next += 1;
        if !taken.contains(&candidate) {
          break candidate
        }
      });
      Term::blank(label.as_str())
    },
    other => other,
  };
  triples
    .into_iter()
    .map(|triple| triple.map_nodes(&mut fresh))
    .collect()
}
