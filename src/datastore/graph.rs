
use {
  std::collections::BTreeSet,
  tracing::trace,
  crate::{
    errors::GraphError as Error,
    Term, Triple,
    datastore::{
      sequenced::SequencedGraph,
      pattern::PatternIndex,
    },
  },
};

type Result<T> = std::result::Result<T, Error>;

/* The only owner of the SequencedGraph and its PatternIndex.
   Triples are stored once, in the sequence; the pattern maps
     hold indices into it. Every mutation goes through this
     type and is applied to both structures before returning,
     so the two views always describe the same set of triples. */
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Graph {
  sequence: SequencedGraph,
  index: PatternIndex,
}

/* Public */
impl Graph {
  /* Constructors */
  pub fn new() -> Self {
    Graph {
      sequence: SequencedGraph::new(),
      index: PatternIndex::new(),
    }
  }
  pub fn from_triples<I: IntoIterator<Item=Triple>>(triples: I) -> Self {
    let mut graph = Self::new();
    for triple in triples {
      graph.add(triple);
    }
    graph
  }
  /* Mutation */
  pub fn add(&mut self, triple: Triple) -> usize {
    let index = self.sequence.next_index();
    self.index.add(&triple, index);
    let assigned = self.sequence.add(triple);
    debug_assert_eq!(index, assigned);
    trace!(index, "added triple");
    assigned
  }
  pub fn remove_by_index(&mut self, index: usize) -> Result<Triple> {
    let triple = self.sequence.remove_by_index(index)?;
    self.index.remove(&triple, index);
    trace!(index, "removed triple");
    Ok(triple)
  }
  /* All-or-nothing: if any index is absent (or repeated) nothing
  is removed. Triples come back in ascending index order. */
  pub fn remove_all(&mut self, indices: &[usize]) -> Result<Vec<Triple>> {
    let mut unique = BTreeSet::new();
    for &index in indices {
      if !self.sequence.contains_index(index) || !unique.insert(index) {
        return Err(Error::NotFound(index))
      }
    }
    let mut removed = Vec::with_capacity(unique.len());
    for index in unique {
      removed.push(self.remove_by_index(index)?);
    }
    Ok(removed)
  }
  /* Queries */
  pub fn get(&self, index: usize) -> Option<&Triple> {
    self.sequence.get(index)
  }
  pub fn len(&self) -> usize {
    self.sequence.len()
  }
  pub fn is_empty(&self) -> bool {
    self.sequence.is_empty()
  }
  pub fn to_ordered_sequence(&self) -> impl Iterator<Item=&Triple> + '_ {
    self.sequence.to_ordered_sequence()
  }
  pub fn iter(&self) -> impl Iterator<Item=(usize, &Triple)> + '_ {
    self.sequence.iter()
  }
  /* Triples matching every bound position, ascending by index */
  pub fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<&Triple> {
    self.find_indexed(s, p, o)
      .into_iter()
      .map(|(_, triple)| triple)
      .collect()
  }
  pub fn find_indexed(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<(usize, &Triple)> {
    self.index.find(s, p, o)
      .into_iter()
      .filter_map(|i| self.sequence.get(i).map(|triple| (i, triple)))
      .collect()
  }
  /* Object of the earliest (subject, predicate, _) triple */
  pub fn first_object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
    let predicate = Term::named(predicate);
    self.index.find(Some(subject), Some(&predicate), None)
      .into_iter()
      .next()
      .and_then(|i| self.sequence.get(i))
      .map(Triple::object)
  }
  /* Indices of the triples describing `root`: those with root as
  subject, plus those of every blank node reachable from it
  through object positions. */
  pub fn describe(&self, root: &Term) -> Vec<usize> {
    let mut found: BTreeSet<usize> = BTreeSet::new();
    let mut seen: BTreeSet<&Term> = BTreeSet::new();
    let mut pending: Vec<&Term> = vec![root];
    seen.insert(root);
    while let Some(node) = pending.pop() {
      for (i, triple) in self.find_indexed(Some(node), None, None) {
        found.insert(i);
        let object = triple.object();
        if let Term::Blank{..} = object {
          if seen.insert(object) {
            pending.push(object);
          }
        }
      }
    }
    found.into_iter().collect()
  }
  /* Labels of every blank node in subject or object position */
  pub fn blank_labels(&self) -> BTreeSet<&str> {
    self.sequence
      .to_ordered_sequence()
      .flat_map(|triple| vec![triple.subject(), triple.object()])
      .filter_map(|term| match term {
        Term::Blank{ id } => Some(id.as_str()),
        _ => None,
      })
      .collect()
  }
  /* Both views hold exactly the same (index, triple) entries */
  pub fn is_consistent(&self) -> bool {
    let wildcard = self.index.find(None, None, None);
    wildcard.len() == self.sequence.len()
      && self.sequence.iter().zip(wildcard.iter()).all(|((i, triple), &j)|
        i == j && self.index.contains(triple, i)
      )
  }
}
impl std::iter::FromIterator<Triple> for Graph {
  fn from_iter<I: IntoIterator<Item=Triple>>(iter: I) -> Self {
    Graph::from_triples(iter)
  }
}

#[cfg(test)]
mod interface_tests {
  use super::*;
  use std::collections::HashSet;
  use rand::{Rng, SeedableRng, rngs::StdRng};
  fn t(s: &str, p: &str, o: &str) -> Triple {
    Triple::new(Term::named(s), Term::named(p), Term::named(o)).unwrap()
  }
  #[test]
  fn default_constructor() {
    let expected = Graph {
      sequence: SequencedGraph::new(),
      index: PatternIndex::new(),
    };
    assert_eq!(expected, Graph::new());
    assert!(Graph::new().is_empty());
  }
  #[test]
  fn match_contains_added_triple_until_removed() {
    let mut g = Graph::new();
    let keep = g.add(t("http://a", "http://p", "http://b"));
    let gone = g.add(t("http://a", "http://q", "http://c"));
    let a: Term = "http://a".into();
    assert_eq!(g.find(Some(&a), None, None).len(), 2);
    let removed = g.remove_by_index(gone).unwrap();
    assert_eq!(removed, t("http://a", "http://q", "http://c"));
    let found = g.find(Some(&a), None, None);
    assert_eq!(found, vec![&t("http://a", "http://p", "http://b")]);
    assert!(g.get(keep).is_some());
    assert!(g.is_consistent());
  }
  #[test]
  fn removing_unknown_index_changes_nothing() {
    let mut g = Graph::new();
    g.add(t("http://a", "http://p", "http://b"));
    let before = g.clone();
    assert_eq!(g.remove_by_index(5), Err(Error::NotFound(5)));
    assert_eq!(g, before);
  }
  #[test]
  fn remove_all_is_all_or_nothing() {
    let mut g = Graph::new();
    let a = g.add(t("http://a", "http://p", "http://b"));
    let b = g.add(t("http://b", "http://p", "http://c"));
    let before = g.clone();
    assert_eq!(g.remove_all(&[a, 9]), Err(Error::NotFound(9)));
    assert_eq!(g.remove_all(&[a, a]), Err(Error::NotFound(a)));
    assert_eq!(g, before);
    assert_eq!(g.remove_all(&[b, a]).unwrap().len(), 2);
    assert!(g.is_empty());
    assert!(g.is_consistent());
  }
  #[test]
  fn duplicates_are_distinct_entries() {
    let mut g = Graph::new();
    let first = g.add(t("http://a", "http://p", "http://b"));
    let second = g.add(t("http://a", "http://p", "http://b"));
    assert_ne!(first, second);
    g.remove_by_index(first).unwrap();
    assert_eq!(g.find_indexed(Some(&"http://a".into()), None, None).len(), 1);
    assert!(g.is_consistent());
  }
  #[test]
  fn first_object_prefers_lowest_index() {
    let mut g = Graph::new();
    g.add(t("http://a", "http://p", "http://first"));
    g.add(t("http://a", "http://p", "http://second"));
    assert_eq!(g.first_object(&"http://a".into(), "http://p"), Some(&"http://first".into()));
    assert_eq!(g.first_object(&"http://a".into(), "http://nope"), None);
  }
  #[test]
  fn describe_follows_blank_nodes_only() {
    let mut g = Graph::new();
    let root: Term = "http://root".into();
    let p = Term::named("http://p");
    let mine = vec![
      g.add(Triple::new(root.clone(), p.clone(), Term::blank("x")).unwrap()),
      g.add(Triple::new(Term::blank("x"), p.clone(), Term::blank("y")).unwrap()),
      g.add(Triple::new(Term::blank("y"), p.clone(), Term::blank("x")).unwrap()),
    ];
    g.add(Triple::new(root.clone(), p.clone(), "http://other".into()).unwrap());
    g.add(t("http://other", "http://p", "http://more"));
    let mut expected = mine;
    expected.push(3);
    assert_eq!(g.describe(&root), expected);
  }
  #[test]
  fn blank_labels_cover_both_node_positions() {
    let mut g = Graph::new();
    g.add(Triple::new(Term::blank("x"), "http://p".into(), Term::blank("y")).unwrap());
    g.add(Triple::new("http://a".into(), "http://p".into(), Term::blank("x")).unwrap());
    g.add(t("http://a", "http://p", "http://b"));
    assert_eq!(g.blank_labels().into_iter().collect::<Vec<_>>(), vec!["x", "y"]);
  }
  #[test]
  fn views_agree_under_random_edits() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut g = Graph::new();
    let mut live: Vec<usize> = Vec::new();
    let names = ["http://a", "http://b", "http://c", "http://d"];
    for _ in 0..500 {
      if live.is_empty() || rng.gen_bool(0.6) {
        let triple = t(
          names[rng.gen_range(0, names.len())],
          names[rng.gen_range(0, names.len())],
          names[rng.gen_range(0, names.len())],
        );
        live.push(g.add(triple));
      }
      else {
        let victim = live.swap_remove(rng.gen_range(0, live.len()));
        g.remove_by_index(victim).unwrap();
      }
      let ordered: HashSet<&Triple> = g.to_ordered_sequence().collect();
      let matched: HashSet<&Triple> = g.find(None, None, None).into_iter().collect();
      assert_eq!(ordered, matched);
      assert_eq!(g.len(), live.len());
      assert!(g.is_consistent());
    }
  }
}
