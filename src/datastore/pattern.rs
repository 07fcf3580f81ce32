
use {
  std::collections::{BTreeSet, HashMap},
  crate::{Term, Triple},
};

type Postings = HashMap<Term, BTreeSet<usize>>;

/* One posting map per triple position, each mapping a Term
     to the indices of the triples holding it in that position.
   Only indices are stored, the triples themselves live in the
     SequencedGraph. Mutation is crate-private so that only the
     Graph facade can touch it, always together with the sequence. */
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PatternIndex {
  subjects: Postings,
  predicates: Postings,
  objects: Postings,
}

/* Public */
impl PatternIndex {
  pub fn new() -> Self {
    PatternIndex {
      subjects: HashMap::new(),
      predicates: HashMap::new(),
      objects: HashMap::new(),
    }
  }
  /* Indices of every triple matching all bound positions,
  ascending. A single bound position costs O(matches); with
  several bound the smallest posting set is walked and the
  others are probed. */
  pub fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<usize> {
    let mut bound: Vec<&BTreeSet<usize>> = Vec::with_capacity(3);
    let positions = [(&self.subjects, s), (&self.predicates, p), (&self.objects, o)];
    for &(postings, term) in positions.iter() {
      if let Some(term) = term {
        match postings.get(term) {
          Some(set) => bound.push(set),
          None => return Vec::new(),
        }
      }
    }
    if bound.is_empty() {
      return self.all()
    }
    bound.sort_by_key(|set| set.len());
    let (smallest, rest) = bound.split_at(1);
    smallest[0]
      .iter()
      .filter(|index| rest.iter().all(|set| set.contains(*index)))
      .copied()
      .collect()
  }
  pub fn contains(&self, triple: &Triple, index: usize) -> bool {
    let positions = [
      (&self.subjects, triple.subject()),
      (&self.predicates, triple.predicate()),
      (&self.objects, triple.object()),
    ];
    positions.iter().all(|&(postings, term)|
      postings.get(term).map_or(false, |set| set.contains(&index))
    )
  }
  /* Distinct terms seen in subject position */
  pub fn subjects(&self) -> impl Iterator<Item=&Term> + '_ {
    self.subjects.keys()
  }
}

/* Crate-private, driven by the Graph facade */
impl PatternIndex {
  pub(crate) fn add(&mut self, triple: &Triple, index: usize) {
    self.subjects.entry(triple.subject().clone()).or_default().insert(index);
    self.predicates.entry(triple.predicate().clone()).or_default().insert(index);
    self.objects.entry(triple.object().clone()).or_default().insert(index);
  }
  pub(crate) fn remove(&mut self, triple: &Triple, index: usize) {
    remove_posting(&mut self.subjects, triple.subject(), index);
    remove_posting(&mut self.predicates, triple.predicate(), index);
    remove_posting(&mut self.objects, triple.object(), index);
  }
}

/* Private */
impl PatternIndex {
  fn all(&self) -> Vec<usize> {
    let all: BTreeSet<usize> = self.subjects
      .values()
      .flat_map(|set| set.iter().copied())
      .collect();
    all.into_iter().collect()
  }
}

/* Utils */
fn remove_posting(postings: &mut Postings, term: &Term, index: usize) {
  if let Some(set) = postings.get_mut(term) {
    set.remove(&index);
    /* Drop the term once nothing refers to it anymore */
    if set.is_empty() {
      postings.remove(term);
    }
  }
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  fn t(s: &str, p: &str, o: &str) -> Triple {
    Triple::new(Term::named(s), Term::named(p), Term::named(o)).unwrap()
  }
  fn indexed() -> PatternIndex {
    let mut index = PatternIndex::new();
    index.add(&t("http://a", "http://knows", "http://b"), 0);
    index.add(&t("http://a", "http://likes", "http://c"), 1);
    index.add(&t("http://b", "http://knows", "http://c"), 2);
    index.add(&t("http://a", "http://knows", "http://c"), 3);
    index
  }
  #[test]
  fn single_bound_position() {
    let index = indexed();
    assert_eq!(index.find(Some(&"http://a".into()), None, None), vec![0, 1, 3]);
    assert_eq!(index.find(None, Some(&"http://knows".into()), None), vec![0, 2, 3]);
    assert_eq!(index.find(None, None, Some(&"http://c".into())), vec![1, 2, 3]);
  }
  #[test]
  fn multiple_bound_positions_intersect() {
    let index = indexed();
    let a: Term = "http://a".into();
    let knows: Term = "http://knows".into();
    let c: Term = "http://c".into();
    assert_eq!(index.find(Some(&a), Some(&knows), None), vec![0, 3]);
    assert_eq!(index.find(Some(&a), Some(&knows), Some(&c)), vec![3]);
    assert_eq!(index.find(None, Some(&knows), Some(&c)), vec![2, 3]);
  }
  #[test]
  fn unknown_term_matches_nothing() {
    let index = indexed();
    assert!(index.find(Some(&"http://zzz".into()), None, None).is_empty());
    assert!(index.find(Some(&"http://a".into()), Some(&"http://zzz".into()), None).is_empty());
  }
  #[test]
  fn wildcard_returns_everything_in_order() {
    let index = indexed();
    assert_eq!(index.find(None, None, None), vec![0, 1, 2, 3]);
  }
  #[test]
  fn removal_drops_empty_postings() {
    let mut index = indexed();
    index.remove(&t("http://a", "http://likes", "http://c"), 1);
    assert!(index.find(None, Some(&"http://likes".into()), None).is_empty());
    assert!(!index.contains(&t("http://a", "http://likes", "http://c"), 1));
    assert!(index.contains(&t("http://a", "http://knows", "http://c"), 3));
    assert_eq!(index.find(Some(&"http://a".into()), None, None), vec![0, 3]);
  }
}
