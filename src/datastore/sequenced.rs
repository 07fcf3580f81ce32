
use {
  std::collections::BTreeMap,
  crate::{
    errors::GraphError as Error,
    Triple,
  },
};

type Result<T> = std::result::Result<T, Error>;

/* Triples keyed by the index they were given on insertion.
   next_index only ever grows, so an index names one insertion
     for the lifetime of the graph even after that triple is gone.
   Reading the map in key order is the canonical serialisation order. */
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SequencedGraph {
  next_index: usize,
  triples: BTreeMap<usize, Triple>,
}

/* Public */
impl SequencedGraph {
  pub fn new() -> Self {
    SequencedGraph {
      next_index: 0,
      triples: BTreeMap::new(),
    }
  }
  pub fn add(&mut self, triple: Triple) -> usize {
    let index = self.next_index;
    self.next_index += 1;
    self.triples.insert(index, triple);
    index
  }
  pub fn remove_by_index(&mut self, index: usize) -> Result<Triple> {
    self.triples.remove(&index).ok_or(Error::NotFound(index))
  }
  pub fn get(&self, index: usize) -> Option<&Triple> {
    self.triples.get(&index)
  }
  pub fn contains_index(&self, index: usize) -> bool {
    self.triples.contains_key(&index)
  }
  pub fn len(&self) -> usize {
    self.triples.len()
  }
  pub fn is_empty(&self) -> bool {
    self.triples.is_empty()
  }
  /* Index the next add() will hand out */
  pub fn next_index(&self) -> usize {
    self.next_index
  }
  pub fn to_ordered_sequence(&self) -> impl Iterator<Item=&Triple> + '_ {
    self.triples.values()
  }
  pub fn iter(&self) -> impl Iterator<Item=(usize, &Triple)> + '_ {
    self.triples.iter().map(|(&i, t)| (i, t))
  }
}
