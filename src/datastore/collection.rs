/*
  Walks rdf:first/rdf:rest chains into the ordered list of
  their members.
*/

use {
  std::collections::HashSet,
  crate::{
    errors::CollectionError as Error,
    rdf::vocab::rdf,
    Graph, Term,
  },
};

type Result<T> = std::result::Result<T, Error>;

/* The head counts as visited before the walk starts, and each rest
target is checked against the visited set before it is entered,
so a node whose rest points at itself fails on the next step.
When a node carries several first/rest values the earliest
inserted one is used. */
pub fn decode(graph: &Graph, head: &Term) -> Result<Vec<Term>> {
  let nil = Term::named(rdf::NIL);
  let mut members = Vec::new();
  if *head == nil {
    return Ok(members)
  }
  let mut visited: HashSet<&Term> = HashSet::new();
  visited.insert(head);
  let mut current = head;
  loop {
    let first = graph.first_object(current, rdf::FIRST)
      .ok_or_else(|| Error::IncompleteList{ node: current.clone() })?;
    members.push(first.clone());
    let next = graph.first_object(current, rdf::REST)
      .ok_or_else(|| Error::IncompleteList{ node: current.clone() })?;
    if *next == nil {
      return Ok(members)
    }
    if !visited.insert(next) {
      return Err(Error::CircularList{ node: next.clone() })
    }
    current = next;
  }
}

/* Triples encoding `members` as a list headed by the first label
handed out by `next_label`. An empty list is rdf:nil itself. */
pub fn encode<F: FnMut() -> Term>(members: Vec<Term>, mut next_label: F) -> (Term, Vec<crate::Triple>) {
  use crate::Triple;
  let nil = Term::named(rdf::NIL);
  if members.is_empty() {
    return (nil, Vec::new())
  }
  let nodes: Vec<Term> = members.iter().map(|_| next_label()).collect();
  let mut triples = Vec::with_capacity(members.len() * 2);
  for (i, member) in members.into_iter().enumerate() {
    let rest = nodes.get(i + 1).cloned().unwrap_or_else(|| nil.clone());
    triples.push(Triple::from_parts(nodes[i].clone(), rdf::FIRST, member));
    triples.push(Triple::from_parts(nodes[i].clone(), rdf::REST, rest));
  }
  (nodes[0].clone(), triples)
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  use crate::Triple;
  fn link(g: &mut Graph, node: &str, first: Term, rest: Term) {
    g.add(Triple::new(Term::blank(node), rdf::FIRST.into(), first).unwrap());
    g.add(Triple::new(Term::blank(node), rdf::REST.into(), rest).unwrap());
  }
  #[test]
  fn three_element_chain() {
    let mut g = Graph::new();
    link(&mut g, "A", Term::literal("x"), Term::blank("B"));
    link(&mut g, "B", Term::literal("y"), Term::blank("C"));
    link(&mut g, "C", Term::literal("z"), rdf::NIL.into());
    assert_eq!(
      decode(&g, &Term::blank("A")),
      Ok(vec![Term::literal("x"), Term::literal("y"), Term::literal("z")])
    );
    /* Restartable from any node */
    assert_eq!(decode(&g, &Term::blank("C")), Ok(vec![Term::literal("z")]));
  }
  #[test]
  fn nil_is_the_empty_list() {
    assert_eq!(decode(&Graph::new(), &rdf::NIL.into()), Ok(Vec::new()));
  }
  #[test]
  fn self_loop_fails_on_next_step() {
    let mut g = Graph::new();
    link(&mut g, "A", Term::literal("x"), Term::blank("A"));
    assert_eq!(decode(&g, &Term::blank("A")), Err(Error::CircularList{ node: Term::blank("A") }));
  }
  #[test]
  fn loop_back_to_earlier_node() {
    let mut g = Graph::new();
    link(&mut g, "A", Term::literal("x"), Term::blank("B"));
    link(&mut g, "B", Term::literal("y"), Term::blank("C"));
    link(&mut g, "C", Term::literal("z"), Term::blank("A"));
    assert_eq!(decode(&g, &Term::blank("A")), Err(Error::CircularList{ node: Term::blank("A") }));
    /* from B the walk is B, C, A and A's rest is B again */
    assert_eq!(decode(&g, &Term::blank("B")), Err(Error::CircularList{ node: Term::blank("B") }));
  }
  #[test]
  fn missing_first_is_incomplete() {
    let mut g = Graph::new();
    link(&mut g, "A", Term::literal("x"), Term::blank("B"));
    g.add(Triple::new(Term::blank("B"), rdf::REST.into(), rdf::NIL.into()).unwrap());
    assert_eq!(decode(&g, &Term::blank("A")), Err(Error::IncompleteList{ node: Term::blank("B") }));
  }
  #[test]
  fn missing_rest_is_incomplete() {
    let mut g = Graph::new();
    g.add(Triple::new(Term::blank("A"), rdf::FIRST.into(), Term::literal("x")).unwrap());
    assert_eq!(decode(&g, &Term::blank("A")), Err(Error::IncompleteList{ node: Term::blank("A") }));
  }
  #[test]
  fn encoded_lists_decode_back() {
    let mut counter = 0;
    let members = vec![Term::literal("a"), Term::named("http://b"), Term::literal("c")];
    let (head, triples) = encode(members.clone(), || {
      counter += 1;
      Term::blank(format!("l{}", counter))
    });
    assert_eq!(head, Term::blank("l1"));
    let g: Graph = triples.into_iter().collect();
    assert_eq!(decode(&g, &head), Ok(members));
  }
}
