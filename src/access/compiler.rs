/*
  Structured access condition facts <-> graph triples.

  A compiled condition looks like:

    <root> rdf:type ac:AccessCondition .
    <root> ac:time _:ac0 .
    _:ac0 rdf:type ac:TimeCondition .
    _:ac0 ac:begin "01/01/2020" .
    _:ac0 ac:end "31/12/2020" .
    _:ac0 ac:condition "ASK WHERE { ... }"^^ac:askQuery .

  Keyword dimensions store their expression tree under ac:expression:
  a keyword is a plain literal, `all`/`any` are blank nodes carrying an
  RDF list under ac:allOf/ac:anyOf, `not` is a blank node with ac:not.
*/

use {
  std::collections::HashSet,
  tracing::{debug, warn},
  crate::{
    access::{
      expr::KeywordExpr,
      facts::{
        AccessConditionFacts, DimensionFact, Dimension, DateFormat, DistanceUnit,
        KeywordCondition, OutdoorArea, TimeWindow, Timestamp,
      },
      vocabulary::KeywordVocabulary,
    },
    datastore::collection,
    errors::{CollectionError, ValidationError},
    rdf::{
      builder::write_term,
      query::{Ask, GroupPattern, QueryUnit},
      vocab::{ac, rdf, xsd},
    },
    Graph, Term, Triple,
  },
};

const BLANK_PREFIX: &str = "ac";

#[derive(Debug, Clone, PartialEq)]
pub struct AccessConditionCompiler {
  root: Term,
  vocabulary: KeywordVocabulary,
  date_format: DateFormat,
}

/* Public */
impl AccessConditionCompiler {
  pub fn new(root: Term, vocabulary: KeywordVocabulary, date_format: DateFormat) -> Self {
    AccessConditionCompiler { root, vocabulary, date_format }
  }
  /* The resource the condition is attached to */
  pub fn root(&self) -> &Term {
    &self.root
  }
  pub fn vocabulary(&self) -> &KeywordVocabulary {
    &self.vocabulary
  }
  pub fn date_format(&self) -> DateFormat {
    self.date_format
  }
  /* Same facts, same triples: dimensions are emitted in fixed order
  and blank node labels come from a counter local to this call.
  Nothing is emitted unless every present dimension validates. */
  pub fn compile(&self, facts: &AccessConditionFacts) -> Result<Vec<Triple>, ValidationError> {
    let mut out = Emitter::new();
    if facts.is_empty() {
      return Ok(Vec::new())
    }
    out.push(self.root.clone(), rdf::TYPE, Term::named(ac::ACCESS_CONDITION));
    for fact in facts.iter() {
      let dimension = fact.dimension();
      let node = out.blank();
      out.push(self.root.clone(), dimension.link(), node.clone());
      out.push(node.clone(), rdf::TYPE, Term::named(dimension.class()));
      let ask = match fact {
        DimensionFact::User(condition)
        | DimensionFact::Environment(condition)
        | DimensionFact::Device(condition) => self.keyword_block(dimension, condition, &node, &mut out)?,
        DimensionFact::Time(window) => self.time_block(window, &node, &mut out)?,
        DimensionFact::Outdoor(area) => self.outdoor_block(area, &node, &mut out)?,
      };
      out.push(node, ac::CONDITION, Term::typed_literal(ask.to_string(), ac::ASK_QUERY));
    }
    debug!(dimensions = facts.len(), triples = out.triples.len(), "compiled access condition");
    Ok(out.triples)
  }
  /* Reads the facts back. A dimension without its link triple is
  absent; a linked block missing parts gives a fact with those
  fields unset. Only malformed lists (or cyclic expressions) fail. */
  pub fn extract(&self, graph: &Graph) -> Result<AccessConditionFacts, CollectionError> {
    let mut facts = AccessConditionFacts::new();
    let typed = graph.find(
      Some(&self.root),
      Some(&Term::named(rdf::TYPE)),
      Some(&Term::named(ac::ACCESS_CONDITION)),
    );
    if typed.is_empty() {
      debug!(root = %self.root, "no access condition in graph");
      return Ok(facts)
    }
    for &dimension in Dimension::ALL.iter() {
      let node = match graph.first_object(&self.root, dimension.link()) {
        Some(node) => node,
        None => continue,
      };
      let fact = match dimension {
        Dimension::Time => DimensionFact::Time(TimeWindow {
          begin: literal_of(graph, node, ac::BEGIN),
          end: literal_of(graph, node, ac::END),
        }),
        Dimension::Outdoor => DimensionFact::Outdoor(OutdoorArea {
          latitude: number_of(graph, node, ac::LATITUDE),
          longitude: number_of(graph, node, ac::LONGITUDE),
          radius: number_of(graph, node, ac::RADIUS),
          unit: literal_of(graph, node, ac::UNIT)
            .and_then(|symbol| DistanceUnit::from_symbol(&symbol))
            .unwrap_or_default(),
        }),
        Dimension::User | Dimension::Environment | Dimension::Device => {
          let expression = match graph.first_object(node, ac::EXPRESSION) {
            Some(term) => read_expr(graph, term, &mut HashSet::new())?,
            None => None,
          };
          match DimensionFact::keyword(dimension, KeywordCondition { expression }) {
            Some(fact) => fact,
            None => continue,
          }
        },
      };
      facts.insert(fact);
    }
    debug!(dimensions = facts.len(), "extracted access condition");
    Ok(facts)
  }
}

/* Private */
impl AccessConditionCompiler {
  fn keyword_block(&self, dimension: Dimension, condition: &KeywordCondition, node: &Term, out: &mut Emitter) -> Result<Ask, ValidationError> {
    let field = dimension.name();
    let expression = condition.expression.as_ref()
      .ok_or_else(|| ValidationError::required(field))?;
    for keyword in expression.keywords() {
      if self.vocabulary.lookup(dimension, keyword).is_none() {
        return Err(ValidationError::new(field, format!("unknown keyword {:?}", keyword)))
      }
    }
    let head = emit_expr(expression, out);
    out.push(node.clone(), ac::EXPRESSION, head);
    let pattern = self.keyword_pattern(dimension, expression)?;
    Ok(Ask::new().pattern(pattern))
  }
  fn keyword_pattern(&self, dimension: Dimension, expression: &KeywordExpr) -> Result<GroupPattern, ValidationError> {
    let subject = format!("${}", dimension.name());
    Ok(match expression {
      KeywordExpr::Keyword(k) => {
        let binding = self.vocabulary.lookup(dimension, k)
          .ok_or_else(|| ValidationError::new(dimension.name(), format!("unknown keyword {:?}", k)))?;
        GroupPattern::triple(subject.as_str(), binding.predicate.as_str(), binding.value.clone())
      },
      KeywordExpr::Not(inner) => GroupPattern::NotExists(Box::new(self.keyword_pattern(dimension, inner)?)),
      KeywordExpr::All(items) => GroupPattern::Group(
        items.iter().map(|item| self.keyword_pattern(dimension, item)).collect::<Result<_, _>>()?
      ),
      KeywordExpr::Any(items) => GroupPattern::Union(
        items.iter().map(|item| self.keyword_pattern(dimension, item)).collect::<Result<_, _>>()?
      ),
    })
  }
  fn time_block(&self, window: &TimeWindow, node: &Term, out: &mut Emitter) -> Result<Ask, ValidationError> {
    let begin_text = window.begin.as_ref().ok_or_else(|| ValidationError::required("begin"))?;
    let end_text = window.end.as_ref().ok_or_else(|| ValidationError::required("end"))?;
    let expected = format!("expected {} or HH:MM", self.date_format.pattern());
    let begin = Timestamp::parse(begin_text, self.date_format)
      .ok_or_else(|| ValidationError::new("begin", expected.clone()))?;
    let end = Timestamp::parse(end_text, self.date_format)
      .ok_or_else(|| ValidationError::new("end", expected))?;
    if begin.is_date() != end.is_date() {
      return Err(ValidationError::new("end", "must be a date when begin is a date, a time when begin is a time"))
    }
    if begin.is_date() && end < begin {
      return Err(ValidationError::new("end", "is before begin"))
    }
    out.push(node.clone(), ac::BEGIN, Term::literal(begin_text.as_str()));
    out.push(node.clone(), ac::END, Term::literal(end_text.as_str()));
    let (property, variable) = if begin.is_date() { (ac::NOW, "now") } else { (ac::TIME_OF_DAY, "clock") };
    let lower = format!("?{} >= {}", variable, term_text(&timestamp_literal(begin)));
    let upper = format!("?{} <= {}", variable, term_text(&timestamp_literal(end)));
    /* A time window like 22:00-06:00 runs over midnight */
    let filter = if end < begin {
      format!("{} || {}", lower, upper)
    }
    else {
      format!("{} && {}", lower, upper)
    };
    Ok(Ask::new()
      .pattern(GroupPattern::triple("$time", property, QueryUnit::Var(variable.into())))
      .filter(filter))
  }
  fn outdoor_block(&self, area: &OutdoorArea, node: &Term, out: &mut Emitter) -> Result<Ask, ValidationError> {
    let latitude = area.latitude.ok_or_else(|| ValidationError::required("latitude"))?;
    let longitude = area.longitude.ok_or_else(|| ValidationError::required("longitude"))?;
    let radius = area.radius.ok_or_else(|| ValidationError::required("radius"))?;
    if !latitude.is_finite() || latitude < -90.0 || latitude > 90.0 {
      return Err(ValidationError::new("latitude", "must be between -90 and 90"))
    }
    if !longitude.is_finite() || longitude < -180.0 || longitude > 180.0 {
      return Err(ValidationError::new("longitude", "must be between -180 and 180"))
    }
    if !radius.is_finite() || radius <= 0.0 {
      return Err(ValidationError::new("radius", "must be a positive number"))
    }
    out.push(node.clone(), ac::LATITUDE, decimal(latitude));
    out.push(node.clone(), ac::LONGITUDE, decimal(longitude));
    out.push(node.clone(), ac::RADIUS, decimal(radius));
    out.push(node.clone(), ac::UNIT, Term::literal(area.unit.symbol()));
    let filter = format!(
      "<{}>(?lat, ?long, {}, {}) <= {}",
      ac::DISTANCE, latitude, longitude, area.unit.to_meters(radius)
    );
    Ok(Ask::new()
      .pattern(GroupPattern::triple("$location", ac::POSITION_LAT, "$lat"))
      .pattern(GroupPattern::triple("$location", ac::POSITION_LONG, "$long"))
      .filter(filter))
  }
}

/* Collects triples and hands out blank node labels */
struct Emitter {
  triples: Vec<Triple>,
  next_blank: usize,
}
impl Emitter {
  fn new() -> Self {
    Emitter { triples: Vec::new(), next_blank: 0 }
  }
  fn blank(&mut self) -> Term {
    let label = format!("{}{}", BLANK_PREFIX, self.next_blank);
    self.next_blank += 1;
    Term::blank(label)
  }
  fn push(&mut self, subject: Term, predicate: &str, object: Term) {
    self.triples.push(Triple::from_parts(subject, predicate, object));
  }
}

/* Utils */
fn emit_expr(expression: &KeywordExpr, out: &mut Emitter) -> Term {
  match expression {
    KeywordExpr::Keyword(k) => Term::literal(k.as_str()),
    KeywordExpr::Not(inner) => {
      let node = out.blank();
      let child = emit_expr(inner, out);
      out.push(node.clone(), ac::NOT, child);
      node
    },
    KeywordExpr::All(items) | KeywordExpr::Any(items) => {
      let node = out.blank();
      let members: Vec<Term> = items.iter().map(|item| emit_expr(item, out)).collect();
      let (head, list) = collection::encode(members, || out.blank());
      let link = if let KeywordExpr::All(_) = expression { ac::ALL_OF } else { ac::ANY_OF };
      out.push(node.clone(), link, head);
      out.triples.extend(list);
      node
    },
  }
}

/* `active` holds the nodes on the current descent path */
fn read_expr<'g>(graph: &'g Graph, term: &'g Term, active: &mut HashSet<&'g Term>) -> Result<Option<KeywordExpr>, CollectionError> {
  if let Term::Literal{ val, .. } = term {
    return Ok(Some(KeywordExpr::Keyword(val.clone())))
  }
  if !active.insert(term) {
    return Err(CollectionError::CircularList{ node: term.clone() })
  }
  let result = if let Some(list) = graph.first_object(term, ac::ALL_OF) {
    read_members(graph, list, active)?.map(KeywordExpr::All)
  }
  else if let Some(list) = graph.first_object(term, ac::ANY_OF) {
    read_members(graph, list, active)?.map(KeywordExpr::Any)
  }
  else if let Some(inner) = graph.first_object(term, ac::NOT) {
    read_expr(graph, inner, active)?.map(|inner| KeywordExpr::Not(Box::new(inner)))
  }
  else {
    warn!(node = %term, "expression node has no allOf, anyOf or not");
    None
  };
  active.remove(term);
  Ok(result)
}
fn read_members<'g>(graph: &'g Graph, list: &'g Term, active: &mut HashSet<&'g Term>) -> Result<Option<Vec<KeywordExpr>>, CollectionError> {
  let mut items = Vec::new();
  for member in collection::decode(graph, list)? {
    /* decode hands back owned terms; look the member up again so the
    recursion can keep borrowing from the graph */
    let member = match lookup_member(graph, &member) {
      Some(member) => member,
      None => match member {
        Term::Literal{ val, .. } => {
          items.push(KeywordExpr::Keyword(val));
          continue
        },
        _ => return Ok(None),
      },
    };
    match read_expr(graph, member, active)? {
      Some(item) => items.push(item),
      None => return Ok(None),
    }
  }
  Ok(Some(items))
}
/* The graph's own copy of a non-literal term, if it is described there */
fn lookup_member<'g>(graph: &'g Graph, term: &Term) -> Option<&'g Term> {
  if term.is_literal() {
    return None
  }
  graph.find(Some(term), None, None)
    .into_iter()
    .next()
    .map(Triple::subject)
}
fn literal_of(graph: &Graph, node: &Term, predicate: &str) -> Option<String> {
  graph.first_object(node, predicate)
    .and_then(Term::literal_value)
    .map(str::to_string)
}
fn number_of(graph: &Graph, node: &Term, predicate: &str) -> Option<f64> {
  graph.first_object(node, predicate)
    .and_then(Term::literal_value)
    .and_then(|val| val.trim().parse::<f64>().ok())
}
fn decimal(value: f64) -> Term {
  Term::typed_literal(value.to_string(), xsd::DECIMAL)
}
fn timestamp_literal(timestamp: Timestamp) -> Term {
  match timestamp {
    Timestamp::Date(date) => Term::typed_literal(date.format("%Y-%m-%d").to_string(), xsd::DATE),
    Timestamp::Time(time) => Term::typed_literal(time.format("%H:%M:%S").to_string(), xsd::TIME),
  }
}
fn term_text(term: &Term) -> String {
  let mut out = String::new();
  write_term(&mut out, term);
  out
}
