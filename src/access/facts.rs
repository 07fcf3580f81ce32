
use {
  std::collections::BTreeMap,
  chrono::{NaiveDate, NaiveTime},
  serde::{Serialize, Deserialize},
  crate::{
    access::expr::KeywordExpr,
    errors::ValidationError,
    rdf::vocab::ac,
  },
};

/* Declaration order is compile order */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
  User,
  Time,
  Outdoor,
  Environment,
  Device,
}
impl Dimension {
  pub const ALL: [Dimension; 5] = [
    Dimension::User,
    Dimension::Time,
    Dimension::Outdoor,
    Dimension::Environment,
    Dimension::Device,
  ];
  pub fn name(self) -> &'static str {
    match self {
      Dimension::User => "user",
      Dimension::Time => "time",
      Dimension::Outdoor => "outdoor",
      Dimension::Environment => "environment",
      Dimension::Device => "device",
    }
  }
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|d| d.name() == name)
  }
  /* Predicate linking the condition resource to this dimension's block */
  pub fn link(self) -> &'static str {
    match self {
      Dimension::User => ac::USER,
      Dimension::Time => ac::TIME,
      Dimension::Outdoor => ac::OUTDOOR,
      Dimension::Environment => ac::ENVIRONMENT,
      Dimension::Device => ac::DEVICE,
    }
  }
  pub fn class(self) -> &'static str {
    match self {
      Dimension::User => ac::USER_CONDITION,
      Dimension::Time => ac::TIME_CONDITION,
      Dimension::Outdoor => ac::OUTDOOR_CONDITION,
      Dimension::Environment => ac::ENVIRONMENT_CONDITION,
      Dimension::Device => ac::DEVICE_CONDITION,
    }
  }
  pub fn is_keyword_driven(self) -> bool {
    matches!(self, Dimension::User | Dimension::Environment | Dimension::Device)
  }
}
impl std::fmt::Display for Dimension {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCondition {
  pub expression: Option<KeywordExpr>,
}
impl KeywordCondition {
  pub fn new(expression: KeywordExpr) -> Self {
    KeywordCondition { expression: Some(expression) }
  }
  /* Parse what the user typed for `dimension` */
  pub fn parse(dimension: Dimension, text: &str) -> Result<Self, ValidationError> {
    KeywordExpr::parse(text)
      .map(Self::new)
      .map_err(|e| ValidationError::new(dimension.name(), e.to_string()))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
  pub begin: Option<String>,
  pub end: Option<String>,
}
impl TimeWindow {
  pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
    TimeWindow { begin: Some(begin.into()), end: Some(end.into()) }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
  #[serde(rename = "dd/mm/yyyy")]
  DayMonthYear,
  #[serde(rename = "mm/dd/yyyy")]
  MonthDayYear,
}
impl Default for DateFormat {
  fn default() -> Self {
    DateFormat::DayMonthYear
  }
}
impl DateFormat {
  pub fn pattern(self) -> &'static str {
    match self {
      DateFormat::DayMonthYear => "dd/mm/yyyy",
      DateFormat::MonthDayYear => "mm/dd/yyyy",
    }
  }
  fn chrono_format(self) -> &'static str {
    match self {
      DateFormat::DayMonthYear => "%d/%m/%Y",
      DateFormat::MonthDayYear => "%m/%d/%Y",
    }
  }
  pub fn from_pattern(pattern: &str) -> Option<Self> {
    match pattern {
      "dd/mm/yyyy" => Some(DateFormat::DayMonthYear),
      "mm/dd/yyyy" => Some(DateFormat::MonthDayYear),
      _ => None,
    }
  }
}

/* A begin/end value: a calendar date or a time of day */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timestamp {
  Date(NaiveDate),
  Time(NaiveTime),
}
impl Timestamp {
  /* Accepts exactly "dd/dd/dddd" (read with `format`) or "dd:dd" */
  pub fn parse(text: &str, format: DateFormat) -> Option<Self> {
    if has_shape(text, "00/00/0000") {
      NaiveDate::parse_from_str(text, format.chrono_format()).ok().map(Timestamp::Date)
    }
    else if has_shape(text, "00:00") {
      NaiveTime::parse_from_str(text, "%H:%M").ok().map(Timestamp::Time)
    }
    else {
      None
    }
  }
  pub fn is_date(&self) -> bool {
    matches!(self, Timestamp::Date(_))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
  Meters,
  Kilometers,
  Miles,
}
impl Default for DistanceUnit {
  fn default() -> Self {
    DistanceUnit::Meters
  }
}
impl DistanceUnit {
  pub fn symbol(self) -> &'static str {
    match self {
      DistanceUnit::Meters => "m",
      DistanceUnit::Kilometers => "km",
      DistanceUnit::Miles => "mi",
    }
  }
  pub fn from_symbol(symbol: &str) -> Option<Self> {
    match symbol {
      "m" => Some(DistanceUnit::Meters),
      "km" => Some(DistanceUnit::Kilometers),
      "mi" => Some(DistanceUnit::Miles),
      _ => None,
    }
  }
  pub fn to_meters(self, distance: f64) -> f64 {
    match self {
      DistanceUnit::Meters => distance,
      DistanceUnit::Kilometers => distance * 1_000.0,
      DistanceUnit::Miles => distance * 1_609.344,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorArea {
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub radius: Option<f64>,
  #[serde(default)]
  pub unit: DistanceUnit,
}
impl OutdoorArea {
  /* Radius in meters */
  pub fn new(latitude: f64, longitude: f64, radius: f64) -> Self {
    OutdoorArea {
      latitude: Some(latitude),
      longitude: Some(longitude),
      radius: Some(radius),
      unit: DistanceUnit::Meters,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionFact {
  User(KeywordCondition),
  Time(TimeWindow),
  Outdoor(OutdoorArea),
  Environment(KeywordCondition),
  Device(KeywordCondition),
}
impl DimensionFact {
  pub fn dimension(&self) -> Dimension {
    match self {
      DimensionFact::User(_) => Dimension::User,
      DimensionFact::Time(_) => Dimension::Time,
      DimensionFact::Outdoor(_) => Dimension::Outdoor,
      DimensionFact::Environment(_) => Dimension::Environment,
      DimensionFact::Device(_) => Dimension::Device,
    }
  }
  /* Wrap a keyword condition in the variant for `dimension`, None for
  dimensions that are not keyword driven */
  pub fn keyword(dimension: Dimension, condition: KeywordCondition) -> Option<Self> {
    match dimension {
      Dimension::User => Some(DimensionFact::User(condition)),
      Dimension::Environment => Some(DimensionFact::Environment(condition)),
      Dimension::Device => Some(DimensionFact::Device(condition)),
      Dimension::Time | Dimension::Outdoor => None,
    }
  }
}

/* The facts of one editing session. A dimension missing from the
map is switched off, which is not the same as present with
empty fields. */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConditionFacts(BTreeMap<Dimension, DimensionFact>);

impl AccessConditionFacts {
  pub fn new() -> Self {
    AccessConditionFacts(BTreeMap::new())
  }
  /* Replaces (and returns) any fact already held for the same dimension */
  pub fn insert(&mut self, fact: DimensionFact) -> Option<DimensionFact> {
    self.0.insert(fact.dimension(), fact)
  }
  pub fn with(mut self, fact: DimensionFact) -> Self {
    self.insert(fact);
    self
  }
  pub fn remove(&mut self, dimension: Dimension) -> Option<DimensionFact> {
    self.0.remove(&dimension)
  }
  pub fn get(&self, dimension: Dimension) -> Option<&DimensionFact> {
    self.0.get(&dimension)
  }
  pub fn contains(&self, dimension: Dimension) -> bool {
    self.0.contains_key(&dimension)
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  /* In compile order */
  pub fn iter(&self) -> impl Iterator<Item=&DimensionFact> + '_ {
    self.0.values()
  }
  pub fn time(&self) -> Option<&TimeWindow> {
    match self.get(Dimension::Time) {
      Some(DimensionFact::Time(window)) => Some(window),
      _ => None,
    }
  }
  pub fn outdoor(&self) -> Option<&OutdoorArea> {
    match self.get(Dimension::Outdoor) {
      Some(DimensionFact::Outdoor(area)) => Some(area),
      _ => None,
    }
  }
  pub fn keyword_condition(&self, dimension: Dimension) -> Option<&KeywordCondition> {
    match self.get(dimension) {
      Some(DimensionFact::User(c)) | Some(DimensionFact::Environment(c)) | Some(DimensionFact::Device(c)) => Some(c),
      _ => None,
    }
  }
}

/* Utils */
/* '0' in the template stands for any ASCII digit */
fn has_shape(text: &str, template: &str) -> bool {
  text.len() == template.len()
    && text.bytes().zip(template.bytes()).all(|(c, t)|
      if t == b'0' { c.is_ascii_digit() } else { c == t }
    )
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  #[test]
  fn facts_iterate_in_compile_order() {
    let facts = AccessConditionFacts::new()
      .with(DimensionFact::Device(KeywordCondition::default()))
      .with(DimensionFact::Time(TimeWindow::default()))
      .with(DimensionFact::User(KeywordCondition::default()));
    let order: Vec<Dimension> = facts.iter().map(DimensionFact::dimension).collect();
    assert_eq!(order, vec![Dimension::User, Dimension::Time, Dimension::Device]);
  }
  #[test]
  fn absence_is_not_emptiness() {
    let mut facts = AccessConditionFacts::new();
    assert!(facts.time().is_none());
    facts.insert(DimensionFact::Time(TimeWindow::default()));
    assert_eq!(facts.time(), Some(&TimeWindow::default()));
    facts.remove(Dimension::Time);
    assert!(!facts.contains(Dimension::Time));
  }
  #[test]
  fn timestamps_follow_date_format() {
    let day_first = Timestamp::parse("31/12/2020", DateFormat::DayMonthYear);
    assert_eq!(day_first, Some(Timestamp::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())));
    assert_eq!(Timestamp::parse("31/12/2020", DateFormat::MonthDayYear), None);
    assert_eq!(
      Timestamp::parse("12/31/2020", DateFormat::MonthDayYear),
      Some(Timestamp::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()))
    );
    assert_eq!(Timestamp::parse("09:30", DateFormat::default()), Some(Timestamp::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())));
    assert_eq!(Timestamp::parse("9:30", DateFormat::default()), None);
    assert_eq!(Timestamp::parse("25:00", DateFormat::default()), None);
    assert_eq!(Timestamp::parse("1/1/2020", DateFormat::default()), None);
  }
  #[test]
  fn keyword_parse_errors_name_the_dimension() {
    let err = KeywordCondition::parse(Dimension::Device, "laptop and").unwrap_err();
    assert_eq!(err.field, "device");
  }
  #[test]
  fn unit_conversion() {
    assert_eq!(DistanceUnit::Kilometers.to_meters(1.5), 1500.0);
    assert_eq!(DistanceUnit::from_symbol("mi"), Some(DistanceUnit::Miles));
    assert_eq!(DistanceUnit::default().symbol(), "m");
  }
}
