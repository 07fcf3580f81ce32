/* Well-known IRIs used by the datastore and the access condition compiler */

pub mod rdf {
  pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
  pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
  pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
  pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
  pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

pub mod xsd {
  pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
  pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
  pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
  pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
  pub const TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
}

/* Access condition vocabulary */
pub mod ac {
  pub const NAMESPACE: &str = "urn:policy:context#";

  pub const ACCESS_CONDITION: &str = "urn:policy:context#AccessCondition";
  pub const USER_CONDITION: &str = "urn:policy:context#UserCondition";
  pub const TIME_CONDITION: &str = "urn:policy:context#TimeCondition";
  pub const OUTDOOR_CONDITION: &str = "urn:policy:context#OutdoorCondition";
  pub const ENVIRONMENT_CONDITION: &str = "urn:policy:context#EnvironmentCondition";
  pub const DEVICE_CONDITION: &str = "urn:policy:context#DeviceCondition";

  /* Links from the condition resource to each dimension block */
  pub const USER: &str = "urn:policy:context#user";
  pub const TIME: &str = "urn:policy:context#time";
  pub const OUTDOOR: &str = "urn:policy:context#outdoor";
  pub const ENVIRONMENT: &str = "urn:policy:context#environment";
  pub const DEVICE: &str = "urn:policy:context#device";

  pub const CONDITION: &str = "urn:policy:context#condition";
  pub const ASK_QUERY: &str = "urn:policy:context#askQuery";

  pub const EXPRESSION: &str = "urn:policy:context#expression";
  pub const ALL_OF: &str = "urn:policy:context#allOf";
  pub const ANY_OF: &str = "urn:policy:context#anyOf";
  pub const NOT: &str = "urn:policy:context#not";

  pub const BEGIN: &str = "urn:policy:context#begin";
  pub const END: &str = "urn:policy:context#end";

  pub const LATITUDE: &str = "urn:policy:context#latitude";
  pub const LONGITUDE: &str = "urn:policy:context#longitude";
  pub const RADIUS: &str = "urn:policy:context#radius";
  pub const UNIT: &str = "urn:policy:context#unit";

  /* Context properties the ASK expressions test against */
  pub const NOW: &str = "urn:policy:context#now";
  pub const TIME_OF_DAY: &str = "urn:policy:context#timeOfDay";
  pub const POSITION_LAT: &str = "urn:policy:context#positionLatitude";
  pub const POSITION_LONG: &str = "urn:policy:context#positionLongitude";
  pub const DISTANCE: &str = "urn:policy:context#distance";
}
