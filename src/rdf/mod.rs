pub mod vocab;
pub mod prefix;
pub mod builder;
pub mod parser;
pub mod query;
