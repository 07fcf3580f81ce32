pub mod sequenced;
pub mod pattern;
pub mod graph;
pub mod collection;
