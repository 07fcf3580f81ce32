pub mod expr;
pub mod facts;
pub mod vocabulary;
pub mod compiler;
