pub mod content;
pub mod document;
pub mod parser;

pub use document::{Chapter, Document, Item};
