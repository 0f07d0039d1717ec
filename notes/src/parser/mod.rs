pub mod error;
mod heading;
mod structural;

pub use error::MalformedDocument;
pub use heading::{HeadingKind, classify};

use crate::document::Document;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source outline into a complete Document.
    pub fn parse(&self) -> Result<Document, Vec<MalformedDocument>> {
        let chapters = structural::parse_chapters(&self.source, self.file_id)?;
        Ok(Document {
            chapters,
            source_id: self.file_id,
        })
    }
}
