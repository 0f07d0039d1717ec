use std::fmt;
use std::ops::Range;

use crate::content::ContentBlock;

/// A parsed notes outline: ordered chapters, each holding numbered items.
/// The tree is immutable after parsing.
#[derive(Debug, Clone)]
pub struct Document {
    pub chapters: Vec<Chapter>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Document {
    /// All items in document order, across chapter boundaries.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.chapters.iter().flat_map(|chapter| chapter.items.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// A numbered grouping of items, opened by a `Chapter N` heading.
/// Chapter numbers are unique and strictly ascending; they need not start
/// at 1 (book notes often begin past the front matter).
#[derive(Debug, Clone)]
pub struct Chapter {
    pub number: u64,
    /// Title text after the number, whitespace-normalized. May be empty.
    pub title: String,
    /// Heading level the chapter was written at (1-6).
    pub level: u8,
    pub items: Vec<Item>,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

/// A single numbered point within a chapter.
/// Item numbers form one strictly increasing sequence across the whole
/// document, regardless of chapter boundaries.
#[derive(Debug, Clone)]
pub struct Item {
    pub number: u64,
    pub title: String,
    pub level: u8,
    /// Number of the owning chapter (back-reference, non-owning).
    pub chapter: u64,
    /// Body content, owned exclusively by this item.
    pub content: Vec<ContentBlock>,
    pub span: Range<usize>,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chapter) in self.chapters.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", chapter)?;
        }
        Ok(())
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level {
            write!(f, "#")?;
        }
        write!(f, " Chapter {}.", self.number)?;
        if !self.title.is_empty() {
            write!(f, " {}", self.title)?;
        }
        writeln!(f)?;
        for item in &self.items {
            writeln!(f)?;
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level {
            write!(f, "#")?;
        }
        write!(f, " Item {}:", self.number)?;
        if !self.title.is_empty() {
            write!(f, " {}", self.title)?;
        }
        writeln!(f)?;
        for block in &self.content {
            writeln!(f)?;
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}
