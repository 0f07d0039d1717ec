use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A fatal structural fault found while parsing: a number out of sequence,
/// an item outside any chapter, or a chapter with no items.
#[derive(Debug, Clone)]
pub struct MalformedDocument {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    /// For numbering faults: the number the sequence required next.
    pub expected: Option<u64>,
    /// For numbering faults: the number actually found.
    pub actual: Option<u64>,
    pub notes: Vec<String>,
}

impl MalformedDocument {
    pub fn new(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        MalformedDocument {
            message: message.into(),
            span,
            file_id,
            expected: None,
            actual: None,
            notes: Vec::new(),
        }
    }

    pub fn numbering(
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
        expected: u64,
        actual: u64,
    ) -> Self {
        let mut err = MalformedDocument::new(message, span, file_id);
        err.expected = Some(expected);
        err.actual = Some(actual);
        err
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let mut notes = self.notes.clone();
        if let (Some(expected), Some(actual)) = (self.expected, self.actual) {
            notes.push(format!("expected {}, found {}", expected, actual));
        }
        Diagnostic::new(Severity::Error)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(notes)
    }
}

impl fmt::Display for MalformedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(expected), Some(actual)) = (self.expected, self.actual) {
            write!(f, " (expected {}, found {})", expected, actual)?;
        }
        Ok(())
    }
}

impl std::error::Error for MalformedDocument {}
