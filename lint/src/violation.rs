use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A non-fatal finding produced by validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub span: Range<usize>,
    pub file_id: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// The first item in the document is not numbered 1.
    SequenceStart { found: u64 },
    /// An item number skips ahead of the expected next number.
    NumberGap { expected: u64, found: u64 },
    /// An item number falls behind the expected next number.
    NumberOutOfOrder { expected: u64, found: u64 },
    /// A chapter heading with no title text after the number.
    MissingChapterTitle { chapter: u64 },
    /// An item heading with no title text after the number.
    MissingItemTitle { item: u64 },
    /// A table row whose cell count differs from its header row.
    RaggedTable {
        item: u64,
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::SequenceStart { found } => {
                write!(f, "item numbering starts at {}, expected 1", found)
            }
            ViolationKind::NumberGap { expected, found } => {
                write!(f, "item {} out of sequence, expected {}", found, expected)
            }
            ViolationKind::NumberOutOfOrder { expected, found } => {
                write!(f, "item {} out of order, expected {}", found, expected)
            }
            ViolationKind::MissingChapterTitle { chapter } => {
                write!(f, "chapter {} is missing a title", chapter)
            }
            ViolationKind::MissingItemTitle { item } => {
                write!(f, "item {} is missing a title", item)
            }
            ViolationKind::RaggedTable {
                item,
                row,
                expected,
                found,
            } => write!(
                f,
                "table in item {}: row {} has {} columns, header has {}",
                item,
                row + 1,
                found,
                expected
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl Violation {
    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Warning)
            .with_message(self.to_string())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
    }
}

/// Render violations as human-readable report lines.
pub fn report(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(|v| v.to_string()).collect()
}
