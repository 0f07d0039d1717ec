use notes::content::ContentBlock;
use notes::document::{Document, Item};

use crate::violation::{Violation, ViolationKind};

/// Validate a parsed document. Never fails; returns findings sorted into
/// document order.
pub fn validate(doc: &Document) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_numbering(doc, &mut violations);
    check_titles(doc, &mut violations);
    check_tables(doc, &mut violations);
    violations.sort_by_key(|v| v.span.start);
    violations
}

/// Item numbers must run 1, 2, 3, ... across the whole document. Parsed
/// documents cannot contain decreasing numbers, but the tree is public and
/// may be hand-built, so this check stands on its own.
fn check_numbering(doc: &Document, out: &mut Vec<Violation>) {
    let mut expected: u64 = 1;
    let mut first = true;

    for item in doc.items() {
        if first && item.number != 1 {
            out.push(item_violation(
                doc,
                item,
                ViolationKind::SequenceStart { found: item.number },
            ));
        } else if !first && item.number > expected {
            out.push(item_violation(
                doc,
                item,
                ViolationKind::NumberGap {
                    expected,
                    found: item.number,
                },
            ));
        } else if !first && item.number < expected {
            out.push(item_violation(
                doc,
                item,
                ViolationKind::NumberOutOfOrder {
                    expected,
                    found: item.number,
                },
            ));
        }
        expected = item.number + 1;
        first = false;
    }
}

fn check_titles(doc: &Document, out: &mut Vec<Violation>) {
    for chapter in &doc.chapters {
        if chapter.title.is_empty() {
            out.push(Violation {
                kind: ViolationKind::MissingChapterTitle {
                    chapter: chapter.number,
                },
                span: chapter.span.clone(),
                file_id: doc.source_id,
            });
        }
        for item in &chapter.items {
            if item.title.is_empty() {
                out.push(item_violation(
                    doc,
                    item,
                    ViolationKind::MissingItemTitle { item: item.number },
                ));
            }
        }
    }
}

fn check_tables(doc: &Document, out: &mut Vec<Violation>) {
    for item in doc.items() {
        for block in &item.content {
            check_block_tables(doc, item, block, out);
        }
    }
}

fn check_block_tables(doc: &Document, item: &Item, block: &ContentBlock, out: &mut Vec<Violation>) {
    match block {
        ContentBlock::Table { headers, rows, .. } => {
            let expected = headers.len();
            for (row, cells) in rows.iter().enumerate() {
                if cells.len() != expected {
                    out.push(item_violation(
                        doc,
                        item,
                        ViolationKind::RaggedTable {
                            item: item.number,
                            row,
                            expected,
                            found: cells.len(),
                        },
                    ));
                }
            }
        }
        ContentBlock::Quote(blocks) => {
            for inner in blocks {
                check_block_tables(doc, item, inner, out);
            }
        }
        _ => {}
    }
}

fn item_violation(doc: &Document, item: &Item, kind: ViolationKind) -> Violation {
    Violation {
        kind,
        span: item.span.clone(),
        file_id: doc.source_id,
    }
}
