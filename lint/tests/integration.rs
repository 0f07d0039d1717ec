use notes::content::{ColumnAlignment, ContentBlock, InlineNode};
use notes::document::{Chapter, Document, Item};
use notes::parser::{HeadingKind, MalformedDocument, Parser, classify};

fn parse(source: &str) -> Document {
    Parser::new(source.to_string(), 0).parse().expect("parse failed")
}

fn parse_err(source: &str) -> Vec<MalformedDocument> {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect_err("expected parse failure")
}

const WELL_FORMED: &str = "\
# Chapter 2. Creating and Destroying Objects

## Item 1: Consider static factory methods instead of constructors

- advantage: they have names
- advantage: not required to create a new object on each call
  - instance-controlled classes

## Item 2: Consider a builder when faced with many constructor parameters

| Pattern | Parameters |
| --- | --- |
| telescoping | rigid |
| builder | flexible |

# Chapter 3. Methods Common to All Objects

## Item 3: Obey the general contract when overriding equals
";

#[test]
fn parses_chapter_structure() {
    let doc = parse(WELL_FORMED);
    let numbers: Vec<u64> = doc.chapters.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![2, 3]);
    assert_eq!(doc.chapters[0].title, "Creating and Destroying Objects");
    assert_eq!(doc.chapters[0].items.len(), 2);
    assert_eq!(doc.chapters[1].items.len(), 1);
    assert_eq!(doc.chapters[1].items[0].chapter, 3);
}

#[test]
fn items_flow_in_document_order() {
    let doc = parse(WELL_FORMED);
    let numbers: Vec<u64> = doc.items().map(|i| i.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn bullets_nest() {
    let doc = parse(WELL_FORMED);
    let item = &doc.chapters[0].items[0];
    let ContentBlock::Bullets(bullets) = &item.content[0] else {
        panic!("expected bullets, got {:?}", item.content);
    };
    assert_eq!(bullets.len(), 2);
    assert!(bullets[0].children.is_empty());
    assert_eq!(bullets[1].children.len(), 1);
}

#[test]
fn tables_attach_to_items() {
    let doc = parse(WELL_FORMED);
    let item = &doc.chapters[0].items[1];
    let ContentBlock::Table { headers, rows, .. } = &item.content[0] else {
        panic!("expected a table, got {:?}", item.content);
    };
    assert_eq!(headers.len(), 2);
    assert_eq!(rows.len(), 2);
}

#[test]
fn paragraphs_code_and_quotes_attach_to_items() {
    let source = "\
# Chapter 1. Generics

## Item 1: Don't use raw types

Raw types exist only for migration compatibility.

```java
Set<Rank> ranks;
```

> If you use raw types, you lose the safety of generics.
";
    let doc = parse(source);
    let content = &doc.chapters[0].items[0].content;
    assert_eq!(content.len(), 3);
    assert!(matches!(content[0], ContentBlock::Paragraph(_)));
    let ContentBlock::Code { language, .. } = &content[1] else {
        panic!("expected a code block, got {:?}", content[1]);
    };
    assert_eq!(language.as_deref(), Some("java"));
    assert!(matches!(content[2], ContentBlock::Quote(_)));
}

#[test]
fn validate_clean_document() {
    let doc = parse(WELL_FORMED);
    assert!(lint::validate(&doc).is_empty());
}

#[test]
fn number_gap_yields_single_violation() {
    // Chapters 2 then 3, items 1,2,3,5: the skipped 4 is the only finding.
    let source = "\
# Chapter 2. A

## Item 1: a
## Item 2: b
## Item 3: c

# Chapter 3. B

## Item 5: e
";
    let doc = parse(source);
    let violations = lint::validate(&doc);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        lint::ViolationKind::NumberGap {
            expected: 4,
            found: 5
        }
    );
    assert_eq!(
        violations[0].to_string(),
        "item 5 out of sequence, expected 4"
    );
}

#[test]
fn sequence_must_start_at_one() {
    let source = "# Chapter 1. A\n\n## Item 2: b\n";
    let violations = lint::validate(&parse(source));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        lint::ViolationKind::SequenceStart { found: 2 }
    );
}

#[test]
fn empty_item_title_parses_with_violation() {
    let source = "# Chapter 1. A\n\n## Item 1:\n";
    let doc = parse(source);
    assert_eq!(doc.chapters[0].items[0].title, "");
    let violations = lint::validate(&doc);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].to_string().contains("missing a title"));
}

#[test]
fn empty_chapter_title_is_a_violation() {
    let source = "# Chapter 1.\n\n## Item 1: a\n";
    let violations = lint::validate(&parse(source));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        lint::ViolationKind::MissingChapterTitle { chapter: 1 }
    );
}

#[test]
fn duplicate_item_number_fails_parse() {
    let source = "# Chapter 1. A\n\n## Item 1: a\n## Item 1: b\n";
    let errors = parse_err(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].expected, Some(2));
    assert_eq!(errors[0].actual, Some(1));
    assert_eq!(
        errors[0].to_string(),
        "item number out of sequence (expected 2, found 1)"
    );
}

#[test]
fn decreasing_item_number_fails_parse() {
    let source = "\
# Chapter 1. A

## Item 5: a

# Chapter 2. B

## Item 3: b
";
    let errors = parse_err(source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("item number out of sequence"));
}

#[test]
fn decreasing_chapter_number_fails_parse() {
    let source = "\
# Chapter 3. A

## Item 1: a

# Chapter 2. B

## Item 2: b
";
    let errors = parse_err(source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("chapter number out of sequence"));
}

#[test]
fn item_outside_chapter_fails_parse() {
    let errors = parse_err("## Item 1: orphaned\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("outside any chapter"));
}

#[test]
fn chapter_without_items_fails_parse() {
    let source = "# Chapter 1. Empty\n\n# Chapter 2. B\n\n## Item 1: a\n";
    let errors = parse_err(source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("chapter 1 contains no items"));
}

#[test]
fn gap_in_numbering_is_not_fatal() {
    let source = "# Chapter 1. A\n\n## Item 1: a\n## Item 3: c\n";
    let doc = parse(source);
    assert_eq!(doc.items().count(), 2);
}

#[test]
fn empty_source_is_an_empty_document() {
    let doc = parse("");
    assert!(doc.is_empty());
    assert!(lint::validate(&doc).is_empty());
}

#[test]
fn unnumbered_headings_carry_no_structure() {
    let source = "\
# Effective Java

# Chapter 1. A

intro text before the first item

## Item 1: a

body text

## Appendix
";
    let doc = parse(source);
    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(doc.chapters[0].items.len(), 1);
    // the intro paragraph belongs to no item
    assert_eq!(doc.chapters[0].items[0].content.len(), 1);
}

#[test]
fn display_round_trips_numbers_and_titles() {
    let doc = parse(WELL_FORMED);
    let reparsed = parse(&doc.to_string());

    let chapters = |d: &Document| -> Vec<(u64, String)> {
        d.chapters.iter().map(|c| (c.number, c.title.clone())).collect()
    };
    let items = |d: &Document| -> Vec<(u64, String, u64)> {
        d.items()
            .map(|i| (i.number, i.title.clone(), i.chapter))
            .collect()
    };

    assert_eq!(chapters(&doc), chapters(&reparsed));
    assert_eq!(items(&doc), items(&reparsed));
}

#[test]
fn find_is_lazy_ordered_and_restartable() {
    let doc = parse(WELL_FORMED);

    let all: Vec<u64> = lint::find(&doc, |_| true).map(|i| i.number).collect();
    assert_eq!(all, vec![1, 2, 3]);

    // restart from the same stored document, no mutation
    let again: Vec<u64> = lint::find(&doc, |_| true).map(|i| i.number).collect();
    assert_eq!(all, again);
}

#[test]
fn find_with_predicates() {
    let doc = parse(WELL_FORMED);

    let in_chapter: Vec<u64> = lint::find(&doc, lint::query::by_chapter(3))
        .map(|i| i.number)
        .collect();
    assert_eq!(in_chapter, vec![3]);

    let titled: Vec<u64> = lint::find(&doc, lint::query::title_contains("BUILDER"))
        .map(|i| i.number)
        .collect();
    assert_eq!(titled, vec![2]);

    assert_eq!(lint::find(&doc, |i| i.number > 10).count(), 0);
}

fn cell(text: &str) -> Vec<InlineNode> {
    vec![InlineNode::Text(text.to_string())]
}

fn document_with_table(rows: Vec<Vec<Vec<InlineNode>>>) -> Document {
    Document {
        chapters: vec![Chapter {
            number: 1,
            title: "Tables".to_string(),
            level: 1,
            items: vec![Item {
                number: 1,
                title: "Compare approaches".to_string(),
                level: 2,
                chapter: 1,
                content: vec![ContentBlock::Table {
                    alignments: vec![ColumnAlignment::None; 2],
                    headers: vec![cell("left"), cell("right")],
                    rows,
                }],
                span: 0..0,
            }],
            span: 0..0,
        }],
        source_id: 0,
    }
}

#[test]
fn ragged_table_rows_are_violations() {
    let doc = document_with_table(vec![
        vec![cell("a"), cell("b")],
        vec![cell("only one")],
    ]);
    let violations = lint::validate(&doc);
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        lint::ViolationKind::RaggedTable {
            item: 1,
            row: 1,
            expected: 2,
            found: 1
        }
    );
}

fn document_with_items(numbers: &[u64]) -> Document {
    Document {
        chapters: vec![Chapter {
            number: 1,
            title: "A".to_string(),
            level: 1,
            items: numbers
                .iter()
                .map(|&number| Item {
                    number,
                    title: format!("t{}", number),
                    level: 2,
                    chapter: 1,
                    content: Vec::new(),
                    span: 0..0,
                })
                .collect(),
            span: 0..0,
        }],
        source_id: 0,
    }
}

#[test]
fn decreasing_item_numbers_are_flagged() {
    // validate must stand alone even for hand-built trees the parser
    // would have rejected
    let doc = document_with_items(&[1, 3, 2]);
    let violations = lint::validate(&doc);
    assert!(violations.iter().any(|v| v.kind
        == lint::ViolationKind::NumberOutOfOrder {
            expected: 4,
            found: 2
        }));
    assert!(
        violations
            .iter()
            .any(|v| v.to_string() == "item 2 out of order, expected 4")
    );
}

#[test]
fn consistent_table_is_clean() {
    let doc = document_with_table(vec![vec![cell("a"), cell("b")]]);
    assert!(lint::validate(&doc).is_empty());
}

#[test]
fn report_renders_one_line_per_violation() {
    let source = "# Chapter 1.\n\n## Item 2:\n";
    let violations = lint::validate(&parse(source));
    let lines = lint::report(&violations);
    assert_eq!(lines.len(), violations.len());
    assert!(lines.iter().any(|l| l.contains("chapter 1 is missing a title")));
    assert!(lines.iter().any(|l| l.contains("item 2 is missing a title")));
    assert!(lines.iter().any(|l| l.contains("starts at 2")));
}

#[test]
fn heading_classification() {
    assert_eq!(
        classify("Chapter 2. Creating and Destroying Objects"),
        HeadingKind::Chapter {
            number: 2,
            title: "Creating and Destroying Objects".to_string()
        }
    );
    assert_eq!(
        classify("Item 10: Obey the general contract"),
        HeadingKind::Item {
            number: 10,
            title: "Obey the general contract".to_string()
        }
    );
    assert_eq!(
        classify("Item 3:"),
        HeadingKind::Item {
            number: 3,
            title: String::new()
        }
    );
    assert_eq!(classify("Effective Java"), HeadingKind::Other);
    assert_eq!(classify("Chapter one"), HeadingKind::Other);
    assert_eq!(classify("Item 3rd place"), HeadingKind::Other);
}

#[test]
fn strikethrough_survives_in_bullets() {
    let doc = parse("# Chapter 1. A\n\n## Item 1: a\n\n- ~~outdated~~ advice\n");
    let ContentBlock::Bullets(bullets) = &doc.chapters[0].items[0].content[0] else {
        panic!("expected bullets");
    };
    assert!(
        bullets[0]
            .text
            .iter()
            .any(|n| matches!(n, InlineNode::Strikethrough(_)))
    );
}

#[test]
fn parse_errors_convert_to_error_diagnostics() {
    let errors = Parser::new("## Item 1: orphaned\n".to_string(), 7)
        .parse()
        .expect_err("expected parse failure");
    let diagnostic = errors[0].to_diagnostic();
    assert_eq!(
        diagnostic.severity,
        codespan_reporting::diagnostic::Severity::Error
    );
    assert_eq!(diagnostic.labels[0].file_id, 7);
}

#[test]
fn parses_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, WELL_FORMED).unwrap();

    let source = std::fs::read_to_string(&path).unwrap();
    let doc = Parser::new(source, 0).parse().expect("parse failed");
    assert_eq!(doc.chapters.len(), 2);
    assert!(lint::validate(&doc).is_empty());
}
