use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::content::{Bullet, ColumnAlignment, ContentBlock, InlineNode};
use crate::document::{Chapter, Item};
use crate::parser::error::MalformedDocument;
use crate::parser::heading::{self, HeadingKind};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into an ordered list of chapters.
pub fn parse_chapters(
    source: &str,
    file_id: usize,
) -> Result<Vec<Chapter>, Vec<MalformedDocument>> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(file_id);
    state.process_events(&events);
    state.finalize(source.len())
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState {
    file_id: usize,
    chapters: Vec<Chapter>,
    current_chapter: Option<ChapterBuilder>,
    current_item: Option<ItemBuilder>,
    /// Last item number seen anywhere in the document. Item numbering is a
    /// single sequence spanning chapter boundaries.
    last_item_number: Option<u64>,
    errors: Vec<MalformedDocument>,
}

struct ChapterBuilder {
    number: u64,
    title: String,
    level: u8,
    items: Vec<Item>,
    span_start: usize,
}

struct ItemBuilder {
    number: u64,
    title: String,
    level: u8,
    chapter: u64,
    content: Vec<ContentBlock>,
    span_start: usize,
}

impl ChapterBuilder {
    fn into_chapter(self, span_end: usize) -> Chapter {
        Chapter {
            number: self.number,
            title: self.title,
            level: self.level,
            items: self.items,
            span: self.span_start..span_end,
        }
    }
}

impl ItemBuilder {
    fn into_item(self, span_end: usize) -> Item {
        Item {
            number: self.number,
            title: self.title,
            level: self.level,
            chapter: self.chapter,
            content: self.content,
            span: self.span_start..span_end,
        }
    }
}

impl ParseState {
    fn new(file_id: usize) -> Self {
        ParseState {
            file_id,
            chapters: Vec::new(),
            current_chapter: None,
            current_item: None,
            last_item_number: None,
            errors: Vec::new(),
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let heading_level = heading_level_to_u8(level);

                    i += 1;
                    let text = collect_heading_text(events, &mut i);
                    let text = normalize_heading_text(&text);

                    match heading::classify(&text) {
                        HeadingKind::Chapter { number, title } => {
                            self.open_chapter(number, title, heading_level, range.clone());
                        }
                        HeadingKind::Item { number, title } => {
                            self.open_item(number, title, heading_level, range.clone());
                        }
                        // Book titles, forewords, appendices: no structure.
                        HeadingKind::Other => {}
                    }
                }

                Event::Start(Tag::List(_)) => {
                    i += 1;
                    let bullets = collect_bullets(events, &mut i);
                    self.push_content(ContentBlock::Bullets(bullets));
                }

                Event::Start(Tag::Paragraph) => {
                    i += 1;
                    let inlines =
                        collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Paragraph));
                    self.push_content(ContentBlock::Paragraph(inlines));
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        pulldown_cmark::CodeBlockKind::Fenced(lang) => {
                            let lang = lang.to_string();
                            if lang.is_empty() { None } else { Some(lang) }
                        }
                        pulldown_cmark::CodeBlockKind::Indented => None,
                    };
                    i += 1;
                    let content =
                        collect_text_until(events, &mut i, |e| matches!(e, TagEnd::CodeBlock));
                    self.push_content(ContentBlock::Code { language, content });
                }

                Event::Start(Tag::Table(alignments)) => {
                    let aligns: Vec<ColumnAlignment> = alignments
                        .iter()
                        .map(|a| match a {
                            pulldown_cmark::Alignment::None => ColumnAlignment::None,
                            pulldown_cmark::Alignment::Left => ColumnAlignment::Left,
                            pulldown_cmark::Alignment::Center => ColumnAlignment::Center,
                            pulldown_cmark::Alignment::Right => ColumnAlignment::Right,
                        })
                        .collect();
                    i += 1;
                    let (headers, rows) = collect_table(events, &mut i);
                    self.push_content(ContentBlock::Table {
                        alignments: aligns,
                        headers,
                        rows,
                    });
                }

                Event::Start(Tag::BlockQuote(_)) => {
                    i += 1;
                    let inner = collect_quote(events, &mut i);
                    self.push_content(ContentBlock::Quote(inner));
                }

                _ => {
                    i += 1;
                }
            }
        }
    }

    /// Attach body content to the current item. Content outside any item
    /// (document preamble, chapter intro text) carries no structure.
    fn push_content(&mut self, block: ContentBlock) {
        if let Some(item) = self.current_item.as_mut() {
            item.content.push(block);
        }
    }

    fn open_chapter(&mut self, number: u64, title: String, level: u8, span: Range<usize>) {
        self.close_item(span.start);
        self.close_chapter(span.start);

        if let Some(prev) = self.chapters.last() {
            if number <= prev.number {
                self.errors.push(MalformedDocument::numbering(
                    "chapter number out of sequence",
                    span.clone(),
                    self.file_id,
                    prev.number + 1,
                    number,
                ));
            }
        }

        self.current_chapter = Some(ChapterBuilder {
            number,
            title,
            level,
            items: Vec::new(),
            span_start: span.start,
        });
    }

    fn open_item(&mut self, number: u64, title: String, level: u8, span: Range<usize>) {
        self.close_item(span.start);

        let Some(chapter) = self.current_chapter.as_ref() else {
            self.errors.push(
                MalformedDocument::new("item heading outside any chapter", span, self.file_id)
                    .with_note("every item must appear under a chapter heading"),
            );
            return;
        };

        if let Some(last) = self.last_item_number {
            if number <= last {
                self.errors.push(MalformedDocument::numbering(
                    "item number out of sequence",
                    span.clone(),
                    self.file_id,
                    last + 1,
                    number,
                ));
            }
        }
        self.last_item_number = Some(number);

        self.current_item = Some(ItemBuilder {
            number,
            title,
            level,
            chapter: chapter.number,
            content: Vec::new(),
            span_start: span.start,
        });
    }

    fn close_item(&mut self, span_end: usize) {
        if let Some(builder) = self.current_item.take() {
            if let Some(chapter) = self.current_chapter.as_mut() {
                chapter.items.push(builder.into_item(span_end));
            }
        }
    }

    fn close_chapter(&mut self, span_end: usize) {
        if let Some(builder) = self.current_chapter.take() {
            if builder.items.is_empty() {
                self.errors.push(MalformedDocument::new(
                    format!("chapter {} contains no items", builder.number),
                    builder.span_start..span_end,
                    self.file_id,
                ));
            }
            self.chapters.push(builder.into_chapter(span_end));
        }
    }

    fn finalize(mut self, source_len: usize) -> Result<Vec<Chapter>, Vec<MalformedDocument>> {
        self.close_item(source_len);
        self.close_chapter(source_len);

        if self.errors.is_empty() {
            Ok(self.chapters)
        } else {
            Err(self.errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Event collection
// ---------------------------------------------------------------------------

/// Collect the entries of a (possibly nested) list until the matching end.
/// Ordered and unordered lists both become bullets; the marker style is
/// presentation, not structure.
fn collect_bullets(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Vec<Bullet> {
    let mut bullets = Vec::new();

    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::List(_)) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Item) => {
                *i += 1;
                bullets.push(collect_bullet(events, i));
            }
            _ => {
                *i += 1;
            }
        }
    }

    bullets
}

/// Collect one list entry: its inline text plus any nested sub-list.
fn collect_bullet(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Bullet {
    let mut text = Vec::new();
    let mut children = Vec::new();

    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::Item) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::List(_)) => {
                *i += 1;
                children.append(&mut collect_bullets(events, i));
            }
            // Loose list items wrap their text in paragraphs.
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let mut inlines =
                    collect_inlines(events, i, &|e| matches!(e, TagEnd::Paragraph));
                if !text.is_empty() {
                    text.push(InlineNode::SoftBreak);
                }
                text.append(&mut inlines);
            }
            Event::Text(s) => {
                text.push(InlineNode::Text(s.to_string()));
                *i += 1;
            }
            Event::Code(s) => {
                text.push(InlineNode::CodeSpan(s.to_string()));
                *i += 1;
            }
            Event::SoftBreak => {
                text.push(InlineNode::SoftBreak);
                *i += 1;
            }
            Event::HardBreak => {
                text.push(InlineNode::HardBreak);
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                text.push(InlineNode::Strong(collect_inlines(events, i, &|e| {
                    matches!(e, TagEnd::Strong)
                })));
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                text.push(InlineNode::Emphasis(collect_inlines(events, i, &|e| {
                    matches!(e, TagEnd::Emphasis)
                })));
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                text.push(InlineNode::Strikethrough(collect_inlines(events, i, &|e| {
                    matches!(e, TagEnd::Strikethrough)
                })));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                text.push(InlineNode::Link {
                    dest,
                    title,
                    content,
                });
            }
            _ => {
                *i += 1;
            }
        }
    }

    Bullet { text, children }
}

/// Collect inline nodes until a matching End tag.
fn collect_inlines(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: &dyn Fn(&TagEnd) -> bool,
) -> Vec<InlineNode> {
    let mut inlines = Vec::new();

    while *i < events.len() {
        match &events[*i].0 {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                inlines.push(InlineNode::Text(s.to_string()));
                *i += 1;
            }
            Event::Code(s) => {
                inlines.push(InlineNode::CodeSpan(s.to_string()));
                *i += 1;
            }
            Event::SoftBreak => {
                inlines.push(InlineNode::SoftBreak);
                *i += 1;
            }
            Event::HardBreak => {
                inlines.push(InlineNode::HardBreak);
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                inlines.push(InlineNode::Strong(children));
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                inlines.push(InlineNode::Emphasis(children));
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                let children =
                    collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                inlines.push(InlineNode::Strikethrough(children));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                inlines.push(InlineNode::Link {
                    dest,
                    title,
                    content,
                });
            }
            _ => {
                *i += 1;
            }
        }
    }

    inlines
}

/// Collect table headers and rows.
fn collect_table(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
) -> (Vec<Vec<InlineNode>>, Vec<Vec<Vec<InlineNode>>>) {
    let mut headers: Vec<Vec<InlineNode>> = Vec::new();
    let mut rows: Vec<Vec<Vec<InlineNode>>> = Vec::new();
    let mut in_head = false;
    let mut current_row: Vec<Vec<InlineNode>> = Vec::new();

    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::Table) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::TableHead) => {
                in_head = true;
                *i += 1;
            }
            Event::End(TagEnd::TableHead) => {
                in_head = false;
                headers = std::mem::take(&mut current_row);
                *i += 1;
            }
            Event::Start(Tag::TableRow) => {
                current_row = Vec::new();
                *i += 1;
            }
            Event::End(TagEnd::TableRow) => {
                if !in_head {
                    rows.push(std::mem::take(&mut current_row));
                }
                *i += 1;
            }
            Event::Start(Tag::TableCell) => {
                *i += 1;
                let cell = collect_inlines(events, i, &|e| matches!(e, TagEnd::TableCell));
                current_row.push(cell);
            }
            _ => {
                *i += 1;
            }
        }
    }

    (headers, rows)
}

/// Collect a blockquote's content as nested content blocks.
fn collect_quote(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::BlockQuote(_)) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let inlines = collect_inlines(events, i, &|e| matches!(e, TagEnd::Paragraph));
                blocks.push(ContentBlock::Paragraph(inlines));
            }
            Event::Start(Tag::List(_)) => {
                *i += 1;
                blocks.push(ContentBlock::Bullets(collect_bullets(events, i)));
            }
            _ => {
                *i += 1;
            }
        }
    }

    blocks
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect heading text (Text and Code events until End(Heading)).
fn collect_heading_text(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> String {
    let mut text = String::new();
    while *i < events.len() {
        match &events[*i].0 {
            Event::End(TagEnd::Heading(_)) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            Event::Code(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// Strip leading/trailing whitespace, collapse interior whitespace.
fn normalize_heading_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect all text content until a matching End tag.
fn collect_text_until(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        match &events[*i].0 {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}
