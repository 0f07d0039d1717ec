/// Classification of a heading's normalized text.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadingKind {
    /// `Chapter <n>`, optionally followed by `.` or `:` and a title.
    Chapter { number: u64, title: String },
    /// `Item <n>`, optionally followed by `.` or `:` and a title.
    Item { number: u64, title: String },
    /// Anything else: book title, preamble, appendix headings.
    Other,
}

/// Classify heading text. Expects whitespace-normalized input.
pub fn classify(text: &str) -> HeadingKind {
    if let Some(rest) = text.strip_prefix("Chapter ") {
        if let Some((number, title)) = split_numbered(rest) {
            return HeadingKind::Chapter { number, title };
        }
    }
    if let Some(rest) = text.strip_prefix("Item ") {
        if let Some((number, title)) = split_numbered(rest) {
            return HeadingKind::Item { number, title };
        }
    }
    HeadingKind::Other
}

/// Split `"2. Creating and Destroying Objects"` into the number and title.
/// The separator after the number may be `.` or `:` (or just a space), and
/// the title may be empty; `Item 3:` parses and validation flags the missing
/// title.
fn split_numbered(rest: &str) -> Option<(u64, String)> {
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let number: u64 = rest[..digits_end].parse().ok()?;
    let mut tail = &rest[digits_end..];
    if let Some(stripped) = tail.strip_prefix('.').or_else(|| tail.strip_prefix(':')) {
        tail = stripped;
    } else if !tail.is_empty() && !tail.starts_with(' ') {
        // "Item 3rd" is prose, not an item heading
        return None;
    }
    Some((number, tail.trim().to_string()))
}
