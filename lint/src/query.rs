use notes::document::{Chapter, Document, Item};

/// Find items matching a predicate, lazily, in document order.
/// The iterator borrows the document; calling `find` again on the stored
/// document restarts the scan without mutation.
pub fn find<P>(doc: &Document, predicate: P) -> Find<'_, P>
where
    P: FnMut(&Item) -> bool,
{
    Find {
        chapters: doc.chapters.iter(),
        items: Default::default(),
        predicate,
    }
}

pub struct Find<'a, P> {
    chapters: std::slice::Iter<'a, Chapter>,
    items: std::slice::Iter<'a, Item>,
    predicate: P,
}

impl<'a, P> Iterator for Find<'a, P>
where
    P: FnMut(&Item) -> bool,
{
    type Item = &'a Item;

    fn next(&mut self) -> Option<&'a Item> {
        loop {
            if let Some(item) = self.items.next() {
                if (self.predicate)(item) {
                    return Some(item);
                }
            } else if let Some(chapter) = self.chapters.next() {
                self.items = chapter.items.iter();
            } else {
                return None;
            }
        }
    }
}

/// Predicate matching items belonging to the given chapter.
pub fn by_chapter(number: u64) -> impl FnMut(&Item) -> bool {
    move |item| item.chapter == number
}

/// Predicate matching items whose title contains `needle`, case-insensitive.
pub fn title_contains(needle: &str) -> impl FnMut(&Item) -> bool {
    let needle = needle.to_lowercase();
    move |item| item.title.to_lowercase().contains(&needle)
}
