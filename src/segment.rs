//! Page segmentation heuristics for formats without page boundaries.
//!
//! Plain text and DOCX carry no page-break information that survives
//! extraction, so logical pages are approximated:
//!
//! - [`split_text_pages`] tries, in order: form feeds, triple newlines,
//!   fixed 3000-character windows, and finally the whole text.
//! - [`group_paragraphs`] treats blank paragraphs as page separators.
//!
//! The tie-break order is part of the output contract; the same input must
//! always produce the same number of pages.

/// Size of a fixed window, in characters, when no separator is found.
pub const PAGE_WINDOW_CHARS: usize = 3000;

const FORM_FEED: char = '\u{000C}';
const TRIPLE_NEWLINE: &str = "\n\n\n";

/// Split untagged text into logical pages.
///
/// Returned chunks borrow from `content` and are not trimmed. Blank chunks
/// are dropped when splitting on separators, but kept for fixed windows.
pub fn split_text_pages(content: &str) -> Vec<&str> {
    if let Some(pages) = split_on_separator(content.split(FORM_FEED)) {
        return pages;
    }

    if let Some(pages) = split_on_separator(content.split(TRIPLE_NEWLINE)) {
        return pages;
    }

    if content.chars().count() > PAGE_WINDOW_CHARS {
        return fixed_windows(content, PAGE_WINDOW_CHARS);
    }

    if content.trim().is_empty() {
        vec![""]
    } else {
        vec![content]
    }
}

/// Keep the non-blank pieces if there are at least two of them.
fn split_on_separator<'a>(pieces: impl Iterator<Item = &'a str>) -> Option<Vec<&'a str>> {
    let pages: Vec<&str> = pieces.filter(|p| !p.trim().is_empty()).collect();
    (pages.len() > 1).then_some(pages)
}

/// Cut `content` into consecutive windows of `size` characters.
///
/// Windows end on character boundaries but ignore word boundaries.
fn fixed_windows(content: &str, size: usize) -> Vec<&str> {
    let mut windows = Vec::new();
    let mut start = 0;
    let mut chars_in_window = 0;

    for (idx, _) in content.char_indices() {
        if chars_in_window == size {
            windows.push(&content[start..idx]);
            start = idx;
            chars_in_window = 0;
        }
        chars_in_window += 1;
    }

    if start < content.len() {
        windows.push(&content[start..]);
    }

    windows
}

/// Group document paragraphs into logical pages.
///
/// Non-blank paragraphs (trimmed) accumulate into the current page, joined
/// with newlines; a blank paragraph closes a non-empty page. A document
/// without paragraphs yields a single empty page.
pub fn group_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for paragraph in paragraphs {
        let text = paragraph.as_ref().trim();
        if !text.is_empty() {
            current.push(text);
        } else if !current.is_empty() {
            pages.push(current.join("\n"));
            current.clear();
        }
    }

    if !current.is_empty() {
        pages.push(current.join("\n"));
    }

    if pages.is_empty() && !paragraphs.is_empty() {
        let all_text = paragraphs
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        pages.push(all_text);
    }

    if pages.is_empty() {
        pages.push(String::new());
    }

    pages
}
