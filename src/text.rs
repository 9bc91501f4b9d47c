use once_cell::sync::Lazy;
use scraper::Selector;

use crate::document::{Document, Element};

/// Element kinds likely to hold user-visible text.
pub const CONTENT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "span", "article", "section", "main", "li",
    "td", "th", "caption", "label", "button",
];

static CONTENT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&CONTENT_TAGS.join(", ")).unwrap());

/// What to do when a content element sits inside another content element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NestedMatches {
    /// Every match contributes its full text, so text inside nested content
    /// elements is collected once per enclosing match.
    #[default]
    Count,
    /// Only matches with no content-element ancestor contribute.
    OutermostOnly,
}

/// Text of every content element, in document order, with script/style
/// contents removed and blank fragments dropped.
pub fn collect_fragments(document: &Document, nested: NestedMatches) -> Vec<String> {
    document
        .select(&CONTENT_SEL)
        .filter(|el| !el.is_hidden())
        .filter(|el| match nested {
            NestedMatches::Count => true,
            NestedMatches::OutermostOnly => !el.has_ancestor(is_content),
        })
        .map(|el| el.text())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

fn is_content(el: Element<'_>) -> bool {
    CONTENT_TAGS.contains(&el.kind())
}
