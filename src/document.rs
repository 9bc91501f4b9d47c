use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Element kinds whose content is never visible text.
pub const NON_VISIBLE_TAGS: &[&str] = &["script", "style"];

/// Parsed markup. Construction never fails: malformed input yields a
/// best-effort tree, and empty or garbage input yields a tree with no content.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        if !html.errors.is_empty() {
            tracing::trace!(errors = html.errors.len(), "recovered from malformed markup");
        }
        Self { html }
    }

    /// Elements matching `selector`, depth-first in document order.
    pub fn select<'a, 'b>(
        &'a self,
        selector: &'b Selector,
    ) -> impl Iterator<Item = Element<'a>> + 'b
    where
        'a: 'b,
    {
        self.html.select(selector).map(Element)
    }
}

/// Read-only view of one element in a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Lowercase tag name.
    pub fn kind(&self) -> &'a str {
        self.0.value().name()
    }

    /// Case-insensitive attribute lookup. The parser lowercases attribute
    /// names in HTML documents, so only the query needs folding.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        let value = self.0.value();
        value.attr(name).or_else(|| {
            value
                .attrs()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// Like [`Element::attr`] but returns `default` when the attribute is absent.
    pub fn attr_or(&self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> {
        self.0.children().filter_map(ElementRef::wrap).map(Element)
    }

    pub fn is_non_visible(&self) -> bool {
        NON_VISIBLE_TAGS.contains(&self.kind())
    }

    /// True if this element or any ancestor is a non-visible kind.
    pub fn is_hidden(&self) -> bool {
        self.is_non_visible()
            || self
                .0
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| NON_VISIBLE_TAGS.contains(&a.value().name()))
    }

    /// True if any ancestor matches `pred`.
    pub fn has_ancestor(&self, pred: impl Fn(Element<'a>) -> bool) -> bool {
        self.0
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| pred(Element(a)))
    }

    /// Descendant text concatenated in document order, skipping the contents
    /// of non-visible elements.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self.0, &mut out);
        out
    }
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&*text.text),
            Node::Element(e) if NON_VISIBLE_TAGS.contains(&e.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}
