use once_cell::sync::Lazy;
use scraper::Selector;
use url::Url;

use crate::document::Document;
use crate::models::ImageRecord;

static IMG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Every `<img>` in document order with its source resolved against `base`.
/// Images with a missing, blank or unresolvable source are skipped; repeats
/// are kept.
pub fn extract_images(document: &Document, base: &Url) -> Vec<ImageRecord> {
    document
        .select(&IMG_SEL)
        .filter_map(|img| {
            let src = img.attr("src").filter(|s| !s.trim().is_empty())?;
            let url = match base.join(src) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(src, error = %e, "skipping unresolvable image source");
                    return None;
                }
            };
            Some(ImageRecord {
                url: url.to_string(),
                alt_text: img.attr_or("alt", "").to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> Vec<ImageRecord> {
        extract_images(&Document::parse(html), &Url::parse(base).unwrap())
    }

    fn record(url: &str, alt: &str) -> ImageRecord {
        ImageRecord {
            url: url.to_string(),
            alt_text: alt.to_string(),
        }
    }

    #[test]
    fn resolves_relative_source_against_page() {
        let images = extract(r#"<img src="img/pic.png">"#, "https://example.com/page");
        assert_eq!(images, vec![record("https://example.com/img/pic.png", "")]);
    }

    #[test]
    fn resolves_root_relative_and_protocol_relative_sources() {
        let images = extract(
            r#"<img src="/a.png"><img src="//cdn.test/b.png"><img src="../c.png">"#,
            "https://example.com/docs/sub/page.html",
        );
        assert_eq!(
            images,
            vec![
                record("https://example.com/a.png", ""),
                record("https://cdn.test/b.png", ""),
                record("https://example.com/docs/c.png", ""),
            ]
        );
    }

    #[test]
    fn absolute_sources_pass_through() {
        let images = extract(
            r#"<img src="http://other.test/x.jpg" alt="X">"#,
            "https://example.com/",
        );
        assert_eq!(images, vec![record("http://other.test/x.jpg", "X")]);
    }

    #[test]
    fn skips_missing_blank_and_malformed_sources() {
        let images = extract(
            r#"<img alt="none"><img src="" alt="empty"><img src="   "><img src="http://[::1"><img src="ok.png">"#,
            "https://example.com/",
        );
        assert_eq!(images, vec![record("https://example.com/ok.png", "")]);
    }

    #[test]
    fn keeps_duplicates_in_document_order() {
        let images = extract(
            r#"<div><img src="a.png" alt="1"><p><img src="b.png"></p></div><img src="a.png" alt="2">"#,
            "https://x.test/",
        );
        assert_eq!(
            images,
            vec![
                record("https://x.test/a.png", "1"),
                record("https://x.test/b.png", ""),
                record("https://x.test/a.png", "2"),
            ]
        );
    }

    #[test]
    fn no_images_yields_empty_list() {
        assert!(extract("<p>text only</p>", "https://x.test/").is_empty());
    }
}
