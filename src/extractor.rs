use crate::models::{NO_ANCHOR_TEXT, RawLink};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));

/// Schemes that never point at a crawlable document
const SKIPPED_PREFIXES: [&str; 2] = ["javascript:", "mailto:"];

/// Extracts every anchor with an `href` from `html`, resolved against `page_url`.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<RawLink> {
    let document = Html::parse_document(html);
    extract_from_document(&document, page_url)
}

pub fn extract_from_document(document: &Html, page_url: &Url) -> Vec<RawLink> {
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        let lowered = href.to_ascii_lowercase();
        if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            continue;
        }

        let Ok(absolute_url) = page_url.join(href) else {
            tracing::debug!(href = %href, "Skipping unresolvable href");
            continue;
        };

        let (is_nofollow, is_sponsored, is_ugc) = read_rel(&element);

        links.push(RawLink {
            url: absolute_url.to_string(),
            anchor_text: anchor_text(&element),
            is_nofollow,
            is_sponsored,
            is_ugc,
        });
    }

    links
}

fn anchor_text(element: &ElementRef<'_>) -> String {
    let text = element
        .text()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        NO_ANCHOR_TEXT.to_string()
    } else {
        text
    }
}

fn read_rel(element: &ElementRef<'_>) -> (bool, bool, bool) {
    let Some(rel) = element.value().attr("rel") else {
        return (false, false, false);
    };

    let mut nofollow = false;
    let mut sponsored = false;
    let mut ugc = false;
    for token in rel.split_ascii_whitespace() {
        match token.to_ascii_lowercase().as_str() {
            "nofollow" => nofollow = true,
            "sponsored" => sponsored = true,
            "ugc" => ugc = true,
            _ => {}
        }
    }
    (nofollow, sponsored, ugc)
}
