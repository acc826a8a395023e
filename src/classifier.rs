use crate::models::{Link, RawLink};
use crate::taxonomy::{Category, Taxonomy};
use url::{Position, Url};

pub const EXTERNAL_CONFIDENCE: f32 = 1.0;
pub const KEYWORD_CONFIDENCE: f32 = 0.9;
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Lowercased host with a leading `www.` removed
pub fn normalize_domain(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// Domain of a page URL as used for internal/external decisions
pub fn page_domain(page_url: &Url) -> String {
    page_url.host_str().map(normalize_domain).unwrap_or_default()
}

/// Assigns links to exactly one category.
///
/// External links are decided by domain before any keyword rule runs, so an
/// off-site `/shop` link is `external`, never `ecommerce`. Keywords match the
/// path, query and fragment of a link plus its anchor text, never the host.
pub struct LinkClassifier<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> LinkClassifier<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn classify(&self, raw: &RawLink, page_domain: &str) -> (Category, f32) {
        let parsed = Url::parse(&raw.url).ok();
        if let Some(url) = &parsed
            && is_external(url, page_domain)
        {
            return (Category::External, EXTERNAL_CONFIDENCE);
        }

        let href = match &parsed {
            Some(url) => url[Position::BeforePath..].to_lowercase(),
            None => raw.url.to_lowercase(),
        };
        let anchor = raw.anchor_text.to_lowercase();

        for rule in self.taxonomy.keyword_rules() {
            if rule
                .keywords
                .iter()
                .any(|keyword| href.contains(keyword.as_str()) || anchor.contains(keyword.as_str()))
            {
                return (rule.category, KEYWORD_CONFIDENCE);
            }
        }

        (Category::Business, FALLBACK_CONFIDENCE)
    }

    /// Classifies `raw` and produces the immutable [`Link`].
    pub fn to_link(&self, raw: RawLink, page_domain: &str) -> Link {
        let (category, confidence) = self.classify(&raw, page_domain);
        Link {
            is_internal: category != Category::External,
            url: raw.url,
            anchor_text: raw.anchor_text,
            is_nofollow: raw.is_nofollow,
            is_sponsored: raw.is_sponsored,
            is_ugc: raw.is_ugc,
            category,
            confidence,
        }
    }
}

fn is_external(url: &Url, page_domain: &str) -> bool {
    let host = url.host_str().map(normalize_domain).unwrap_or_default();
    !host.is_empty() && host != normalize_domain(page_domain)
}
