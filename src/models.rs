use crate::error::ErrorReport;
use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anchor text recorded when a link has no visible text.
///
/// Extraction writes it and scoring reads it, so both must use this constant.
pub const NO_ANCHOR_TEXT: &str = "[No text]";

/// Returns true for empty anchors, including the [`NO_ANCHOR_TEXT`] sentinel
pub fn is_missing_anchor(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == NO_ANCHOR_TEXT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowType {
    Dofollow,
    Nofollow,
    Sponsored,
    Ugc,
}

/// A link as found in the HTML, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub url: String,
    pub anchor_text: String,
    pub is_nofollow: bool,
    pub is_sponsored: bool,
    pub is_ugc: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    pub anchor_text: String,
    pub is_internal: bool,
    pub is_nofollow: bool,
    pub is_sponsored: bool,
    pub is_ugc: bool,
    pub category: Category,
    pub confidence: f32,
}

impl Link {
    /// Single follow label; nofollow beats sponsored beats ugc.
    pub fn follow_status(&self) -> FollowType {
        if self.is_nofollow {
            FollowType::Nofollow
        } else if self.is_sponsored {
            FollowType::Sponsored
        } else if self.is_ugc {
            FollowType::Ugc
        } else {
            FollowType::Dofollow
        }
    }

    pub fn has_anchor_text(&self) -> bool {
        !is_missing_anchor(&self.anchor_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub name: Category,
    pub description: String,
    pub count: usize,
    pub percentage: f64,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub page_url: String,
    pub page_domain: String,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub dofollow_links: usize,
    pub nofollow_links: usize,
    pub sponsored_links: usize,
    pub ugc_links: usize,
    pub missing_anchor_text: usize,
    pub quality_score: u8,
    pub categories: BTreeMap<Category, CategoryBucket>,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PageReport {
    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).map_or(0, |b| b.count)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.categories.values().flat_map(|bucket| bucket.links.iter())
    }
}

/// Uniform single-page response; failures never escape as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub page_url: String,
    pub success: bool,
    pub access_blocked: bool,
    pub error: Option<ErrorReport>,
    pub report: Option<PageReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link_health: Option<LinkHealthReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Ok,
    Broken,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheck {
    pub url: String,
    pub status: LinkStatus,
    pub code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkHealthReport {
    pub checked_count: usize,
    /// Links that answered with a 4xx or 5xx status
    pub broken_count: usize,
    /// Links that could not be reached at all
    pub error_count: usize,
    pub details: Vec<LinkCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub total_links: usize,
    /// Number of crawled pages with at least one link in this category
    pub pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageEntry {
    Report(Box<PageReport>),
    Failed {
        #[serde(rename = "pageUrl")]
        page_url: String,
        error: ErrorReport,
    },
}

impl PageEntry {
    pub fn page_url(&self) -> &str {
        match self {
            PageEntry::Report(report) => &report.page_url,
            PageEntry::Failed { page_url, .. } => page_url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PageEntry::Report(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapReport {
    pub sitemap_url: String,
    pub total_pages_in_sitemap: usize,
    pub total_pages_crawled: usize,
    pub failed_pages: usize,
    pub cancelled: bool,
    pub category_summary: BTreeMap<Category, CategoryTotal>,
    pub pages: Vec<PageEntry>,
    pub timestamp: String,
}

/// Page URLs listed by a sitemap, without any analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapUrlList {
    pub sitemap_url: String,
    pub total_urls: usize,
    pub urls: Vec<String>,
    pub timestamp: String,
}

/// Several single-page analyses run in one go; each URL succeeds or fails alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_urls_analyzed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<PageAnalysis>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundDomain {
    pub domain: String,
    pub link_count: usize,
    pub dofollow_count: usize,
    /// Links marked nofollow, sponsored or ugc
    pub nofollow_count: usize,
    pub anchors: Vec<String>,
}

/// External domains a page links out to, busiest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundReport {
    pub page_url: String,
    pub page_domain: String,
    pub total_external_links: usize,
    /// Distinct domains before the list is capped
    pub unique_domains: usize,
    pub domains: Vec<OutboundDomain>,
}

// Backlink profile shapes. Providers adapt their responses into these.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Homepage,
    InnerPage,
    Resource,
    Blog,
    Comment,
    Forum,
    BlogSpam,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Homepage => "homepage",
            PageType::InnerPage => "inner_page",
            PageType::Resource => "resource",
            PageType::Blog => "blog",
            PageType::Comment => "comment",
            PageType::Forum => "forum",
            PageType::BlogSpam => "blog_spam",
        }
    }

    pub fn is_risky(&self) -> bool {
        matches!(self, PageType::Comment | PageType::Forum | PageType::BlogSpam)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkRecord {
    pub source_domain: String,
    pub domain_authority: u8,
    pub anchor_text: String,
    pub follow_type: FollowType,
    pub page_type: PageType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToxicFinding {
    pub source_domain: String,
    pub domain_authority: u8,
    pub severity: Severity,
    pub toxicity_score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Accelerating,
    Growing,
    Stable,
    Slowing,
    Declining,
}

/// Estimated backlink growth. Always simulated, never measured history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityReport {
    pub new_links_30d: u32,
    pub new_links_90d: u32,
    pub acceleration_pct: f64,
    pub trend: Trend,
    pub health_score: u8,
    pub warnings: Vec<String>,
    pub simulated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityBuckets {
    pub high: Vec<BacklinkRecord>,
    pub medium: Vec<BacklinkRecord>,
    pub low: Vec<BacklinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSource {
    pub provider: String,
    pub simulated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkProfile {
    pub domain: String,
    pub source: ProfileSource,
    pub total_backlinks: u32,
    pub referring_domains: u32,
    pub dofollow_count: u32,
    pub nofollow_count: u32,
    pub authority_buckets: AuthorityBuckets,
    pub toxic_links: Vec<ToxicFinding>,
    pub velocity: VelocityReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAssessment {
    pub summary: String,
    pub quality_score: u8,
    pub high_authority_count: usize,
    pub toxic_links_count: usize,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkReport {
    pub profile: BacklinkProfile,
    pub assessment: ProfileAssessment,
    pub timestamp: String,
}
