use crate::analyzer::LinkAnalyzer;
use crate::error::LinkError;
use crate::models::{CategoryTotal, PageEntry, SitemapReport, SitemapUrlList};
use futures::future;
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use indicatif::{ProgressBar, ProgressStyle};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{BTreeMap, HashSet};
use std::pin::pin;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const MAX_PAGES_CEILING: usize = 500;
pub const DEFAULT_MAX_SITEMAP_URLS: usize = 1000;
pub const DEFAULT_MAX_SITEMAP_DOCUMENTS: usize = 50;
pub const DEFAULT_CONCURRENCY: usize = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

pub(crate) type Pacer = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Limits and pacing for a sitemap walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerSettings {
    pub max_pages: usize,
    pub max_pages_ceiling: usize,
    pub max_sitemap_urls: usize,
    /// Upper bound on sitemap documents fetched, index files included
    pub max_sitemap_documents: usize,
    pub concurrency: usize,
    /// Minimum spacing between page fetch dispatches, shared by all workers
    pub delay: Duration,
    pub deadline: Option<Duration>,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_pages_ceiling: MAX_PAGES_CEILING,
            max_sitemap_urls: DEFAULT_MAX_SITEMAP_URLS,
            max_sitemap_documents: DEFAULT_MAX_SITEMAP_DOCUMENTS,
            concurrency: DEFAULT_CONCURRENCY,
            delay: DEFAULT_DELAY,
            deadline: None,
        }
    }
}

impl WalkerSettings {
    pub fn effective_max_pages(&self) -> usize {
        self.max_pages.min(self.max_pages_ceiling)
    }
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: nested sitemap URLs
    Index(Vec<String>),
}

/// Parses a sitemap or sitemap index, returning the `<loc>` values in document order.
pub fn parse_sitemap(url: &str, xml: &str) -> Result<SitemapDocument, LinkError> {
    let malformed = |reason: String| LinkError::MalformedSitemap {
        url: url.to_string(),
        reason,
    };

    let check_root = |name: String| match name.as_str() {
        "urlset" | "sitemapindex" => Ok(name),
        _ => Err(malformed(format!("unexpected root element <{}>", name))),
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut root: Option<String> = None;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut current_loc = String::new();
    let mut locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if root.is_none() {
                    root = Some(check_root(name)?);
                    continue;
                }
                match name.as_str() {
                    "url" | "sitemap" => {
                        in_entry = true;
                        current_loc.clear();
                    }
                    "loc" if in_entry => in_loc = true,
                    _ => {}
                }
            }
            // A self-closing root is a sitemap with no entries
            Ok(Event::Empty(e)) if root.is_none() => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                root = Some(check_root(name)?);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "loc" => in_loc = false,
                    "url" | "sitemap" if in_entry => {
                        if !current_loc.is_empty() {
                            locs.push(current_loc.clone());
                        }
                        in_entry = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e
                    .unescape()
                    .map_err(|err| malformed(format!("invalid text in <loc>: {}", err)))?;
                current_loc.push_str(text.trim());
            }
            Ok(Event::CData(e)) if in_loc => {
                current_loc.push_str(String::from_utf8_lossy(&e.into_inner()).trim());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    match root.as_deref() {
        Some("urlset") => Ok(SitemapDocument::UrlSet(locs)),
        Some(_) => Ok(SitemapDocument::Index(locs)),
        None => Err(malformed(
            "no <urlset> or <sitemapindex> root element".to_string(),
        )),
    }
}

/// Walks a sitemap (index) and runs the page pipeline over its URLs.
///
/// Each page fails in isolation; only a failure of the root sitemap aborts the walk.
pub struct SitemapWalker {
    analyzer: LinkAnalyzer,
    sitemap_url: String,
    cancel: CancellationToken,
    progress_bar: Option<ProgressBar>,
}

impl SitemapWalker {
    pub fn new(sitemap_url: &str, analyzer: LinkAnalyzer) -> Self {
        Self {
            analyzer,
            sitemap_url: sitemap_url.to_string(),
            cancel: CancellationToken::new(),
            progress_bar: None,
        }
    }

    /// Uses `token` to stop the walk; pages already in flight still complete.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Enable progress bar for the page crawl
    pub fn enable_progress_bar(&mut self) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages {msg}")
                .expect("Progress bar template should be valid"),
        );
        self.progress_bar = Some(pb);
    }

    fn settings(&self) -> &WalkerSettings {
        &self.analyzer.engine().walker
    }

    /// Flattens the sitemap tree into de-duplicated page URLs, depth-first in document order.
    pub async fn collect_urls(&self) -> Result<Vec<String>, LinkError> {
        let settings = self.settings();
        let mut stack = vec![self.sitemap_url.clone()];
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut urls = Vec::new();
        let mut documents = 0;

        while let Some(sitemap_url) = stack.pop() {
            if !visited.insert(sitemap_url.clone()) {
                continue;
            }
            if documents >= settings.max_sitemap_documents {
                tracing::warn!(
                    limit = settings.max_sitemap_documents,
                    "Sitemap document limit reached, skipping remaining sitemaps"
                );
                break;
            }
            documents += 1;

            let is_root = sitemap_url == self.sitemap_url;
            let document = match self.fetch_document(&sitemap_url).await {
                Ok(document) => document,
                Err(e) if is_root => return Err(e),
                Err(e) => {
                    tracing::warn!(url = %sitemap_url, error = %e, "Skipping nested sitemap");
                    continue;
                }
            };

            match document {
                SitemapDocument::Index(children) => {
                    tracing::debug!(url = %sitemap_url, count = children.len(), "Sitemap index");
                    stack.extend(children.into_iter().rev());
                }
                SitemapDocument::UrlSet(locs) => {
                    for loc in locs {
                        if urls.len() >= settings.max_sitemap_urls {
                            return Ok(urls);
                        }
                        if seen.insert(loc.clone()) {
                            urls.push(loc);
                        }
                    }
                }
            }

            if urls.len() >= settings.max_sitemap_urls {
                break;
            }
        }

        Ok(urls)
    }

    /// Lists the sitemap's page URLs without fetching any page.
    pub async fn list_urls(&self) -> Result<SitemapUrlList, LinkError> {
        let urls = self.collect_urls().await?;
        Ok(SitemapUrlList {
            sitemap_url: self.sitemap_url.clone(),
            total_urls: urls.len(),
            urls,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, LinkError> {
        let page = self.analyzer.fetcher().fetch(url).await?;
        parse_sitemap(url, &page.body)
    }

    pub async fn walk(&self) -> Result<SitemapReport, LinkError> {
        let urls = self.collect_urls().await?;
        let total_pages_in_sitemap = urls.len();
        let settings = self.settings();
        let targets: Vec<String> = urls
            .into_iter()
            .take(settings.effective_max_pages())
            .collect();
        let target_count = targets.len();

        tracing::info!(
            sitemap = %self.sitemap_url,
            found = total_pages_in_sitemap,
            crawling = target_count,
            "Starting sitemap walk"
        );

        if let Some(pb) = &self.progress_bar {
            pb.set_length(target_count as u64);
            pb.set_position(0);
        }

        let pacer: Option<Pacer> = Quota::with_period(settings.delay).map(RateLimiter::direct);
        let deadline = settings.deadline.map(|d| Instant::now() + d);
        let cancel = &self.cancel;
        let stopped = || cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d);
        let pacer = &pacer;
        let analyzer = &self.analyzer;

        let results = stream::iter(targets)
            .take_while(|_| future::ready(!stopped()))
            .map(|url| async move {
                if let Some(pacer) = pacer {
                    pacer.until_ready().await;
                }
                if stopped() {
                    return None;
                }
                let entry = match analyzer.analyze(&url).await {
                    Ok(report) => PageEntry::Report(Box::new(report)),
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "Failed to analyze page");
                        PageEntry::Failed {
                            page_url: url,
                            error: e.to_report(),
                        }
                    }
                };
                Some(entry)
            })
            .buffered(settings.concurrency.max(1));
        let mut results = pin!(results);

        let mut category_summary: BTreeMap<_, CategoryTotal> = analyzer
            .engine()
            .taxonomy
            .categories()
            .map(|category| (category, CategoryTotal::default()))
            .collect();
        let mut pages = Vec::with_capacity(target_count);

        while let Some(result) = results.next().await {
            let Some(entry) = result else {
                continue;
            };

            if let PageEntry::Report(report) = &entry {
                for (category, bucket) in &report.categories {
                    if bucket.count > 0 {
                        let total = category_summary.entry(*category).or_default();
                        total.total_links += bucket.count;
                        total.pages += 1;
                    }
                }
            }
            pages.push(entry);

            if let Some(pb) = &self.progress_bar {
                pb.inc(1);
            }
        }

        let cancelled = pages.len() < target_count;
        if cancelled {
            tracing::info!(
                completed = pages.len(),
                planned = target_count,
                "Sitemap walk cancelled, returning completed pages"
            );
        }

        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(if cancelled { "(cancelled)" } else { "" });
        }

        let total_pages_crawled = pages.iter().filter(|p| p.is_success()).count();
        Ok(SitemapReport {
            sitemap_url: self.sitemap_url.clone(),
            total_pages_in_sitemap,
            total_pages_crawled,
            failed_pages: pages.len() - total_pages_crawled,
            cancelled,
            category_summary,
            pages,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}
