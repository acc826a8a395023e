use crate::classifier::{LinkClassifier, page_domain};
use crate::config::EngineConfig;
use crate::error::LinkError;
use crate::extractor::extract_links;
use crate::fetcher::{FetchedPage, Fetcher, parse_http_url};
use crate::models::{PageAnalysis, PageReport};
use crate::page_report::PageReportBuilder;
use anyhow::Result;
use std::sync::Arc;

/// The single-page pipeline: fetch, extract, classify, report.
#[derive(Debug, Clone)]
pub struct LinkAnalyzer {
    fetcher: Fetcher,
    engine: Arc<EngineConfig>,
}

impl LinkAnalyzer {
    pub fn new(engine: Arc<EngineConfig>) -> Result<Self> {
        let fetcher = Fetcher::new(engine.http.timeout, engine.http.head_timeout)?;
        Ok(Self::with_fetcher(fetcher, engine))
    }

    pub fn with_fetcher(fetcher: Fetcher, engine: Arc<EngineConfig>) -> Self {
        Self { fetcher, engine }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn engine(&self) -> &Arc<EngineConfig> {
        &self.engine
    }

    /// Analyzes one page and wraps every outcome, failures included, in a [`PageAnalysis`].
    ///
    /// A page without links still carries its report (with the no-links insight) but is
    /// marked unsuccessful with kind `no_links_found`.
    pub async fn analyze_page(&self, url: &str) -> PageAnalysis {
        match self.fetch_and_report(url).await {
            Ok(report) if report.total_links == 0 => {
                let error = LinkError::NoLinksFound {
                    url: url.to_string(),
                };
                PageAnalysis {
                    page_url: url.to_string(),
                    success: false,
                    access_blocked: false,
                    error: Some(error.to_report()),
                    report: Some(report),
                    link_health: None,
                }
            }
            Ok(report) => PageAnalysis {
                page_url: url.to_string(),
                success: true,
                access_blocked: false,
                error: None,
                report: Some(report),
                link_health: None,
            },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Page analysis failed");
                PageAnalysis {
                    page_url: url.to_string(),
                    success: false,
                    access_blocked: e.is_access_blocked(),
                    error: Some(e.to_report()),
                    report: None,
                    link_health: None,
                }
            }
        }
    }

    /// Strict variant used by the sitemap walker: a page without links is an error.
    pub async fn analyze(&self, url: &str) -> Result<PageReport, LinkError> {
        let report = self.fetch_and_report(url).await?;
        if report.total_links == 0 {
            return Err(LinkError::NoLinksFound {
                url: url.to_string(),
            });
        }
        Ok(report)
    }

    async fn fetch_and_report(&self, url: &str) -> Result<PageReport, LinkError> {
        let page = self.fetcher.fetch(url).await?;
        warn_on_non_html(&page);
        self.report_from_html(url, &page.url, &page.body)
    }

    /// Builds a report from already-fetched HTML.
    ///
    /// `page_url` decides what counts as internal; `base_url` (usually the final URL after
    /// redirects) resolves relative hrefs.
    pub fn report_from_html(
        &self,
        page_url: &str,
        base_url: &str,
        html: &str,
    ) -> Result<PageReport, LinkError> {
        let page = parse_http_url(page_url)?;
        let base = parse_http_url(base_url).unwrap_or_else(|_| page.clone());
        let domain = page_domain(&page);

        let classifier = LinkClassifier::new(&self.engine.taxonomy);
        let links = extract_links(html, &base)
            .into_iter()
            .map(|raw| classifier.to_link(raw, &domain))
            .collect();

        let builder = PageReportBuilder::new(&self.engine.taxonomy, &self.engine.scoring);
        Ok(builder.build(page_url, links))
    }
}

fn warn_on_non_html(page: &FetchedPage) {
    if let Some(ct) = &page.content_type {
        let ct_lower = ct.to_lowercase();
        if !ct_lower.contains("text/html") && !ct_lower.contains("application/xhtml") {
            tracing::warn!(
                url = %page.url,
                content_type = %ct,
                "Non-HTML content type detected, parsing may fail"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;

    fn analyzer() -> LinkAnalyzer {
        LinkAnalyzer::new(Arc::new(EngineConfig::default())).unwrap()
    }

    #[test]
    fn test_report_from_html_resolves_against_base() {
        let html = r#"<a href="/about">About us</a><a href="https://twitter.com/acme">Twitter</a>"#;
        let report = analyzer()
            .report_from_html("https://acme.com/", "https://www.acme.com/home", html)
            .unwrap();

        assert_eq!(report.total_links, 2);
        assert_eq!(report.internal_links, 1);
        assert_eq!(report.count(Category::External), 1);
        assert!(
            report
                .links()
                .any(|link| link.url == "https://www.acme.com/about")
        );
    }

    #[test]
    fn test_report_from_html_rejects_invalid_page_url() {
        let err = analyzer()
            .report_from_html("ftp://acme.com/", "ftp://acme.com/", "<a href='/x'>x</a>")
            .unwrap_err();
        assert!(matches!(err, LinkError::InvalidUrl { .. }));
    }
}
