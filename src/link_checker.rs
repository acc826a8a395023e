use crate::fetcher::Fetcher;
use crate::models::{LinkCheck, LinkHealthReport, LinkStatus, PageReport};
use futures::future::join_all;
use std::collections::HashSet;

/// HEAD-based liveness check for a page's outbound links.
pub struct LinkChecker<'a> {
    fetcher: &'a Fetcher,
    limit: usize,
}

impl<'a> LinkChecker<'a> {
    pub fn new(fetcher: &'a Fetcher, limit: usize) -> Self {
        Self { fetcher, limit }
    }

    /// Checks up to `limit` unique http(s) links of `report`, sorted by URL.
    pub async fn check_report(&self, report: &PageReport) -> LinkHealthReport {
        let mut seen = HashSet::new();
        let mut urls: Vec<&str> = report
            .links()
            .map(|link| link.url.as_str())
            .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
            .filter(|url| seen.insert(*url))
            .collect();
        urls.sort_unstable();
        urls.truncate(self.limit);
        self.check_urls(&urls).await
    }

    pub async fn check_urls(&self, urls: &[&str]) -> LinkHealthReport {
        let details: Vec<LinkCheck> = join_all(urls.iter().map(|url| self.check_link(url))).await;
        let count = |status: LinkStatus| details.iter().filter(|c| c.status == status).count();
        let broken_count = count(LinkStatus::Broken);
        let error_count = count(LinkStatus::Error);

        LinkHealthReport {
            checked_count: details.len(),
            broken_count,
            error_count,
            details,
        }
    }

    async fn check_link(&self, url: &str) -> LinkCheck {
        match self.fetcher.head(url).await {
            Ok(code) => LinkCheck {
                url: url.to_string(),
                status: if code >= 400 {
                    LinkStatus::Broken
                } else {
                    LinkStatus::Ok
                },
                code: Some(code),
            },
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Link check failed");
                LinkCheck {
                    url: url.to_string(),
                    status: LinkStatus::Error,
                    code: None,
                }
            }
        }
    }
}
