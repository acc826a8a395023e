use crate::analyzer::LinkAnalyzer;
use crate::models::BatchReport;
use futures::stream::{self, StreamExt};
use crate::sitemap::Pacer;
use governor::{Quota, RateLimiter};

/// Runs the page pipeline over a list of URLs.
///
/// Dispatch is paced and bounded by the walker settings, so a batch behaves like a
/// sitemap walk over a hand-picked list. Results keep the input order.
pub struct BatchAnalyzer {
    analyzer: LinkAnalyzer,
}

impl BatchAnalyzer {
    pub fn new(analyzer: LinkAnalyzer) -> Self {
        Self { analyzer }
    }

    pub async fn analyze(&self, urls: &[String]) -> BatchReport {
        let settings = &self.analyzer.engine().walker;
        let pacer: Option<Pacer> = Quota::with_period(settings.delay).map(RateLimiter::direct);
        let pacer = &pacer;
        let analyzer = &self.analyzer;

        tracing::info!(count = urls.len(), "Starting batch analysis");

        let results: Vec<_> = stream::iter(urls)
            .map(|url| async move {
                if let Some(pacer) = pacer {
                    pacer.until_ready().await;
                }
                analyzer.analyze_page(url).await
            })
            .buffered(settings.concurrency.max(1))
            .collect()
            .await;

        let successful = results.iter().filter(|r| r.success).count();
        tracing::info!(successful, failed = results.len() - successful, "Batch finished");

        BatchReport {
            total_urls_analyzed: results.len(),
            successful,
            failed: results.len() - successful,
            results,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
