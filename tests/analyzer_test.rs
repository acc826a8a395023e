mod server;

use linkscope::analyzer::LinkAnalyzer;
use linkscope::config::EngineConfig;
use linkscope::error::ErrorKind;
use linkscope::page_report::{NO_LINKS_INSIGHT, NO_LINKS_WARNING};
use linkscope::taxonomy::Category;
use server::start_test_server;
use std::sync::Arc;
use std::time::Duration;

fn analyzer() -> LinkAnalyzer {
    LinkAnalyzer::new(Arc::new(EngineConfig::default())).expect("Failed to build analyzer")
}

#[tokio::test]
async fn test_links_page_counts() {
    let base_url = start_test_server().await;
    let analysis = analyzer().analyze_page(&format!("{}/links", base_url)).await;

    assert!(analysis.success);
    assert!(!analysis.access_blocked);
    assert!(analysis.error.is_none());

    let report = analysis.report.expect("report should be present");
    assert_eq!(report.total_links, 10);
    assert_eq!(report.nofollow_links, 3);
    assert_eq!(report.dofollow_links, 7);
    assert_eq!(report.external_links, 2);
    assert_eq!(report.internal_links, 8);
    assert_eq!(report.missing_anchor_text, 0);
    assert_eq!(report.page_domain, "127.0.0.1");

    assert_eq!(report.count(Category::Navigation), 3);
    assert_eq!(report.count(Category::Ecommerce), 1);
    assert_eq!(report.count(Category::Support), 1);
    assert_eq!(report.count(Category::Legal), 1);
    assert_eq!(report.count(Category::Content), 1);
    assert_eq!(report.count(Category::Careers), 1);
    assert_eq!(report.count(Category::External), 2);
}

#[tokio::test]
async fn test_links_page_buckets_partition_links() {
    let base_url = start_test_server().await;
    let report = analyzer()
        .analyze(&format!("{}/links", base_url))
        .await
        .expect("analysis should succeed");

    assert_eq!(report.categories.len(), 13);

    let bucket_sum: usize = report.categories.values().map(|b| b.count).sum();
    assert_eq!(bucket_sum, report.total_links);

    for (category, bucket) in &report.categories {
        assert_eq!(bucket.name, *category);
        assert_eq!(bucket.count, bucket.links.len());
        assert!(bucket.links.iter().all(|link| link.category == *category));
    }

    let mut urls: Vec<_> = report.links().map(|l| l.url.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), report.total_links);
}

#[tokio::test]
async fn test_blocked_page_is_flagged() {
    let base_url = start_test_server().await;
    let analysis = analyzer().analyze_page(&format!("{}/blocked", base_url)).await;

    assert!(!analysis.success);
    assert!(analysis.access_blocked);
    assert!(analysis.report.is_none());
    let error = analysis.error.expect("error should be present");
    assert_eq!(error.kind, ErrorKind::AccessBlocked);
    assert!(error.message.contains("403"));
}

#[tokio::test]
async fn test_server_error_is_generic_failure() {
    let base_url = start_test_server().await;
    let analysis = analyzer().analyze_page(&format!("{}/error", base_url)).await;

    assert!(!analysis.success);
    assert!(!analysis.access_blocked);
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::GenericFetchFailure);
}

#[tokio::test]
async fn test_empty_page_reports_no_links() {
    let base_url = start_test_server().await;
    let analysis = analyzer().analyze_page(&format!("{}/empty", base_url)).await;

    assert!(!analysis.success);
    assert!(!analysis.access_blocked);
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::NoLinksFound);

    let report = analysis.report.expect("report should be kept for empty pages");
    assert_eq!(report.total_links, 0);
    assert_eq!(report.insights, vec![NO_LINKS_INSIGHT.to_string()]);
    assert!(report.warnings.contains(&NO_LINKS_WARNING.to_string()));
    assert!(report.categories.values().all(|b| b.count == 0));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let base_url = start_test_server().await;
    let mut engine = EngineConfig::default();
    engine.http.timeout = Duration::from_secs(1);
    let analyzer = LinkAnalyzer::new(Arc::new(engine)).unwrap();

    let analysis = analyzer.analyze_page(&format!("{}/slow", base_url)).await;
    assert!(!analysis.success);
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn test_invalid_url_never_errors() {
    let analysis = analyzer().analyze_page("example.com/no-scheme").await;
    assert!(!analysis.success);
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::InvalidUrl);

    let analysis = analyzer().analyze_page("ftp://example.com/").await;
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::InvalidUrl);
}

#[tokio::test]
async fn test_connection_refused() {
    let analysis = analyzer().analyze_page("http://127.0.0.1:1/").await;
    assert!(!analysis.success);
    assert_eq!(analysis.error.unwrap().kind, ErrorKind::ConnectionError);
}

#[tokio::test]
async fn test_page_analysis_json_shape() {
    let base_url = start_test_server().await;
    let analysis = analyzer().analyze_page(&format!("{}/links", base_url)).await;
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["accessBlocked"], false);
    assert!(json["error"].is_null());
    assert!(json.get("linkHealth").is_none());
    assert_eq!(json["report"]["totalLinks"], 10);
    assert_eq!(json["report"]["nofollowLinks"], 3);
    assert_eq!(json["report"]["categories"]["external"]["count"], 2);
    assert_eq!(
        json["report"]["categories"].as_object().unwrap().len(),
        13
    );

    let blocked = analyzer().analyze_page(&format!("{}/blocked", base_url)).await;
    let json = serde_json::to_value(&blocked).unwrap();
    assert_eq!(json["error"]["kind"], "access_blocked");
    assert!(json["report"].is_null());
}
