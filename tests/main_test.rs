mod server;

use linkscope::cli::{Cli, Command};
use linkscope::run;
use server::start_test_server;
use std::fs;
use tempfile::tempdir;

fn cli(command: Command) -> Cli {
    Cli {
        command,
        output: None,
        save: None,
        verbose: false,
        timeout: Some(2),
        head_timeout: Some(2),
        concurrency: None,
        delay_ms: Some(0),
        max_sitemap_urls: None,
        config: None,
    }
}

fn page(url: String, check_links: bool) -> Command {
    Command::Page {
        url,
        check_links,
        link_check_limit: None,
    }
}

fn sitemap(url: String, max_pages: Option<usize>) -> Command {
    Command::Sitemap {
        url,
        max_pages,
        deadline: None,
    }
}

#[tokio::test]
async fn test_invalid_page_url_is_not_an_error() {
    // Page failures are reported in the analysis, never as a process error
    let result = run(cli(page("example.com".to_string(), false))).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_page_with_text_output() {
    let base_url = start_test_server().await;

    let result = run(cli(page(format!("{}/links", base_url), false))).await;
    assert!(result.is_ok(), "Should analyze the page with text output");
}

#[tokio::test]
async fn test_page_with_json_output_and_link_check() {
    let base_url = start_test_server().await;

    let mut args = cli(page(format!("{}/check", base_url), true));
    args.output = Some("json".to_string());

    let result = run(args).await;
    assert!(result.is_ok(), "Should analyze and check links with JSON output");
}

#[tokio::test]
async fn test_page_save_file() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("page_report.json");

    let mut args = cli(page(format!("{}/links", base_url), true));
    args.save = Some(report_path.to_str().unwrap().to_string());

    let result = run(args).await;
    assert!(result.is_ok(), "Should analyze the page and save the report");

    let content = fs::read_to_string(&report_path).expect("Report file should be created");
    let json: serde_json::Value =
        serde_json::from_str(&content).expect("Report file should contain valid JSON");

    assert_eq!(json["success"], true);
    assert_eq!(json["report"]["totalLinks"], 10);
    assert!(json["report"]["categories"].is_object());
    assert!(json["linkHealth"]["details"].is_array());
}

#[tokio::test]
async fn test_page_failure_is_saved() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("blocked.json");

    let mut args = cli(page(format!("{}/blocked", base_url), false));
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["accessBlocked"], true);
    assert!(json["report"].is_null());
}

#[tokio::test]
async fn test_sitemap_with_save_file() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("sitemap_report.json");

    let mut args = cli(sitemap(format!("{}/sitemap-mixed.xml", base_url), None));
    args.save = Some(report_path.to_str().unwrap().to_string());

    let result = run(args).await;
    assert!(result.is_ok(), "Partial page failures should not fail the walk");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totalPagesInSitemap"], 4);
    assert_eq!(json["totalPagesCrawled"], 1);
    assert_eq!(json["failedPages"], 3);
    assert_eq!(json["pages"].as_array().unwrap().len(), 4);
    assert!(json["categorySummary"].is_object());
}

#[tokio::test]
async fn test_sitemap_respects_max_pages() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("capped.json");

    let mut args = cli(sitemap(format!("{}/sitemap-big.xml", base_url), Some(5)));
    args.output = Some("json".to_string());
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totalPagesInSitemap"], 30);
    assert_eq!(json["pages"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_sitemap_root_failure_is_an_error() {
    let base_url = start_test_server().await;

    let result = run(cli(sitemap(format!("{}/not-a-sitemap", base_url), None))).await;
    let err = result.expect_err("A page that is not a sitemap should fail the walk");
    assert!(err.to_string().contains("Malformed sitemap"));
}

#[tokio::test]
async fn test_backlinks_with_save_file() {
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("backlinks.json");

    let mut args = cli(Command::Backlinks {
        domain: "https://www.example.com".to_string(),
        seed: Some(11),
    });
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["profile"]["domain"], "www.example.com");
    assert_eq!(json["profile"]["source"]["simulated"], true);
}

#[tokio::test]
async fn test_zero_concurrency_is_rejected() {
    let mut args = cli(Command::Backlinks {
        domain: "example.com".to_string(),
        seed: Some(1),
    });
    args.concurrency = Some(0);

    let err = run(args).await.expect_err("Zero concurrency should be rejected");
    assert!(err.to_string().contains("Concurrency must be at least 1"));
}

#[tokio::test]
async fn test_batch_with_save_file() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("batch.json");

    let mut args = cli(Command::Batch {
        urls: vec![format!("{}/links", base_url), format!("{}/blocked", base_url)],
    });
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok(), "Failed pages should not fail the batch");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totalUrlsAnalyzed"], 2);
    assert_eq!(json["successful"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["results"][1]["accessBlocked"], true);
}

#[tokio::test]
async fn test_outbound_with_save_file() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("outbound.json");

    let mut args = cli(Command::Outbound {
        url: format!("{}/links", base_url),
    });
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totalExternalLinks"], 2);
    assert_eq!(json["uniqueDomains"], 2);
    assert_eq!(json["domains"][0]["domain"], "partner.example.org");
    assert_eq!(json["domains"][1]["domain"], "twitter.com");
    assert_eq!(json["domains"][1]["nofollowCount"], 1);
}

#[tokio::test]
async fn test_outbound_unreachable_page_is_an_error() {
    let base_url = start_test_server().await;

    let result = run(cli(Command::Outbound {
        url: format!("{}/blocked", base_url),
    }))
    .await;
    let err = result.expect_err("Outbound needs the page's links");
    assert!(err.to_string().contains("Failed to analyze"));
}

#[tokio::test]
async fn test_sitemap_urls_with_save_file() {
    let base_url = start_test_server().await;
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("urls.json");

    let mut args = cli(Command::SitemapUrls {
        url: format!("{}/sitemap-big.xml", base_url),
    });
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totalUrls"], 30);
    assert_eq!(json["urls"][0], format!("{}/page/1", base_url));
}

#[tokio::test]
async fn test_backlinks_domain_drops_scheme_case_and_port() {
    let dir = tempdir().unwrap();
    let report_path = dir.path().join("port.json");

    let mut args = cli(Command::Backlinks {
        domain: "HTTPS://Example.com:8080/".to_string(),
        seed: Some(5),
    });
    args.save = Some(report_path.to_str().unwrap().to_string());

    assert!(run(args).await.is_ok());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["profile"]["domain"], "example.com");
}
