use linkscope::error::{ErrorKind, ErrorReport};
use linkscope::models::{
    AuthorityBuckets, BacklinkProfile, BacklinkRecord, BacklinkReport, CategoryBucket,
    CategoryTotal, FollowType, Link, LinkCheck, LinkHealthReport, LinkStatus, PageAnalysis,
    PageEntry, PageReport, PageType, ProfileAssessment, ProfileSource, Severity, SitemapReport,
    ToxicFinding, Trend, VelocityReport,
};
use linkscope::reporter::Reporter;
use linkscope::taxonomy::Category;
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

fn create_test_link(url: &str, category: Category, is_internal: bool) -> Link {
    Link {
        url: url.to_string(),
        anchor_text: "Link Text".to_string(),
        is_internal,
        is_nofollow: false,
        is_sponsored: false,
        is_ugc: false,
        category,
        confidence: 0.9,
    }
}

fn create_test_report(page_url: &str, links: Vec<Link>) -> PageReport {
    let total = links.len();
    let categories = Category::ALL
        .into_iter()
        .map(|category| {
            let bucket_links: Vec<Link> =
                links.iter().filter(|l| l.category == category).cloned().collect();
            let count = bucket_links.len();
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            (
                category,
                CategoryBucket {
                    name: category,
                    description: format!("{} links", category.as_str()),
                    count,
                    percentage,
                    links: bucket_links,
                },
            )
        })
        .collect();
    let internal = links.iter().filter(|l| l.is_internal).count();

    PageReport {
        page_url: page_url.to_string(),
        page_domain: "example.com".to_string(),
        total_links: total,
        internal_links: internal,
        external_links: total - internal,
        dofollow_links: total,
        nofollow_links: 0,
        sponsored_links: 0,
        ugc_links: 0,
        missing_anchor_text: 0,
        quality_score: 72,
        categories,
        insights: vec!["Good navigation structure".to_string()],
        warnings: vec![],
        recommendations: vec!["Add a privacy policy link".to_string()],
    }
}

fn create_test_analysis() -> PageAnalysis {
    let links = vec![
        create_test_link("https://example.com/", Category::Navigation, true),
        create_test_link("https://example.com/blog", Category::Content, true),
        create_test_link("https://partner.org/", Category::External, false),
    ];
    PageAnalysis {
        page_url: "https://example.com/".to_string(),
        success: true,
        access_blocked: false,
        error: None,
        report: Some(create_test_report("https://example.com/", links)),
        link_health: Some(LinkHealthReport {
            checked_count: 2,
            broken_count: 0,
            error_count: 1,
            details: vec![
                LinkCheck {
                    url: "https://example.com/".to_string(),
                    status: LinkStatus::Ok,
                    code: Some(200),
                },
                LinkCheck {
                    url: "https://partner.org/".to_string(),
                    status: LinkStatus::Error,
                    code: None,
                },
            ],
        }),
    }
}

fn create_test_sitemap_report() -> SitemapReport {
    let page = create_test_report(
        "https://example.com/a",
        vec![create_test_link("https://example.com/", Category::Navigation, true)],
    );
    let mut category_summary: BTreeMap<Category, CategoryTotal> = Category::ALL
        .into_iter()
        .map(|c| (c, CategoryTotal::default()))
        .collect();
    category_summary.insert(
        Category::Navigation,
        CategoryTotal {
            total_links: 1,
            pages: 1,
        },
    );

    SitemapReport {
        sitemap_url: "https://example.com/sitemap.xml".to_string(),
        total_pages_in_sitemap: 3,
        total_pages_crawled: 1,
        failed_pages: 1,
        cancelled: true,
        category_summary,
        pages: vec![
            PageEntry::Report(Box::new(page)),
            PageEntry::Failed {
                page_url: "https://example.com/b".to_string(),
                error: ErrorReport {
                    kind: ErrorKind::Timeout,
                    message: "Request to https://example.com/b timed out after 10s".to_string(),
                },
            },
        ],
        timestamp: "2024-01-01T00:00:00Z".to_string(),
    }
}

fn create_test_backlink_report() -> BacklinkReport {
    let record = |domain: &str, authority: u8| BacklinkRecord {
        source_domain: domain.to_string(),
        domain_authority: authority,
        anchor_text: "example".to_string(),
        follow_type: FollowType::Dofollow,
        page_type: PageType::InnerPage,
    };

    BacklinkReport {
        profile: BacklinkProfile {
            domain: "example.com".to_string(),
            source: ProfileSource {
                provider: "simulated".to_string(),
                simulated: true,
            },
            total_backlinks: 40,
            referring_domains: 3,
            dofollow_count: 30,
            nofollow_count: 10,
            authority_buckets: AuthorityBuckets {
                high: vec![record("news.com", 80)],
                medium: vec![record("blog.net", 45)],
                low: vec![record("spam-casino.biz", 4)],
            },
            toxic_links: vec![ToxicFinding {
                source_domain: "spam-casino.biz".to_string(),
                domain_authority: 4,
                severity: Severity::High,
                toxicity_score: 95,
                reasons: vec!["Suspicious TLD (.biz)".to_string()],
            }],
            velocity: VelocityReport {
                new_links_30d: 4,
                new_links_90d: 11,
                acceleration_pct: 33.3,
                trend: Trend::Growing,
                health_score: 90,
                warnings: vec![],
                simulated: true,
            },
        },
        assessment: ProfileAssessment {
            summary: "Analyzed 40 backlinks from 3 unique domains (simulated data)".to_string(),
            quality_score: 55,
            high_authority_count: 1,
            toxic_links_count: 1,
            insights: vec!["Few high-authority domains".to_string()],
            recommendations: vec!["Review the toxic links and disavow them".to_string()],
        },
        timestamp: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn test_print_page_analysis() {
    // Should not panic
    Reporter::print_page_analysis(&create_test_analysis());
}

#[test]
fn test_print_failed_page_analysis() {
    let analysis = PageAnalysis {
        page_url: "https://example.com/".to_string(),
        success: false,
        access_blocked: true,
        error: Some(ErrorReport {
            kind: ErrorKind::AccessBlocked,
            message: "Access blocked".to_string(),
        }),
        report: None,
        link_health: None,
    };

    Reporter::print_page_analysis(&analysis);
}

#[test]
fn test_print_sitemap_report() {
    Reporter::print_sitemap_report(&create_test_sitemap_report());
}

#[test]
fn test_print_backlink_report() {
    Reporter::print_backlink_report(&create_test_backlink_report());
}

#[test]
fn test_save_page_analysis_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("page.json");
    let filename = path.to_str().unwrap();

    Reporter::save_json_report(&create_test_analysis(), filename).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(filename).unwrap()).unwrap();
    assert_eq!(json["pageUrl"], "https://example.com/");
    assert_eq!(json["accessBlocked"], false);
    assert_eq!(json["report"]["totalLinks"], 3);
    assert_eq!(json["report"]["qualityScore"], 72);
    assert_eq!(json["report"]["categories"].as_object().unwrap().len(), 13);
    assert_eq!(json["report"]["categories"]["navigation"]["count"], 1);
    assert_eq!(
        json["report"]["categories"]["external"]["links"][0]["isInternal"],
        false
    );
    assert_eq!(json["linkHealth"]["brokenCount"], 0);
    assert_eq!(json["linkHealth"]["errorCount"], 1);
    assert_eq!(json["linkHealth"]["details"][1]["status"], "error");
    assert!(json["linkHealth"]["details"][1]["code"].is_null());
}

#[test]
fn test_save_sitemap_report_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sitemap.json");
    let filename = path.to_str().unwrap();

    Reporter::save_json_report(&create_test_sitemap_report(), filename).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(filename).unwrap()).unwrap();
    assert_eq!(json["sitemapUrl"], "https://example.com/sitemap.xml");
    assert_eq!(json["totalPagesInSitemap"], 3);
    assert_eq!(json["cancelled"], true);
    assert_eq!(json["categorySummary"]["navigation"]["totalLinks"], 1);
    assert_eq!(json["pages"][0]["pageUrl"], "https://example.com/a");
    assert_eq!(json["pages"][1]["error"]["kind"], "timeout");
}

#[test]
fn test_save_backlink_report_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("backlinks.json");
    let filename = path.to_str().unwrap();

    Reporter::save_json_report(&create_test_backlink_report(), filename).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(filename).unwrap()).unwrap();
    assert_eq!(json["profile"]["referringDomains"], 3);
    assert_eq!(json["profile"]["authorityBuckets"]["low"][0]["pageType"], "inner_page");
    assert_eq!(json["profile"]["toxicLinks"][0]["severity"], "high");
    assert_eq!(json["profile"]["velocity"]["newLinks30d"], 4);
    assert_eq!(json["assessment"]["toxicLinksCount"], 1);
}

#[test]
fn test_save_json_report_to_missing_directory_fails() {
    let result = Reporter::save_json_report(
        &create_test_backlink_report(),
        "/nonexistent/dir/report.json",
    );

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to create report file")
    );
}
