use crate::models::{
    BacklinkReport, BatchReport, LinkHealthReport, LinkStatus, OutboundReport, PageAnalysis,
    PageEntry, PageReport, Severity, SitemapReport, SitemapUrlList, Trend,
};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    fn header(title: &str) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", title.bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();
    }

    fn footer() {
        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn score(score: u8) -> ColoredString {
        let text = format!("{}/100", score);
        if score >= 75 {
            text.bright_green()
        } else if score >= 50 {
            text.yellow()
        } else {
            text.bright_red()
        }
    }

    fn print_list(title: &str, items: &[String], marker: ColoredString) {
        if items.is_empty() {
            return;
        }
        println!("{}", title.bright_yellow().bold().underline());
        for item in items {
            println!("  [{}] {}", marker, item);
        }
        println!();
    }

    pub fn print_page_analysis(analysis: &PageAnalysis) {
        Self::header("linkscope - Page Link Report");

        println!("{}: {}", "Page URL".bright_white().bold(), analysis.page_url);

        if let Some(error) = &analysis.error {
            println!(
                "{}: {} ({})",
                "Status".bright_white().bold(),
                "FAILED".bright_red().bold(),
                error.kind.as_str()
            );
            println!("  {}", error.message.bright_red());
            if analysis.access_blocked {
                println!(
                    "  {}",
                    "The site blocks automated requests. Try again later or analyze another page."
                        .yellow()
                );
            }
        }
        println!();

        if let Some(report) = &analysis.report {
            Self::print_page_report(report);
        }
        if let Some(health) = &analysis.link_health {
            Self::print_link_health(health);
        }

        Self::footer();
    }

    fn print_page_report(report: &PageReport) {
        println!("{}", "Summary".bright_yellow().bold().underline());
        println!("  Domain:              {}", report.page_domain);
        println!(
            "  Quality Score:       {}",
            Self::score(report.quality_score)
        );
        println!(
            "  Total Links:         {}",
            report.total_links.to_string().bright_green()
        );
        println!("  Internal / External: {} / {}", report.internal_links, report.external_links);
        println!(
            "  Follow:              {} dofollow, {} nofollow, {} sponsored, {} ugc",
            report.dofollow_links, report.nofollow_links, report.sponsored_links, report.ugc_links
        );
        println!(
            "  Missing Anchor Text: {}",
            if report.missing_anchor_text > 0 {
                report.missing_anchor_text.to_string().yellow()
            } else {
                report.missing_anchor_text.to_string().bright_green()
            }
        );
        println!();

        println!("{}", "Categories".bright_yellow().bold().underline());
        for bucket in report.categories.values().filter(|b| b.count > 0) {
            println!(
                "  {:<12} {:>4} ({:>5.1}%)  {}",
                bucket.name.as_str().bright_white(),
                bucket.count,
                bucket.percentage,
                bucket.description.dimmed()
            );
        }
        println!();

        Self::print_list("Insights", &report.insights, "INFO ".bright_cyan());
        Self::print_list("Warnings", &report.warnings, "WARN ".yellow());
        Self::print_list("Recommendations", &report.recommendations, "TIP  ".bright_green());
    }

    fn print_link_health(health: &LinkHealthReport) {
        println!("{}", "Link Health".bright_yellow().bold().underline());
        let tally = |count: usize| {
            if count > 0 {
                count.to_string().bright_red()
            } else {
                count.to_string().bright_green()
            }
        };
        println!(
            "  Checked: {}  Broken: {}  Unreachable: {}",
            health.checked_count,
            tally(health.broken_count),
            tally(health.error_count)
        );
        for check in &health.details {
            let status = match check.status {
                LinkStatus::Ok => "OK    ".bright_green(),
                LinkStatus::Broken => "BROKEN".bright_red(),
                LinkStatus::Error => "ERROR ".bright_red(),
            };
            let code = check
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  [{}] {:>3} {}", status, code, check.url);
        }
    }

    pub fn print_sitemap_report(report: &SitemapReport) {
        Self::header("linkscope - Sitemap Link Report");

        println!("{}: {}", "Sitemap".bright_white().bold(), report.sitemap_url);
        println!("{}: {}", "Timestamp".bright_white().bold(), report.timestamp);
        println!();

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!("  Pages in Sitemap: {}", report.total_pages_in_sitemap);
        println!(
            "  Pages Crawled:    {}",
            report.total_pages_crawled.to_string().bright_green()
        );
        println!(
            "  Failed Pages:     {}",
            if report.failed_pages > 0 {
                report.failed_pages.to_string().bright_red()
            } else {
                report.failed_pages.to_string().bright_green()
            }
        );
        if report.cancelled {
            println!("  {}", "Walk cancelled before all pages were analyzed".yellow());
        }
        println!();

        println!("{}", "Category Summary".bright_yellow().bold().underline());
        for (category, total) in report.category_summary.iter().filter(|(_, t)| t.total_links > 0)
        {
            println!(
                "  {:<12} {:>6} links on {} pages",
                category.as_str().bright_white(),
                total.total_links,
                total.pages
            );
        }
        println!();

        println!("{}", "Pages".bright_yellow().bold().underline());
        for entry in &report.pages {
            match entry {
                PageEntry::Report(page) => println!(
                    "  {} {} ({} links)",
                    Self::score(page.quality_score),
                    page.page_url,
                    page.total_links
                ),
                PageEntry::Failed { page_url, error } => println!(
                    "  {} {} ({})",
                    "FAILED ".bright_red(),
                    page_url,
                    error.kind.as_str()
                ),
            }
        }

        Self::footer();
    }

    pub fn print_sitemap_urls(list: &SitemapUrlList) {
        Self::header("linkscope - Sitemap URLs");

        println!("{}: {}", "Sitemap".bright_white().bold(), list.sitemap_url);
        println!(
            "{}: {}",
            "URLs".bright_white().bold(),
            list.total_urls.to_string().bright_green()
        );
        println!();
        for url in &list.urls {
            println!("  {}", url);
        }

        Self::footer();
    }

    pub fn print_batch_report(report: &BatchReport) {
        Self::header("linkscope - Batch Link Report");

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!("  URLs Analyzed: {}", report.total_urls_analyzed);
        println!("  Successful:    {}", report.successful.to_string().bright_green());
        println!(
            "  Failed:        {}",
            if report.failed > 0 {
                report.failed.to_string().bright_red()
            } else {
                report.failed.to_string().bright_green()
            }
        );
        println!();

        println!("{}", "Pages".bright_yellow().bold().underline());
        for analysis in &report.results {
            match (&analysis.report, &analysis.error) {
                (Some(page), None) => println!(
                    "  {} {} ({} links)",
                    Self::score(page.quality_score),
                    analysis.page_url,
                    page.total_links
                ),
                (_, Some(error)) => println!(
                    "  {} {} ({})",
                    "FAILED ".bright_red(),
                    analysis.page_url,
                    error.kind.as_str()
                ),
                (None, None) => println!("  {} {}", "FAILED ".bright_red(), analysis.page_url),
            }
        }

        Self::footer();
    }

    pub fn print_outbound_report(report: &OutboundReport) {
        Self::header("linkscope - Outbound Domains");

        println!("{}: {}", "Page URL".bright_white().bold(), report.page_url);
        println!(
            "{}: {} links to {} domains",
            "External".bright_white().bold(),
            report.total_external_links,
            report.unique_domains
        );
        println!();

        if report.domains.is_empty() {
            println!("  {}", "No external links on this page".dimmed());
        }
        for domain in &report.domains {
            println!(
                "  {:<32} {:>4} links ({} dofollow, {} nofollow)",
                domain.domain.bright_white(),
                domain.link_count,
                domain.dofollow_count,
                domain.nofollow_count
            );
            if !domain.anchors.is_empty() {
                println!("      {}", domain.anchors.join(", ").dimmed());
            }
        }
        if report.unique_domains > report.domains.len() {
            println!(
                "  {}",
                format!("... and {} more", report.unique_domains - report.domains.len()).dimmed()
            );
        }

        Self::footer();
    }

    pub fn print_backlink_report(report: &BacklinkReport) {
        let profile = &report.profile;
        let assessment = &report.assessment;
        Self::header("linkscope - Backlink Profile Report");

        println!("{}: {}", "Domain".bright_white().bold(), profile.domain);
        println!(
            "{}: {}{}",
            "Source".bright_white().bold(),
            profile.source.provider,
            if profile.source.simulated {
                " (SIMULATED DATA - not real backlinks)".bright_red().bold().to_string()
            } else {
                String::new()
            }
        );
        println!();

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!("  {}", assessment.summary);
        println!("  Quality Score:     {}", Self::score(assessment.quality_score));
        println!("  Total Backlinks:   {}", profile.total_backlinks);
        println!("  Referring Domains: {}", profile.referring_domains);
        println!(
            "  Dofollow / Nofollow: {} / {}",
            profile.dofollow_count, profile.nofollow_count
        );
        println!(
            "  Authority:         {} high, {} medium, {} low",
            profile.authority_buckets.high.len(),
            profile.authority_buckets.medium.len(),
            profile.authority_buckets.low.len()
        );
        println!();

        if !profile.toxic_links.is_empty() {
            println!("{}", "Toxic Links".bright_yellow().bold().underline());
            for finding in &profile.toxic_links {
                let severity = match finding.severity {
                    Severity::High => "HIGH  ".bright_red(),
                    Severity::Medium => "MEDIUM".yellow(),
                    Severity::Low | Severity::None => "LOW   ".bright_cyan(),
                };
                println!(
                    "  [{}] {} (DA {}, score {})",
                    severity,
                    finding.source_domain,
                    finding.domain_authority,
                    finding.toxicity_score
                );
                for reason in &finding.reasons {
                    println!("      - {}", reason.dimmed());
                }
            }
            println!();
        }

        let velocity = &profile.velocity;
        let trend = match velocity.trend {
            Trend::Accelerating => "accelerating".bright_green(),
            Trend::Growing => "growing".green(),
            Trend::Stable => "stable".bright_white(),
            Trend::Slowing => "slowing".yellow(),
            Trend::Declining => "declining".bright_red(),
        };
        println!(
            "{}{}",
            "Link Velocity".bright_yellow().bold().underline(),
            if velocity.simulated {
                " (estimated)".dimmed().to_string()
            } else {
                String::new()
            }
        );
        println!("  New (30d / 90d): {} / {}", velocity.new_links_30d, velocity.new_links_90d);
        println!("  Acceleration:    {:.1}% ({})", velocity.acceleration_pct, trend);
        println!("  Health Score:    {}", Self::score(velocity.health_score));
        for warning in &velocity.warnings {
            println!("  [{}] {}", "WARN ".yellow(), warning);
        }
        println!();

        Self::print_list("Insights", &assessment.insights, "INFO ".bright_cyan());
        Self::print_list(
            "Recommendations",
            &assessment.recommendations,
            "TIP  ".bright_green(),
        );

        Self::footer();
    }

    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        eprintln!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
