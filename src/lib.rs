pub mod analyzer;
pub mod backlinks;
pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod http_client;
pub mod link_checker;
pub mod models;
pub mod outbound;
pub mod page_report;
pub mod reporter;
pub mod sitemap;
pub mod taxonomy;
pub mod toxicity;
pub mod velocity;

use analyzer::LinkAnalyzer;
use anyhow::{Result, bail};
use backlinks::{BacklinkAnalyzer, SimulatedProvider};
use batch::BatchAnalyzer;
use cli::{Cli, Command};
use colored::*;
use config::{Config, EngineConfig};
use link_checker::LinkChecker;
use outbound::summarize_outbound;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reporter::Reporter;
use serde::Serialize;
use sitemap::SitemapWalker;
use std::sync::Arc;

pub async fn run(args: Cli) -> Result<()> {
    let file_config = Config::load(&args)?;
    let args = file_config.merge_with_cli(&args);
    let engine = Arc::new(EngineConfig::build(&args, &file_config)?);

    if !args.wants_json() {
        println!("{}", "linkscope - Link Intelligence".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!();
    }

    match &args.command {
        Command::Page {
            url, check_links, ..
        } => run_page(&args, engine, url, *check_links).await,
        Command::Sitemap { url, .. } => run_sitemap(&args, engine, url).await,
        Command::Batch { urls } => run_batch(&args, engine, urls).await,
        Command::Outbound { url } => run_outbound(&args, engine, url).await,
        Command::SitemapUrls { url } => run_sitemap_urls(&args, engine, url).await,
        Command::Backlinks { domain, seed } => run_backlinks(&args, engine, domain, *seed).await,
    }
}

async fn run_page(
    args: &Cli,
    engine: Arc<EngineConfig>,
    url: &str,
    check_links: bool,
) -> Result<()> {
    let link_check_limit = engine.link_check_limit;
    let analyzer = LinkAnalyzer::new(engine)?;
    let chatty = args.verbose && !args.wants_json();

    if chatty {
        println!("{} {}", "Analyzing page:".bright_white().bold(), url);
    }

    let mut analysis = analyzer.analyze_page(url).await;

    if check_links && let Some(report) = &analysis.report {
        if chatty {
            println!("{}", "Checking links...".bright_yellow());
        }
        let checker = LinkChecker::new(analyzer.fetcher(), link_check_limit);
        analysis.link_health = Some(checker.check_report(report).await);
    }

    emit(args, &analysis, Reporter::print_page_analysis)
}

async fn run_sitemap(args: &Cli, engine: Arc<EngineConfig>, url: &str) -> Result<()> {
    let analyzer = LinkAnalyzer::new(engine)?;
    let mut walker = SitemapWalker::new(url, analyzer);

    if !args.wants_json() {
        println!("{} {}", "Walking sitemap:".bright_white().bold(), url);
        println!();
        walker.enable_progress_bar();
    }

    let token = walker.cancellation_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight pages");
            token.cancel();
        }
    });

    let report = walker.walk().await;
    ctrl_c.abort();
    let report = report?;

    if !args.wants_json() {
        println!(
            "{} {} pages analyzed, {} failed",
            "Success:".bright_green().bold(),
            report.total_pages_crawled,
            report.failed_pages
        );
    }

    emit(args, &report, Reporter::print_sitemap_report)
}

async fn run_batch(args: &Cli, engine: Arc<EngineConfig>, urls: &[String]) -> Result<()> {
    let analyzer = LinkAnalyzer::new(engine)?;

    if !args.wants_json() {
        println!("{} {} pages", "Analyzing:".bright_white().bold(), urls.len());
        println!();
    }

    let report = BatchAnalyzer::new(analyzer).analyze(urls).await;
    emit(args, &report, Reporter::print_batch_report)
}

async fn run_outbound(args: &Cli, engine: Arc<EngineConfig>, url: &str) -> Result<()> {
    let analyzer = LinkAnalyzer::new(engine)?;
    let analysis = analyzer.analyze_page(url).await;

    let Some(report) = &analysis.report else {
        let reason = analysis
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "no report produced".to_string());
        bail!("Failed to analyze {}: {}", url, reason);
    };

    emit(args, &summarize_outbound(report), Reporter::print_outbound_report)
}

async fn run_sitemap_urls(args: &Cli, engine: Arc<EngineConfig>, url: &str) -> Result<()> {
    let analyzer = LinkAnalyzer::new(engine)?;
    let list = SitemapWalker::new(url, analyzer).list_urls().await?;
    emit(args, &list, Reporter::print_sitemap_urls)
}

async fn run_backlinks(
    args: &Cli,
    engine: Arc<EngineConfig>,
    domain: &str,
    seed: Option<u64>,
) -> Result<()> {
    let provider = SimulatedProvider::new(seed);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = BacklinkAnalyzer::new(&engine)
        .analyze(&provider, domain, &mut rng)
        .await?;

    emit(args, &report, Reporter::print_backlink_report)
}

fn emit<T: Serialize>(args: &Cli, report: &T, print_text: fn(&T)) -> Result<()> {
    if args.wants_json() {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_text(report);
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(report, filename)?;
    }

    Ok(())
}
