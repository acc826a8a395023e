use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "linkscope")]
#[command(
    about = "Categorize page links, score link quality, walk sitemaps and audit backlink profiles",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: text or json (default: text)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Save report to file (JSON)
    #[arg(short, long, global = true)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Page fetch timeout in seconds (default: 10)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Link liveness check timeout in seconds (default: 5)
    #[arg(long, global = true)]
    pub head_timeout: Option<u64>,

    /// Number of pages fetched concurrently in a sitemap walk (default: 3)
    #[arg(short = 'c', long, global = true)]
    pub concurrency: Option<usize>,

    /// Delay between page fetches in milliseconds (default: 300)
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Maximum number of URLs gathered from a sitemap (default: 1000)
    #[arg(long, global = true)]
    pub max_sitemap_urls: Option<usize>,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Categorize and score every link on a single page
    Page {
        /// The page URL
        #[arg(value_name = "URL")]
        url: String,

        /// Check whether the page's outbound links are alive
        #[arg(long)]
        check_links: bool,

        /// Number of links to check with --check-links (default: 10)
        #[arg(long)]
        link_check_limit: Option<usize>,
    },

    /// Walk a sitemap (or sitemap index) and analyze the links of each page
    Sitemap {
        /// The sitemap URL
        #[arg(value_name = "URL")]
        url: String,

        /// Maximum number of pages to analyze (default: 50, at most 500)
        #[arg(short, long)]
        max_pages: Option<usize>,

        /// Stop dispatching new pages after this many seconds
        #[arg(long)]
        deadline: Option<u64>,
    },

    /// Analyze several pages in one run; each page succeeds or fails on its own
    Batch {
        /// The page URLs
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// Summarize the external domains a page links out to
    Outbound {
        /// The page URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// List the page URLs of a sitemap (or sitemap index) without analyzing them
    SitemapUrls {
        /// The sitemap URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Audit a domain's backlink profile (simulated data)
    Backlinks {
        /// The domain to audit
        #[arg(value_name = "DOMAIN")]
        domain: String,

        /// Seed for reproducible simulated data
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    pub fn wants_json(&self) -> bool {
        self.output.as_deref() == Some("json")
    }
}
