//! Backlink profile analysis.
//!
//! Backlink data comes from an external SEO data provider. The engine only
//! depends on [`BacklinkProvider`] and the provider-agnostic [`ProviderData`];
//! [`SimulatedProvider`] fabricates data for demos and tests and is labelled as
//! simulated everywhere it surfaces.

use crate::config::EngineConfig;
use crate::models::{
    AuthorityBuckets, BacklinkProfile, BacklinkRecord, BacklinkReport, FollowType, PageType,
    ProfileAssessment, ProfileSource, Severity, Trend,
};
use crate::toxicity::ToxicityScorer;
use crate::velocity::{AuthorityCounts, VelocityEstimator};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use url::Url;

pub const HIGH_AUTHORITY_MIN: u8 = 60;
pub const MEDIUM_AUTHORITY_MIN: u8 = 30;

/// Raw provider output, before toxicity and velocity are derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderData {
    pub domain: String,
    pub total_backlinks: u32,
    pub referring_domains: u32,
    pub dofollow_count: u32,
    pub nofollow_count: u32,
    pub records: Vec<BacklinkRecord>,
}

/// Source of backlink data for a domain (an Ahrefs/SEMrush-class API adapter,
/// or [`SimulatedProvider`]).
#[async_trait]
pub trait BacklinkProvider: Send + Sync {
    fn name(&self) -> &str;

    /// True when the data is fabricated rather than observed
    fn is_simulated(&self) -> bool;

    async fn fetch(&self, domain: &str) -> Result<ProviderData>;
}

const DOMAIN_ADJECTIVES: &[&str] = &[
    "digital", "smart", "pro", "best", "top", "perfect", "ultimate", "premium", "advanced",
    "elite", "expert", "professional", "trusted", "leading", "modern", "innovative", "optimal",
    "superior", "dynamic", "strategic",
];

const DOMAIN_NOUNS: &[&str] = &[
    "solutions", "services", "hub", "central", "studio", "agency", "tech", "labs", "media",
    "group", "marketing", "consulting", "insights", "analytics", "strategy", "content", "web",
    "online", "resources", "tools", "platform", "network", "exchange", "marketplace",
    "directory", "portal", "center", "syndicate",
];

const DOMAIN_TLDS: &[&str] = &[
    "com", "net", "org", "co", "io", "info", "biz", "blog", "site", "online", "tech", "website",
    "space", "work", "news", "guru",
];

const SPAMMY_DOMAINS: &[&str] = &[
    "free-casino-bonus.biz",
    "cheap-pharma-deals.tk",
    "crypto-money-fast.info",
    "best-loan-offers.ml",
];

const ANCHORS: &[&str] = &[
    "click here",
    "read more",
    "seo guide",
    "digital marketing",
    "keyword research",
    "link building",
    "content strategy",
    "web analytics",
    "learn more",
];

/// Fabricates a plausible-looking backlink profile.
///
/// **Simulated data.** Nothing here is measured; use it for demos and tests
/// only, never as an analysis of a real site.
pub struct SimulatedProvider {
    seed: Option<u64>,
}

impl SimulatedProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn domain_name(rng: &mut StdRng) -> String {
        let pick = |rng: &mut StdRng, list: &[&'static str]| -> &'static str {
            list.choose(rng).copied().unwrap_or("site")
        };
        let tld = pick(rng, DOMAIN_TLDS);
        match rng.gen_range(0..5) {
            0 => format!("{}{}.{}", pick(rng, DOMAIN_ADJECTIVES), pick(rng, DOMAIN_NOUNS), tld),
            1 => format!("{}-{}.{}", pick(rng, DOMAIN_ADJECTIVES), pick(rng, DOMAIN_NOUNS), tld),
            2 => format!("{}{}.{}", pick(rng, DOMAIN_NOUNS), pick(rng, DOMAIN_NOUNS), tld),
            3 => format!(
                "{}{}{}.{}",
                pick(rng, DOMAIN_ADJECTIVES),
                pick(rng, DOMAIN_NOUNS),
                rng.gen_range(1..100),
                tld
            ),
            _ => format!("{}.{}", pick(rng, DOMAIN_NOUNS), tld),
        }
    }

    pub fn generate(&self, domain: &str) -> ProviderData {
        let mut rng = self.rng();
        let referring_domains = rng.gen_range(15..=120u32);
        let mut records = Vec::with_capacity(referring_domains as usize);

        for _ in 0..referring_domains {
            let authority: u8 = match rng.gen_range(0..100) {
                0..=14 => rng.gen_range(60..=95),
                15..=54 => rng.gen_range(30..=59),
                _ => rng.gen_range(1..=29),
            };
            let follow_type = if rng.gen_bool(0.7) {
                FollowType::Dofollow
            } else {
                FollowType::Nofollow
            };
            let page_type = match rng.gen_range(0..100) {
                0..=29 => PageType::Homepage,
                30..=79 => PageType::InnerPage,
                80..=89 => PageType::Resource,
                90..=96 => PageType::Blog,
                _ => PageType::Comment,
            };
            records.push(BacklinkRecord {
                source_domain: Self::domain_name(&mut rng),
                domain_authority: authority,
                anchor_text: ANCHORS.choose(&mut rng).copied().unwrap_or("learn more").to_string(),
                follow_type,
                page_type,
            });
        }

        let spammy = rng.gen_range(0..=SPAMMY_DOMAINS.len());
        for spam_domain in SPAMMY_DOMAINS.iter().take(spammy) {
            records.push(BacklinkRecord {
                source_domain: spam_domain.to_string(),
                domain_authority: rng.gen_range(1..=12),
                anchor_text: "click here".to_string(),
                follow_type: FollowType::Dofollow,
                page_type: PageType::BlogSpam,
            });
        }

        let total_backlinks = records.len() as u32 * rng.gen_range(2..=6);
        let dofollow_share = records
            .iter()
            .filter(|r| r.follow_type == FollowType::Dofollow)
            .count() as f64
            / records.len().max(1) as f64;
        let dofollow_count = (total_backlinks as f64 * dofollow_share).round() as u32;

        ProviderData {
            domain: domain.to_string(),
            total_backlinks,
            referring_domains: records.len() as u32,
            dofollow_count,
            nofollow_count: total_backlinks - dofollow_count,
            records,
        }
    }
}

#[async_trait]
impl BacklinkProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    fn is_simulated(&self) -> bool {
        true
    }

    async fn fetch(&self, domain: &str) -> Result<ProviderData> {
        Ok(self.generate(domain))
    }
}

/// Turns provider data into a [`BacklinkProfile`] and assesses it.
pub struct BacklinkAnalyzer<'a> {
    config: &'a EngineConfig,
}

impl<'a> BacklinkAnalyzer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn build_profile<R: Rng + ?Sized>(
        &self,
        data: ProviderData,
        source: ProfileSource,
        rng: &mut R,
    ) -> BacklinkProfile {
        let scorer = ToxicityScorer::new(&self.config.toxicity);

        let mut toxic_links: Vec<_> = data
            .records
            .iter()
            .filter_map(|record| scorer.finding(record))
            .collect();
        toxic_links.sort_by(|a, b| b.toxicity_score.cmp(&a.toxicity_score));

        let mut buckets = AuthorityBuckets::default();
        for record in data.records {
            if record.domain_authority >= HIGH_AUTHORITY_MIN {
                buckets.high.push(record);
            } else if record.domain_authority >= MEDIUM_AUTHORITY_MIN {
                buckets.medium.push(record);
            } else {
                buckets.low.push(record);
            }
        }

        let counts = AuthorityCounts {
            total_backlinks: data.total_backlinks,
            high: buckets.high.len() as u32,
            medium: buckets.medium.len() as u32,
            low: buckets.low.len() as u32,
        };
        let velocity = VelocityEstimator::new(&self.config.velocity).estimate(counts, rng);

        BacklinkProfile {
            domain: data.domain,
            source,
            total_backlinks: data.total_backlinks,
            referring_domains: data.referring_domains,
            dofollow_count: data.dofollow_count,
            nofollow_count: data.nofollow_count,
            authority_buckets: buckets,
            toxic_links,
            velocity,
        }
    }

    /// Rule-based insights, recommendations and a 0–100 profile quality score.
    pub fn assess(&self, profile: &BacklinkProfile) -> ProfileAssessment {
        let mut insights = Vec::new();
        let mut recommendations = Vec::new();
        let mut score: i32 = 50;

        let total = profile.total_backlinks;
        let referring = profile.referring_domains;

        if total == 0 {
            insights.push("No backlinks detected. This is critical for SEO performance.".to_string());
            recommendations
                .push("Start outreach and link building campaigns immediately.".to_string());
        } else if referring > 0 {
            let per_domain = total as f64 / referring as f64;
            if per_domain > 5.0 {
                insights.push(format!(
                    "Strong link diversity: Average {:.1} links per domain.",
                    per_domain
                ));
                score += 5;
            } else {
                insights.push(format!(
                    "Limited link diversity: Only {:.1} links per domain on average.",
                    per_domain
                ));
                recommendations.push("Diversify your link sources across more domains.".to_string());
            }
        }

        let dofollow_ratio = if total > 0 {
            profile.dofollow_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        if dofollow_ratio < 50.0 {
            insights.push(format!(
                "Low dofollow ratio ({:.0}%). Many links may not pass link equity.",
                dofollow_ratio
            ));
            recommendations.push(
                "Focus on acquiring high-quality dofollow links from authoritative sites.".to_string(),
            );
        } else {
            insights.push(format!(
                "Healthy dofollow ratio ({:.0}%) - good link equity transfer.",
                dofollow_ratio
            ));
            score += 10;
        }

        let buckets = &profile.authority_buckets;
        let high = buckets.high.len();
        let counted = high + buckets.medium.len() + buckets.low.len();
        if high > 0 && counted > 0 {
            let high_pct = high as f64 / counted as f64 * 100.0;
            if high_pct >= 15.0 {
                insights.push(format!(
                    "Excellent link profile: {:.0}% of links from high-authority domains (DA {}+).",
                    high_pct, HIGH_AUTHORITY_MIN
                ));
                score += 20;
            } else {
                insights.push(format!(
                    "Need more authority links: Only {:.0}% from high-authority domains.",
                    high_pct
                ));
                recommendations.push(
                    "Target high-authority publications and resources for guest posting.".to_string(),
                );
                score += 5;
            }
        }

        let brand = profile
            .domain
            .trim_start_matches("www.")
            .split('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let (mut generic, mut branded) = (0, 0);
        for record in buckets.high.iter().chain(&buckets.medium).chain(&buckets.low) {
            let anchor = record.anchor_text.trim().to_lowercase();
            if self.config.toxicity.generic_anchors.contains(&anchor) {
                generic += 1;
            } else if !brand.is_empty() && anchor.contains(&brand) {
                branded += 1;
            }
        }
        let descriptive = counted - generic - branded;
        if descriptive > 0 {
            insights.push(format!(
                "Strong keyword anchors: {} links use descriptive anchor text.",
                descriptive
            ));
        }
        if generic > branded && generic > descriptive {
            insights.push(format!(
                "Many generic anchors ({}). Consider improving anchor text diversity.",
                generic
            ));
            recommendations.push(
                "Work with content partners to use descriptive anchor text in future links."
                    .to_string(),
            );
        }

        let toxic = &profile.toxic_links;
        if toxic.is_empty() {
            insights.push("Clean backlink profile - no obvious toxic links detected.".to_string());
            score += 10;
        } else {
            let high_severity = toxic.iter().filter(|t| t.severity == Severity::High).count();
            insights.push(format!(
                "Found {} potentially toxic links ({} high-severity).",
                toxic.len(),
                high_severity
            ));
            recommendations
                .push("Review and disavow toxic links using Google Search Console.".to_string());
            score -= (high_severity as i32 * 5).min(30);
        }

        let velocity = &profile.velocity;
        if velocity.health_score >= 75 {
            score += 5;
        } else if velocity.health_score <= 20 {
            score -= 10;
        }
        match velocity.trend {
            Trend::Growing | Trend::Accelerating if velocity.new_links_30d > 10 => {
                insights.push(format!(
                    "Positive trend: Growing backlinks ({} new in last 30 days, estimated).",
                    velocity.new_links_30d
                ));
            }
            Trend::Declining => {
                insights.push(
                    "Warning: Declining backlinks - lost some links recently (estimated).".to_string(),
                );
                recommendations.push(
                    "Analyze lost links and recreate valuable content to recover lost links."
                        .to_string(),
                );
            }
            _ => {}
        }

        let quality_score = score.clamp(0, 100) as u8;
        if quality_score >= 80 {
            insights.push(format!(
                "Excellent link quality score: {}/100. Your backlink profile is strong.",
                quality_score
            ));
        } else if quality_score >= 60 {
            insights.push(format!(
                "Good link quality score: {}/100. There's room for improvement.",
                quality_score
            ));
        } else {
            insights.push(format!(
                "Low link quality score: {}/100. Significant improvements needed.",
                quality_score
            ));
        }

        let mut summary = format!(
            "Analyzed {} backlinks from {} unique domains",
            total, referring
        );
        if profile.source.simulated {
            summary.push_str(" (simulated data)");
        }

        ProfileAssessment {
            summary,
            quality_score,
            high_authority_count: high,
            toxic_links_count: toxic.len(),
            insights,
            recommendations,
        }
    }

    /// Fetches `domain` from `provider`, then profiles and assesses it.
    pub async fn analyze<P, R>(
        &self,
        provider: &P,
        domain: &str,
        rng: &mut R,
    ) -> Result<BacklinkReport>
    where
        P: BacklinkProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let domain = normalize_target_domain(domain)?;
        let data = provider
            .fetch(&domain)
            .await
            .with_context(|| {
                format!("Backlink provider '{}' failed for {}", provider.name(), domain)
            })?;

        let source = ProfileSource {
            provider: provider.name().to_string(),
            simulated: provider.is_simulated(),
        };
        let profile = self.build_profile(data, source, rng);
        let assessment = self.assess(&profile);

        Ok(BacklinkReport {
            profile,
            assessment,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Accepts a bare domain or a URL and returns the lowercase host.
pub fn normalize_target_domain(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).with_context(|| format!("Invalid domain: '{}'", input))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid domain: '{}': only http and https URLs are accepted", input);
    }
    let host = url.host_str().unwrap_or_default().to_lowercase();

    if host.is_empty() || !host.contains('.') {
        bail!("Invalid domain: '{}'", input);
    }
    Ok(host)
}
