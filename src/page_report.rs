use crate::classifier::normalize_domain;
use crate::models::{CategoryBucket, FollowType, Link, PageReport};
use crate::taxonomy::{Category, Taxonomy};
use std::collections::{BTreeMap, HashMap};
use url::Url;

/// Point table for the page link-quality score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    pub base_score: i32,
    pub navigation_rich_min: usize,
    pub navigation_rich_bonus: i32,
    pub navigation_missing_penalty: i32,
    pub social_bonus: i32,
    pub legal_bonus: i32,
    pub legal_missing_penalty: i32,
    pub support_bonus: i32,
    pub support_missing_penalty: i32,
    /// Content + business links needed for the content-volume bonus
    pub content_volume_min: usize,
    pub content_volume_bonus: i32,
    pub healthy_external_min_pct: f64,
    pub healthy_external_max_pct: f64,
    pub healthy_external_bonus: i32,
    pub excessive_external_pct: f64,
    pub excessive_external_penalty: i32,
    pub full_anchor_coverage_bonus: i32,
    pub missing_anchor_max_ratio: f64,
    pub missing_anchor_penalty: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: 65,
            navigation_rich_min: 5,
            navigation_rich_bonus: 5,
            navigation_missing_penalty: 10,
            social_bonus: 3,
            legal_bonus: 5,
            legal_missing_penalty: 5,
            support_bonus: 3,
            support_missing_penalty: 3,
            content_volume_min: 10,
            content_volume_bonus: 5,
            healthy_external_min_pct: 0.2,
            healthy_external_max_pct: 30.0,
            healthy_external_bonus: 7,
            excessive_external_pct: 70.0,
            excessive_external_penalty: 10,
            full_anchor_coverage_bonus: 5,
            missing_anchor_max_ratio: 0.2,
            missing_anchor_penalty: 10,
        }
    }
}

pub const NO_LINKS_INSIGHT: &str = "No links found on this page.";
pub const NO_LINKS_WARNING: &str =
    "Pages with no links may have poor user experience and limited SEO value.";

/// Counts a report's text and score are derived from
#[derive(Debug, Clone, Copy, Default)]
struct LinkStats {
    total: usize,
    navigation: usize,
    social: usize,
    legal: usize,
    support: usize,
    content: usize,
    business: usize,
    media: usize,
    utility: usize,
    external: usize,
    external_nofollow: usize,
    missing_anchor: usize,
    sponsored: usize,
}

impl LinkStats {
    fn external_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.external as f64 / self.total as f64 * 100.0
        }
    }

    fn internal(&self) -> usize {
        self.total - self.external
    }
}

/// Builds [`PageReport`]s from classified links.
pub struct PageReportBuilder<'a> {
    taxonomy: &'a Taxonomy,
    rules: &'a ScoringRules,
}

impl<'a> PageReportBuilder<'a> {
    pub fn new(taxonomy: &'a Taxonomy, rules: &'a ScoringRules) -> Self {
        Self { taxonomy, rules }
    }

    pub fn build(&self, page_url: &str, links: Vec<Link>) -> PageReport {
        let page_domain = Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(normalize_domain))
            .unwrap_or_default();

        let total = links.len();
        let mut categories: BTreeMap<Category, CategoryBucket> = self
            .taxonomy
            .categories()
            .map(|category| {
                (
                    category,
                    CategoryBucket {
                        name: category,
                        description: self.taxonomy.description(category).to_string(),
                        count: 0,
                        percentage: 0.0,
                        links: Vec::new(),
                    },
                )
            })
            .collect();

        let mut follow: HashMap<FollowType, usize> = HashMap::new();
        let mut stats = LinkStats {
            total,
            ..Default::default()
        };

        for link in links {
            *follow.entry(link.follow_status()).or_default() += 1;

            if !link.has_anchor_text() {
                stats.missing_anchor += 1;
            }
            if link.is_sponsored {
                stats.sponsored += 1;
            }
            if link.category == Category::External && link.is_nofollow {
                stats.external_nofollow += 1;
            }

            let bucket = categories
                .entry(link.category)
                .or_insert_with(|| CategoryBucket {
                    name: link.category,
                    description: self.taxonomy.description(link.category).to_string(),
                    count: 0,
                    percentage: 0.0,
                    links: Vec::new(),
                });
            bucket.links.push(link);
        }

        for bucket in categories.values_mut() {
            bucket.count = bucket.links.len();
            bucket.percentage = percentage(bucket.count, total);
        }

        let count = |c: Category| categories.get(&c).map_or(0, |b| b.count);
        stats.navigation = count(Category::Navigation);
        stats.social = count(Category::Social);
        stats.legal = count(Category::Legal);
        stats.support = count(Category::Support);
        stats.content = count(Category::Content);
        stats.business = count(Category::Business);
        stats.media = count(Category::Media);
        stats.utility = count(Category::Utility);
        stats.external = count(Category::External);

        let (insights, warnings, recommendations) = if total == 0 {
            (
                vec![NO_LINKS_INSIGHT.to_string()],
                vec![NO_LINKS_WARNING.to_string()],
                Vec::new(),
            )
        } else {
            self.narrate(&stats)
        };

        let follow_count = |f: FollowType| follow.get(&f).copied().unwrap_or(0);
        PageReport {
            page_url: page_url.to_string(),
            page_domain,
            total_links: total,
            internal_links: stats.internal(),
            external_links: stats.external,
            dofollow_links: follow_count(FollowType::Dofollow),
            nofollow_links: follow_count(FollowType::Nofollow),
            sponsored_links: stats.sponsored,
            ugc_links: follow_count(FollowType::Ugc),
            missing_anchor_text: stats.missing_anchor,
            quality_score: self.quality_score(&stats),
            categories,
            insights,
            warnings,
            recommendations,
        }
    }

    fn quality_score(&self, stats: &LinkStats) -> u8 {
        let rules = self.rules;
        let mut score = rules.base_score;

        if stats.navigation >= rules.navigation_rich_min {
            score += rules.navigation_rich_bonus;
        } else if stats.navigation == 0 {
            score -= rules.navigation_missing_penalty;
        }

        if stats.social > 0 {
            score += rules.social_bonus;
        }

        if stats.legal > 0 {
            score += rules.legal_bonus;
        } else {
            score -= rules.legal_missing_penalty;
        }

        if stats.support > 0 {
            score += rules.support_bonus;
        } else {
            score -= rules.support_missing_penalty;
        }

        if stats.content + stats.business >= rules.content_volume_min {
            score += rules.content_volume_bonus;
        }

        let external_pct = stats.external_pct();
        if (rules.healthy_external_min_pct..=rules.healthy_external_max_pct).contains(&external_pct)
        {
            score += rules.healthy_external_bonus;
        } else if external_pct > rules.excessive_external_pct {
            score -= rules.excessive_external_penalty;
        }

        if stats.total > 0 {
            if stats.missing_anchor == 0 {
                score += rules.full_anchor_coverage_bonus;
            } else if stats.missing_anchor as f64
                > stats.total as f64 * rules.missing_anchor_max_ratio
            {
                score -= rules.missing_anchor_penalty;
            }
        }

        score.clamp(0, 100) as u8
    }

    fn narrate(&self, stats: &LinkStats) -> (Vec<String>, Vec<String>, Vec<String>) {
        let mut insights = Vec::new();
        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        match stats.navigation {
            0 => {
                warnings.push(
                    "No navigation links detected. Users may have difficulty navigating your site."
                        .to_string(),
                );
                recommendations.push(
                    "Add clear navigation links (home, about, contact, services) to improve user experience."
                        .to_string(),
                );
            }
            n if n < self.rules.navigation_rich_min => {
                insights.push(format!(
                    "Limited navigation: Only {} navigation links found.",
                    n
                ));
                recommendations.push(
                    "Consider adding more navigation options for better site structure.".to_string(),
                );
            }
            n => insights.push(format!(
                "Good navigation structure: {} navigation links found.",
                n
            )),
        }

        if stats.social == 0 {
            recommendations
                .push("Add social media links to increase brand visibility and engagement.".to_string());
        } else {
            insights.push(format!(
                "Social presence: {} social media links found.",
                stats.social
            ));
        }

        if stats.legal == 0 {
            warnings.push(
                "No legal/policy links found. This may affect user trust and compliance.".to_string(),
            );
            recommendations
                .push("Add privacy policy, terms of service, and other compliance pages.".to_string());
        } else {
            insights.push(format!(
                "Legal compliance: {} legal/policy links present.",
                stats.legal
            ));
        }

        if stats.support == 0 {
            recommendations.push(
                "Link to help, FAQ, or documentation pages so visitors can find support.".to_string(),
            );
        } else {
            insights.push(format!(
                "Support resources: {} help/support links found.",
                stats.support
            ));
        }

        let content_links = stats.content + stats.business;
        if content_links == 0 {
            warnings.push(
                "No business/content links found. Add blog posts, resources, or product pages."
                    .to_string(),
            );
        } else {
            insights.push(format!(
                "Content depth: {} business/content links found.",
                content_links
            ));
        }

        let external_pct = stats.external_pct();
        if stats.external == 0 {
            warnings.push(
                "No external links found. Consider linking to authoritative sources to build trust."
                    .to_string(),
            );
            recommendations
                .push("Add relevant external links to trusted sources in your industry.".to_string());
        } else if external_pct > self.rules.excessive_external_pct {
            warnings.push(format!(
                "High external link ratio ({:.0}%). This may dilute your link equity.",
                external_pct
            ));
            recommendations.push(
                "Balance external links with more internal linking to keep users on your site."
                    .to_string(),
            );
        } else {
            insights.push(format!(
                "Balanced external linking: {} external links ({:.0}%).",
                stats.external, external_pct
            ));
        }

        if stats.external_nofollow > 0 && stats.external > 0 {
            let nofollow_pct = stats.external_nofollow as f64 / stats.external as f64 * 100.0;
            insights.push(format!(
                "{:.0}% of external links use nofollow attribute (good for link juice preservation).",
                nofollow_pct
            ));
        }

        if stats.media > 0 {
            insights.push(format!(
                "Rich content: {} media/download links found.",
                stats.media
            ));
        }

        if stats.utility > 10 {
            insights.push(format!(
                "Many utility links ({}). Ensure they don't clutter the user experience.",
                stats.utility
            ));
        }

        let internal = stats.internal();
        if internal > 0 && stats.external > 0 {
            let ratio = internal as f64 / stats.external as f64;
            if ratio >= 3.0 {
                insights.push(format!(
                    "Excellent internal linking: {:.1}:1 ratio of internal to external links.",
                    ratio
                ));
            } else if ratio >= 1.5 {
                insights.push(format!(
                    "Good internal linking: {:.1}:1 ratio of internal to external links.",
                    ratio
                ));
            } else {
                warnings.push(format!(
                    "Low internal linking ratio: {:.1}:1. Consider adding more internal links.",
                    ratio
                ));
                recommendations
                    .push("Strengthen internal linking to improve site structure and SEO.".to_string());
            }
        }

        if stats.missing_anchor > 0 {
            warnings.push(format!(
                "{} links have no anchor text. This is bad for accessibility and SEO.",
                stats.missing_anchor
            ));
            recommendations.push(
                "Add descriptive anchor text to all links for better user experience and SEO."
                    .to_string(),
            );
        }

        if stats.sponsored > 0 {
            insights.push(format!(
                "{} links properly marked as sponsored.",
                stats.sponsored
            ));
        }

        (insights, warnings, recommendations)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
    }
}
