use crate::classifier::normalize_domain;
use crate::models::{FollowType, OutboundDomain, OutboundReport, PageReport};
use std::collections::HashMap;
use url::Url;

pub const MAX_EXTERNAL_DOMAINS: usize = 10;
pub const MAX_ANCHORS_PER_DOMAIN: usize = 3;

/// Groups a page's external links by target domain.
///
/// Domains are ordered by link count, then name, and capped at
/// [`MAX_EXTERNAL_DOMAINS`]; `unique_domains` still counts all of them.
pub fn summarize_outbound(report: &PageReport) -> OutboundReport {
    let mut by_domain: HashMap<String, OutboundDomain> = HashMap::new();
    let mut total_external_links = 0;

    for link in report.links().filter(|l| !l.is_internal) {
        let Some(domain) = Url::parse(&link.url)
            .ok()
            .and_then(|u| u.host_str().map(normalize_domain))
        else {
            continue;
        };
        total_external_links += 1;

        let entry = by_domain
            .entry(domain.clone())
            .or_insert_with(|| OutboundDomain {
                domain,
                link_count: 0,
                dofollow_count: 0,
                nofollow_count: 0,
                anchors: Vec::new(),
            });
        entry.link_count += 1;
        if link.follow_status() == FollowType::Dofollow {
            entry.dofollow_count += 1;
        } else {
            entry.nofollow_count += 1;
        }
        if link.has_anchor_text()
            && entry.anchors.len() < MAX_ANCHORS_PER_DOMAIN
            && !entry.anchors.contains(&link.anchor_text)
        {
            entry.anchors.push(link.anchor_text.clone());
        }
    }

    let unique_domains = by_domain.len();
    let mut domains: Vec<OutboundDomain> = by_domain.into_values().collect();
    domains.sort_by(|a, b| {
        b.link_count
            .cmp(&a.link_count)
            .then_with(|| a.domain.cmp(&b.domain))
    });
    domains.truncate(MAX_EXTERNAL_DOMAINS);

    OutboundReport {
        page_url: report.page_url.clone(),
        page_domain: report.page_domain.clone(),
        total_external_links,
        unique_domains,
        domains,
    }
}
