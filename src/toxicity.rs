use crate::models::{BacklinkRecord, Severity, ToxicFinding, is_missing_anchor};

/// Signal weights for the additive toxicity score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxicityWeights {
    pub very_low_authority: u32,
    pub low_authority: u32,
    pub suspicious_domain: u32,
    pub suspicious_tld: u32,
    pub keyword_stuffing: u32,
    pub spam_keywords: u32,
    pub risky_page_type: u32,
    pub generic_anchor: u32,
}

impl Default for ToxicityWeights {
    fn default() -> Self {
        Self {
            very_low_authority: 40,
            low_authority: 20,
            suspicious_domain: 50,
            suspicious_tld: 15,
            keyword_stuffing: 20,
            spam_keywords: 25,
            risky_page_type: 30,
            generic_anchor: 15,
        }
    }
}

/// Word lists and thresholds used by [`ToxicityScorer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxicityRules {
    pub weights: ToxicityWeights,
    pub spam_keywords: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub generic_anchors: Vec<String>,
    pub very_low_authority_below: u8,
    pub low_authority_below: u8,
    /// Anchors with more words than this count as keyword stuffing
    pub max_anchor_words: usize,
    pub high_threshold: u32,
    pub medium_threshold: u32,
    pub low_threshold: u32,
}

const SPAM_KEYWORDS: &[&str] = &[
    "spam", "casino", "poker", "viagra", "pharma", "loan", "debt", "crypto", "forex", "trading",
    "xxx", "adult", "porn", "cheap", "free", "money", "weight loss", "dating", "escort",
];

const SUSPICIOUS_TLDS: &[&str] = &[".biz", ".info", ".tk", ".ml", ".ga", ".cf", ".gq"];

const GENERIC_ANCHORS: &[&str] = &[
    "click here",
    "read more",
    "check this out",
    "here",
    "link",
    "more info",
    "learn more",
    "continue reading",
    "view more",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ToxicityRules {
    fn default() -> Self {
        Self {
            weights: ToxicityWeights::default(),
            spam_keywords: owned(SPAM_KEYWORDS),
            suspicious_tlds: owned(SUSPICIOUS_TLDS),
            generic_anchors: owned(GENERIC_ANCHORS),
            very_low_authority_below: 10,
            low_authority_below: 20,
            max_anchor_words: 4,
            high_threshold: 70,
            medium_threshold: 40,
            low_threshold: 15,
        }
    }
}

impl ToxicityRules {
    /// Appends extra list entries (from a config file), lowercased and de-duplicated.
    pub fn extend(
        &mut self,
        spam_keywords: &[String],
        suspicious_tlds: &[String],
        generic_anchors: &[String],
    ) {
        fn merge(into: &mut Vec<String>, extra: &[String], normalize: impl Fn(&str) -> String) {
            for item in extra {
                let item = normalize(item);
                if !item.is_empty() && !into.contains(&item) {
                    into.push(item);
                }
            }
        }

        merge(&mut self.spam_keywords, spam_keywords, |s| s.trim().to_lowercase());
        merge(&mut self.suspicious_tlds, suspicious_tlds, |s| {
            let tld = s.trim().to_lowercase();
            if tld.is_empty() || tld.starts_with('.') {
                tld
            } else {
                format!(".{}", tld)
            }
        });
        merge(&mut self.generic_anchors, generic_anchors, |s| s.trim().to_lowercase());
    }

    pub fn severity_for(&self, score: u32) -> Severity {
        if score >= self.high_threshold {
            Severity::High
        } else if score >= self.medium_threshold {
            Severity::Medium
        } else if score >= self.low_threshold {
            Severity::Low
        } else {
            Severity::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxicityScore {
    pub is_toxic: bool,
    pub severity: Severity,
    pub reasons: Vec<String>,
    pub raw_score: u32,
}

/// Weighted spam-risk heuristic for backlinks.
///
/// Signals are independent and additive, so every signal that fires adds its
/// weight and its reason; reasons keep evaluation order.
pub struct ToxicityScorer<'a> {
    rules: &'a ToxicityRules,
}

impl<'a> ToxicityScorer<'a> {
    pub fn new(rules: &'a ToxicityRules) -> Self {
        Self { rules }
    }

    pub fn score(&self, record: &BacklinkRecord) -> ToxicityScore {
        let rules = self.rules;
        let weights = &rules.weights;
        let mut score = 0;
        let mut reasons = Vec::new();

        let da = record.domain_authority;
        if da < rules.very_low_authority_below {
            score += weights.very_low_authority;
            reasons.push(format!("Very low domain authority (DA {})", da));
        } else if da < rules.low_authority_below {
            score += weights.low_authority;
            reasons.push(format!("Low domain authority (DA {})", da));
        }

        let domain = record.source_domain.trim().to_lowercase();
        if rules.spam_keywords.iter().any(|kw| domain.contains(kw.as_str())) {
            score += weights.suspicious_domain;
            reasons.push("Suspicious domain name pattern detected".to_string());
        }

        if let Some(tld) = rules
            .suspicious_tlds
            .iter()
            .find(|tld| domain.ends_with(tld.as_str()))
        {
            score += weights.suspicious_tld;
            reasons.push(format!("Suspicious TLD ({})", tld));
        }

        let anchor = if is_missing_anchor(&record.anchor_text) {
            String::new()
        } else {
            record.anchor_text.trim().to_lowercase()
        };

        if anchor.split_whitespace().count() > rules.max_anchor_words {
            score += weights.keyword_stuffing;
            reasons.push("Possible keyword stuffing in anchor text".to_string());
        }

        if rules.spam_keywords.iter().any(|kw| anchor.contains(kw.as_str())) {
            score += weights.spam_keywords;
            reasons.push("Spam keyword in anchor text".to_string());
        }

        if record.page_type.is_risky() {
            score += weights.risky_page_type;
            reasons.push(format!("Risky page type ({})", record.page_type.as_str()));
        }

        if rules.generic_anchors.iter().any(|generic| *generic == anchor) {
            score += weights.generic_anchor;
            reasons.push("Generic anchor text".to_string());
        }

        let severity = rules.severity_for(score);
        ToxicityScore {
            is_toxic: severity != Severity::None,
            severity,
            reasons,
            raw_score: score,
        }
    }

    /// Scores `record` and returns a finding only when it is toxic.
    pub fn finding(&self, record: &BacklinkRecord) -> Option<ToxicFinding> {
        let score = self.score(record);
        score.is_toxic.then(|| ToxicFinding {
            source_domain: record.source_domain.clone(),
            domain_authority: record.domain_authority,
            severity: score.severity,
            toxicity_score: score.raw_score,
            reasons: score.reasons,
        })
    }
}
