//! Link-velocity estimation.
//!
//! There is no backlink history to measure growth from, so every figure here is
//! an estimate drawn from a sustainable growth range. Reports always carry
//! `simulated: true` and must not be presented as measured data.

use crate::models::{Trend, VelocityReport};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct VelocitySettings {
    pub min_growth: f64,
    pub max_growth: f64,
    pub high_weight: f64,
    pub medium_weight: f64,
    pub low_weight: f64,
    /// Upper bound on 30-day new links as a fraction of total backlinks
    pub max_30d_share: f64,
    /// Upper bound on 90-day new links as a fraction of total backlinks
    pub max_90d_share: f64,
    pub accelerating_pct: f64,
    pub growing_pct: f64,
    pub slowing_pct: f64,
    pub declining_pct: f64,
    /// Profiles above this size are "established" and penalized for stalling
    pub established_profile_min: u32,
    pub excellent_ratio: u32,
    pub good_ratio: u32,
    pub spike_pct: f64,
}

impl Default for VelocitySettings {
    fn default() -> Self {
        Self {
            min_growth: 0.05,
            max_growth: 0.15,
            high_weight: 3.0,
            medium_weight: 1.5,
            low_weight: 1.0,
            max_30d_share: 0.25,
            max_90d_share: 0.6,
            accelerating_pct: 20.0,
            growing_pct: 5.0,
            slowing_pct: -5.0,
            declining_pct: -20.0,
            established_profile_min: 20,
            excellent_ratio: 5,
            good_ratio: 10,
            spike_pct: 50.0,
        }
    }
}

/// Authority-bucketed backlink counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorityCounts {
    pub total_backlinks: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

pub struct VelocityEstimator<'a> {
    settings: &'a VelocitySettings,
}

impl<'a> VelocityEstimator<'a> {
    pub fn new(settings: &'a VelocitySettings) -> Self {
        Self { settings }
    }

    /// Estimates velocity with growth rates drawn from `rng`.
    ///
    /// The result is simulated; pass a seeded rng for reproducible output.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        counts: AuthorityCounts,
        rng: &mut R,
    ) -> VelocityReport {
        let (min, max) = (self.settings.min_growth, self.settings.max_growth);
        let current_rate = rng.gen_range(min..=max);
        let previous_rate = rng.gen_range(min..=max);
        self.estimate_with_rates(counts, current_rate, previous_rate)
    }

    pub fn weighted_total(&self, counts: AuthorityCounts) -> f64 {
        counts.high as f64 * self.settings.high_weight
            + counts.medium as f64 * self.settings.medium_weight
            + counts.low as f64 * self.settings.low_weight
    }

    /// Deterministic core of [`estimate`](Self::estimate).
    pub fn estimate_with_rates(
        &self,
        counts: AuthorityCounts,
        current_rate: f64,
        previous_rate: f64,
    ) -> VelocityReport {
        let s = self.settings;
        let weighted = self.weighted_total(counts);
        let total = counts.total_backlinks as f64;

        let new_30 = (weighted * current_rate)
            .round()
            .min((total * s.max_30d_share).floor())
            .max(0.0) as u32;
        let new_90 = (weighted * current_rate * 3.0)
            .round()
            .min((total * s.max_90d_share).floor())
            .max(new_30 as f64) as u32;
        let previous_30 = (weighted * previous_rate)
            .round()
            .min((total * s.max_30d_share).floor())
            .max(0.0) as u32;

        let acceleration_pct = if previous_30 == 0 {
            0.0
        } else {
            let pct = (new_30 as f64 - previous_30 as f64) / previous_30 as f64 * 100.0;
            (pct * 10.0).round() / 10.0
        };

        let trend = self.trend_for(acceleration_pct);
        let health_score = self.health_score(counts.total_backlinks, new_30);

        let mut warnings = Vec::new();
        if new_30 == 0 && counts.total_backlinks > s.established_profile_min {
            warnings.push(
                "Link acquisition has stalled: no new backlinks estimated in the last 30 days."
                    .to_string(),
            );
        }
        if trend == Trend::Declining {
            warnings.push(format!(
                "Link velocity is declining ({:.1}% vs previous period).",
                acceleration_pct
            ));
        }
        if acceleration_pct > s.spike_pct {
            warnings.push(format!(
                "Unusually fast link growth ({:.1}%) may look unnatural to search engines.",
                acceleration_pct
            ));
        }

        VelocityReport {
            new_links_30d: new_30,
            new_links_90d: new_90,
            acceleration_pct,
            trend,
            health_score,
            warnings,
            simulated: true,
        }
    }

    pub fn trend_for(&self, acceleration_pct: f64) -> Trend {
        let s = self.settings;
        if acceleration_pct > s.accelerating_pct {
            Trend::Accelerating
        } else if acceleration_pct > s.growing_pct {
            Trend::Growing
        } else if acceleration_pct < s.declining_pct {
            Trend::Declining
        } else if acceleration_pct < s.slowing_pct {
            Trend::Slowing
        } else {
            Trend::Stable
        }
    }

    pub fn health_score(&self, total_backlinks: u32, new_30: u32) -> u8 {
        let s = self.settings;
        if total_backlinks == 0 {
            return 50;
        }
        if new_30 == 0 && total_backlinks > s.established_profile_min {
            return 20;
        }
        let (new_30, total) = (u64::from(new_30), u64::from(total_backlinks));
        if new_30 * u64::from(s.excellent_ratio) >= total {
            90
        } else if new_30 * u64::from(s.good_ratio) >= total {
            75
        } else {
            50
        }
    }
}
