use crate::histogram::build_histogram;
use crate::model::{HistogramBucket, RiskSummary};
use pricing_lens_common::{PricingLensError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitPercentiles {
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

/// renderable shape of a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskView {
    pub histogram: Vec<HistogramBucket>,
    pub mean_profit: f64,
    pub std_profit: f64,
    pub prob_loss: f64,
    pub runs: usize,
    pub percentiles: ProfitPercentiles,
}

pub fn summarize_risk(summary: &RiskSummary, bucket_count: usize) -> Result<RiskView> {
    if summary.profits.is_empty() {
        return Err(PricingLensError::MalformedPayload("profits is empty".into()));
    }
    for (name, v) in [("mean_profit", summary.mean_profit), ("std_profit", summary.std_profit), ("prob_loss", summary.prob_loss)] {
        if !v.is_finite() {
            return Err(PricingLensError::MalformedPayload(format!("{name} is not finite: {v}")));
        }
    }
    if !(0.0..=1.0).contains(&summary.prob_loss) {
        return Err(PricingLensError::MalformedPayload(format!("prob_loss out of [0, 1]: {}", summary.prob_loss)));
    }
    if let Some(i) = summary.profits.iter().position(|p| !p.is_finite()) {
        return Err(PricingLensError::MalformedPayload(format!("profits[{i}] is not finite")));
    }
    let mut sorted = summary.profits.clone();
    sorted.sort_by(f64::total_cmp);
    let (Some(p5), Some(p50), Some(p95)) = (percentile(&sorted, 5), percentile(&sorted, 50), percentile(&sorted, 95)) else {
        return Err(PricingLensError::MalformedPayload("profits is empty".into()));
    };
    Ok(RiskView {
        histogram: build_histogram(&summary.profits, bucket_count),
        mean_profit: summary.mean_profit,
        std_profit: summary.std_profit,
        prob_loss: summary.prob_loss,
        runs: summary.profits.len(),
        percentiles: ProfitPercentiles { p5, p50, p95 },
    })
}

/// nearest-rank-below on sorted data: sorted[floor(pct/100 * (n-1))]; None when empty
pub fn percentile(sorted: &[f64], pct: u8) -> Option<f64> {
    if sorted.is_empty() { return None; }
    let idx = ((pct.min(100) as f64 / 100.0) * (sorted.len() - 1) as f64).floor() as usize;
    sorted.get(idx).copied()
}
