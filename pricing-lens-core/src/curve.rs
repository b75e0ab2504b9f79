use crate::model::{OptimizationResult, PriceProfitPoint};
use pricing_lens_common::{PricingLensError, Result};
use serde::Serialize;

const OPTIMUM_TOLERANCE: f64 = 1e-9;

/// reported optimum disagrees with the curve it came with
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimumMismatch {
    pub reported: PriceProfitPoint,
    pub scanned: PriceProfitPoint,
}

/// validated, borrowed view of an optimization result for charting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSummary<'a> {
    pub curve: &'a [PriceProfitPoint],
    pub optimal_price: f64,
    pub max_profit: f64,
    pub mismatch: Option<OptimumMismatch>,
}

pub fn summarize_curve(result: &OptimizationResult) -> Result<CurveSummary<'_>> {
    if result.curve.is_empty() { return Err(PricingLensError::EmptyCurve); }
    if !result.optimal_price.is_finite() || !result.max_profit.is_finite() {
        return Err(PricingLensError::MalformedPayload(format!(
            "non-finite optimum: optimal_price={}, max_profit={}",
            result.optimal_price, result.max_profit
        )));
    }
    if let Some((i, p)) = result.curve.iter().enumerate().find(|(_, p)| !p.price.is_finite() || !p.profit.is_finite()) {
        return Err(PricingLensError::MalformedPayload(format!(
            "non-finite curve point #{i}: price={}, profit={}", p.price, p.profit
        )));
    }
    let reported = PriceProfitPoint { price: result.optimal_price, profit: result.max_profit };
    let mismatch = scan_optimum(&result.curve)
        .filter(|s| !same_point(s, &reported))
        .map(|&scanned| OptimumMismatch { reported, scanned });
    if let Some(m) = &mismatch {
        tracing::warn!(
            reported_price = m.reported.price, reported_profit = m.reported.profit,
            scanned_price = m.scanned.price, scanned_profit = m.scanned.profit,
            "reported optimum does not match curve maximum"
        );
    }
    Ok(CurveSummary {
        curve: &result.curve,
        optimal_price: result.optimal_price,
        max_profit: result.max_profit,
        mismatch,
    })
}

/// first point with maximal profit (ties -> earliest)
pub fn scan_optimum(curve: &[PriceProfitPoint]) -> Option<&PriceProfitPoint> {
    curve.iter().fold(None, |best: Option<&PriceProfitPoint>, p| match best {
        Some(b) if b.profit >= p.profit => Some(b),
        _ => Some(p),
    })
}

/// (min, max) profit across the curve, for chart y-axis bounds
pub fn profit_bounds(curve: &[PriceProfitPoint]) -> Option<(f64, f64)> {
    if curve.is_empty() { return None; }
    let min = curve.iter().map(|p| p.profit).fold(f64::INFINITY, f64::min);
    let max = curve.iter().map(|p| p.profit).fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

fn same_point(a: &PriceProfitPoint, b: &PriceProfitPoint) -> bool {
    (a.price - b.price).abs() <= OPTIMUM_TOLERANCE && (a.profit - b.profit).abs() <= OPTIMUM_TOLERANCE
}
