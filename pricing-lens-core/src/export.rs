use std::io::Write;
use std::path::Path;
use serde::Serialize;
use pricing_lens_common::Result;
use crate::curve::CurveSummary;
use crate::model::{HistogramBucket, PointOutcome, PriceProfitPoint};
use crate::risk::RiskView;

// --- headless output ---

pub fn print_point(outcome: &PointOutcome) {
    println!("{:<16} {}", "Demand:", outcome.demand);
    println!("{:<16} {}", "Revenue:", outcome.revenue);
    println!("{:<16} {}", "Total cost:", outcome.total_cost);
    println!("{:<16} {}", "Profit:", outcome.profit);
}

pub fn print_curve_summary(summary: &CurveSummary<'_>) {
    println!("{:<16} {}", "Points:", summary.curve.len());
    println!("{:<16} {}", "Optimal price:", summary.optimal_price);
    println!("{:<16} {}", "Max profit:", summary.max_profit);
    if let Some(m) = &summary.mismatch {
        println!("{:<16} curve peaks at price {} (profit {})", "Warning:", m.scanned.price, m.scanned.profit);
    }
}

pub fn print_risk_view(view: &RiskView) {
    println!("{:<20} {:.2}", "Expected profit:", view.mean_profit);
    println!("{:<20} {:.2}", "Std dev:", view.std_profit);
    println!("{:<20} {:.2}%", "Probability of loss:", view.prob_loss * 100.0);
    println!("{:<20} {}", "Runs:", view.runs);
    println!("{:<20} {:.2} / {:.2} / {:.2}", "P5 / P50 / P95:", view.percentiles.p5, view.percentiles.p50, view.percentiles.p95);
    let peak = view.histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for b in &view.histogram {
        let bar = "#".repeat((b.count * 40 / peak) as usize);
        println!("{:>10} {:>6} {bar}", b.range_label, b.count);
    }
}

// --- file export ---

pub fn export_json<T: Serialize + ?Sized>(output_path: &Path, doc: &T) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, doc)?;
    Ok(())
}

pub fn export_histogram_csv(output_path: &Path, buckets: &[HistogramBucket]) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(file, "range_label,range_start,range_end,count")?;
    for b in buckets {
        writeln!(file, "{},{},{},{}", b.range_label, b.range_start, b.range_end, b.count)?;
    }
    Ok(())
}

pub fn export_curve_csv(output_path: &Path, curve: &[PriceProfitPoint]) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(file, "price,profit")?;
    for p in curve {
        writeln!(file, "{},{}", p.price, p.profit)?;
    }
    Ok(())
}
