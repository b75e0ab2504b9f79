pub mod client;
pub mod curve;
pub mod export;
pub mod histogram;
pub mod model;
pub mod request;
pub mod risk;

pub use pricing_lens_common::{PricingLensError, Result};
pub use client::{error_detail, SimulationClient, MONTE_CARLO_PATH, RANGE_PATH, SIMULATE_PATH};
pub use curve::{profit_bounds, scan_optimum, summarize_curve, CurveSummary, OptimumMismatch};
pub use export::{export_curve_csv, export_histogram_csv, export_json, print_curve_summary, print_point, print_risk_view};
pub use histogram::{bucket_index, build_histogram, DEFAULT_BUCKET_COUNT};
pub use model::{HistogramBucket, OptimizationResult, PointOutcome, PointSimulation, PriceProfitPoint, RiskSummary};
pub use request::{MonteCarloRequest, NoiseDistribution, NoiseSettings, PointRequest, RangeRequest};
pub use risk::{percentile, summarize_risk, ProfitPercentiles, RiskView};
