use pricing_lens_core::{
    summarize_curve, summarize_risk, MonteCarloRequest, OptimizationResult, OptimumMismatch,
    PointOutcome, PointRequest, PointSimulation, RangeRequest, Result, RiskView, SimulationClient,
};
use serde::{Deserialize, Serialize};

/// one submission, rebuilt from CLI flags or the saved session; never mutated after dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimRequest {
    Point(PointRequest),
    Range(RangeRequest),
    MonteCarlo(MonteCarloRequest),
}

impl SimRequest {
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Point(r) if r.noise.is_some() => "[POINT MC]",
            Self::Point(_) => "[POINT]",
            Self::Range(_) => "[OPTIMIZE]",
            Self::MonteCarlo(_) => "[RISK]",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Point(r) => format!("price {} | demand {} | elasticity {} | unit {} | fixed {}",
                r.price, r.base_demand, r.price_elasticity, r.unit_cost, r.fixed_cost),
            Self::Range(r) => format!("price {}..{} step {} | demand {} | elasticity {}",
                r.min_price, r.max_price, r.step, r.base_demand, r.price_elasticity),
            Self::MonteCarlo(r) => format!("price {} | elasticity {}±{} | {} runs",
                r.price, r.elasticity_mean, r.elasticity_sigma, r.num_runs),
        }
    }
}

/// validated, render-ready result; built whole or not at all
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimOutcome {
    Point(PointOutcome),
    Curve { result: OptimizationResult, mismatch: Option<OptimumMismatch> },
    Risk(RiskView),
}

pub async fn execute(client: &SimulationClient, request: &SimRequest, bins: usize) -> Result<SimOutcome> {
    match request {
        SimRequest::Point(req) => match client.simulate_point(req).await? {
            PointSimulation::Deterministic(o) => Ok(SimOutcome::Point(o)),
            PointSimulation::MonteCarlo(summary) => Ok(SimOutcome::Risk(summarize_risk(&summary, bins)?)),
        },
        SimRequest::Range(req) => {
            let result = client.simulate_range(req).await?;
            let mismatch = summarize_curve(&result)?.mismatch;
            Ok(SimOutcome::Curve { result, mismatch })
        }
        SimRequest::MonteCarlo(req) => {
            let summary = client.simulate_monte_carlo(req).await?;
            Ok(SimOutcome::Risk(summarize_risk(&summary, bins)?))
        }
    }
}
