use serde::{Deserialize, Serialize};

/// one point of a swept price -> profit curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceProfitPoint {
    pub price: f64,
    pub profit: f64,
}

/// response of `/simulate-range`; curve is ascending by price as swept upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub curve: Vec<PriceProfitPoint>,
    pub optimal_price: f64,
    pub max_profit: f64,
}

/// response of `/simulate-monte-carlo`, and of `/simulate` when run with noise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub profits: Vec<f64>,
    pub mean_profit: f64,
    pub std_profit: f64,
    pub prob_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOutcome {
    pub demand: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
}

/// `/simulate` answers either shape depending on whether noise settings were sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointSimulation {
    MonteCarlo(RiskSummary), // must stay first: it is the only variant requiring `profits`
    Deterministic(PointOutcome),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub range_label: String,
    pub range_start: f64,
    pub range_end: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_simulation_picks_deterministic_shape() {
        let body = r#"{"demand":98.5,"revenue":985.0,"total_cost":345.5,"profit":639.5}"#;
        let sim: PointSimulation = serde_json::from_str(body).unwrap();
        assert!(matches!(sim, PointSimulation::Deterministic(o) if o.profit == 639.5));
    }

    #[test]
    fn point_simulation_picks_monte_carlo_shape() {
        let body = r#"{"profits":[1.0,-2.0],"mean_profit":-0.5,"std_profit":1.5,"prob_loss":0.5}"#;
        let sim: PointSimulation = serde_json::from_str(body).unwrap();
        match sim {
            PointSimulation::MonteCarlo(r) => assert_eq!(r.profits.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn optimization_result_missing_field_fails() {
        let body = r#"{"curve":[{"price":1.0,"profit":2.0}],"optimal_price":1.0}"#;
        assert!(serde_json::from_str::<OptimizationResult>(body).is_err());
    }
}
