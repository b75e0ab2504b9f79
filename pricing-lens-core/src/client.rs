use crate::model::{OptimizationResult, PointSimulation, RiskSummary};
use crate::request::{MonteCarloRequest, PointRequest, RangeRequest};
use pricing_lens_common::{PricingLensError, Result, ServiceConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const SIMULATE_PATH: &str = "/simulate";
pub const RANGE_PATH: &str = "/simulate-range";
pub const MONTE_CARLO_PATH: &str = "/simulate-monte-carlo";

const FALLBACK_ERROR: &str = "Request failed";

/// thin async client for the pricing simulation service; one call = one request, no retry
#[derive(Debug, Clone)]
pub struct SimulationClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimulationClient {
    pub fn new(cfg: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| PricingLensError::Network(e.to_string()))?;
        Ok(Self { http, base_url: cfg.base_url.trim_end_matches('/').to_owned() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn simulate_point(&self, req: &PointRequest) -> Result<PointSimulation> {
        req.validate()?;
        self.post(SIMULATE_PATH, req).await
    }

    pub async fn simulate_range(&self, req: &RangeRequest) -> Result<OptimizationResult> {
        req.validate()?;
        tracing::debug!(points = req.point_count(), "sweeping price range");
        self.post(RANGE_PATH, req).await
    }

    pub async fn simulate_monte_carlo(&self, req: &MonteCarloRequest) -> Result<RiskSummary> {
        req.validate()?;
        self.post(MONTE_CARLO_PATH, req).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "dispatching simulation request");
        let resp = self.http.post(&url)
            .json(body)
            .send().await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "simulation request failed");
                PricingLensError::Network(e.to_string())
            })?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| PricingLensError::Network(e.to_string()))?;
        if !status.is_success() {
            let message = error_detail(&text);
            tracing::warn!(%url, status = status.as_u16(), %message, "simulation service returned an error");
            return Err(PricingLensError::Transport { status: status.as_u16(), message });
        }
        serde_json::from_str(&text).map_err(|e| PricingLensError::MalformedPayload(format!("{path}: {e}")))
    }
}

/// user-facing message from an error body: `detail` as a string, `detail.message`,
/// or the `msg` entries of a validation-error list; generic fallback otherwise
pub fn error_detail(body: &str) -> String {
    let Ok(v) = serde_json::from_str::<serde_json::Value>(body) else { return FALLBACK_ERROR.into() };
    let msg = match v.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Object(o)) => o.get("message").and_then(|m| m.as_str()).map(str::to_owned),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items.iter().filter_map(|i| i.get("msg").and_then(|m| m.as_str())).collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    };
    msg.filter(|m| !m.is_empty()).unwrap_or_else(|| FALLBACK_ERROR.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn detail_string() { assert_eq!(error_detail(r#"{"detail":"min_price must be less than max_price"}"#), "min_price must be less than max_price"); }
    #[test] fn detail_object() { assert_eq!(error_detail(r#"{"detail":{"field":"decision.price","message":"Must be > 0"}}"#), "Must be > 0"); }
    #[test] fn detail_list() { assert_eq!(error_detail(r#"{"detail":[{"loc":["body","price"],"msg":"field required"},{"msg":"value is not a valid float"}]}"#), "field required; value is not a valid float"); }
    #[test] fn detail_missing() { assert_eq!(error_detail(r#"{"error":"boom"}"#), "Request failed"); }
    #[test] fn detail_empty() { assert_eq!(error_detail(r#"{"detail":""}"#), "Request failed"); }
    #[test] fn not_json() { assert_eq!(error_detail("<html>502 Bad Gateway</html>"), "Request failed"); }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let cfg = ServiceConfig { base_url: "http://localhost:8000/".into(), timeout_secs: 5 };
        assert_eq!(SimulationClient::new(&cfg).unwrap().base_url(), "http://localhost:8000");
    }
}
