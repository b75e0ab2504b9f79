use pricing_lens_common::{PricingLensError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseDistribution {
    Normal,
    Lognormal,
}

impl FromStr for NoiseDistribution {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "lognormal" => Ok(Self::Lognormal),
            _ => Err(format!("unsupported distribution: {s} (use normal or lognormal)")),
        }
    }
}

impl fmt::Display for NoiseDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Lognormal => "lognormal",
        })
    }
}

/// uncertainty settings; present => `/simulate` runs in Monte Carlo mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    pub demand_noise_distribution: NoiseDistribution,
    pub demand_noise_sigma: f64,
    pub elasticity_noise_distribution: NoiseDistribution,
    pub elasticity_noise_sigma: f64,
    pub num_runs: u32,
    pub random_seed: u64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            demand_noise_distribution: NoiseDistribution::Normal,
            demand_noise_sigma: 1.0,
            elasticity_noise_distribution: NoiseDistribution::Normal,
            elasticity_noise_sigma: 0.1,
            num_runs: 1000,
            random_seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRequest {
    pub price: f64,
    pub base_demand: f64,
    pub price_elasticity: f64,
    pub unit_cost: f64,
    pub fixed_cost: f64,
    #[serde(flatten)]
    pub noise: Option<NoiseSettings>,
}

impl Default for PointRequest {
    fn default() -> Self {
        Self {
            price: 15.0,
            base_demand: 100.0,
            price_elasticity: 0.1,
            unit_cost: 3.0,
            fixed_cost: 50.0,
            noise: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRequest {
    pub base_demand: f64,
    pub price_elasticity: f64,
    pub unit_cost: f64,
    pub fixed_cost: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub step: f64,
}

impl Default for RangeRequest {
    fn default() -> Self {
        Self {
            base_demand: 100.0,
            price_elasticity: 0.1,
            unit_cost: 3.0,
            fixed_cost: 50.0,
            min_price: 1.0,
            max_price: 50.0,
            step: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloRequest {
    pub price: f64,
    pub base_demand: f64,
    pub elasticity_mean: f64,
    pub elasticity_sigma: f64,
    pub unit_cost: f64,
    pub fixed_cost: f64,
    pub num_runs: u32,
}

impl Default for MonteCarloRequest {
    fn default() -> Self {
        Self {
            price: 15.0,
            base_demand: 100.0,
            elasticity_mean: 0.1,
            elasticity_sigma: 0.02,
            unit_cost: 3.0,
            fixed_cost: 50.0,
            num_runs: 1000,
        }
    }
}

fn finite(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() { Ok(()) } else { Err(PricingLensError::invalid(field, "must be a finite number")) }
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    finite(field, v)?;
    if v > 0.0 { Ok(()) } else { Err(PricingLensError::invalid(field, "must be > 0")) }
}

fn runs(n: u32) -> Result<()> {
    if n >= 1 { Ok(()) } else { Err(PricingLensError::invalid("num_runs", "must be >= 1")) }
}

impl NoiseSettings {
    pub fn validate(&self) -> Result<()> {
        positive("demand_noise_sigma", self.demand_noise_sigma)?;
        positive("elasticity_noise_sigma", self.elasticity_noise_sigma)?;
        if self.elasticity_noise_sigma > 0.5 {
            return Err(PricingLensError::invalid("elasticity_noise_sigma", "too large; may cause instability"));
        }
        runs(self.num_runs)
    }
}

impl PointRequest {
    pub fn validate(&self) -> Result<()> {
        positive("price", self.price)?;
        finite("base_demand", self.base_demand)?;
        finite("price_elasticity", self.price_elasticity)?;
        finite("unit_cost", self.unit_cost)?;
        finite("fixed_cost", self.fixed_cost)?;
        match &self.noise {
            Some(n) => n.validate(),
            None => Ok(()),
        }
    }
}

impl RangeRequest {
    pub fn validate(&self) -> Result<()> {
        finite("base_demand", self.base_demand)?;
        finite("price_elasticity", self.price_elasticity)?;
        finite("unit_cost", self.unit_cost)?;
        finite("fixed_cost", self.fixed_cost)?;
        positive("min_price", self.min_price)?;
        finite("max_price", self.max_price)?;
        if self.min_price >= self.max_price {
            return Err(PricingLensError::invalid("min_price", "min_price must be less than max_price"));
        }
        positive("step", self.step)
    }

    /// number of sweep points the service will evaluate
    pub fn point_count(&self) -> usize {
        ((self.max_price - self.min_price) / self.step).floor() as usize + 1
    }
}

impl MonteCarloRequest {
    pub fn validate(&self) -> Result<()> {
        positive("price", self.price)?;
        finite("base_demand", self.base_demand)?;
        finite("elasticity_mean", self.elasticity_mean)?;
        finite("elasticity_sigma", self.elasticity_sigma)?;
        if self.elasticity_sigma < 0.0 {
            return Err(PricingLensError::invalid("elasticity_sigma", "must be >= 0"));
        }
        finite("unit_cost", self.unit_cost)?;
        finite("fixed_cost", self.fixed_cost)?;
        runs(self.num_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(r: Result<()>) -> &'static str {
        match r {
            Err(PricingLensError::InvalidRequest { field, .. }) => field,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(PointRequest::default().validate().is_ok());
        assert!(RangeRequest::default().validate().is_ok());
        assert!(MonteCarloRequest::default().validate().is_ok());
        let noisy = PointRequest { noise: Some(NoiseSettings::default()), ..Default::default() };
        assert!(noisy.validate().is_ok());
    }

    #[test]
    fn inverted_range_rejected_before_dispatch() {
        let req = RangeRequest { min_price: 50.0, max_price: 1.0, ..Default::default() };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("min_price must be less than max_price"));
    }

    #[test]
    fn equal_bounds_rejected() {
        let req = RangeRequest { min_price: 10.0, max_price: 10.0, ..Default::default() };
        assert_eq!(field_of(req.validate()), "min_price");
    }

    #[test]
    fn zero_step_rejected() {
        let req = RangeRequest { step: 0.0, ..Default::default() };
        assert_eq!(field_of(req.validate()), "step");
    }

    #[test]
    fn non_finite_rejected() {
        let req = PointRequest { unit_cost: f64::NAN, ..Default::default() };
        assert_eq!(field_of(req.validate()), "unit_cost");
        let req = MonteCarloRequest { fixed_cost: f64::INFINITY, ..Default::default() };
        assert_eq!(field_of(req.validate()), "fixed_cost");
    }

    #[test]
    fn zero_runs_rejected() {
        let req = MonteCarloRequest { num_runs: 0, ..Default::default() };
        assert_eq!(field_of(req.validate()), "num_runs");
    }

    #[test]
    fn elasticity_noise_sigma_capped() {
        let noise = NoiseSettings { elasticity_noise_sigma: 0.6, ..Default::default() };
        let req = PointRequest { noise: Some(noise), ..Default::default() };
        assert_eq!(field_of(req.validate()), "elasticity_noise_sigma");
    }

    #[test]
    fn point_request_flattens_noise() {
        let req = PointRequest { noise: Some(NoiseSettings::default()), ..Default::default() };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["demand_noise_distribution"], "normal");
        assert_eq!(v["num_runs"], 1000);
        let plain = serde_json::to_value(PointRequest::default()).unwrap();
        assert!(plain.get("num_runs").is_none());
    }

    #[test]
    fn distribution_parses_case_insensitively() {
        assert_eq!("LogNormal".parse::<NoiseDistribution>().unwrap(), NoiseDistribution::Lognormal);
        assert!("uniform".parse::<NoiseDistribution>().is_err());
    }

    #[test]
    fn default_sweep_has_25_points() {
        assert_eq!(RangeRequest::default().point_count(), 25); // 1,3,..,49
    }
}
