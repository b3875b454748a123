//! # Config
//!
//! Aggregated analytics settings, loadable from JSON with per-field defaults.

use std::fs;
use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::returns::ZeroPricePolicy;
use crate::risk::RiskConfig;
use crate::simulation::MonteCarloConfig;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
  pub risk: RiskConfig,
  pub simulation: MonteCarloConfig,
  pub zero_price_policy: ZeroPricePolicy,
  /// Observations spanned by the trailing-growth figure (one trading year).
  pub trailing_window: usize,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      risk: RiskConfig::default(),
      simulation: MonteCarloConfig::default(),
      zero_price_policy: ZeroPricePolicy::default(),
      trailing_window: 252,
    }
  }
}

impl AnalyticsConfig {
  pub fn from_json_str(json: &str) -> Result<Self> {
    let config: Self = serde_json::from_str(json).context("malformed analytics config")?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
      .with_context(|| format!("failed to read config {}", path.display()))?;
    Self::from_json_str(&json)
  }

  pub fn validate(&self) -> Result<()> {
    if !(self.risk.periods_per_year.is_finite() && self.risk.periods_per_year > 0.0) {
      bail!("risk.periods_per_year must be > 0");
    }
    if !self.risk.risk_free_rate.is_finite() {
      bail!("risk.risk_free_rate must be finite");
    }
    if self.simulation.horizon_days == 0 {
      bail!("simulation.horizon_days must be > 0");
    }
    if self.simulation.num_simulations == 0 {
      bail!("simulation.num_simulations must be > 0");
    }
    if self.trailing_window == 0 {
      bail!("trailing_window must be > 0");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::risk::AnnualizationMethod;

  #[test]
  fn defaults_match_dashboard_constants() {
    let cfg = AnalyticsConfig::default();
    assert_eq!(cfg.risk.periods_per_year, 252.0);
    assert_eq!(cfg.risk.risk_free_rate, 0.06);
    assert_eq!(cfg.simulation.horizon_days, 252);
    assert_eq!(cfg.simulation.num_simulations, 1000);
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn partial_json_keeps_defaults() {
    let cfg = AnalyticsConfig::from_json_str(
      r#"{"risk": {"risk_free_rate": 0.04, "annualization": "geometric"},
          "simulation": {"seed": 9},
          "zero_price_policy": "skip"}"#,
    )
    .unwrap();

    assert_eq!(cfg.risk.risk_free_rate, 0.04);
    assert_eq!(cfg.risk.periods_per_year, 252.0);
    assert_eq!(cfg.risk.annualization, AnnualizationMethod::Geometric);
    assert_eq!(cfg.simulation.seed, Some(9));
    assert_eq!(cfg.simulation.num_simulations, 1000);
    assert_eq!(cfg.zero_price_policy, ZeroPricePolicy::Skip);
  }

  #[test]
  fn rejects_nonsense() {
    let err = AnalyticsConfig::from_json_str(r#"{"simulation": {"num_simulations": 0}}"#)
      .unwrap_err();
    assert!(err.to_string().contains("num_simulations"));
    assert!(AnalyticsConfig::from_json_str(r#"{"risk": {"periods_per_year": -1}}"#).is_err());
    assert!(AnalyticsConfig::from_json_str("not json").is_err());
  }
}
