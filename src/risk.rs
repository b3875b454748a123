//! # Risk
//!
//! $$
//! \hat\mu_A = P\,\bar r,\qquad
//! \hat\sigma_A = \sqrt{P\left(\overline{r^2}-\bar r^{\,2}\right)},\qquad
//! S = \frac{\hat\mu_A - r_f}{\hat\sigma_A}
//! $$
//!
//! Annualized return, volatility and Sharpe ratio of a return series.

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::error::Result;

/// Volatility below this is treated as zero (rounding residue of a flat series).
const DEGENERATE_VOL: f64 = 1e-12;
/// Variance within this many `EPSILON`s of `E[r^2]` counts as zero.
const RESIDUE_ULPS: f64 = 8.0;

/// How the per-period mean return is scaled to a yearly figure.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnualizationMethod {
  /// `mean * P`
  #[default]
  Arithmetic,
  /// `(1 + mean)^P - 1`
  Geometric,
}

/// Parameters of the risk estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
  /// Return periods per year (252 for daily trading data).
  pub periods_per_year: f64,
  /// Annual risk-free rate used as the Sharpe hurdle.
  pub risk_free_rate: f64,
  pub annualization: AnnualizationMethod,
}

impl Default for RiskConfig {
  fn default() -> Self {
    Self {
      periods_per_year: 252.0,
      risk_free_rate: 0.06,
      annualization: AnnualizationMethod::Arithmetic,
    }
  }
}

/// Per-period population moments of a return series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ReturnMoments {
  pub mean: f64,
  pub variance: f64,
  pub std_dev: f64,
}

/// Compute `E[r]`, `E[r^2] - E[r]^2` and its square root. Empty input gives zeros.
///
/// The variance is accumulated around the mean, and anything within a few ulps of `E[r^2]`
/// is rounding residue and reported as exactly 0.
pub fn return_moments(returns: &[f64]) -> ReturnMoments {
  if returns.is_empty() {
    return ReturnMoments::default();
  }

  let m = returns.len() as f64;
  let mean = returns.iter().sum::<f64>() / m;
  let mean_sq = returns.iter().map(|r| r * r).sum::<f64>() / m;
  let centered = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / m;
  let variance = if centered <= RESIDUE_ULPS * f64::EPSILON * mean_sq {
    0.0
  } else {
    centered
  };

  ReturnMoments {
    mean,
    variance,
    std_dev: variance.sqrt(),
  }
}

/// Annualized risk figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RiskMetrics {
  pub annualized_return: f64,
  pub annualized_volatility: f64,
  pub sharpe_ratio: f64,
}

impl RiskMetrics {
  /// True when volatility is zero and the Sharpe ratio carries no information.
  pub fn is_degenerate(&self) -> bool {
    self.annualized_volatility == 0.0
  }
}

/// Stateless estimator parameterized by [`RiskConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RiskEstimator {
  config: RiskConfig,
}

impl RiskEstimator {
  pub fn new(config: RiskConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &RiskConfig {
    &self.config
  }

  /// Estimate annualized metrics. An empty series degrades to all zeros.
  pub fn estimate(&self, returns: &[f64]) -> RiskMetrics {
    if returns.is_empty() {
      return RiskMetrics::default();
    }

    let p = self.config.periods_per_year;
    let moments = return_moments(returns);

    let annualized_return = match self.config.annualization {
      AnnualizationMethod::Arithmetic => moments.mean * p,
      AnnualizationMethod::Geometric => (1.0 + moments.mean).powf(p) - 1.0,
    };

    let mut annualized_volatility = (moments.variance * p).sqrt();
    if annualized_volatility < DEGENERATE_VOL {
      annualized_volatility = 0.0;
    }

    let sharpe_ratio = if annualized_volatility > 0.0 {
      (annualized_return - self.config.risk_free_rate) / annualized_volatility
    } else {
      0.0
    };

    debug!(
      n = returns.len(),
      annualized_return, annualized_volatility, sharpe_ratio, "estimated risk metrics"
    );

    RiskMetrics {
      annualized_return,
      annualized_volatility,
      sharpe_ratio,
    }
  }

  /// Like [`estimate`](Self::estimate) but reports empty or zero-volatility input as an error.
  pub fn estimate_strict(&self, returns: &[f64]) -> Result<RiskMetrics> {
    if returns.is_empty() {
      return Err(AnalyticsError::invalid("return series is empty"));
    }

    let metrics = self.estimate(returns);
    if metrics.is_degenerate() {
      return Err(AnalyticsError::DegenerateData(
        "return series has zero volatility".into(),
      ));
    }

    Ok(metrics)
  }
}
