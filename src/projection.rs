//! # Projection
//!
//! $$
//! V = P\,(1 + r)^{y},\qquad \Pi = V - P
//! $$
//!
use impl_new_derive::ImplNew;
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::error::Result;

/// Future value of a lump sum and the profit over the principal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ProjectionResult {
  pub estimated_value: f64,
  pub estimated_profit: f64,
}

/// Lump-sum investment compounded yearly at `annualized_return`.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct InvestmentProjection {
  pub principal: f64,
  /// May be negative; values below -1 leave the real power undefined and are rejected
  /// unless `years` is 0.
  pub annualized_return: f64,
  pub years: f64,
}

impl InvestmentProjection {
  pub fn calculate(&self) -> Result<ProjectionResult> {
    project(self.principal, self.annualized_return, self.years)
  }
}

pub fn project(principal: f64, annualized_return: f64, years: f64) -> Result<ProjectionResult> {
  if !principal.is_finite() || !annualized_return.is_finite() || !years.is_finite() {
    return Err(AnalyticsError::invalid("projection inputs must be finite"));
  }
  if years < 0.0 {
    return Err(AnalyticsError::invalid(format!(
      "holding period must be >= 0 years, got {years}"
    )));
  }
  if years == 0.0 {
    return Ok(ProjectionResult {
      estimated_value: principal,
      estimated_profit: 0.0,
    });
  }
  if 1.0 + annualized_return < 0.0 {
    return Err(AnalyticsError::invalid(format!(
      "annualized return {annualized_return} is below -100%"
    )));
  }

  let estimated_value = principal * (1.0 + annualized_return).powf(years);

  Ok(ProjectionResult {
    estimated_value,
    estimated_profit: estimated_value - principal,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn one_year_at_twelve_percent() {
    let p = project(1000.0, 0.12, 1.0).unwrap();
    assert_relative_eq!(p.estimated_value, 1120.0, epsilon = 1e-9);
    assert_relative_eq!(p.estimated_profit, 120.0, epsilon = 1e-9);
  }

  #[test]
  fn zero_years_returns_principal() {
    for r in [-1.5, -0.5, 0.0, 0.07, 3.0] {
      let p = project(2500.0, r, 0.0).unwrap();
      assert_eq!(p.estimated_value, 2500.0);
      assert_eq!(p.estimated_profit, 0.0);
    }
  }

  #[test]
  fn loss_scenario_not_clamped() {
    let p = InvestmentProjection::new(1000.0, -0.2, 2.0).calculate().unwrap();
    assert_relative_eq!(p.estimated_value, 640.0, epsilon = 1e-9);
    assert_eq!(p.estimated_profit, p.estimated_value - 1000.0);
  }

  #[test]
  fn rejects_negative_years_and_bad_inputs() {
    assert!(matches!(
      project(1000.0, 0.1, -1.0),
      Err(AnalyticsError::InvalidInput(_))
    ));
    assert!(project(f64::NAN, 0.1, 1.0).is_err());
    assert!(project(1000.0, -1.5, 0.5).is_err());
  }
}
