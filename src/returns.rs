//! # Returns
//!
//! $$
//! r_i = \frac{p_{i+1} - p_i}{p_i}
//! $$
//!
//! Period-over-period fractional returns built from a [`PriceSeries`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::error::AnalyticsError;
use crate::error::Result;
use crate::series::PriceSeries;

/// What to do with a pair whose earlier price is zero (the return is undefined).
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPricePolicy {
  /// Fail the whole computation with [`AnalyticsError::InvalidInput`].
  #[default]
  Reject,
  /// Drop the undefined pair and keep going.
  Skip,
}

/// Fractional returns, each tagged with the date of the later observation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReturnSeries {
  dates: Vec<NaiveDate>,
  values: Vec<f64>,
}

impl ReturnSeries {
  pub fn values(&self) -> &[f64] {
    &self.values
  }

  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
    self.dates.iter().copied().zip(self.values.iter().copied())
  }
}

/// Build the return series of `series`. Fewer than two observations yield an empty series.
pub fn build_returns(series: &PriceSeries, policy: ZeroPricePolicy) -> Result<ReturnSeries> {
  let obs = series.observations();
  let mut out = ReturnSeries {
    dates: Vec::with_capacity(obs.len().saturating_sub(1)),
    values: Vec::with_capacity(obs.len().saturating_sub(1)),
  };

  for pair in obs.windows(2) {
    let (prev, curr) = (pair[0], pair[1]);

    if prev.value == 0.0 {
      match policy {
        ZeroPricePolicy::Reject => {
          return Err(AnalyticsError::invalid(format!(
            "zero price on {} makes the return to {} undefined",
            prev.date, curr.date
          )));
        }
        ZeroPricePolicy::Skip => {
          warn!(date = %prev.date, "skipping return after zero price");
          continue;
        }
      }
    }

    out.dates.push(curr.date);
    out.values.push((curr.value - prev.value) / prev.value);
  }

  Ok(out)
}
