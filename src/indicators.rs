//! # Indicators
//!
//! $$
//! \mathrm{MDD} = \min_t \left(\frac{p_t}{\max_{s\le t} p_s} - 1\right)
//! $$
//!
//! Dashboard series derived from prices and returns: drawdown, rolling volatility,
//! moving averages, monthly return heatmap, trailing growth and date alignment.

use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::NaiveDate;
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use serde::Serialize;

use crate::returns::ReturnSeries;
use crate::risk::return_moments;
use crate::series::PriceSeries;

/// Largest peak-to-trough decline as a non-positive fraction. Empty or all-zero input gives 0.
pub fn max_drawdown(series: &PriceSeries) -> f64 {
  let mut peak = 0.0f64;
  let drawdowns: Array1<f64> = series
    .observations()
    .iter()
    .map(|obs| {
      peak = peak.max(obs.value);
      if peak > 0.0 {
        obs.value / peak - 1.0
      } else {
        0.0
      }
    })
    .collect();

  drawdowns.min().copied().unwrap_or(0.0)
}

/// Annualized volatility over each trailing full `window` of returns.
pub fn rolling_volatility(returns: &[f64], window: usize, periods_per_year: f64) -> Vec<f64> {
  if window == 0 || window > returns.len() {
    return Vec::new();
  }

  returns
    .windows(window)
    .map(|w| (return_moments(w).variance * periods_per_year).sqrt())
    .collect()
}

/// Simple moving average aligned with `values`; `None` until the window is full.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
  if window == 0 {
    return vec![None; values.len()];
  }

  let mut out = Vec::with_capacity(values.len());
  let mut sum = 0.0;
  for (i, v) in values.iter().enumerate() {
    sum += v;
    if i >= window {
      sum -= values[i - window];
    }
    out.push((i + 1 >= window).then(|| sum / window as f64));
  }
  out
}

/// Mean return for one calendar month across all years.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthlyReturn {
  pub month: u32,
  pub mean_return: f64,
}

/// Heatmap rows: mean return per calendar month present in `returns`, ascending by month.
pub fn monthly_mean_returns(returns: &ReturnSeries) -> Vec<MonthlyReturn> {
  let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
  for (date, r) in returns.iter() {
    let entry = buckets.entry(date.month()).or_insert((0.0, 0));
    entry.0 += r;
    entry.1 += 1;
  }

  buckets
    .into_iter()
    .map(|(month, (sum, n))| MonthlyReturn {
      month,
      mean_return: sum / n as f64,
    })
    .collect()
}

/// Growth of the latest value over the base at position `len - lookback`, so the window spans
/// `lookback` observations including the latest (the first one for shorter histories).
pub fn trailing_growth(series: &PriceSeries, lookback: usize) -> Option<f64> {
  let obs = series.observations();
  let latest = obs.last()?.value;
  let base = obs[obs.len().saturating_sub(lookback.max(1))].value;

  (base > 0.0).then(|| (latest - base) / base)
}

/// One row of an outer date join; `values[k]` belongs to the k-th input series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlignedRow {
  pub date: NaiveDate,
  pub values: Vec<Option<f64>>,
}

/// Outer-join several series on date for side-by-side comparison.
pub fn align_series(series: &[&PriceSeries]) -> Vec<AlignedRow> {
  let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
  for (k, s) in series.iter().enumerate() {
    for obs in s.observations() {
      rows.entry(obs.date).or_insert_with(|| vec![None; series.len()])[k] = Some(obs.value);
    }
  }

  rows
    .into_iter()
    .map(|(date, values)| AlignedRow { date, values })
    .collect()
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;
  use crate::returns::build_returns;
  use crate::returns::ZeroPricePolicy;

  fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
  }

  fn series(values: &[f64]) -> PriceSeries {
    PriceSeries::from_values(start(), values).unwrap()
  }

  #[test]
  fn drawdown_from_peak() {
    let s = series(&[100.0, 120.0, 90.0, 130.0, 117.0]);
    assert_abs_diff_eq!(max_drawdown(&s), -0.25, epsilon = 1e-12);
    assert_eq!(max_drawdown(&series(&[])), 0.0);
    assert_eq!(max_drawdown(&series(&[1.0, 2.0, 3.0])), 0.0);
  }

  #[test]
  fn rolling_vol_window_count() {
    let r = [0.01, -0.01, 0.01, -0.01, 0.02];
    let vol = rolling_volatility(&r, 2, 252.0);

    assert_eq!(vol.len(), 4);
    assert_abs_diff_eq!(vol[0], (0.0001f64 * 252.0).sqrt(), epsilon = 1e-12);
    assert!(rolling_volatility(&r, 0, 252.0).is_empty());
    assert!(rolling_volatility(&r, 6, 252.0).is_empty());
  }

  #[test]
  fn moving_average_is_aligned() {
    let ma = moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
    assert_eq!(ma, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
  }

  #[test]
  fn monthly_means_group_by_calendar_month() {
    let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    let s = PriceSeries::new(vec![
      crate::series::PriceObservation::new(d(1, 30), 100.0),
      crate::series::PriceObservation::new(d(1, 31), 110.0),
      crate::series::PriceObservation::new(d(2, 1), 99.0),
      crate::series::PriceObservation::new(d(2, 2), 99.0),
    ])
    .unwrap();
    let r = build_returns(&s, ZeroPricePolicy::Reject).unwrap();
    let heat = monthly_mean_returns(&r);

    assert_eq!(heat.len(), 2);
    assert_eq!(heat[0].month, 1);
    assert_abs_diff_eq!(heat[0].mean_return, 0.1, epsilon = 1e-12);
    assert_eq!(heat[1].month, 2);
    assert_abs_diff_eq!(heat[1].mean_return, -0.05, epsilon = 1e-12);
  }

  #[test]
  fn trailing_growth_uses_lookback_or_first() {
    let s = series(&[50.0, 80.0, 100.0]);
    assert_abs_diff_eq!(trailing_growth(&s, 2).unwrap(), 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(trailing_growth(&s, 252).unwrap(), 1.0, epsilon = 1e-12);
    assert_eq!(trailing_growth(&series(&[]), 252), None);
    assert_eq!(trailing_growth(&series(&[0.0, 1.0]), 252), None);
  }

  #[test]
  fn align_outer_joins_on_date() {
    let a = series(&[1.0, 2.0]);
    let b = PriceSeries::from_values(start().succ_opt().unwrap(), &[5.0, 6.0]).unwrap();
    let rows = align_series(&[&a, &b]);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].values, vec![Some(1.0), None]);
    assert_eq!(rows[1].values, vec![Some(2.0), Some(5.0)]);
    assert_eq!(rows[2].values, vec![None, Some(6.0)]);
  }
}
