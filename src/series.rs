//! # Price Series
//!
//! $$
//! \{(t_i, p_i)\}_{i=0}^{n-1},\quad t_0 < t_1 < \dots < t_{n-1}
//! $$
//!
//! Validated price/NAV histories and ingestion of the provider JSON shapes.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::error::AnalyticsError;
use crate::error::Result;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

/// One price or NAV value on one date.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
  pub date: NaiveDate,
  pub value: f64,
}

impl PriceObservation {
  pub fn new(date: NaiveDate, value: f64) -> Self {
    Self { date, value }
  }
}

/// Observations strictly increasing by date with finite, non-negative values.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PriceSeries {
  observations: Vec<PriceObservation>,
}

impl PriceSeries {
  /// Build a series from observations that must already be in ascending date order.
  pub fn new(observations: Vec<PriceObservation>) -> Result<Self> {
    for obs in &observations {
      check_value(obs)?;
    }

    if let Some(pair) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
      return Err(AnalyticsError::invalid(format!(
        "observation dates must be strictly increasing ({} followed by {})",
        pair[0].date, pair[1].date
      )));
    }

    Ok(Self { observations })
  }

  /// Build a series from observations in arbitrary order (providers often send newest first).
  pub fn from_unordered(mut observations: Vec<PriceObservation>) -> Result<Self> {
    observations.sort_by_key(|obs| obs.date);

    if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
      return Err(AnalyticsError::invalid(format!(
        "duplicate observation date {}",
        pair[0].date
      )));
    }

    Self::new(observations)
  }

  /// Build an undated series from raw values, dating them on consecutive days from `start`.
  pub fn from_values(start: NaiveDate, values: &[f64]) -> Result<Self> {
    let observations = values
      .iter()
      .zip(start.iter_days())
      .map(|(&value, date)| PriceObservation::new(date, value))
      .collect();

    Self::new(observations)
  }

  /// Parse a JSON array of `{ "date": .., "value" | "nav": .. }` records.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let records: Vec<RawRecord> = serde_json::from_str(json)
      .map_err(|e| AnalyticsError::invalid(format!("malformed history payload: {e}")))?;
    Self::from_records(records)
  }

  fn from_records(records: Vec<RawRecord>) -> Result<Self> {
    let total = records.len();
    let mut observations = Vec::with_capacity(total);

    for record in records {
      let date = parse_date(&record.date)?;
      match record.value.as_f64() {
        Some(value) => observations.push(PriceObservation::new(date, value)),
        None => warn!(%date, "dropping history row with unparseable value"),
      }
    }

    debug!(total, kept = observations.len(), "parsed history records");
    Self::from_unordered(observations)
  }

  pub fn observations(&self) -> &[PriceObservation] {
    &self.observations
  }

  pub fn values(&self) -> Vec<f64> {
    self.observations.iter().map(|obs| obs.value).collect()
  }

  pub fn dates(&self) -> Vec<NaiveDate> {
    self.observations.iter().map(|obs| obs.date).collect()
  }

  pub fn len(&self) -> usize {
    self.observations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.observations.is_empty()
  }

  pub fn last(&self) -> Option<&PriceObservation> {
    self.observations.last()
  }
}

/// Load a history JSON file for command-line use.
pub fn load_history_file(path: impl AsRef<Path>) -> anyhow::Result<PriceSeries> {
  let path = path.as_ref();
  let json = fs::read_to_string(path)
    .with_context(|| format!("failed to read history file {}", path.display()))?;
  PriceSeries::from_json_str(&json)
    .with_context(|| format!("failed to parse history file {}", path.display()))
}

fn check_value(obs: &PriceObservation) -> Result<()> {
  if !obs.value.is_finite() || obs.value < 0.0 {
    return Err(AnalyticsError::invalid(format!(
      "price on {} must be finite and non-negative, got {}",
      obs.date, obs.value
    )));
  }
  Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
  let raw = raw.trim();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    .ok_or_else(|| AnalyticsError::invalid(format!("unrecognised date `{raw}`")))
}

#[derive(Deserialize)]
struct RawRecord {
  date: String,
  #[serde(alias = "nav", alias = "close", alias = "price")]
  value: RawValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
  Number(f64),
  Text(String),
  Missing(()),
}

impl RawValue {
  fn as_f64(&self) -> Option<f64> {
    match self {
      RawValue::Number(v) => Some(*v),
      RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
      RawValue::Missing(()) => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use tracing_test::traced_test;

  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn rejects_non_increasing_dates() {
    let obs = vec![
      PriceObservation::new(d(2024, 1, 2), 10.0),
      PriceObservation::new(d(2024, 1, 2), 11.0),
    ];
    assert!(matches!(
      PriceSeries::new(obs),
      Err(AnalyticsError::InvalidInput(_))
    ));
  }

  #[test]
  fn rejects_negative_and_nan_values() {
    let neg = vec![PriceObservation::new(d(2024, 1, 2), -1.0)];
    let nan = vec![PriceObservation::new(d(2024, 1, 2), f64::NAN)];
    assert!(PriceSeries::new(neg).is_err());
    assert!(PriceSeries::new(nan).is_err());
  }

  #[test]
  fn zero_values_are_tolerated_at_construction() {
    let series = PriceSeries::from_values(d(2024, 1, 1), &[0.0, 1.0]).unwrap();
    assert_eq!(series.len(), 2);
  }

  #[test]
  fn parses_nav_provider_shape_newest_first() {
    let json = r#"[
      {"date": "03-01-2024", "nav": "12.50"},
      {"date": "02-01-2024", "nav": "12.00"},
      {"date": "01-01-2024", "nav": "11.00"}
    ]"#;
    let series = PriceSeries::from_json_str(json).unwrap();

    assert_eq!(series.values(), vec![11.0, 12.0, 12.5]);
    assert_eq!(series.observations()[0].date, d(2024, 1, 1));
  }

  #[test]
  fn parses_generic_value_shape() {
    let json = r#"[{"date": "2024-03-01", "value": 100}, {"date": "2024-03-04", "value": 101.5}]"#;
    let series = PriceSeries::from_json_str(json).unwrap();
    assert_eq!(series.values(), vec![100.0, 101.5]);
  }

  #[test]
  #[traced_test]
  fn drops_unparseable_values_with_warning() {
    let json = r#"[
      {"date": "2024-03-01", "nav": "10.0"},
      {"date": "2024-03-02", "nav": "N/A"},
      {"date": "2024-03-03", "nav": null}
    ]"#;
    let series = PriceSeries::from_json_str(json).unwrap();

    assert_eq!(series.len(), 1);
    assert!(logs_contain("dropping history row with unparseable value"));
  }

  #[test]
  fn rejects_bad_dates_and_duplicates() {
    let bad = r#"[{"date": "March 1st", "value": 1.0}]"#;
    let dup = r#"[{"date": "2024-03-01", "value": 1.0}, {"date": "01-03-2024", "value": 2.0}]"#;
    assert!(PriceSeries::from_json_str(bad).is_err());
    assert!(PriceSeries::from_json_str(dup).is_err());
  }

  #[test]
  fn loads_history_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"[{{"date": "2024-03-01", "value": 5.0}}, {{"date": "2024-03-02", "value": 5.5}}]"#
    )
    .unwrap();

    let series = load_history_file(file.path()).unwrap();
    assert_eq!(series.last().map(|o| o.value), Some(5.5));
  }

  #[test]
  fn missing_history_file_reports_path() {
    let err = load_history_file("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
  }
}
