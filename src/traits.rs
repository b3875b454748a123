//! # Traits
//!
//! $$
//! \text{Provider contract: } \mathrm{id} \mapsto \{(t_i, p_i)\} \;\lor\; \text{UpstreamUnavailable}
//! $$
//!
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::AnalyticsError;
use crate::error::Result;
use crate::series::PriceSeries;

/// Source of price/NAV histories keyed by instrument id (ticker, scheme code, coin id).
///
/// Implementations own fetching, caching and timeouts; a failed fetch is reported as
/// [`AnalyticsError::UpstreamUnavailable`].
pub trait HistoryProvider: Send + Sync {
  fn history(&self, id: &str) -> Result<PriceSeries>;
}

/// Histories held in memory, mostly for tests and precomputed batches.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHistory {
  series: HashMap<String, PriceSeries>,
}

impl InMemoryHistory {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, id: impl Into<String>, series: PriceSeries) -> &mut Self {
    self.series.insert(id.into(), series);
    self
  }
}

impl HistoryProvider for InMemoryHistory {
  fn history(&self, id: &str) -> Result<PriceSeries> {
    self
      .series
      .get(id)
      .cloned()
      .ok_or_else(|| AnalyticsError::upstream(id, "no history recorded"))
  }
}

/// Reads `<dir>/<id>.json` in either provider JSON shape.
#[derive(Clone, Debug)]
pub struct JsonDirHistory {
  dir: PathBuf,
}

impl JsonDirHistory {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }
}

impl HistoryProvider for JsonDirHistory {
  fn history(&self, id: &str) -> Result<PriceSeries> {
    let path = self.dir.join(format!("{id}.json"));
    let json = fs::read_to_string(&path)
      .map_err(|e| AnalyticsError::upstream(id, format!("{}: {e}", path.display())))?;
    PriceSeries::from_json_str(&json)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn in_memory_reports_missing_id_as_upstream() {
    let provider = InMemoryHistory::new();
    assert!(matches!(
      provider.history("INFY.NS"),
      Err(AnalyticsError::UpstreamUnavailable { .. })
    ));
  }

  #[test]
  fn json_dir_reads_by_id() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join("120503.json"),
      r#"[{"date": "02-01-2024", "nav": "10.5"}, {"date": "01-01-2024", "nav": "10.0"}]"#,
    )
    .unwrap();

    let provider = JsonDirHistory::new(dir.path());
    let series = provider.history("120503").unwrap();

    assert_eq!(series.values(), vec![10.0, 10.5]);
    assert!(matches!(
      provider.history("missing"),
      Err(AnalyticsError::UpstreamUnavailable { .. })
    ));
  }
}
