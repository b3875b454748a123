//! # Report
//!
//! $$
//! \text{history} \mapsto (\text{returns}, \text{risk}, \text{simulation}, \text{projection})
//! $$
//!
//! Single entry point tying the calculators together, plus structured per-asset and
//! portfolio summaries meant as plain-data context for charting and text generation.

use rayon::prelude::*;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::indicators::max_drawdown;
use crate::indicators::trailing_growth;
use crate::projection::project;
use crate::projection::ProjectionResult;
use crate::returns::build_returns;
use crate::returns::ReturnSeries;
use crate::risk::return_moments;
use crate::risk::RiskEstimator;
use crate::risk::RiskMetrics;
use crate::series::PriceSeries;
use crate::simulation::MonteCarloSimulator;
use crate::simulation::SimulationResult;
use crate::simulation::SimulationSummary;
use crate::traits::HistoryProvider;

/// Analytics for one instrument.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetReport {
  pub id: String,
  pub last_value: Option<f64>,
  pub trailing_growth: Option<f64>,
  pub max_drawdown: f64,
  pub risk: RiskMetrics,
  /// `None` when fewer than two returns are available or the last value cannot be simulated.
  pub simulation: Option<SimulationSummary>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingKind {
  #[default]
  MutualFund,
  Stock,
  Crypto,
}

/// Portfolio entry as stored by the external portfolio API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Holding {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub kind: HoldingKind,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoldingSummary {
  pub name: String,
  pub kind: HoldingKind,
  /// `None` when the history could not be fetched or analysed.
  pub report: Option<AssetReport>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
  pub items: Vec<HoldingSummary>,
  /// Sum of latest values over holdings that have data.
  pub total_latest_value: f64,
}

/// Engine applying one [`AnalyticsConfig`] to every calculation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analyzer {
  config: AnalyticsConfig,
}

impl Analyzer {
  pub fn new(config: AnalyticsConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &AnalyticsConfig {
    &self.config
  }

  pub fn returns(&self, series: &PriceSeries) -> Result<ReturnSeries> {
    build_returns(series, self.config.zero_price_policy)
  }

  pub fn risk(&self, returns: &ReturnSeries) -> RiskMetrics {
    RiskEstimator::new(self.config.risk).estimate(returns.values())
  }

  /// Simulate forward from the last observation using the series' own return moments.
  pub fn simulate(&self, series: &PriceSeries) -> Result<SimulationResult> {
    let returns = self.returns(series)?;
    self.simulate_returns(series, &returns)
  }

  fn simulate_returns(
    &self,
    series: &PriceSeries,
    returns: &ReturnSeries,
  ) -> Result<SimulationResult> {
    let moments = return_moments(returns.values());
    let last = series.last().map_or(0.0, |obs| obs.value);

    MonteCarloSimulator::new(self.config.simulation).simulate(last, moments.mean, moments.std_dev)
  }

  /// Project `principal` over `years` at the series' annualized return.
  pub fn project(&self, series: &PriceSeries, principal: f64, years: f64) -> Result<ProjectionResult> {
    let returns = self.returns(series)?;
    project(principal, self.risk(&returns).annualized_return, years)
  }

  pub fn report(&self, id: &str, series: &PriceSeries) -> Result<AssetReport> {
    let returns = self.returns(series)?;
    let risk = self.risk(&returns);

    let simulation = if returns.len() >= 2 {
      match self.simulate_returns(series, &returns) {
        Ok(sim) => Some(sim.summary()),
        Err(err) => {
          warn!(id, error = %err, "simulation skipped");
          None
        }
      }
    } else {
      debug!(id, n = returns.len(), "not enough returns for simulation");
      None
    };

    Ok(AssetReport {
      id: id.to_string(),
      last_value: series.last().map(|obs| obs.value),
      trailing_growth: trailing_growth(series, self.config.trailing_window),
      max_drawdown: max_drawdown(series),
      risk,
      simulation,
    })
  }

  /// Summarize every holding; unavailable or invalid histories degrade to `None` reports.
  ///
  /// Holdings are fetched and analysed on the rayon pool; output keeps the input order.
  pub fn portfolio_summary<P: HistoryProvider + ?Sized>(
    &self,
    holdings: &[Holding],
    provider: &P,
  ) -> PortfolioSummary {
    let reports: Vec<Result<AssetReport>> = holdings
      .par_iter()
      .map(|holding| {
        provider
          .history(&holding.id)
          .and_then(|series| self.report(&holding.id, &series))
      })
      .collect();

    let mut summary = PortfolioSummary::default();
    for (holding, report) in holdings.iter().zip(reports) {
      let report = match report {
        Ok(report) => {
          summary.total_latest_value += report.last_value.unwrap_or(0.0);
          Some(report)
        }
        Err(err) => {
          warn!(id = %holding.id, error = %err, "holding has no usable history");
          None
        }
      };

      summary.items.push(HoldingSummary {
        name: holding.name.clone(),
        kind: holding.kind,
        report,
      });
    }

    summary
  }
}
