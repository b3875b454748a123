//! # Visualization
//!
//! $$
//! \{S^{(k)}_t\}_{k=1}^m \mapsto \text{fan chart}
//! $$
//!
//! Chart adapter over plain results; nothing here feeds back into the calculators.

use plotly::common::DashType;
use plotly::common::Line;
use plotly::common::Mode;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;

use crate::returns::ReturnSeries;
use crate::simulation::SimulationResult;

pub struct SimulationPlotter {
  max_paths: usize,
  line_width: f64,
  title: String,
}

impl Default for SimulationPlotter {
  fn default() -> Self {
    Self::new()
  }
}

impl SimulationPlotter {
  pub fn new() -> Self {
    Self {
      max_paths: 50,
      line_width: 1.0,
      title: "Monte Carlo price paths".into(),
    }
  }

  pub fn title(mut self, title: &str) -> Self {
    self.title = title.into();
    self
  }

  pub fn max_paths(mut self, n: usize) -> Self {
    self.max_paths = n;
    self
  }

  pub fn line_width(mut self, w: f64) -> Self {
    self.line_width = w;
    self
  }

  /// First `max_paths` paths plus flat 5th/95th percentile and expected-price guides.
  pub fn fan_chart(&self, result: &SimulationResult) -> Plot {
    let horizon = result.paths.ncols();
    let t: Vec<usize> = (0..horizon).collect();

    let mut plot = Plot::new();
    for (k, path) in result.paths.rows().into_iter().take(self.max_paths).enumerate() {
      let trace = Scatter::new(t.clone(), path.to_vec())
        .mode(Mode::Lines)
        .name(format!("path {}", k + 1))
        .line(Line::new().width(self.line_width))
        .show_legend(false);
      plot.add_trace(trace);
    }

    let guides = [
      ("5th percentile", result.lower_bound_5th),
      ("expected", result.expected_price),
      ("95th percentile", result.upper_bound_95th),
    ];
    for (label, level) in guides {
      let trace = Scatter::new(vec![0, horizon.saturating_sub(1)], vec![level, level])
        .mode(Mode::Lines)
        .name(label)
        .line(Line::new().width(2.0).dash(DashType::Dash));
      plot.add_trace(trace);
    }

    plot.set_layout(Layout::new().title(self.title.as_str()));
    plot
  }
}

/// Line chart of a return series against its dates.
pub fn returns_chart(returns: &ReturnSeries, title: &str) -> Plot {
  let dates: Vec<String> = returns.dates().iter().map(|d| d.to_string()).collect();

  let mut plot = Plot::new();
  plot.add_trace(
    Scatter::new(dates, returns.values().to_vec())
      .mode(Mode::Lines)
      .name("returns"),
  );
  plot.set_layout(Layout::new().title(title));
  plot
}
