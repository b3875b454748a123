//! # Monte Carlo
//!
//! $$
//! S^{(k)}_{t} = S^{(k)}_{t-1}\,(1 + \varepsilon^{(k)}_t),\qquad
//! \varepsilon^{(k)}_t \overset{iid}{\sim} \mathcal N(\mu, \sigma^2)
//! $$
//!
//! Forward price paths compounded from Gaussian per-period returns.

use ndarray::parallel::prelude::*;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayViewMut1;
use ndarray::Axis;
use ndarray::Zip;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::Normal;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::error::Result;

/// Simulation size and reproducibility settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
  /// Path length including the starting price.
  pub horizon_days: usize,
  pub num_simulations: usize,
  /// Master seed. `None` draws one from entropy.
  pub seed: Option<u64>,
  /// Generate paths on the rayon pool.
  pub parallel: bool,
}

impl Default for MonteCarloConfig {
  fn default() -> Self {
    Self {
      horizon_days: 252,
      num_simulations: 1000,
      seed: None,
      parallel: true,
    }
  }
}

/// Simulated paths and the statistics of their final prices.
#[derive(Clone, Debug)]
pub struct SimulationResult {
  pub last_price: f64,
  pub expected_price: f64,
  /// Share of paths ending strictly above `last_price`, in `[0, 1]`.
  pub probability_of_gain: f64,
  pub lower_bound_5th: f64,
  pub upper_bound_95th: f64,
  /// `num_simulations x horizon_days`, column 0 equals `last_price`.
  pub paths: Array2<f64>,
}

impl SimulationResult {
  pub fn final_prices(&self) -> Array1<f64> {
    self.paths.column(self.paths.ncols() - 1).to_owned()
  }

  pub fn summary(&self) -> SimulationSummary {
    SimulationSummary {
      last_price: self.last_price,
      expected_price: self.expected_price,
      probability_of_gain: self.probability_of_gain,
      lower_bound_5th: self.lower_bound_5th,
      upper_bound_95th: self.upper_bound_95th,
      num_simulations: self.paths.nrows(),
      horizon_days: self.paths.ncols(),
    }
  }
}

/// Path-free view of a [`SimulationResult`] for structured reporting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SimulationSummary {
  pub last_price: f64,
  pub expected_price: f64,
  pub probability_of_gain: f64,
  pub lower_bound_5th: f64,
  pub upper_bound_95th: f64,
  pub num_simulations: usize,
  pub horizon_days: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MonteCarloSimulator {
  config: MonteCarloConfig,
}

impl MonteCarloSimulator {
  pub fn new(config: MonteCarloConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &MonteCarloConfig {
    &self.config
  }

  /// Simulate forward from `last_price` with per-period return mean `mu` and std-dev `sigma`.
  pub fn simulate(&self, last_price: f64, mu: f64, sigma: f64) -> Result<SimulationResult> {
    let MonteCarloConfig {
      horizon_days,
      num_simulations,
      seed,
      parallel,
    } = self.config;

    if !last_price.is_finite() || last_price <= 0.0 {
      return Err(AnalyticsError::invalid(format!(
        "last price must be positive and finite, got {last_price}"
      )));
    }
    if horizon_days == 0 || num_simulations == 0 {
      return Err(AnalyticsError::invalid(
        "horizon_days and num_simulations must be > 0",
      ));
    }
    if !mu.is_finite() {
      return Err(AnalyticsError::invalid(format!("mu must be finite, got {mu}")));
    }
    if !sigma.is_finite() || sigma < 0.0 {
      return Err(AnalyticsError::invalid(format!(
        "sigma must be finite and >= 0, got {sigma}"
      )));
    }
    let normal = Normal::new(mu, sigma).map_err(|e| AnalyticsError::invalid(e.to_string()))?;

    let mut master = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let path_seeds = Array1::from_shape_fn(num_simulations, |_| master.gen::<u64>());

    let mut paths = Array2::<f64>::zeros((num_simulations, horizon_days));

    if parallel {
      Zip::from(paths.axis_iter_mut(Axis(0)))
        .and(&path_seeds)
        .into_par_iter()
        .for_each(|(path, &path_seed)| fill_path(path, last_price, normal, path_seed));
    } else {
      Zip::from(paths.axis_iter_mut(Axis(0)))
        .and(&path_seeds)
        .for_each(|path, &path_seed| fill_path(path, last_price, normal, path_seed));
    }

    let finals = paths.column(horizon_days - 1);
    let n = num_simulations as f64;
    let expected_price = finals.sum() / n;
    let gains = finals.iter().filter(|&&p| p > last_price).count();
    let probability_of_gain = gains as f64 / n;

    let mut sorted = finals.to_vec();
    sorted.sort_by(f64::total_cmp);
    let lower_bound_5th = percentile_sorted(&sorted, 5.0);
    let upper_bound_95th = percentile_sorted(&sorted, 95.0);

    debug!(
      num_simulations,
      horizon_days, expected_price, probability_of_gain, "monte carlo simulation finished"
    );

    Ok(SimulationResult {
      last_price,
      expected_price,
      probability_of_gain,
      lower_bound_5th,
      upper_bound_95th,
      paths,
    })
  }
}

fn fill_path(mut path: ArrayViewMut1<f64>, last_price: f64, normal: Normal<f64>, seed: u64) {
  let mut rng = StdRng::seed_from_u64(seed);
  let steps = path.len() - 1;
  let draws = Array1::random_using(steps, normal, &mut rng);

  path[0] = last_price;
  for t in 1..path.len() {
    path[t] = path[t - 1] * (1.0 + draws[t - 1]);
  }
}

/// Percentile `q` (0..=100) of ascending `sorted` with linear interpolation between ranks.
///
/// Returns `NaN` for an empty slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
  match sorted.len() {
    0 => f64::NAN,
    1 => sorted[0],
    n => {
      let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
      let lo = rank.floor() as usize;
      let hi = rank.ceil() as usize;
      let frac = rank - lo as f64;
      sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
  }
}
