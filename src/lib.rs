//! # finrisk
//!
//! $$
//! \{(t_i, p_i)\} \;\to\; r_i \;\to\; (\hat\mu_A, \hat\sigma_A, S) \;\to\; \{S^{(k)}_t\}
//! $$
//!
//! Return, risk, Monte Carlo and projection analytics for price and NAV histories.
//! All calculators are pure and synchronous; fetching data is left to a [`traits::HistoryProvider`].

pub mod config;
pub mod error;
pub mod indicators;
pub mod projection;
pub mod report;
pub mod returns;
pub mod risk;
pub mod series;
pub mod simulation;
pub mod traits;
pub mod visualization;

pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use error::Result;
pub use projection::project;
pub use projection::ProjectionResult;
pub use report::Analyzer;
pub use report::AssetReport;
pub use report::PortfolioSummary;
pub use returns::build_returns;
pub use returns::ReturnSeries;
pub use returns::ZeroPricePolicy;
pub use risk::RiskConfig;
pub use risk::RiskEstimator;
pub use risk::RiskMetrics;
pub use series::PriceObservation;
pub use series::PriceSeries;
pub use simulation::MonteCarloConfig;
pub use simulation::MonteCarloSimulator;
pub use simulation::SimulationResult;
