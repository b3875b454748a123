#[macro_use]
extern crate prettytable;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use finrisk::report::Holding;
use finrisk::series::load_history_file;
use finrisk::traits::JsonDirHistory;
use finrisk::AnalyticsConfig;
use finrisk::Analyzer;
use finrisk::AssetReport;
use prettytable::Table;
use tracing_subscriber::EnvFilter;

/// Return, risk and Monte Carlo analytics for price and NAV histories
#[derive(Parser, Debug)]
#[command(name = "finrisk", version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Analyse a single history file
  Report {
    /// History JSON (provider or NAV shape)
    history: PathBuf,
    /// Analytics config JSON
    config: Option<PathBuf>,
  },
  /// Summarize holdings stored as `<dir>/<id>.json`
  Portfolio {
    /// Directory of history files
    dir: PathBuf,
    /// Holding ids
    #[arg(required = true)]
    ids: Vec<String>,
    /// Analytics config JSON
    #[arg(long)]
    config: Option<PathBuf>,
  },
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalyticsConfig> {
  match path {
    Some(path) => AnalyticsConfig::from_file(path),
    None => Ok(AnalyticsConfig::default()),
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Report { history, config } => {
      let config = load_config(config.as_ref())?;
      let series = load_history_file(&history)?;
      let report = Analyzer::new(config).report(&history.display().to_string(), &series)?;

      print_table(&report);
      println!("{}", serde_json::to_string_pretty(&report)?);
      Ok(())
    }
    Commands::Portfolio { dir, ids, config } => {
      let config = load_config(config.as_ref())?;
      let holdings: Vec<Holding> = ids
        .into_iter()
        .map(|id| Holding {
          name: id.clone(),
          id,
          kind: Default::default(),
        })
        .collect();
      let summary = Analyzer::new(config).portfolio_summary(&holdings, &JsonDirHistory::new(dir));

      for item in summary.items.iter().filter_map(|item| item.report.as_ref()) {
        print_table(item);
      }
      println!("{}", serde_json::to_string_pretty(&summary)?);
      Ok(())
    }
  }
}

fn print_table(report: &AssetReport) {
  let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));

  let mut table = Table::new();
  table.add_row(row!["id", report.id]);
  table.add_row(row!["last value", fmt(report.last_value)]);
  table.add_row(row!["trailing growth", fmt(report.trailing_growth)]);
  table.add_row(row!["max drawdown", fmt(Some(report.max_drawdown))]);
  table.add_row(row!["annualized return", fmt(Some(report.risk.annualized_return))]);
  table.add_row(row!["annualized volatility", fmt(Some(report.risk.annualized_volatility))]);
  table.add_row(row!["sharpe ratio", fmt(Some(report.risk.sharpe_ratio))]);
  if let Some(sim) = &report.simulation {
    table.add_row(row!["expected price", fmt(Some(sim.expected_price))]);
    table.add_row(row!["probability of gain", fmt(Some(sim.probability_of_gain))]);
    table.add_row(row!["5th percentile", fmt(Some(sim.lower_bound_5th))]);
    table.add_row(row!["95th percentile", fmt(Some(sim.upper_bound_95th))]);
  }
  table.printstd();
}
