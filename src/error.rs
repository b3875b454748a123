//! # Errors
//!
//! $$
//! f:\text{inputs}\to \text{Result}\langle T, \text{AnalyticsError}\rangle
//! $$
//!
use thiserror::Error;

/// Failure taxonomy shared by every analytics operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
  /// Malformed or out-of-domain input (short series, zero price, negative duration...).
  #[error("invalid input: {0}")]
  InvalidInput(String),
  /// Input is well formed but carries no information for the requested statistic.
  #[error("degenerate data: {0}")]
  DegenerateData(String),
  /// The price/NAV history provider could not deliver data for `id`.
  #[error("upstream unavailable for `{id}`: {reason}")]
  UpstreamUnavailable { id: String, reason: String },
}

impl AnalyticsError {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidInput(msg.into())
  }

  pub(crate) fn upstream(id: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::UpstreamUnavailable {
      id: id.into(),
      reason: reason.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
