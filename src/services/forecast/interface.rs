use std::fmt;

use crate::models::forecast::PriceForecast;
use crate::models::selection::{AcceptanceConfirmation, SelectionResult};

/// Inbound fetch failed or returned an unusable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    NotFound,
    Upstream(String),
}

/// Acceptance submission failed. `Rejected` is the collaborator refusing
/// the payload; `Upstream` is transport or server failure. Both are
/// retryable by the user, never retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    Rejected(String),
    Upstream(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "price forecast not found"),
            LoadError::Upstream(msg) => write!(f, "failed to load price forecast: {}", msg),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected(msg) => write!(f, "acceptance rejected: {}", msg),
            SubmitError::Upstream(msg) => write!(f, "failed to submit acceptance: {}", msg),
        }
    }
}

/// Transport seam between the selection flow and the outside world: one
/// function per collaborator, so tests can substitute fakes.
pub trait ForecastOperations {
    async fn load_forecast(&self, request_id: &str) -> Result<PriceForecast, LoadError>;

    async fn submit_acceptance(
        &self,
        result: &SelectionResult,
    ) -> Result<AcceptanceConfirmation, SubmitError>;
}
