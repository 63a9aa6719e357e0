//! Scoring port: Trait for the remote risk-scoring service.
//!
//! Each operation is one request/response exchange with no retries. Callers
//! run these on background threads (see `application::RemoteWorker`), so the
//! trait itself is synchronous.

use crate::domain::{Panel, PatientId, RiskResult, ServiceHealth};

/// Failures reported by a [`ScoringService`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or unexpected HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service has no record for the identifier.
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Contract with the remote scoring service.
pub trait ScoringService: Send + Sync {
    /// List known patient identifiers.
    ///
    /// Best-effort: any transport or decode failure yields an empty list.
    fn list_patients(&self) -> Vec<PatientId>;

    /// Fetch one patient's panel.
    ///
    /// # Errors
    /// [`ClientError::PatientNotFound`] when the service reports an error
    /// payload for `id`; [`ClientError::Transport`] on network failure;
    /// [`ClientError::Decode`] when the panel is incomplete or non-numeric.
    fn fetch_patient(&self, id: &PatientId) -> Result<Panel, ClientError>;

    /// Submit a panel and receive its risk scores.
    ///
    /// Missing `scores`/`topFactors`/`recommendations` decode as empty.
    ///
    /// # Errors
    /// [`ClientError::Transport`] on network failure, [`ClientError::Decode`]
    /// when the body is not a JSON object of the expected shape.
    fn submit_for_scoring(&self, panel: &Panel) -> Result<RiskResult, ClientError>;

    /// Probe service liveness and record count.
    ///
    /// # Errors
    /// Same taxonomy as the other operations.
    fn health(&self) -> Result<ServiceHealth, ClientError>;
}
