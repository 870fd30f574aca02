//! Contract with the itinerary service: error mapping, response checks and
//! the transport trait platform adapters implement.
use thiserror::Error;

#[cfg(feature = "async")]
use crate::request::PlanRequest;
use crate::response::PlanResponse;

pub const GENERATE_FAILED: &str = "Failed to generate itinerary. Please try again.";
pub const REGENERATE_FAILED: &str = "Regeneration failed. Please try again.";
pub const NETWORK_FAILED: &str = "Network error: is the itinerary service running?";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Network failure, or a non-success status when `status` is set.
    #[error("transport failure{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// The service answered but reported a failure of its own.
    #[error("{0}")]
    Application(String),
    #[error("malformed itinerary response: {0}")]
    Decode(String),
}

impl PlanError {
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("Server error: {status}"),
        }
    }

    /// Text for the user-facing notice.
    ///
    /// Application errors pass through verbatim; everything else gets a
    /// generic retry message.
    #[must_use]
    pub fn notice(&self, regenerating: bool) -> String {
        match self {
            Self::Application(message) => message.clone(),
            Self::Transport { status: None, .. } => NETWORK_FAILED.to_string(),
            Self::Transport { .. } | Self::Decode(_) => {
                if regenerating {
                    REGENERATE_FAILED.to_string()
                } else {
                    GENERATE_FAILED.to_string()
                }
            }
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Validate a raw service reply.
///
/// # Errors
///
/// Non-2xx statuses map to [`PlanError::Transport`], undecodable bodies to
/// [`PlanError::Decode`] and an `error` field to [`PlanError::Application`].
pub fn interpret_response(status: u16, body: &str) -> Result<PlanResponse, PlanError> {
    if !(200..300).contains(&status) {
        return Err(PlanError::status(status));
    }
    let response: PlanResponse =
        serde_json::from_str(body).map_err(|e| PlanError::Decode(e.to_string()))?;
    check_response(response)
}

/// Reject a decoded reply that carries an application error.
///
/// # Errors
///
/// Returns [`PlanError::Application`] with the service's message.
pub fn check_response(response: PlanResponse) -> Result<PlanResponse, PlanError> {
    if let Some(message) = response
        .error
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        return Err(PlanError::Application(message.to_string()));
    }
    Ok(response)
}

/// Sends a plan request to the itinerary service.
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait PlanTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`PlanError`] for network, status, decode or application failures.
    async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError>;
}
