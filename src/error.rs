use thiserror::Error;

/// Status codes worth retrying: rate limiting and upstream hiccups.
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// Failure of a search or detail call against the places provider.
///
/// The two variants drive control flow: `Transient` errors are retried by
/// `retry_request`, `Permanent` errors abort the current query term only.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("transient provider error (status {status:?}): {message}")]
    Transient { status: Option<u16>, message: String },
    #[error("permanent provider error (status {status:?}): {message}")]
    Permanent { status: Option<u16>, message: String },
}

impl ProviderError {
    pub fn from_status(status: u16, body: String) -> Self {
        let message = truncate_body(body);
        if RETRYABLE_STATUS.contains(&status) {
            Self::Transient {
                status: Some(status),
                message,
            }
        } else {
            Self::Permanent {
                status: Some(status),
                message,
            }
        }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        // Connectivity and timeout failures are worth another attempt.
        Self::Transient {
            status: None,
            message: err.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no data produced: every query term failed")]
    NoData,
}

// Keep diagnostics, not whole HTML error pages. Credentials travel in
// request headers and never reach the body we retain here.
fn truncate_body(body: String) -> String {
    const MAX: usize = 500;
    if body.chars().count() > MAX {
        body.chars().take(MAX).collect()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_classify_as_transient() {
        for status in RETRYABLE_STATUS {
            assert!(ProviderError::from_status(status, String::new()).is_transient());
        }
    }

    #[test]
    fn client_errors_classify_as_permanent() {
        for status in [400, 401, 403, 404] {
            assert!(!ProviderError::from_status(status, String::new()).is_transient());
        }
    }
}
