//! Typed errors for vault API calls.

/// Errors from the vault API.
///
/// `Unauthenticated` is the one kind callers branch on: the bearer token was
/// rejected and the session has to be re-established outside this process.
/// Everything else is reported as a generic remote failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("not authenticated")]
  Unauthenticated,

  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("server returned status {0}")]
  Status(u16),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn is_unauthenticated(&self) -> bool {
    matches!(self, ApiError::Unauthenticated)
  }

  /// Classify a non-success HTTP status, keeping 401 distinct.
  pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
    if status == reqwest::StatusCode::UNAUTHORIZED {
      ApiError::Unauthenticated
    } else {
      ApiError::Status(status.as_u16())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unauthorized_is_classified() {
    assert!(ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED).is_unauthenticated());
    assert!(!ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).is_unauthenticated());
  }
}
