use thiserror::Error;

/// Engine-level error type.
///
/// Every fallible operation in the intake service and the layout engine
/// returns this enum; the transport layer that embeds the crate maps the
/// variants onto its own response codes (422 / 409 / 404 / 500).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed payload (session request, CIP). Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal state transition or an operation forbidden in the current
    /// session status. Surfaced to the caller, never retried.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown session or proposal id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected failure during processing. The owning session transitions
    /// to `failed` with the captured message.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Stable machine-readable code for the variant, used in logs and by
    /// transport adapters.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            EngineError::Validation("x".to_string()).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(EngineError::Conflict("x".to_string()).code(), "CONFLICT");
        assert_eq!(EngineError::NotFound("x".to_string()).code(), "NOT_FOUND");
        assert_eq!(
            EngineError::Internal(anyhow::anyhow!("boom")).code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = EngineError::Conflict("cannot submit in status failed".to_string());
        assert!(err.to_string().contains("cannot submit"));
    }
}
