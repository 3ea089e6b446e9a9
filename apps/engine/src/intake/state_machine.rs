//! Session lifecycle state machine.
//!
//! Legal flow: `draft → normalizing → ready → layout_queued →
//! layout_processing → layout_complete`, with `failed` reachable from every
//! non-terminal state. Submission is legal from `draft` as well as `ready`
//! (normalization may be skipped). `layout_complete` and `failed` accept no
//! further transitions.
//!
//! Invalid transitions never mutate the session; they surface as a conflict.

use chrono::Utc;

use crate::errors::EngineError;
use crate::models::session::{Session, SessionStatus};

/// Returns true when `from → to` is a legal lifecycle transition.
pub fn is_legal_transition(from: SessionStatus, to: SessionStatus) -> bool {
    use SessionStatus::*;

    if to == Failed {
        return !from.is_terminal();
    }

    matches!(
        (from, to),
        (Draft, Normalizing)
            | (Draft, LayoutQueued)
            | (Normalizing, Ready)
            | (Ready, LayoutQueued)
            | (LayoutQueued, LayoutProcessing)
            | (LayoutProcessing, LayoutComplete)
    )
}

/// Applies a transition, refreshing the session's last-modified timestamp.
/// Illegal transitions leave the session untouched and return a conflict.
pub fn transition(session: &mut Session, to: SessionStatus) -> Result<(), EngineError> {
    if !is_legal_transition(session.status, to) {
        return Err(EngineError::Conflict(format!(
            "Cannot transition session {} from {} to {}",
            session.session_id,
            session.status.as_str(),
            to.as_str()
        )));
    }
    session.status = to;
    session.updated_at = Utc::now();
    Ok(())
}

/// Marks a session failed with a captured error message. Only legal from
/// non-terminal states.
pub fn fail(session: &mut Session, message: String) -> Result<(), EngineError> {
    transition(session, SessionStatus::Failed)?;
    session.error_message = Some(message);
    Ok(())
}
