use thiserror::Error;

/// Typed failure returned by every externally reachable mutation.
///
/// Nothing in the engine raises from inside a tick loop: one character's
/// invalid state must never abort processing of the rest of the
/// population. Messages are written to be surfaced directly as narrative
/// strings by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("character {id} not found")]
    NotFound { id: u64 },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
}

impl EngineError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        EngineError::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn already_dead(id: u64) -> Self {
        EngineError::InvalidState {
            reason: format!("character {id} is already dead"),
        }
    }
}
