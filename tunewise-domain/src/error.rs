use thiserror::Error;

/// Precondition failures. Raised before the pipeline runs, never from inside it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid vehicle: {0}")]
    InvalidVehicle(String),

    #[error("invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("no modification catalog loaded")]
    EmptyCatalog,
}

impl EngineError {
    /// True for errors caused by the caller's input rather than configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidVehicle(_) | EngineError::InvalidPreferences(_)
        )
    }
}
