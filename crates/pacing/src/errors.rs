use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Route has no samples")]
    EmptyRoute,

    #[error("Route has zero total distance")]
    ZeroDistance,

    #[error("Invalid checkpoints: {0}")]
    InvalidCheckpoints(String),

    #[error("Expected {expected} terrain types (one per segment), got {got}")]
    TerrainCountMismatch { expected: usize, got: usize },

    #[error("Invalid reference performance: {0}")]
    InvalidPerformance(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for PlanError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        if messages.is_empty() {
            return PlanError::InvalidInput(errors.to_string());
        }
        messages.sort();
        PlanError::InvalidInput(messages.join(", "))
    }
}
