use thiserror::Error;

use crate::rail::RailError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario {0:?} not found")]
    UnknownScenario(String),

    #[error("scenario {0:?} has not completed")]
    NotCompleted(String),

    #[error(transparent)]
    Rail(#[from] RailError),

    #[error("scenario spec parse error: {0}")]
    Spec(#[from] serde_json::Error),
}
