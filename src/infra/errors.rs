// src/infra/errors.rs — Error types for the keyword optimizer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeywordOptimizerError>;

#[derive(Error, Debug)]
pub enum KeywordOptimizerError {
    // Component failures (abort the run)
    #[error("Seed generation failed: {message}")]
    Generation {
        message: String,
        #[source]
        source: Option<Box<KeywordOptimizerError>>,
    },

    #[error("Finding alternatives failed: {message}")]
    Alternatives {
        message: String,
        #[source]
        source: Option<Box<KeywordOptimizerError>>,
    },

    #[error("Traffic estimation failed: {message}")]
    Estimation {
        message: String,
        #[source]
        source: Option<Box<KeywordOptimizerError>>,
    },

    // Remote API errors (retriable ones are retried by the API layer)
    #[error("Ads API error: {message}")]
    Api { message: String, retriable: bool },

    #[error("Rate limited by the Ads API, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    // User errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    // Infra
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeywordOptimizerError {
    pub fn generation(message: impl Into<String>) -> Self {
        KeywordOptimizerError::Generation {
            message: message.into(),
            source: None,
        }
    }

    pub fn alternatives(message: impl Into<String>) -> Self {
        KeywordOptimizerError::Alternatives {
            message: message.into(),
            source: None,
        }
    }

    pub fn estimation(message: impl Into<String>) -> Self {
        KeywordOptimizerError::Estimation {
            message: message.into(),
            source: None,
        }
    }

    /// Attach a root cause to a component failure. Other variants are returned unchanged.
    pub fn caused_by(self, cause: KeywordOptimizerError) -> Self {
        let cause = Some(Box::new(cause));
        match self {
            KeywordOptimizerError::Generation { message, .. } => {
                KeywordOptimizerError::Generation {
                    message,
                    source: cause,
                }
            }
            KeywordOptimizerError::Alternatives { message, .. } => {
                KeywordOptimizerError::Alternatives {
                    message,
                    source: cause,
                }
            }
            KeywordOptimizerError::Estimation { message, .. } => {
                KeywordOptimizerError::Estimation {
                    message,
                    source: cause,
                }
            }
            other => other,
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            KeywordOptimizerError::Api {
                retriable: true,
                ..
            } | KeywordOptimizerError::RateLimited { .. }
        )
    }
}
