// src/error.rs
use thiserror::Error;

/// Custom error types for the gbm-call-mc library
#[derive(Debug, Clone, Error)]
pub enum SdeError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Monte Carlo simulation error
    #[error("Monte Carlo simulation error with {paths} paths: {reason}")]
    MonteCarloError { paths: usize, reason: String },

    /// RNG or entropy source error
    #[error("Random number generation error: {reason}")]
    RandomGenerationError { reason: String },
}

/// Result type alias for gbm-call-mc operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        if value <= 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        if value < 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> SdeResult<()> {
        if paths == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "num_paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SdeResult<()> {
        if steps == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "num_steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that `workers` is non-zero and splits `paths` into equal chunks
    pub fn validate_workers(paths: usize, workers: usize) -> SdeResult<()> {
        if workers == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths % workers != 0 {
            Err(SdeError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: format!(
                    "{} paths cannot be split evenly across {} workers",
                    paths, workers
                ),
            })
        } else {
            Ok(())
        }
    }
}
