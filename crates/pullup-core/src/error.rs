use thiserror::Error;

pub type Result<T> = std::result::Result<T, PanelError>;

/// Rejected decay parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecelerationError {
    #[error("deceleration rate must lie strictly between 0 and 1, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("velocity threshold must be positive and finite, got {threshold}")]
    InvalidThreshold { threshold: f64 },
}

/// Rejected panel configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a non-negative finite length, got {value}")]
    NegativeLength { field: &'static str, value: f64 },

    #[error("middle_state must lie in [0, 1], got {value}")]
    MiddleStateOutOfRange { value: f64 },

    #[error(transparent)]
    Deceleration(#[from] DecelerationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    #[error("invalid panel configuration: {0}")]
    Config(#[from] ConfigError),
}
