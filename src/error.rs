//! Error types and handling for Charge Planner
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Charge Planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Main error type for Charge Planner
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A schedule rule names a day that is neither a weekday nor an aggregate
    #[error("Invalid day: {token}")]
    InvalidDayToken { token: String },

    /// A schedule rule time is not `HH:MM`
    #[error("Invalid time format: {value} (expected HH:MM)")]
    InvalidTimeFormat { value: String },

    /// The schedule expanded to nothing
    #[error("No candidate times found")]
    NoCandidates,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// MQTT client and broker errors
    #[error("MQTT error: {message}")]
    Mqtt { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl PlannerError {
    /// Create a new invalid day error
    pub fn invalid_day<S: Into<String>>(token: S) -> Self {
        PlannerError::InvalidDayToken {
            token: token.into(),
        }
    }

    /// Create a new invalid time format error
    pub fn invalid_time<S: Into<String>>(value: S) -> Self {
        PlannerError::InvalidTimeFormat {
            value: value.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        PlannerError::Config {
            message: message.into(),
        }
    }

    /// Create a new MQTT error
    pub fn mqtt<S: Into<String>>(message: S) -> Self {
        PlannerError::Mqtt {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        PlannerError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        PlannerError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        PlannerError::Io {
            message: message.into(),
        }
    }

    /// Whether the error stems from the vehicle's schedule rather than transport
    pub fn is_schedule_error(&self) -> bool {
        matches!(
            self,
            PlannerError::InvalidDayToken { .. }
                | PlannerError::InvalidTimeFormat { .. }
                | PlannerError::NoCandidates
        )
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        PlannerError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlannerError {
    fn from(err: serde_yaml::Error) -> Self {
        PlannerError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<rumqttc::ClientError> for PlannerError {
    fn from(err: rumqttc::ClientError) -> Self {
        PlannerError::mqtt(err.to_string())
    }
}
