use crate::error::{PlannerError, Result};
use tracing::Level;

/// Parse a level name; accepts the evcc spellings `warning`, `fatal` and `critical`
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" | "FATAL" | "CRITICAL" => Ok(Level::ERROR),
        _ => Err(PlannerError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}
