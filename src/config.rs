//! Configuration management for Charge Planner
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{PlannerError, Result};
use crate::schedule::{parse_time_of_day, resolve_days};
use crate::timezone::ScheduleZone;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

mod defaults;

/// Placeholders accepted in the plan topic template
pub const TOPIC_PLACEHOLDERS: [&str; 2] = ["%s", "{vehicle}"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MQTT broker and topic configuration
    pub mqtt: MqttConfig,

    /// Vehicles with their charging schedules
    pub vehicles: Vec<VehicleConfig>,

    /// IANA zone the schedules are evaluated in; host local zone when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Shorthand log level, takes precedence over `logging.level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// MQTT connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker address, `[scheme://]host[:port]`
    pub broker: String,

    /// Username (empty for anonymous)
    pub user: String,

    /// Password
    pub password: String,

    /// Client identifier; generated when empty
    #[serde(alias = "clientID", alias = "clientId")]
    pub client_id: String,

    /// Skip TLS certificate verification (not supported, rejected on validate)
    pub insecure: bool,

    /// CA certificate (PEM file path); enables TLS
    #[serde(alias = "caCert")]
    pub ca_cert: String,

    /// Client certificate (PEM file path)
    #[serde(alias = "clientCert")]
    pub client_cert: String,

    /// Client private key (PEM file path)
    #[serde(alias = "clientKey")]
    pub client_key: String,

    /// MQTT keep-alive in seconds
    pub keep_alive_secs: u64,

    /// Delay before polling again after a connection error
    pub reconnect_delay_ms: u64,

    /// Topic configuration
    pub topics: TopicsConfig,
}

/// Topics consumed and produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    /// Topic carrying evcc events
    pub events: String,

    /// Per-vehicle plan topic template; `%s` is replaced by the vehicle name
    #[serde(alias = "planSoc")]
    pub plan_soc: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or directory; empty disables file logging
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// One vehicle and its weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleConfig {
    /// Vehicle identifier as used by evcc
    pub name: String,

    /// Target SOC for rules without their own
    pub soc: i32,

    /// Weekly recurring rules
    #[serde(default)]
    pub schedule: Vec<ScheduleRule>,
}

/// A weekly recurring charge deadline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleRule {
    /// Weekday name, `workday` or `weekend`
    pub day: String,

    /// Deadline in `HH:MM`
    pub time: String,

    /// Target SOC for this rule; the vehicle default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc: Option<i32>,
}

impl ScheduleRule {
    pub fn new<D: Into<String>, T: Into<String>>(day: D, time: T, soc: Option<i32>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            soc,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "charge_planner.yaml",
            "/data/charge_planner.yaml",
            "/etc/charge-planner/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Look up a vehicle by its exact name
    pub fn vehicle(&self, name: &str) -> Option<&VehicleConfig> {
        self.vehicles.iter().find(|v| v.name == name)
    }

    /// Log level after applying the `log` shorthand
    pub fn effective_log_level(&self) -> &str {
        self.log
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.logging.level)
    }

    /// Logging settings with the `log` shorthand folded in
    pub fn effective_logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.effective_log_level().to_string(),
            ..self.logging.clone()
        }
    }

    /// Zone schedules are evaluated in
    pub fn schedule_zone(&self) -> Result<ScheduleZone> {
        ScheduleZone::from_config(self.timezone.as_deref())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.mqtt.broker.trim().is_empty() {
            return Err(PlannerError::validation(
                "mqtt.broker",
                "Broker address cannot be empty",
            ));
        }

        if self.mqtt.insecure {
            return Err(PlannerError::validation(
                "mqtt.insecure",
                "Skipping certificate verification is not supported",
            ));
        }

        if self.mqtt.client_cert.is_empty() != self.mqtt.client_key.is_empty() {
            return Err(PlannerError::validation(
                "mqtt.client_cert",
                "Client certificate and key must be given together",
            ));
        }

        if self.mqtt.topics.events.trim().is_empty() {
            return Err(PlannerError::validation(
                "mqtt.topics.events",
                "Events topic cannot be empty",
            ));
        }

        if !TOPIC_PLACEHOLDERS
            .iter()
            .any(|p| self.mqtt.topics.plan_soc.contains(p))
        {
            return Err(PlannerError::validation(
                "mqtt.topics.plan_soc",
                "Topic template must contain a %s placeholder",
            ));
        }

        self.schedule_zone()?;

        let mut seen = HashSet::new();
        for (i, vehicle) in self.vehicles.iter().enumerate() {
            if vehicle.name.trim().is_empty() {
                return Err(PlannerError::validation(
                    format!("vehicles[{}].name", i),
                    "Vehicle name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(vehicle.name.as_str()) {
                return Err(PlannerError::validation(
                    format!("vehicles[{}].name", i),
                    format!("Duplicate vehicle {}", vehicle.name),
                ));
            }
        }

        Ok(())
    }

    /// Rules that will fail to resolve, as `(vehicle, problem)` pairs.
    ///
    /// These only affect events for the vehicle concerned, so they are
    /// reported rather than rejected by `validate`.
    pub fn schedule_issues(&self) -> Vec<(String, String)> {
        let mut issues = Vec::new();
        for vehicle in &self.vehicles {
            if vehicle.schedule.is_empty() {
                issues.push((vehicle.name.clone(), "no schedule rules".to_string()));
            }
            for (j, rule) in vehicle.schedule.iter().enumerate() {
                if let Err(e) =
                    resolve_days(&rule.day).and_then(|_| parse_time_of_day(&rule.time))
                {
                    issues.push((vehicle.name.clone(), format!("schedule[{}]: {}", j, e)));
                }
            }
        }
        issues
    }
}
