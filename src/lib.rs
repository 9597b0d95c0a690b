//! # Charge Planner - weekly charge plans for evcc
//!
//! Listens for vehicle connect events on MQTT and answers each one with the
//! next scheduled charge deadline and target state of charge, taken from a
//! weekly recurring schedule per vehicle.
//!
//! ## Architecture
//!
//! - `schedule`: pure resolution of the next deadline from weekly rules
//! - `timezone`: the zone schedules are evaluated in
//! - `intake`: event decoding and filtering
//! - `dispatch`: plan encoding and publishing
//! - `bus`: MQTT client and the `BusClient` seam
//! - `service`: the event loop tying it together
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod intake;
pub mod logging;
pub mod schedule;
pub mod service;
pub mod timezone;

// Re-export commonly used types
pub use config::Config;
pub use error::{PlannerError, Result};
pub use service::PlannerService;
