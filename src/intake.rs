//! Inbound evcc events
//!
//! Decodes events from the bus, keeps only `connect` events for configured
//! vehicles, resolves their schedule and hands the plan to the dispatcher.

use crate::bus::BusClient;
use crate::config::{Config, VehicleConfig};
use crate::dispatch::PlanDispatcher;
use crate::error::{PlannerError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::schedule::ResolvedPlan;
use crate::timezone::ScheduleZone;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Event kind that triggers planning
pub const CONNECT_EVENT: &str = "connect";

/// evcc event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub vehicle: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Event {
    /// Decode a JSON event payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|e| {
            PlannerError::serialization(format!("Error parsing event JSON: {}", e))
        })
    }

    pub fn is_connect(&self) -> bool {
        self.kind == CONNECT_EVENT
    }
}

/// Why an event did not lead to a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event kind other than `connect`
    NotConnect(String),
    /// Vehicle without configuration
    UnknownVehicle(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::NotConnect(kind) => write!(f, "non-connect event {:?}", kind),
            IgnoreReason::UnknownVehicle(name) => write!(f, "no configuration for {:?}", name),
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    Ignored(IgnoreReason),
    Dispatched {
        vehicle: String,
        topic: String,
        plan: ResolvedPlan<FixedOffset>,
    },
}

/// Filters events and plans charging for configured vehicles
pub struct EventIntake {
    config: Arc<Config>,
    zone: ScheduleZone,
    dispatcher: PlanDispatcher,
    logger: StructuredLogger,
}

impl EventIntake {
    pub fn new(config: Arc<Config>, zone: ScheduleZone, dispatcher: PlanDispatcher) -> Self {
        Self {
            config,
            zone,
            dispatcher,
            logger: get_logger("intake"),
        }
    }

    /// Wire up an intake publishing through `bus` using the configured zone and topics
    pub fn from_config(config: Arc<Config>, bus: Arc<dyn BusClient>) -> Result<Self> {
        let zone = config.schedule_zone()?;
        let dispatcher = PlanDispatcher::new(bus, &config.mqtt.topics.plan_soc);
        Ok(Self::new(config, zone, dispatcher))
    }

    pub fn zone(&self) -> ScheduleZone {
        self.zone
    }

    /// Next plan for `vehicle` as seen at `now`
    pub fn plan_for<Z: TimeZone>(
        &self,
        vehicle: &VehicleConfig,
        now: &DateTime<Z>,
    ) -> Result<ResolvedPlan<FixedOffset>> {
        self.zone.resolve(&vehicle.schedule, now, vehicle.soc)
    }

    /// Decode and handle a raw bus payload
    pub async fn handle_payload(&self, payload: &[u8], now: DateTime<Utc>) -> Result<IntakeOutcome> {
        let event = Event::from_payload(payload)?;
        self.handle_event(&event, now).await
    }

    /// Handle a decoded event
    pub async fn handle_event(&self, event: &Event, now: DateTime<Utc>) -> Result<IntakeOutcome> {
        if !event.is_connect() {
            return Ok(IntakeOutcome::Ignored(IgnoreReason::NotConnect(
                event.kind.clone(),
            )));
        }

        let Some(vehicle) = self.config.vehicle(&event.vehicle) else {
            return Ok(IntakeOutcome::Ignored(IgnoreReason::UnknownVehicle(
                event.vehicle.clone(),
            )));
        };

        let logger = self.logger.for_vehicle(&vehicle.name);
        logger.trace(&format!("Resolving schedule in zone {}", self.zone));

        let plan = self.plan_for(vehicle, &now)?;
        logger.debug(&format!(
            "Calculated next charging time: {} (target soc {})",
            plan.time, plan.soc
        ));

        let topic = self.dispatcher.dispatch(&vehicle.name, &plan).await?;
        Ok(IntakeOutcome::Dispatched {
            vehicle: vehicle.name.clone(),
            topic,
            plan,
        })
    }
}
