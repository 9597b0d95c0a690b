//! Outbound charge plans
//!
//! Encodes a resolved plan as the evcc `planSoc` command and publishes it on
//! the vehicle's topic.

use crate::bus::BusClient;
use crate::config::TOPIC_PLACEHOLDERS;
use crate::error::Result;
use crate::logging::{LogContext, get_logger_with_context};
use crate::schedule::ResolvedPlan;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of the plan command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPlanPayload {
    /// Target SOC in percent
    pub value: i32,
    /// Deadline, RFC 3339 with UTC offset
    pub time: String,
}

/// RFC 3339 with whole seconds; a zero offset is written as `Z`
pub fn format_plan_time(time: &DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Encode the plan command for `soc` by `time`
pub fn build_plan_payload(soc: i32, time: &DateTime<FixedOffset>) -> Result<Vec<u8>> {
    let payload = SetPlanPayload {
        value: soc,
        time: format_plan_time(time),
    };
    Ok(serde_json::to_vec(&payload)?)
}

/// Substitute the vehicle name into the topic template
pub fn plan_topic(template: &str, vehicle: &str) -> String {
    TOPIC_PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |topic, placeholder| {
            topic.replace(placeholder, vehicle)
        })
}

/// Publishes plans through a bus client
pub struct PlanDispatcher {
    bus: Arc<dyn BusClient>,
    topic_template: String,
}

impl PlanDispatcher {
    pub fn new(bus: Arc<dyn BusClient>, topic_template: &str) -> Self {
        Self {
            bus,
            topic_template: topic_template.to_string(),
        }
    }

    /// Publish `plan` for `vehicle`, returning the topic it went to
    pub async fn dispatch(
        &self,
        vehicle: &str,
        plan: &ResolvedPlan<FixedOffset>,
    ) -> Result<String> {
        let payload = build_plan_payload(plan.soc, &plan.time)?;
        let topic = plan_topic(&self.topic_template, vehicle);
        let logger = get_logger_with_context(
            LogContext::new("dispatch")
                .with_vehicle(vehicle)
                .with_field("topic", topic.clone()),
        );

        logger.trace(&format!(
            "Marshaled JSON: {}",
            String::from_utf8_lossy(&payload)
        ));
        self.bus.publish(&topic, false, payload).await?;
        logger.debug("Published plan");
        Ok(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_carries_offset() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let time = tz.with_ymd_and_hms(2023, 3, 6, 7, 0, 0).unwrap();
        let payload = build_plan_payload(70, &time).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"value":70,"time":"2023-03-06T07:00:00+01:00"}"#
        );
    }

    #[test]
    fn zero_offset_is_zulu() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let time = tz.with_ymd_and_hms(2023, 3, 6, 7, 0, 0).unwrap();
        assert_eq!(format_plan_time(&time), "2023-03-06T07:00:00Z");
    }

    #[test]
    fn topic_template_substitution() {
        assert_eq!(
            plan_topic("evcc/vehicles/%s/planSoc/set", "model3"),
            "evcc/vehicles/model3/planSoc/set"
        );
        assert_eq!(plan_topic("plans/{vehicle}", "ioniq"), "plans/ioniq");
    }
}
