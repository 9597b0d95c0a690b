#![allow(dead_code)]

use charge_planner::bus::BusClient;
use charge_planner::config::Config;
use charge_planner::error::{PlannerError, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

pub const CONFIG_YAML: &str = r#"
mqtt:
  broker: tcp://127.0.0.1:1883
  topics:
    events: evcc/events
    plan_soc: "evcc/vehicles/%s/planSoc/set"
timezone: Europe/Amsterdam
vehicles:
  - name: model3
    soc: 80
    schedule:
      - { day: Monday, time: "07:00", soc: 70 }
      - { day: Wednesday, time: "07:00" }
      - { day: Friday, time: "07:00", soc: 90 }
      - { day: workday, time: "08:00", soc: 80 }
      - { day: weekend, time: "09:00", soc: 60 }
  - name: broken
    soc: 50
    schedule:
      - { day: someday, time: "07:00" }
  - name: idle
    soc: 50
"#;

/// Config as a user would write it; `broken` is intentionally invalid
pub fn config() -> Config {
    serde_yaml::from_str(CONFIG_YAML).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub retained: bool,
    pub payload: String,
}

/// In-memory bus that records what would have been published
#[derive(Default)]
pub struct RecordingBus {
    messages: Mutex<Vec<Published>>,
    fail: bool,
}

impl RecordingBus {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn published(&self) -> Vec<Published> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BusClient for RecordingBus {
    async fn publish(&self, topic: &str, retained: bool, payload: Vec<u8>) -> Result<()> {
        if self.fail {
            return Err(PlannerError::mqtt("broker unavailable"));
        }
        self.messages.lock().unwrap().push(Published {
            topic: topic.to_string(),
            retained,
            payload: String::from_utf8(payload).unwrap(),
        });
        Ok(())
    }
}
