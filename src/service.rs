//! Service loop for Charge Planner
//!
//! Drives the MQTT event loop, (re)subscribes to the events topic on every
//! connection and hands each event to its own task so slow publishes never
//! hold up the loop.

use crate::bus::{BusClient, MqttBus};
use crate::config::Config;
use crate::dispatch::{build_plan_payload, plan_topic};
use crate::error::Result;
use crate::intake::{EventIntake, IntakeOutcome};
use crate::logging::{StructuredLogger, get_logger};
use chrono::{DateTime, Utc};
use rumqttc::{Event, EventLoop, Packet};
use std::sync::Arc;
use std::time::Duration;

/// Main service for Charge Planner
pub struct PlannerService {
    intake: Arc<EventIntake>,
    bus: Arc<MqttBus>,
    events_topic: String,
    reconnect_delay: Duration,
    logger: StructuredLogger,
}

impl PlannerService {
    /// Build the service and the MQTT event loop it runs on
    pub fn new(config: Config) -> Result<(Self, EventLoop)> {
        let logger = get_logger("service");
        let (bus, eventloop) = MqttBus::new(&config.mqtt)?;
        let bus = Arc::new(bus);

        let events_topic = config.mqtt.topics.events.clone();
        let reconnect_delay = Duration::from_millis(config.mqtt.reconnect_delay_ms);

        let config = Arc::new(config);
        let publisher: Arc<dyn BusClient> = bus.clone();
        let intake = Arc::new(EventIntake::from_config(Arc::clone(&config), publisher)?);

        if config.vehicles.is_empty() {
            logger.warn("No vehicles configured; events will be ignored");
        }
        for (vehicle, issue) in config.schedule_issues() {
            logger
                .for_vehicle(&vehicle)
                .warn(&format!("Schedule will not resolve: {}", issue));
        }
        logger.info(&format!(
            "Planning for {} vehicle(s) in zone {}",
            config.vehicles.len(),
            intake.zone()
        ));

        Ok((
            Self {
                intake,
                bus,
                events_topic,
                reconnect_delay,
                logger,
            },
            eventloop,
        ))
    }

    /// Run until Ctrl-C
    pub async fn run(&self, eventloop: EventLoop) -> Result<()> {
        self.run_until(eventloop, tokio::signal::ctrl_c()).await
    }

    /// Run until `shutdown` completes
    pub async fn run_until<F>(&self, mut eventloop: EventLoop, shutdown: F) -> Result<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        self.logger.info("Starting event loop");
        tokio::pin!(shutdown);

        loop {
            let polled = tokio::select! {
                res = &mut shutdown => {
                    self.shutdown_requested(res);
                    break;
                }
                polled = eventloop.poll() => polled,
            };

            match polled {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    self.logger.info("Connected to MQTT broker");
                    // Sessions are clean, so every connection needs a fresh subscription
                    self.spawn_subscribe();
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if publish.topic == self.events_topic {
                        self.spawn_handler(publish.payload.to_vec());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    self.logger.error(&format!(
                        "MQTT connection error: {}; retrying in {:?}",
                        e, self.reconnect_delay
                    ));
                    tokio::select! {
                        res = &mut shutdown => {
                            self.shutdown_requested(res);
                            break;
                        }
                        _ = tokio::time::sleep(self.reconnect_delay) => {}
                    }
                }
            }
        }

        if let Err(e) = self.bus.disconnect() {
            self.logger.warn(&format!("Could not request disconnect: {}", e));
        }
        // Give the event loop a moment to flush the disconnect
        let _ = tokio::time::timeout(Duration::from_millis(250), eventloop.poll()).await;
        self.logger.info("Service shutdown complete");
        Ok(())
    }

    fn shutdown_requested(&self, res: std::io::Result<()>) {
        if let Err(e) = res {
            self.logger
                .error(&format!("Failed to listen for shutdown signal: {}", e));
        }
        self.logger.info("Shutdown requested");
    }

    // The request queue is drained by the event loop, so waiting on it here
    // would stall the loop when spawned publishes have filled it
    fn spawn_subscribe(&self) {
        let bus = Arc::clone(&self.bus);
        let topic = self.events_topic.clone();
        let logger = self.logger.clone();
        tokio::spawn(async move {
            if let Err(e) = bus.subscribe(&topic).await {
                logger.error(&format!("Error subscribing to topic {}: {}", topic, e));
            }
        });
    }

    fn spawn_handler(&self, payload: Vec<u8>) {
        let intake = Arc::clone(&self.intake);
        let logger = self.logger.clone();
        tokio::spawn(async move {
            let outcome = intake.handle_payload(&payload, Utc::now()).await;
            report_outcome(&logger, outcome);
        });
    }
}

/// Log how an event was handled; failures never stop the service
pub fn report_outcome(logger: &StructuredLogger, outcome: Result<IntakeOutcome>) {
    match outcome {
        Ok(IntakeOutcome::Dispatched {
            vehicle,
            topic,
            plan,
        }) => logger.for_vehicle(&vehicle).info(&format!(
            "Planned charge to {}% by {} on {}",
            plan.soc, plan.time, topic
        )),
        Ok(IntakeOutcome::Ignored(reason)) => {
            logger.debug(&format!("Ignoring event: {}", reason));
        }
        Err(e) if e.is_schedule_error() => {
            logger.error(&format!("Error calculating next charge time: {}", e));
        }
        Err(e) => logger.error(&format!("Error handling event: {}", e)),
    }
}

/// One line per vehicle describing the plan it would get at `now`.
///
/// A vehicle whose schedule does not resolve gets its error on its own line;
/// only an unusable zone fails the whole preview.
pub fn preview_plans(config: &Config, now: &DateTime<Utc>) -> Result<Vec<String>> {
    let zone = config.schedule_zone()?;
    let lines = config
        .vehicles
        .iter()
        .map(|vehicle| {
            let planned = zone
                .resolve(&vehicle.schedule, now, vehicle.soc)
                .and_then(|plan| build_plan_payload(plan.soc, &plan.time));
            match planned {
                Ok(payload) => format!(
                    "{} -> {} {}",
                    vehicle.name,
                    plan_topic(&config.mqtt.topics.plan_soc, &vehicle.name),
                    String::from_utf8_lossy(&payload)
                ),
                Err(e) => format!("{} -> error: {}", vehicle.name, e),
            }
        })
        .collect();
    Ok(lines)
}
