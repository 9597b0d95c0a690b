//! Message bus access for Charge Planner
//!
//! `BusClient` is the seam the dispatcher publishes through; `MqttBus` is the
//! production implementation on top of `rumqttc`.

use crate::config::MqttConfig;
use crate::error::{PlannerError, Result};
use crate::logging::{StructuredLogger, get_logger};
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, TlsConfiguration, Transport};
use std::time::Duration;

pub mod broker;

pub use broker::{BrokerAddress, parse_broker};

/// Request queue depth between the client handle and the event loop
const CLIENT_CAPACITY: usize = 32;

/// Shortest keep-alive rumqttc accepts
const MIN_KEEP_ALIVE_SECS: u64 = 5;

/// Publishing side of the message bus
#[async_trait::async_trait]
pub trait BusClient: Send + Sync {
    async fn publish(&self, topic: &str, retained: bool, payload: Vec<u8>) -> Result<()>;
}

/// MQTT client handle
pub struct MqttBus {
    client: AsyncClient,
    logger: StructuredLogger,
}

impl MqttBus {
    /// Build the client and its event loop; the connection is made when the
    /// event loop is first polled.
    pub fn new(config: &MqttConfig) -> Result<(Self, EventLoop)> {
        let logger = get_logger("mqtt");
        let options = mqtt_options(config)?;
        logger.info(&format!(
            "Using MQTT broker {}:{} as {}",
            options.broker_address().0,
            options.broker_address().1,
            options.client_id()
        ));

        let (client, eventloop) = AsyncClient::new(options, CLIENT_CAPACITY);
        Ok((Self { client, logger }, eventloop))
    }

    /// Subscribe to a topic with at-least-once delivery
    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        self.logger.debug(&format!("Subscribing to {}", topic));
        self.client.subscribe(topic, QoS::AtLeastOnce).await?;
        Ok(())
    }

    /// Queue a clean disconnect without waiting on a full request queue
    pub fn disconnect(&self) -> Result<()> {
        self.logger.info("Disconnecting from MQTT broker");
        self.client.try_disconnect()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BusClient for MqttBus {
    async fn publish(&self, topic: &str, retained: bool, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, QoS::AtLeastOnce, retained, payload)
            .await
            .map_err(|e| PlannerError::mqtt(format!("error publishing to topic {}: {}", topic, e)))
    }
}

/// Translate configuration into rumqttc connection options
pub fn mqtt_options(config: &MqttConfig) -> Result<MqttOptions> {
    let address = parse_broker(&config.broker)?;

    let client_id = match config.client_id.trim() {
        "" => generated_client_id(),
        id => id.to_string(),
    };

    let mut options = MqttOptions::new(client_id, address.host.clone(), address.port);
    options.set_keep_alive(Duration::from_secs(
        config.keep_alive_secs.max(MIN_KEEP_ALIVE_SECS),
    ));

    if !config.user.is_empty() {
        options.set_credentials(config.user.clone(), config.password.clone());
    }

    if !config.ca_cert.is_empty() {
        let ca = std::fs::read(&config.ca_cert)?;
        let client_auth = if config.client_cert.is_empty() {
            None
        } else {
            Some((
                std::fs::read(&config.client_cert)?,
                std::fs::read(&config.client_key)?,
            ))
        };
        options.set_transport(Transport::Tls(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth,
        }));
    } else if address.tls {
        options.set_transport(Transport::tls_with_default_config());
    }

    Ok(options)
}

fn generated_client_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("charge-planner-{}", &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let config = MqttConfig {
            broker: "mqtt://broker.local:1884".to_string(),
            client_id: "planner".to_string(),
            user: "evcc".to_string(),
            password: "secret".to_string(),
            keep_alive_secs: 1,
            ..MqttConfig::default()
        };
        let options = mqtt_options(&config).unwrap();
        assert_eq!(
            options.broker_address(),
            ("broker.local".to_string(), 1884)
        );
        assert_eq!(options.client_id(), "planner");
        assert_eq!(options.keep_alive(), Duration::from_secs(MIN_KEEP_ALIVE_SECS));
        assert_eq!(
            options.credentials(),
            Some(("evcc".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn blank_client_id_is_generated() {
        let options = mqtt_options(&MqttConfig::default()).unwrap();
        assert!(options.client_id().starts_with("charge-planner-"));
        assert!(options.credentials().is_none());
    }

    #[test]
    fn missing_ca_file_is_an_io_error() {
        let config = MqttConfig {
            ca_cert: "/nonexistent/ca.pem".to_string(),
            ..MqttConfig::default()
        };
        assert!(matches!(mqtt_options(&config), Err(PlannerError::Io { .. })));
    }
}
