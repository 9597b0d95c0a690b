use super::*;

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "tcp://localhost:1883".to_string(),
            user: String::new(),
            password: String::new(),
            client_id: String::new(),
            insecure: false,
            ca_cert: String::new(),
            client_cert: String::new(),
            client_key: String::new(),
            keep_alive_secs: 30,
            reconnect_delay_ms: 5000,
            topics: TopicsConfig::default(),
        }
    }
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            events: "evcc/events".to_string(),
            plan_soc: "evcc/vehicles/%s/planSoc/set".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig::default(),
            vehicles: Vec::new(),
            timezone: None,
            log: None,
            logging: LoggingConfig::default(),
        }
    }
}
