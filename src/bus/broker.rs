use crate::error::{PlannerError, Result};

pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TLS_PORT: u16 = 8883;

/// Where to reach the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

/// Parse `[scheme://]host[:port]`.
///
/// `tcp` and `mqtt` (or no scheme) are plain connections, `ssl`, `tls` and
/// `mqtts` use TLS. IPv6 hosts need brackets when a port is given.
pub fn parse_broker(broker: &str) -> Result<BrokerAddress> {
    let broker = broker.trim();
    let (scheme, rest) = match broker.split_once("://") {
        Some((scheme, rest)) => (Some(scheme.to_ascii_lowercase()), rest),
        None => (None, broker),
    };

    let tls = match scheme.as_deref() {
        None | Some("tcp") | Some("mqtt") => false,
        Some("ssl") | Some("tls") | Some("mqtts") => true,
        Some(other) => {
            return Err(PlannerError::validation(
                "mqtt.broker".to_string(),
                format!("Unsupported scheme {}", other),
            ));
        }
    };
    let default_port = if tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT };

    let rest = rest.trim_end_matches('/');
    let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| invalid(broker, "unclosed ["))?;
        let port = match tail.strip_prefix(':') {
            Some(port) => parse_port(broker, port)?,
            None if tail.is_empty() => default_port,
            None => return Err(invalid(broker, "unexpected text after ]")),
        };
        (host, port)
    } else {
        match rest.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => (host, parse_port(broker, port)?),
            _ => (rest, default_port),
        }
    };

    if host.is_empty() {
        return Err(invalid(broker, "missing host"));
    }

    Ok(BrokerAddress {
        host: host.to_string(),
        port,
        tls,
    })
}

fn parse_port(broker: &str, port: &str) -> Result<u16> {
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(invalid(broker, "invalid port")),
    }
}

fn invalid(broker: &str, why: &str) -> PlannerError {
    PlannerError::validation("mqtt.broker".to_string(), format!("{}: {}", broker, why))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(host: &str, port: u16, tls: bool) -> BrokerAddress {
        BrokerAddress {
            host: host.to_string(),
            port,
            tls,
        }
    }

    #[test]
    fn plain_forms() {
        assert_eq!(parse_broker("localhost").unwrap(), addr("localhost", 1883, false));
        assert_eq!(parse_broker("localhost:1884").unwrap(), addr("localhost", 1884, false));
        assert_eq!(
            parse_broker("tcp://10.0.0.2:1883").unwrap(),
            addr("10.0.0.2", 1883, false)
        );
        assert_eq!(parse_broker("mqtt://broker/").unwrap(), addr("broker", 1883, false));
    }

    #[test]
    fn tls_forms() {
        assert_eq!(parse_broker("ssl://broker").unwrap(), addr("broker", 8883, true));
        assert_eq!(
            parse_broker("MQTTS://broker:9883").unwrap(),
            addr("broker", 9883, true)
        );
    }

    #[test]
    fn ipv6_hosts() {
        assert_eq!(parse_broker("[::1]:1884").unwrap(), addr("::1", 1884, false));
        assert_eq!(parse_broker("[fe80::1]").unwrap(), addr("fe80::1", 1883, false));
        assert_eq!(parse_broker("::1").unwrap(), addr("::1", 1883, false));
    }

    #[test]
    fn rejects_garbage() {
        for broker in ["", "ws://broker", "broker:0", "broker:http", "[::1", "[::1]x", ":1883"] {
            assert!(parse_broker(broker).is_err(), "accepted {broker:?}");
        }
    }
}
