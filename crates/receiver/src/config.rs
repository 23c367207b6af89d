use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 1236;
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on how long in-flight requests may run after shutdown starts.
    pub drain_timeout: Duration,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("RECEIVER_HOST") {
            Some(raw) => raw.parse().map_err(|e| {
                crate::Error::Config(format!("RECEIVER_HOST '{}' is not an IP address: {}", raw, e))
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("RECEIVER_PORT") {
            Some(raw) => raw.parse().map_err(|e| {
                crate::Error::Config(format!("RECEIVER_PORT '{}' is not a valid port: {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        let drain_timeout = match lookup("DRAIN_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map(Duration::from_secs).map_err(|e| {
                crate::Error::Config(format!("DRAIN_TIMEOUT_SECS '{}' is not a number: {}", raw, e))
            })?,
            None => DEFAULT_DRAIN_TIMEOUT,
        };

        Ok(Config {
            server: ServerConfig {
                host,
                port,
                drain_timeout,
            },
        })
    }

    /// Apply a port given on the command line over the loaded one.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: DEFAULT_PORT,
                drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> crate::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.addr(), "0.0.0.0:1236".parse().unwrap());
        assert_eq!(config.server.drain_timeout, Duration::from_secs(5));
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("RECEIVER_HOST", "127.0.0.1"),
            ("RECEIVER_PORT", "9097"),
            ("DRAIN_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:9097".parse().unwrap());
        assert_eq!(config.server.drain_timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_invalid_port() {
        let err = load(&[("RECEIVER_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, crate::Error::Config(msg) if msg.contains("RECEIVER_PORT")));
    }

    #[test]
    fn rejects_invalid_host() {
        assert!(load(&[("RECEIVER_HOST", "localhost")]).is_err());
    }

    #[test]
    fn command_line_port_wins() {
        let config = Config::default().with_port(Some(8080));
        assert_eq!(config.server.port, 8080);
        let config = Config::default().with_port(None);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }
}
