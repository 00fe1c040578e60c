use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when host and port do not form a
    /// socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::invalid("server.host", format!("'{}' is not an IP address", self.host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_all_interfaces() {
        let addr = ServerConfig::default().socket_addr().expect("addr");
        assert_eq!(addr.to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn hostnames_are_rejected() {
        let config = ServerConfig {
            host: "localhost".into(),
            port: 80,
        };
        assert!(config.socket_addr().is_err());
    }
}
