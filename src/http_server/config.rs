//! Listener settings for the listings API
//!
//! Lives under the `server` key of the application config. An empty
//! `cors_origins` list lets any browser origin call the API; otherwise only
//! the listed origins get CORS headers.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Where the API listens and which origins may call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Bind address (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 8888)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API, e.g. `https://homes.example.com`
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port` as written in the config
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins for the CORS layer, or `None` when any origin is allowed
    pub fn allowed_origins(&self) -> Option<Vec<HeaderValue>> {
        if self.cors_origins.is_empty() {
            return None;
        }
        Some(
            self.cors_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect(),
        )
    }

    /// Checks the bind address and every CORS origin
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("server.port must be > 0".into());
        }
        self.socket_addr()
            .parse::<SocketAddr>()
            .map_err(|e| format!("server.host {:?} is not an IP address: {}", self.host, e))?;
        for origin in &self.cors_origins {
            if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
                return Err(format!("server.cors_origins has an unusable origin {:?}", origin));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:8888");
        assert!(config.allowed_origins().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HttpServerConfig =
            serde_json::from_str(r#"{"port": 9000, "cors_origins": ["https://homes.example.com"]}"#)
                .unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(
            config.allowed_origins(),
            Some(vec![HeaderValue::from_static("https://homes.example.com")])
        );
    }

    #[test]
    fn test_validate_rejects_unusable_settings() {
        assert!(HttpServerConfig::with_port(0).validate().is_err());

        let named_host = HttpServerConfig {
            host: "localhost".into(),
            ..Default::default()
        };
        assert!(named_host.validate().is_err());

        let bad_origin = HttpServerConfig {
            cors_origins: vec!["https://ok.example.com".into(), "bad\norigin".into()],
            ..Default::default()
        };
        assert!(bad_origin.validate().is_err());
    }
}
