//! Server configuration read from environment variables.
//!
//! - `FHEGRAPH_BIND`: listen address (default: "127.0.0.1")
//! - `FHEGRAPH_PORT`: listen port (default: "8080")
//! - `FHEGRAPH_DEMO`: register the built-in `demo` session, "1"/"true" or
//!   "0"/"false" (default: "true")

use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// A configuration variable holds a value that cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {var}: '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub demo_session: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            demo_session: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(bind) = lookup("FHEGRAPH_BIND") {
            config.bind = bind;
        }
        if let Some(port) = lookup("FHEGRAPH_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError {
                var: "FHEGRAPH_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(demo) = lookup("FHEGRAPH_DEMO") {
            config.demo_session = match demo.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError {
                        var: "FHEGRAPH_DEMO",
                        value: demo,
                    })
                }
            };
        }

        Ok(config)
    }

    /// `host:port` string for binding the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
