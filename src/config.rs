//! Configuration Module
//!
//! Loads server configuration from a JSON file (`conf.json` by default)
//! with a single `serverPort` field. A missing or malformed file is not
//! fatal; the server falls back to the default port.

use serde::Deserialize;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "conf.json";

const DEFAULT_SERVER_PORT: u16 = 8080;

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    server_port: String,
}

impl Config {
    /// Loads the configuration from `path`, falling back to defaults (with
    /// a warning) when the file is absent, unreadable, or malformed, and
    /// when the port value does not parse.
    pub fn load(path: &str) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<ConfigFile>(&raw) {
                Ok(file) => file,
                Err(err) => {
                    warn!("can't parse configuration file {}: {}", path, err);
                    ConfigFile::default()
                }
            },
            Err(err) => {
                warn!("can't load configuration file {}: {}", path, err);
                ConfigFile::default()
            }
        };

        let server_port = if file.server_port.is_empty() {
            DEFAULT_SERVER_PORT
        } else {
            file.server_port.parse().unwrap_or_else(|_| {
                warn!(
                    "invalid serverPort {:?}, falling back to {}",
                    file.server_port, DEFAULT_SERVER_PORT
                );
                DEFAULT_SERVER_PORT
            })
        };

        Self { server_port }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}
