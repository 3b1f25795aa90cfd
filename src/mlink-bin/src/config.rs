// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for mlink-bin.
//!
//! Supports loading configuration from TOML files with the following search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./mlink.toml` (current directory)
//! 3. `~/.config/mlink/config.toml` (XDG config)
//! 4. `/etc/mlink/config.toml` (system-wide)
//!
//! CLI arguments override config file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Serial transport configuration
    pub serial: SerialConfig,
    /// Ingest endpoint configuration
    pub ingest: IngestConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Serial transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port path (e.g. "/dev/ttyUSB0")
    pub port: Option<String>,
    /// Baud rate
    pub baud: u32,
    /// Size of the read buffer, one read per frame
    pub read_buffer_bytes: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: 9600,
            read_buffer_bytes: 256,
        }
    }
}

/// Ingest endpoint configuration.
///
/// Either a full `url`, or host/port/user_id from which the measurement
/// endpoint is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Full ingest URL; overrides host/port/user_id when set
    pub url: Option<String>,
    /// Ingest server host
    pub host: String,
    /// Ingest server port
    pub port: u16,
    /// User the measurements are filed under
    pub user_id: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 5000,
            user_id: 1,
        }
    }
}

impl IngestConfig {
    /// The measurement ingestion URL for this configuration.
    pub fn endpoint_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "http://{}:{}/new/user/{}/measurements",
                self.host, self.port, self.user_id
            ),
        }
    }
}

impl Config {
    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from the default search paths.
    /// Returns default config if no config file is found.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in Self::default_search_paths() {
            if path.exists() {
                let config = Self::load_from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Get the default search paths for config files.
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        paths.push(PathBuf::from("mlink.toml"));

        // XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mlink").join("config.toml"));
        }

        // System-wide config
        paths.push(PathBuf::from("/etc/mlink/config.toml"));

        paths
    }

    /// Generate an example configuration as a TOML string.
    pub fn example_toml() -> String {
        let example = Config {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            serial: SerialConfig {
                port: Some("/dev/ttyUSB0".to_string()),
                baud: 9600,
                read_buffer_bytes: 256,
            },
            ingest: IngestConfig {
                url: None,
                host: "127.0.0.1".to_string(),
                port: 5000,
                user_id: 1,
            },
        };

        toml::to_string_pretty(&example).unwrap_or_default()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    ReadError(PathBuf, String),
    /// Failed to parse the config file
    ParseError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(path, err) => {
                write!(
                    f,
                    "failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            Self::ParseError(path, err) => {
                write!(
                    f,
                    "failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.serial.port, None);
        assert_eq!(config.serial.baud, 9600);
        assert_eq!(config.serial.read_buffer_bytes, 256);
        assert_eq!(config.ingest.host, "127.0.0.1");
        assert_eq!(config.ingest.port, 5000);
        assert_eq!(config.ingest.user_id, 1);
        assert_eq!(
            config.ingest.endpoint_url(),
            "http://127.0.0.1:5000/new/user/1/measurements"
        );
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[serial]
port = "/dev/ttyUSB0"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.port, Some("/dev/ttyUSB0".to_string()));
        assert_eq!(config.serial.baud, 9600);
        assert_eq!(config.ingest.port, 5000);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[serial]
port = "/dev/ttyACM1"
baud = 115200
read_buffer_bytes = 512

[ingest]
host = "ingest.example.net"
port = 8088
user_id = 42
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, Some("debug".to_string()));
        assert_eq!(config.serial.port, Some("/dev/ttyACM1".to_string()));
        assert_eq!(config.serial.baud, 115_200);
        assert_eq!(config.serial.read_buffer_bytes, 512);
        assert_eq!(
            config.ingest.endpoint_url(),
            "http://ingest.example.net:8088/new/user/42/measurements"
        );
    }

    #[test]
    fn test_url_overrides_host_port() {
        let toml_str = r#"
[ingest]
url = "http://10.0.0.2:9000/ingest"
host = "ignored.example.net"
port = 8088
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ingest.endpoint_url(), "http://10.0.0.2:9000/ingest");
    }

    #[test]
    fn test_example_toml_parses() {
        let example = Config::example_toml();
        let _config: Config = toml::from_str(&example).unwrap();
    }
}
