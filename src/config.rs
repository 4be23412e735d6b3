// Configuration module
// Typed view of config.toml plus environment overrides

use serde::Deserialize;
use std::net::SocketAddr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub library: LibraryConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static site configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory the front-end is served from
    pub dir: String,
    /// Files tried in order when a directory is requested
    pub index_files: Vec<String>,
}

/// Library document configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    /// Path to the JSON document served at the library endpoint
    pub file: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Missing files are fine: every key has a default. A `PORT` environment
    /// variable overrides `server.port` when it parses as a valid port number.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("site.dir", ".")?
            .set_default("site.index_files", vec!["index.html".to_string()])?
            .set_default("library.file", "library.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        if let Some(port) = port_override(std::env::var("PORT").ok().as_deref()) {
            cfg.server.port = port;
        }
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse the `PORT` environment value
///
/// Unset or non-numeric values yield `None`, leaving the configured port in
/// place.
fn port_override(raw: Option<&str>) -> Option<u16> {
    raw.and_then(|v| v.trim().parse::<u16>().ok())
}
