//! Configuration management for the contact book.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the working directory. Every variable has a default.

use crate::domain::PhoneLocale;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const MEMORY_URL: &str = "sqlite::memory:";
const SQLITE_SCHEME: &str = "sqlite://";

/// Where the contact database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database file, created on first use
    File(PathBuf),
    /// A private in-memory database, lost on exit
    InMemory,
}

impl DatabaseLocation {
    /// Parse a `DATABASE_URL` value.
    ///
    /// Accepts `sqlite::memory:`, `sqlite://<path>`, or a bare path.
    pub fn parse(url: &str) -> ConfigResult<Self> {
        let url = url.trim();
        if url == MEMORY_URL || url == ":memory:" {
            return Ok(Self::InMemory);
        }

        let path = url.strip_prefix(SQLITE_SCHEME).unwrap_or(url);
        if path.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "DATABASE_URL".to_string(),
                reason: "Database path cannot be empty".to_string(),
            });
        }
        if path.contains("://") {
            return Err(ConfigError::InvalidValue {
                var: "DATABASE_URL".to_string(),
                reason: format!("Only sqlite:// URLs are supported, got: {}", url),
            });
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Configuration for the contact book server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database location (default: `contacts.db` in the working directory)
    pub database: DatabaseLocation,

    /// Address to bind (default: 127.0.0.1)
    pub bind_address: IpAddr,

    /// Port to listen on (default: 3000)
    pub port: u16,

    /// How long a flash message survives before it is dropped (default: 6)
    pub flash_ttl_seconds: u64,

    /// Region whose mobile number grammar phone numbers must match
    pub phone_locale: PhoneLocale,

    /// Log level used when RUST_LOG is unset (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `DATABASE_URL`: `sqlite://<path>`, a path, or `sqlite::memory:`
    /// - `BIND_ADDRESS`: IP address to bind (default: 127.0.0.1)
    /// - `PORT`: listening port (default: 3000)
    /// - `FLASH_TTL_SECONDS`: flash message lifetime (default: 6)
    /// - `PHONE_LOCALE`: mobile number locale (default: id-ID)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let database = match env::var("DATABASE_URL") {
            Ok(url) => DatabaseLocation::parse(&url)?,
            Err(_) => defaults.database,
        };

        let bind_address = match env::var("BIND_ADDRESS") {
            Ok(val) => val.parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
                var: "BIND_ADDRESS".to_string(),
                reason: format!("Must be an IP address, got: {}", val),
            })?,
            Err(_) => defaults.bind_address,
        };

        let port = Self::parse_env_u16("PORT", defaults.port)?;
        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                reason: "Must be between 1 and 65535".to_string(),
            });
        }

        let flash_ttl_seconds = Self::parse_env_u64("FLASH_TTL_SECONDS", defaults.flash_ttl_seconds)?;
        if flash_ttl_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                var: "FLASH_TTL_SECONDS".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let phone_locale = match env::var("PHONE_LOCALE") {
            Ok(tag) => tag.parse::<PhoneLocale>().map_err(|e| ConfigError::InvalidValue {
                var: "PHONE_LOCALE".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => defaults.phone_locale,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            database,
            bind_address,
            port,
            flash_ttl_seconds,
            phone_locale,
            log_level,
        })
    }

    /// Socket address the server listens on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Flash message lifetime.
    pub fn flash_ttl(&self) -> Duration {
        Duration::from_secs(self.flash_ttl_seconds)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u16 with a default value.
    fn parse_env_u16(var_name: &str, default: u16) -> ConfigResult<u16> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number between 0-65535, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseLocation::File(PathBuf::from("contacts.db")),
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            flash_ttl_seconds: 6,
            phone_locale: PhoneLocale::IdId,
            log_level: "info".to_string(),
        }
    }
}
