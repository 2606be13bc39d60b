// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`Config`] struct loaded once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the records database | `./data` |
//! | `JWT_SECRET` | HMAC secret used to sign bearer tokens | Required |
//! | `TOKEN_TTL_DAYS` | Bearer token lifetime in days | `7` |
//! | `CORS_ORIGINS` | Comma-separated list of allowed origins | `http://localhost:5000,http://127.0.0.1:5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The redb file `records.redb` is created inside this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const TOKEN_TTL_DAYS_ENV: &str = "TOKEN_TTL_DAYS";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5000,http://127.0.0.1:5000";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the embedded database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "records.redb";

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{JWT_SECRET_ENV} must be set")]
    MissingSecret,

    #[error("{JWT_SECRET_ENV} must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Server configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`Config::from_env`] so tests never touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let data_dir = lookup(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let token_ttl_days = match lookup(TOKEN_TTL_DAYS_ENV) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_DAYS_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_DAYS,
        };

        let cors_origins = lookup(CORS_ORIGINS_ENV)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            jwt_secret,
            token_ttl_days,
            cors_origins,
            log_format,
        })
    }

    /// Socket address to bind the HTTP listener to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }

    /// Full path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123";

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, SECRET)])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.database_path(), PathBuf::from("./data/records.redb"));
    }

    #[test]
    fn missing_secret_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "short")]));
        assert_eq!(result.unwrap_err(), ConfigError::WeakSecret);
    }

    #[test]
    fn invalid_port_is_reported() {
        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, SECRET),
            (PORT_ENV, "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, SECRET),
            (TOKEN_TTL_DAYS_ENV, "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: TOKEN_TTL_DAYS_ENV,
                ..
            })
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, SECRET),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8080"),
            (CORS_ORIGINS_ENV, "https://a.example, ,https://b.example"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
