// Copyright 2015, Paul Osborne <osbpau@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/license/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option.  This file may not be copied, modified, or distributed
// except according to those terms.

use crate::ffi::I2C_SLAVE;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_DEV_PREFIX: &str = "/dev/i2c-";

pub const ENV_DEV_PREFIX: &str = "I2CREG_DEV_PREFIX";
pub const ENV_BIND_REQUEST: &str = "I2CREG_BIND_REQUEST";
pub const ENV_LOG_LEVEL: &str = "I2CREG_LOG_LEVEL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind request code {0:?}")]
    BindRequest(String),
    #[error("invalid log level {0:?}")]
    LogLevel(String),
}

/// Settings shared by every connection opened with them
///
/// The bind request code is the platform's `I2C_SLAVE` ioctl number.
/// It is resolved once, here, and handed to each open rather than being
/// baked into the code paths that issue it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Device node prefix; the bus index is appended to it
    pub dev_prefix: PathBuf,
    /// Request code of the address binding ioctl
    pub bind_request: u16,
    /// Level wire traffic is logged at, `None` for silence
    pub log_level: Option<Level>,
}

impl Default for BusConfig {
    fn default() -> BusConfig {
        BusConfig {
            dev_prefix: PathBuf::from(DEFAULT_DEV_PREFIX),
            bind_request: I2C_SLAVE,
            log_level: Some(Level::DEBUG),
        }
    }
}

impl BusConfig {
    /// Defaults overridden by `I2CREG_*` environment variables
    pub fn from_env() -> Result<BusConfig, ConfigError> {
        BusConfig::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<BusConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BusConfig::default();
        if let Some(prefix) = lookup(ENV_DEV_PREFIX) {
            config.dev_prefix = PathBuf::from(prefix);
        }
        if let Some(code) = lookup(ENV_BIND_REQUEST) {
            config.bind_request = parse_request(&code)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = parse_level(&level)?;
        }
        Ok(config)
    }

    pub fn with_dev_prefix<P: AsRef<Path>>(mut self, prefix: P) -> BusConfig {
        self.dev_prefix = prefix.as_ref().to_path_buf();
        self
    }

    pub fn with_bind_request(mut self, request: u16) -> BusConfig {
        self.bind_request = request;
        self
    }

    pub fn with_log_level(mut self, level: Option<Level>) -> BusConfig {
        self.log_level = level;
        self
    }

    /// Path of the device node for `bus`, e.g. `/dev/i2c-2`
    pub fn device_path(&self, bus: u32) -> PathBuf {
        let mut path = self.dev_prefix.clone().into_os_string();
        path.push(bus.to_string());
        PathBuf::from(path)
    }
}

fn parse_request(s: &str) -> Result<u16, ConfigError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| ConfigError::BindRequest(s.to_string()))
}

fn parse_level(s: &str) -> Result<Option<Level>, ConfigError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    s.parse::<Level>()
        .map(Some)
        .map_err(|_| ConfigError::LogLevel(s.to_string()))
}
