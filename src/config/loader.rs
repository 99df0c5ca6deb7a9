// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Execution configuration for statements.
///
/// Loaded from a YAML or TOML file; every field is optional.
///
/// # Fields
/// * `driver` - Name of a discoverable driver; the registry's active driver when absent
/// * `execution` - Options applied to every statement executed through the resulting runtime
///
/// # Example
/// ```yaml
/// driver: direct
/// execution:
///   log_category: pipeline
///   delay_fallback: immediate
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub execution: ExecutionOptions,
}

/// Options applied when a statement is executed.
///
/// # Fields
/// * `log_category` - When set, every executed root context is instrumented with `log` under this category
/// * `delay_fallback` - What `after` does when the driver cannot schedule
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExecutionOptions {
    #[serde(default)]
    pub log_category: Option<String>,
    #[serde(default)]
    pub delay_fallback: DelayFallback,
}

/// Behavior of delayed execution on a driver that cannot schedule.
///
/// # Variants
/// * `Immediate` - Execute now and log a warning
/// * `Reject` - Fail with `SchedulingUnsupported`
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DelayFallback {
    #[default]
    Immediate,
    Reject,
}

impl DelayFallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayFallback::Immediate => "immediate",
            DelayFallback::Reject => "reject",
        }
    }
}

/// Load a config from a `.yaml`, `.yml` or `.toml` file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    let read = || {
        fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&read()?)?),
        Some("toml") => Ok(toml::from_str(&read()?)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
