// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for a `Config`
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file is not valid TOML for a `Config`
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML
    #[error("Unsupported config format for '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),
}
