// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, ExecutionOptions};
use crate::driver::registry::{self, DriverRegistry};
use crate::driver::DriverHandle;
use crate::errors::ProactiveError;

/// The driver and options statements are executed with.
///
/// Statements never hold a driver themselves; each execution receives one
/// from a `Runtime`. `Runtime::active()` uses the process-wide registry, and
/// any other runtime can be injected explicitly.
///
/// # Examples
///
/// ## Building a runtime from configuration
/// ```
/// use proactive::config::{Config, Runtime};
/// use proactive::driver::DriverRegistry;
///
/// let config = Config {
///     driver: Some("direct".to_string()),
///     ..Config::default()
/// };
///
/// let runtime = Runtime::from_config(&config, &DriverRegistry::new()).unwrap();
/// assert_eq!(runtime.driver().name(), "direct");
/// ```
#[derive(Debug, Clone)]
pub struct Runtime {
    driver: DriverHandle,
    options: ExecutionOptions,
}

impl Runtime {
    pub fn new(driver: DriverHandle) -> Self {
        Self {
            driver,
            options: ExecutionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    /// A runtime on the process-wide active driver.
    pub fn active() -> Result<Self, ProactiveError> {
        Ok(Self::new(registry::active_driver()?))
    }

    /// A runtime on `registry`'s active driver.
    pub fn from_registry(registry: &DriverRegistry) -> Result<Self, ProactiveError> {
        Ok(Self::new(registry.active()?))
    }

    /// Build a runtime from configuration.
    ///
    /// A named driver is instantiated fresh from the registry's discoverable
    /// drivers; without a name the registry's active driver is used.
    pub fn from_config(cfg: &Config, registry: &DriverRegistry) -> Result<Self, ProactiveError> {
        let driver = match &cfg.driver {
            Some(name) => registry.named(name)?,
            None => registry.active()?,
        };
        Ok(Self::new(driver).with_options(cfg.execution.clone()))
    }

    pub fn driver(&self) -> &DriverHandle {
        &self.driver
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }
}
