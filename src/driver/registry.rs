// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Active-driver selection and link-time driver discovery.
//!
//! Backends register a [`DriverRegistration`] in the [`DRIVERS`] distributed
//! slice:
//!
//! ```ignore
//! use linkme::distributed_slice;
//! use proactive::driver::{DriverRegistration, DRIVERS};
//!
//! #[distributed_slice(DRIVERS)]
//! static MY_DRIVER: DriverRegistration = DriverRegistration {
//!     name: "my-driver",
//!     create: || std::sync::Arc::new(MyDriver::new()),
//! };
//! ```
//!
//! A [`DriverRegistry`] answers "which driver runs statements" with an
//! explicitly installed driver if there is one, and otherwise with the first
//! discoverable registration by name. The discovered driver is cached, so every
//! caller sees the same instance until the slot is changed.

use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwapOption;
use linkme::distributed_slice;

use super::{Driver, DriverHandle};
use crate::errors::ProactiveError;
use crate::observability::messages::driver::{DriverCleared, DriverDiscovered, DriverInstalled, DriverUnavailable};
use crate::observability::messages::StructuredLog;

/// A discoverable driver.
#[derive(Clone, Copy)]
pub struct DriverRegistration {
    pub name: &'static str,
    pub create: fn() -> Arc<dyn Driver>,
}

impl DriverRegistration {
    pub fn instantiate(&self) -> DriverHandle {
        DriverHandle::from_arc((self.create)())
    }
}

impl fmt::Debug for DriverRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistration").field("name", &self.name).finish()
    }
}

/// Every driver linked into the final binary.
#[distributed_slice]
pub static DRIVERS: [DriverRegistration];

type Discovery = Box<dyn Fn() -> Vec<DriverRegistration> + Send + Sync>;

/// Holder of the active driver.
///
/// Safe to share across threads; reads and writes of the slot are atomic.
pub struct DriverRegistry {
    active: ArcSwapOption<DriverHandle>,
    discover: Discovery,
}

impl DriverRegistry {
    /// A registry discovering drivers from [`DRIVERS`].
    pub fn new() -> Self {
        Self::with_discovery(|| DRIVERS.to_vec())
    }

    /// A registry discovering drivers through `discover`.
    pub fn with_discovery(discover: impl Fn() -> Vec<DriverRegistration> + Send + Sync + 'static) -> Self {
        Self {
            active: ArcSwapOption::empty(),
            discover: Box::new(discover),
        }
    }

    /// Install `driver` as the active driver, or clear the slot with `None`.
    ///
    /// Clearing re-enables discovery on the next [`active`](Self::active) call.
    pub fn set_active(&self, driver: Option<DriverHandle>) {
        match driver {
            Some(handle) => {
                DriverInstalled {
                    name: handle.name(),
                    id: handle.id(),
                    discovered: false,
                }
                .log();
                self.active.store(Some(Arc::new(handle)));
            }
            None => {
                DriverCleared.log();
                self.active.store(None);
            }
        }
    }

    /// The installed driver, else the first discoverable one.
    pub fn active(&self) -> Result<DriverHandle, ProactiveError> {
        if let Some(handle) = self.active.load_full() {
            return Ok((*handle).clone());
        }

        let registration = match self.registrations().into_iter().next() {
            Some(registration) => registration,
            None => {
                DriverUnavailable.log();
                return Err(ProactiveError::DriverUnavailable);
            }
        };
        DriverDiscovered {
            name: registration.name,
        }
        .log();

        let candidate = Arc::new(registration.instantiate());
        let empty: Option<Arc<DriverHandle>> = None;
        let previous = self.active.compare_and_swap(&empty, Some(candidate.clone()));
        match &*previous {
            // Another caller installed or discovered a driver first.
            Some(existing) => Ok((**existing).clone()),
            None => {
                DriverInstalled {
                    name: candidate.name(),
                    id: candidate.id(),
                    discovered: true,
                }
                .log();
                Ok((*candidate).clone())
            }
        }
    }

    /// Whether an installed or discoverable driver exists.
    pub fn has_active(&self) -> bool {
        self.active.load().is_some() || !(self.discover)().is_empty()
    }

    /// Discoverable registrations, ordered by name.
    pub fn registrations(&self) -> Vec<DriverRegistration> {
        let mut registrations = (self.discover)();
        registrations.sort_by_key(|registration| registration.name);
        registrations
    }

    /// A fresh instance of every discoverable driver.
    pub fn all(&self) -> Vec<DriverHandle> {
        self.registrations()
            .iter()
            .map(DriverRegistration::instantiate)
            .collect()
    }

    /// A fresh instance of the discoverable driver called `name`.
    pub fn named(&self, name: &str) -> Result<DriverHandle, ProactiveError> {
        self.registrations()
            .iter()
            .find(|registration| registration.name == name)
            .map(DriverRegistration::instantiate)
            .ok_or_else(|| ProactiveError::DriverNotFound { name: name.to_string() })
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("active", &self.active.load().as_deref().map(DriverHandle::name))
            .finish()
    }
}

/// The process-wide registry.
pub fn global() -> &'static DriverRegistry {
    static GLOBAL: OnceLock<DriverRegistry> = OnceLock::new();
    GLOBAL.get_or_init(DriverRegistry::new)
}

/// Shorthand for `global().active()`.
pub fn active_driver() -> Result<DriverHandle, ProactiveError> {
    global().active()
}

/// Shorthand for `global().set_active(driver)`.
pub fn set_active_driver(driver: Option<DriverHandle>) {
    global().set_active(driver);
}
