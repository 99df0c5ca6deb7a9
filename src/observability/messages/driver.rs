// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for driver discovery, installation and context checks.

use crate::driver::DriverId;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A driver registration was found by link-time discovery.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DriverDiscovered<'a> {
    pub name: &'a str,
}

impl Display for DriverDiscovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Discovered proactive driver '{}'", self.name)
    }
}

impl StructuredLog for DriverDiscovered<'_> {
    fn log(&self) {
        tracing::info!(driver = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("driver_discovery", span_name = name, driver = self.name)
    }
}

/// A driver became the active driver.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DriverInstalled<'a> {
    pub name: &'a str,
    pub id: DriverId,
    pub discovered: bool,
}

impl Display for DriverInstalled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let how = if self.discovered { "discovered" } else { "explicit" };
        write!(f, "Active proactive driver is now '{}' {} ({})", self.name, self.id, how)
    }
}

impl StructuredLog for DriverInstalled<'_> {
    fn log(&self) {
        tracing::info!(
            driver = self.name,
            driver_id = %self.id,
            discovered = self.discovered,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "driver_installed",
            span_name = name,
            driver = self.name,
            driver_id = %self.id,
        )
    }
}

/// The explicitly installed driver was removed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DriverCleared;

impl Display for DriverCleared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Active proactive driver cleared; discovery re-enabled")
    }
}

impl StructuredLog for DriverCleared {
    fn log(&self) {
        tracing::info!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("driver_cleared", span_name = name)
    }
}

/// Neither an explicit nor a discoverable driver exists.
///
/// # Log Level
/// `warn!` - The caller is about to fail
pub struct DriverUnavailable;

impl Display for DriverUnavailable {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No proactive driver installed and none discoverable")
    }
}

impl StructuredLog for DriverUnavailable {
    fn log(&self) {
        tracing::warn!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("driver_unavailable", span_name = name)
    }
}

/// A context produced by one driver was handed to another.
///
/// # Log Level
/// `warn!` - Caller error surfaced as `UnsupportedContext`
pub struct ContextRejected {
    pub operation: &'static str,
    pub expected: DriverId,
    pub found: DriverId,
}

impl Display for ContextRejected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected context in {}: produced by driver {}, expected {}",
            self.operation, self.found, self.expected
        )
    }
}

impl StructuredLog for ContextRejected {
    fn log(&self) {
        tracing::warn!(
            operation = self.operation,
            expected = %self.expected,
            found = %self.found,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "context_rejected",
            span_name = name,
            operation = self.operation,
            expected = %self.expected,
            found = %self.found,
        )
    }
}
