// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for statement dispatch and deferred execution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A statement's context was built and subscribed.
///
/// # Log Level
/// `debug!` - Emitted once per execution
pub struct StatementDispatched<'a> {
    pub statement: &'a str,
    pub driver: &'a str,
}

impl Display for StatementDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatching {} statement on driver '{}'", self.statement, self.driver)
    }
}

impl StructuredLog for StatementDispatched<'_> {
    fn log(&self) {
        tracing::debug!(statement = self.statement, driver = self.driver, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "statement",
            span_name = name,
            statement = self.statement,
            driver = self.driver,
        )
    }
}

/// A statement was scheduled to subscribe after a delay.
///
/// # Log Level
/// `debug!` - Emitted once per execution
pub struct StatementDeferred<'a> {
    pub statement: &'a str,
    pub driver: &'a str,
    pub delay: Duration,
}

impl Display for StatementDeferred<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deferring {} statement on driver '{}' by {:?}",
            self.statement, self.driver, self.delay
        )
    }
}

impl StructuredLog for StatementDeferred<'_> {
    fn log(&self) {
        tracing::debug!(
            statement = self.statement,
            driver = self.driver,
            delay_ms = self.delay.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "statement_deferred",
            span_name = name,
            statement = self.statement,
            delay_ms = self.delay.as_millis() as u64,
        )
    }
}

/// A delay was requested but the driver cannot schedule; the fallback applies.
///
/// # Log Level
/// `warn!` - Requested timing is not honored
pub struct DelayUnsupported<'a> {
    pub statement: &'a str,
    pub driver: &'a str,
    pub delay: Duration,
    pub fallback: &'a str,
}

impl Display for DelayUnsupported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Driver '{}' cannot delay {} statement by {:?}; falling back to {}",
            self.driver, self.statement, self.delay, self.fallback
        )
    }
}

impl StructuredLog for DelayUnsupported<'_> {
    fn log(&self) {
        tracing::warn!(
            statement = self.statement,
            driver = self.driver,
            delay_ms = self.delay.as_millis() as u64,
            fallback = self.fallback,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delay_unsupported",
            span_name = name,
            statement = self.statement,
            driver = self.driver,
        )
    }
}

/// A deferred execution could not be started once its delay elapsed.
///
/// # Log Level
/// `error!` - Nobody is left to receive the failure
pub struct DeferredExecutionFailed<'a> {
    pub statement: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DeferredExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deferred {} statement failed to start: {}", self.statement, self.error)
    }
}

impl StructuredLog for DeferredExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            statement = self.statement,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "deferred_execution_failed",
            span_name = name,
            statement = self.statement,
        )
    }
}

/// A deferred execution was dropped before its delay elapsed, typically because
/// the runtime holding the timer shut down.
///
/// # Log Level
/// `warn!` - The execution never starts; `on_error` receives `Abandoned`
pub struct DeferredExecutionDropped<'a> {
    pub statement: &'a str,
    pub driver: &'a str,
}

impl Display for DeferredExecutionDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deferred {} statement on driver '{}' was dropped before it started",
            self.statement, self.driver
        )
    }
}

impl StructuredLog for DeferredExecutionDropped<'_> {
    fn log(&self) {
        tracing::warn!(statement = self.statement, driver = self.driver, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "deferred_execution_dropped",
            span_name = name,
            statement = self.statement,
            driver = self.driver,
        )
    }
}
