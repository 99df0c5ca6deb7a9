// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the adapter, the driver contract and statement execution.
//!
//! Most variants are raised synchronously at call time. `ContextConsumed`,
//! `InvalidDemand` and `TypeMismatch` are delivered through `on_error` as a
//! [`StreamError`](crate::streams::StreamError) instead.

use std::sync::Arc;
use thiserror::Error;

use crate::driver::DriverId;
use crate::streams::StreamError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProactiveError {
    /// A required reference was not supplied.
    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    /// A context produced by one driver was handed to another.
    #[error("Unsupported context in {operation}: produced by driver {found}, expected driver {expected}")]
    UnsupportedContext {
        operation: &'static str,
        expected: DriverId,
        found: DriverId,
    },

    /// Neither an explicit nor a discoverable driver exists.
    #[error("No proactive driver is available")]
    DriverUnavailable,

    /// No discoverable driver carries the requested name.
    #[error("No proactive driver named '{name}' is registered")]
    DriverNotFound { name: String },

    /// Delayed execution was requested from a driver that cannot schedule.
    #[error("Driver '{driver}' does not support delayed execution")]
    SchedulingUnsupported { driver: String },

    /// A single-use context was subscribed to a second time.
    #[error("Context has already been consumed")]
    ContextConsumed,

    /// A subscriber requested a non-positive amount.
    #[error("Invalid demand: {requested} (must be greater than zero)")]
    InvalidDemand { requested: u64 },

    /// A value crossed the type-erased driver boundary with an unexpected type.
    #[error("Value type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    /// An awaited execution ended without a terminal signal.
    #[error("Execution ended without completing or failing")]
    Abandoned,
}

impl ProactiveError {
    /// Convert into the payload carried by `on_error`.
    pub fn into_stream_error(self) -> StreamError {
        Arc::new(self)
    }
}

impl From<ProactiveError> for StreamError {
    fn from(error: ProactiveError) -> Self {
        error.into_stream_error()
    }
}
