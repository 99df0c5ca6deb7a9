// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `driver` - driver discovery, installation and context rejection
//! * `statement` - statement dispatch and deferred execution
//! * `signal` - signals seen by instrumented contexts and callbacks

use tracing::Span;

pub mod driver;
pub mod signal;
pub mod statement;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level, with its fields attached.
    fn log(&self);

    /// A span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
