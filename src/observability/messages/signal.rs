// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stream signals.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A signal passed through a context instrumented with `log`.
///
/// # Log Level
/// `debug!` - One line per signal
pub struct SignalObserved<'a> {
    pub category: &'a str,
    pub signal: &'a str,
    pub detail: Option<&'a str>,
}

impl Display for SignalObserved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.detail {
            Some(detail) => write!(f, "[{}] {}: {}", self.category, self.signal, detail),
            None => write!(f, "[{}] {}", self.category, self.signal),
        }
    }
}

impl StructuredLog for SignalObserved<'_> {
    fn log(&self) {
        tracing::debug!(
            category = self.category,
            signal = self.signal,
            detail = self.detail,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("signal", span_name = name, category = self.category)
    }
}

/// An error signal reached a subscriber without an error handler.
///
/// # Log Level
/// `warn!` - The failure is otherwise invisible
pub struct ErrorDropped<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ErrorDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stream error with no on_error handler: {}", self.error)
    }
}

impl StructuredLog for ErrorDropped<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("error_dropped", span_name = name)
    }
}

/// A value handed to a typed callback did not have the expected type.
///
/// # Log Level
/// `warn!` - The value is dropped
pub struct ValueTypeMismatch {
    pub expected: &'static str,
}

impl Display for ValueTypeMismatch {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dropped value: expected type {}", self.expected)
    }
}

impl StructuredLog for ValueTypeMismatch {
    fn log(&self) {
        tracing::warn!(expected = self.expected, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("value_type_mismatch", span_name = name, expected = self.expected)
    }
}
