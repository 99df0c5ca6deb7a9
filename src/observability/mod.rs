// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for driver selection, statement execution and stream signals.
//!
//! Every diagnostic the crate emits is a message struct with a `Display`
//! implementation and a [`StructuredLog`](messages::StructuredLog) impl that
//! picks the level and the structured fields. Call sites never format log
//! strings themselves.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::driver` - driver discovery, installation and context rejection
//! * `messages::statement` - statement dispatch and deferred execution
//! * `messages::signal` - signals seen by instrumented contexts and callbacks
//!
//! # Usage
//!
//! ```rust
//! use proactive::observability::messages::{statement::StatementDispatched, StructuredLog};
//!
//! let msg = StatementDispatched {
//!     statement: "check",
//!     driver: "direct",
//! };
//!
//! msg.log();
//! ```
//!
//! The crate installs no subscriber; applications choose their own.

pub mod messages;
