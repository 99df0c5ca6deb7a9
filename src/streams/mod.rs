// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Push-based asynchronous stream protocols.
//!
//! Two structurally equivalent protocols live here:
//!
//! * [`reactive`] - the protocol every driver speaks internally
//! * [`flow`] - the alternate protocol exposed to callers holding flow-shaped streams
//!
//! Both share a Publisher / Subscriber / Subscription shape and the same error
//! payload ([`StreamError`]). The [`crate::adapter`] module converts single objects
//! between them without accumulating wrapper layers.
//!
//! # Signal rules
//!
//! * `on_subscribe` is signalled exactly once, before anything else
//! * `on_next` is only signalled for outstanding demand
//! * at most one of `on_error` / `on_complete` is signalled, and nothing follows it
//! * `request(u64::MAX)` means unbounded demand

use std::error::Error;
use std::sync::Arc;

pub mod flow;
pub mod reactive;

/// Error payload carried by `on_error` in both protocols.
///
/// Errors are reference counted so they can be forwarded unchanged through any
/// number of operators; `Arc::ptr_eq` holds between the error a source signals
/// and the one a final subscriber receives.
pub type StreamError = Arc<dyn Error + Send + Sync + 'static>;

/// Demand value meaning "no limit".
pub const UNBOUNDED: u64 = u64::MAX;
