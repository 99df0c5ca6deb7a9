// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Driver backends.
//!
//! ## Direct Backend
//! Synchronous push streams with no third-party reactive library underneath:
//! - **Sources**: `empty`, `just`, `just_all` over single-use item lists
//! - **Operators**: filter, find, first, flat-map merge, signal logging
//! - **Scheduling**: delayed subscription on the ambient tokio runtime
//! - **Discovery**: registered in [`DRIVERS`](crate::driver::DRIVERS) as `"direct"`
//!
//! ## Stub Backend (Test-Only)
//! Recording subscribers, subscriptions and publishers for protocol tests, plus
//! a callback collector for statement tests. Not available in production builds.
//!
//! # Architecture
//!
//! ```text
//! DriverRegistration → Arc<dyn Driver> → DriverHandle → Statement::get
//! ```
//!
//! # Example
//! ```rust
//! use proactive::backends::direct::DirectDriver;
//! use proactive::driver::{Callbacks, DriverHandle};
//!
//! let driver = DriverHandle::new(DirectDriver::new());
//! let context = driver.just_all(vec![1, 2, 3]);
//! driver.subscribe(context, Callbacks::new().on_next(|v: i32| println!("{}", v)))?;
//! # Ok::<(), proactive::errors::ProactiveError>(())
//! ```

pub mod direct;
#[cfg(test)]
pub mod stub;
