// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend-agnostic composition of asynchronous statements.
//!
//! Statements describe work; a [`Driver`](driver::Driver) runs it. The same
//! statement tree executes unchanged under any registered driver.

pub mod adapter;      // reactive <-> flow protocol bridge
pub mod backends;     // driver implementations
pub mod config;       // config loading + runtime
pub mod driver;       // backend contract + registry
pub mod errors;       // error handling
pub mod observability;
pub mod statement;    // Statement trait + execution
pub mod statements;   // combinators
pub mod streams;      // push-stream protocols
mod utils;

pub use config::Runtime;
pub use driver::{Callbacks, Context, DriverHandle};
pub use errors::ProactiveError;
pub use statement::{Statement, StatementExt, Truthy};
