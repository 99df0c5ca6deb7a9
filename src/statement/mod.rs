// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Statements: reusable descriptions of asynchronous work.
//!
//! A [`Statement`] is a pure factory. Every execution asks it for a fresh
//! [`Context`] from the driver in use, then subscribes to that context. Nothing
//! is cached between executions, so one statement can run any number of times
//! and under any driver.
//!
//! # Example
//! ```
//! use proactive::statement::Statement;
//! use proactive::statements::{Try, The};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tens = Try::resolving(The::series(vec![1, 2, 3])).then_with(|v: i32| The::value(v * 10));
//! assert_eq!(tens.resolve().await.unwrap(), vec![10, 20, 30]);
//! # }
//! ```

mod execute;
mod truthy;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::config::Runtime;
use crate::driver::{Callbacks, Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statements::Logged;
use crate::streams::StreamError;
use crate::utils::sync::lock;

pub use truthy::Truthy;

/// Asynchronous work producing values of type `O`.
///
/// Execution triggers return `Err` only for failures detected before anything
/// runs (no driver, foreign context, rejected delay). Failures of the work
/// itself arrive through `on_error`.
#[async_trait]
pub trait Statement<O: Send + 'static>: Send + Sync {
    /// Produce a fresh context for one execution.
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Execute now on the active driver, ignoring every signal.
    fn now(&self) -> Result<(), ProactiveError> {
        self.now_with(Callbacks::new())
    }

    /// Execute now on the active driver.
    fn now_with(&self, callbacks: Callbacks<O>) -> Result<(), ProactiveError> {
        self.now_in(&Runtime::active()?, callbacks)
    }

    /// Execute now on `runtime`.
    fn now_in(&self, runtime: &Runtime, callbacks: Callbacks<O>) -> Result<(), ProactiveError> {
        execute::dispatch(runtime, self, callbacks)
    }

    /// Execute on the active driver once `delay` has elapsed, ignoring every signal.
    fn after(&self, delay: Duration) -> Result<(), ProactiveError> {
        self.after_with(delay, Callbacks::new())
    }

    /// Execute on the active driver once `delay` has elapsed.
    fn after_with(&self, delay: Duration, callbacks: Callbacks<O>) -> Result<(), ProactiveError> {
        self.after_in(&Runtime::active()?, delay, callbacks)
    }

    /// Execute on `runtime` once `delay` has elapsed.
    ///
    /// The context is produced immediately; only the subscription waits. When
    /// the driver cannot schedule, the runtime's `delay_fallback` decides.
    ///
    /// The wait is owned by the driver's scheduler. If the scheduler discards
    /// the task before the delay elapses (a tokio runtime shutting down, for
    /// example), `on_error` receives [`ProactiveError::Abandoned`].
    fn after_in(&self, runtime: &Runtime, delay: Duration, callbacks: Callbacks<O>) -> Result<(), ProactiveError> {
        execute::defer(runtime, self, delay, callbacks)
    }

    /// Execute on the active driver and collect every value.
    async fn resolve(&self) -> Result<Vec<O>, StreamError> {
        let runtime = Runtime::active()?;
        self.resolve_in(&runtime).await
    }

    /// Execute on `runtime` and collect every value.
    async fn resolve_in(&self, runtime: &Runtime) -> Result<Vec<O>, StreamError> {
        let (sender, receiver) = oneshot::channel::<Result<(), StreamError>>();
        let outcome = Arc::new(Mutex::new(Some(sender)));
        let values = Arc::new(Mutex::new(Vec::<O>::new()));

        let (on_error, on_complete, collected) = (outcome.clone(), outcome, values.clone());
        let callbacks = Callbacks::<O>::new()
            .on_next(move |value: O| lock(&collected).push(value))
            .on_error(move |error| {
                if let Some(sender) = lock(&on_error).take() {
                    let _ = sender.send(Err(error));
                }
            })
            .on_complete(move || {
                if let Some(sender) = lock(&on_complete).take() {
                    let _ = sender.send(Ok(()));
                }
            });

        self.now_in(runtime, callbacks)?;
        receiver
            .await
            .map_err(|_| ProactiveError::Abandoned.into_stream_error())??;

        let collected = std::mem::take(&mut *lock(&values));
        Ok(collected)
    }
}

impl<O: Send + 'static, S: Statement<O> + ?Sized> Statement<O> for Arc<S> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        (**self).get(driver)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<O: Send + 'static, S: Statement<O> + ?Sized> Statement<O> for Box<S> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        (**self).get(driver)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Combinators available on every statement.
pub trait StatementExt<O: Send + 'static>: Statement<O> + Sized {
    /// Instrument every execution with the driver's `log` under `category`.
    fn logged(self, category: impl Into<String>) -> Logged<O>
    where
        Self: 'static,
    {
        Logged::new(self, category)
    }

    /// Erase the concrete statement type.
    fn shared(self) -> Arc<dyn Statement<O>>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<O: Send + 'static, S: Statement<O>> StatementExt<O> for S {}
