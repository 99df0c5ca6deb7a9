// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{computed, constant, Step};
use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::Statement;

/// Resolve a statement and feed each of its values to the next stage.
///
/// ```
/// use proactive::statement::Statement;
/// use proactive::statements::{Try, The};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let labels = Try::resolving(The::series(vec![1, 2]))
///     .then_with(|v: i32| The::value(v * 10))
///     .then_with(|v: i32| The::value(format!("#{}", v)));
///
/// assert_eq!(labels.resolve().await.unwrap(), vec!["#10", "#20"]);
/// # }
/// ```
pub struct Try<O: Send + 'static> {
    that: Arc<dyn Statement<O>>,
}

impl<O: Send + 'static> Try<O> {
    pub fn resolving(statement: impl Statement<O> + 'static) -> Self {
        Self {
            that: Arc::new(statement),
        }
    }

    /// Run `statement` once per value.
    pub fn then<T: Send + 'static>(self, statement: impl Statement<T> + 'static) -> TryThen<O, T> {
        TryThen {
            upstream: self.that,
            step: constant(statement),
        }
    }

    /// Run the statement built by `step` once per value.
    pub fn then_with<T, S, F>(self, step: F) -> TryThen<O, T>
    where
        T: Send + 'static,
        S: Statement<T> + 'static,
        F: Fn(O) -> S + Send + Sync + 'static,
    {
        TryThen {
            upstream: self.that,
            step: computed(step),
        }
    }
}

impl<O: Send + 'static> Statement<O> for Try<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        self.that.get(driver)
    }

    fn name(&self) -> &'static str {
        "try"
    }
}

/// One stage of a `Try` chain.
pub struct TryThen<I: Send + 'static, O: Send + 'static> {
    upstream: Arc<dyn Statement<I>>,
    step: Step<I, O>,
}

impl<I: Send + 'static, O: Send + 'static> TryThen<I, O> {
    /// Run `statement` once per value of this stage.
    pub fn then<T: Send + 'static>(self, statement: impl Statement<T> + 'static) -> TryThen<O, T> {
        TryThen {
            upstream: Arc::new(self),
            step: constant(statement),
        }
    }

    /// Run the statement built by `step` once per value of this stage.
    pub fn then_with<T, S, F>(self, step: F) -> TryThen<O, T>
    where
        T: Send + 'static,
        S: Statement<T> + 'static,
        F: Fn(O) -> S + Send + Sync + 'static,
    {
        TryThen {
            upstream: Arc::new(self),
            step: computed(step),
        }
    }
}

impl<I: Send + 'static, O: Send + 'static> Statement<O> for TryThen<I, O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        let upstream = self.upstream.get(driver)?;
        let step = self.step.clone();
        let stage_driver = driver.clone();
        driver.flat_map(upstream, move |value: I| step(value).get(&stage_driver))
    }

    fn name(&self) -> &'static str {
        "try"
    }
}
