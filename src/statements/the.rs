// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::Statement;
use crate::streams::{flow, reactive};

type Source<O> = Arc<dyn Fn(&DriverHandle) -> Context<O> + Send + Sync>;

/// Plain values and external publishers as statements.
///
/// Values are copied into a fresh context on every execution. A lifted
/// publisher is subscribed anew on every execution, so it must support
/// repeated subscription to be re-executed.
pub struct The<O: Send + 'static> {
    source: Source<O>,
}

impl<O: Send + 'static> The<O> {
    fn from_source(source: impl Fn(&DriverHandle) -> Context<O> + Send + Sync + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Emit `value`, then complete.
    pub fn value(value: O) -> Self
    where
        O: Clone + Sync,
    {
        Self::from_source(move |driver| driver.just(Some(value.clone())))
    }

    /// Emit the value when present; complete either way.
    pub fn maybe(value: Option<O>) -> Self
    where
        O: Clone + Sync,
    {
        Self::from_source(move |driver| driver.just(value.clone()))
    }

    /// Emit every value in order, then complete.
    pub fn series(values: impl IntoIterator<Item = O>) -> Self
    where
        O: Clone + Sync,
    {
        let values: Vec<O> = values.into_iter().collect();
        Self::from_source(move |driver| driver.just_all(values.clone()))
    }

    /// Lift a reactive publisher.
    pub fn publisher(publisher: Arc<dyn reactive::Publisher<O>>) -> Self {
        Self::from_source(move |driver| driver.to_context(publisher.clone()))
    }

    /// Lift a flow publisher.
    pub fn flow_publisher(publisher: Arc<dyn flow::Publisher<O>>) -> Self {
        Self::from_source(move |driver| driver.to_context_flow(publisher.clone()))
    }
}

impl<O: Send + 'static> Statement<O> for The<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        Ok((self.source)(driver))
    }

    fn name(&self) -> &'static str {
        "the"
    }
}
