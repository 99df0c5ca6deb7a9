// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed view of a driver.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::context::{erase, unerase, ErasingPublisher, TypedPublisher, TypedSubscriber};
use super::{Callbacks, Context, Driver, DriverId, Item, ItemMapper, ItemPredicate, RawContext, ScheduledTask};
use crate::adapter;
use crate::errors::ProactiveError;
use crate::observability::messages::{driver::ContextRejected, StructuredLog};
use crate::streams::{flow, reactive};

/// Shared, typed handle to a [`Driver`].
///
/// Every operation checks that incoming contexts were produced by this handle's
/// driver and fails with [`ProactiveError::UnsupportedContext`] otherwise. That
/// check also covers contexts returned from `flat_map` mappers, where a foreign
/// context surfaces as a stream error.
#[derive(Clone)]
pub struct DriverHandle {
    driver: Arc<dyn Driver>,
}

impl DriverHandle {
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    pub fn from_arc(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    pub fn id(&self) -> DriverId {
        self.driver.id()
    }

    pub fn name(&self) -> &str {
        self.driver.name()
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Whether both handles refer to the same driver instance.
    pub fn same_driver(&self, other: &DriverHandle) -> bool {
        self.id() == other.id()
    }

    fn admit<T>(&self, operation: &'static str, context: Context<T>) -> Result<RawContext, ProactiveError> {
        let raw = context.into_raw();
        check_origin(operation, self.id(), &raw)?;
        Ok(raw)
    }

    pub fn empty<T: Send + 'static>(&self) -> Context<T> {
        Context::from_raw(self.driver.empty())
    }

    /// Emit `value` then complete; `None` completes without values.
    pub fn just<T: Send + 'static>(&self, value: Option<T>) -> Context<T> {
        Context::from_raw(self.driver.just(value.map(erase)))
    }

    /// Emit every value in order, then complete.
    pub fn just_all<T: Send + 'static>(&self, values: Vec<T>) -> Context<T> {
        Context::from_raw(self.driver.just_all(values.into_iter().map(erase).collect()))
    }

    pub fn filter<T, P>(&self, context: Context<T>, predicate: P) -> Result<Context<T>, ProactiveError>
    where
        T: Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let raw = self.admit("filter", context)?;
        Ok(Context::from_raw(self.driver.filter(raw, erase_predicate(predicate))?))
    }

    pub fn find<T, P>(&self, context: Context<T>, predicate: P) -> Result<Context<T>, ProactiveError>
    where
        T: Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let raw = self.admit("find", context)?;
        Ok(Context::from_raw(self.driver.find(raw, erase_predicate(predicate))?))
    }

    pub fn first<T: Send + 'static>(&self, context: Context<T>) -> Result<Context<T>, ProactiveError> {
        let raw = self.admit("first", context)?;
        Ok(Context::from_raw(self.driver.first(raw)?))
    }

    pub fn flat_map<I, O, F>(&self, context: Context<I>, mapper: F) -> Result<Context<O>, ProactiveError>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(I) -> Result<Context<O>, ProactiveError> + Send + Sync + 'static,
    {
        let raw = self.admit("flat_map", context)?;
        let expected = self.id();
        let erased: ItemMapper = Arc::new(move |item: Item| {
            let value = unerase::<I>(item)?;
            let mapped = mapper(value)?.into_raw();
            check_origin("flat_map", expected, &mapped)?;
            Ok(mapped)
        });
        Ok(Context::from_raw(self.driver.flat_map(raw, erased)?))
    }

    pub fn log<T: Send + 'static>(&self, context: Context<T>, category: &str) -> Result<Context<T>, ProactiveError> {
        let raw = self.admit("log", context)?;
        Ok(Context::from_raw(self.driver.log(raw, category)?))
    }

    /// Start execution with the given handlers.
    pub fn subscribe<T: Send + 'static>(&self, context: Context<T>, callbacks: Callbacks<T>) -> Result<(), ProactiveError> {
        let raw = self.admit("subscribe", context)?;
        self.driver.subscribe(raw, callbacks.into_raw())
    }

    /// Start execution, delivering to a subscriber that manages its own demand.
    pub fn subscribe_with<T: Send + 'static>(
        &self,
        context: Context<T>,
        subscriber: Arc<dyn reactive::Subscriber<T>>,
    ) -> Result<(), ProactiveError> {
        let raw = self.admit("subscribe", context)?;
        self.driver.subscribe_with(raw, Arc::new(TypedSubscriber::new(subscriber)))
    }

    /// Start execution, delivering to a flow subscriber.
    pub fn subscribe_flow<T: Send + 'static>(
        &self,
        context: Context<T>,
        subscriber: Arc<dyn flow::Subscriber<T>>,
    ) -> Result<(), ProactiveError> {
        self.subscribe_with(context, adapter::to_subscriber(subscriber))
    }

    /// Lift an external reactive publisher into a context.
    pub fn to_context<T: Send + 'static>(&self, publisher: Arc<dyn reactive::Publisher<T>>) -> Context<T> {
        Context::from_raw(self.driver.to_context(Arc::new(ErasingPublisher::new(publisher))))
    }

    /// Lift an external flow publisher into a context.
    pub fn to_context_flow<T: Send + 'static>(&self, publisher: Arc<dyn flow::Publisher<T>>) -> Context<T> {
        self.to_context(adapter::to_publisher(publisher))
    }

    /// Expose a context as a reactive publisher.
    pub fn to_publisher<T: Send + 'static>(
        &self,
        context: Context<T>,
    ) -> Result<Arc<dyn reactive::Publisher<T>>, ProactiveError> {
        let raw = self.admit("to_publisher", context)?;
        Ok(Arc::new(TypedPublisher::<T>::new(raw.into_publisher())))
    }

    /// Expose a context as a flow publisher.
    pub fn to_flow_publisher<T: Send + 'static>(
        &self,
        context: Context<T>,
    ) -> Result<Arc<dyn flow::Publisher<T>>, ProactiveError> {
        Ok(adapter::to_flow_publisher(self.to_publisher(context)?))
    }

    pub fn can_schedule(&self) -> bool {
        self.driver.can_schedule()
    }

    pub fn schedule(&self, delay: Duration, task: ScheduledTask) -> Result<(), ProactiveError> {
        self.driver.schedule(delay, task)
    }
}

impl fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

fn check_origin(operation: &'static str, expected: DriverId, raw: &RawContext) -> Result<(), ProactiveError> {
    if raw.origin() == expected {
        return Ok(());
    }
    ContextRejected {
        operation,
        expected,
        found: raw.origin(),
    }
    .log();
    Err(ProactiveError::UnsupportedContext {
        operation,
        expected,
        found: raw.origin(),
    })
}

fn erase_predicate<T, P>(predicate: P) -> ItemPredicate
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(move |item: &Item| (**item).downcast_ref::<T>().is_some_and(|value| predicate(value)))
}
