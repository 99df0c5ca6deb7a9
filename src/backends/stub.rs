// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recording doubles for protocol and statement tests.

use std::fmt::Debug;
use std::io;
use std::sync::{Arc, Mutex};

use crate::backends::direct::DirectDriver;
use crate::driver::{
    Callbacks, Driver, DriverId, Item, ItemMapper, ItemPredicate, RawCallbacks, RawContext,
};
use crate::errors::ProactiveError;
use crate::streams::{flow, reactive, StreamError};

/// Shared, ordered record of calls.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Subscriber for either protocol that records every signal.
pub struct RecordingSubscriber<T> {
    log: CallLog,
    reactive_subscription: Mutex<Option<Arc<dyn reactive::Subscription>>>,
    flow_subscription: Mutex<Option<Arc<dyn flow::Subscription>>>,
    _marker: std::marker::PhantomData<fn(T)>,
}

impl<T> RecordingSubscriber<T> {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            reactive_subscription: Mutex::new(None),
            flow_subscription: Mutex::new(None),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn reactive_subscription(&self) -> Option<Arc<dyn reactive::Subscription>> {
        self.reactive_subscription.lock().unwrap().clone()
    }

    pub fn flow_subscription(&self) -> Option<Arc<dyn flow::Subscription>> {
        self.flow_subscription.lock().unwrap().clone()
    }
}

impl<T: Debug> reactive::Subscriber<T> for RecordingSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        *self.reactive_subscription.lock().unwrap() = Some(subscription);
        self.log.push("on_subscribe");
    }

    fn on_next(&self, value: T) {
        self.log.push(format!("on_next({:?})", value));
    }

    fn on_error(&self, error: StreamError) {
        self.log.push(format!("on_error({})", error));
    }

    fn on_complete(&self) {
        self.log.push("on_complete");
    }
}

impl<T: Debug> flow::Subscriber<T> for RecordingSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn flow::Subscription>) {
        *self.flow_subscription.lock().unwrap() = Some(subscription);
        self.log.push("on_subscribe");
    }

    fn on_next(&self, item: T) {
        self.log.push(format!("on_next({:?})", item));
    }

    fn on_error(&self, error: StreamError) {
        self.log.push(format!("on_error({})", error));
    }

    fn on_complete(&self) {
        self.log.push("on_complete");
    }
}

/// Subscription for either protocol that records demand and cancellation.
pub struct RecordingSubscription {
    log: CallLog,
}

impl RecordingSubscription {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl reactive::Subscription for RecordingSubscription {
    fn request(&self, count: u64) {
        self.log.push(format!("request({})", count));
    }

    fn cancel(&self) {
        self.log.push("cancel");
    }
}

impl flow::Subscription for RecordingSubscription {
    fn request(&self, count: u64) {
        self.log.push(format!("request({})", count));
    }

    fn cancel(&self) {
        self.log.push("cancel");
    }
}

struct Ignored;

impl reactive::Subscription for Ignored {
    fn request(&self, _count: u64) {}
    fn cancel(&self) {}
}

impl flow::Subscription for Ignored {
    fn request(&self, _count: u64) {}
    fn cancel(&self) {}
}

/// Publisher for either protocol that emits its values and then fails,
/// ignoring demand. Every subscriber receives the same error instance.
pub struct FailingPublisher<T> {
    values: Vec<T>,
    error: StreamError,
}

impl<T> FailingPublisher<T> {
    pub fn new(values: Vec<T>, message: &str) -> Self {
        Self {
            values,
            error: Arc::new(io::Error::new(io::ErrorKind::Other, message.to_string())),
        }
    }

    pub fn error(&self) -> StreamError {
        self.error.clone()
    }
}

impl<T: Clone + Send + Sync> reactive::Publisher<T> for FailingPublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<T>>) {
        subscriber.on_subscribe(Arc::new(Ignored));
        for value in &self.values {
            subscriber.on_next(value.clone());
        }
        subscriber.on_error(self.error());
    }
}

impl<T: Clone + Send + Sync> flow::Publisher<T> for FailingPublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn flow::Subscriber<T>>) {
        subscriber.on_subscribe(Arc::new(Ignored));
        for value in &self.values {
            subscriber.on_next(value.clone());
        }
        subscriber.on_error(self.error());
    }
}

/// A terminal or value signal seen by a [`Collector`].
#[derive(Debug, Clone)]
pub enum Event<T> {
    Next(T),
    Error(StreamError),
    Complete,
}

/// Records what a statement execution delivers to its callbacks.
pub struct Collector<T> {
    events: Arc<Mutex<Vec<Event<T>>>>,
    subscribed: Arc<Mutex<usize>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            subscribed: self.subscribed.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Collector<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            subscribed: Arc::new(Mutex::new(0)),
        }
    }

    /// Callbacks feeding this collector; every handler is set.
    pub fn callbacks(&self) -> Callbacks<T> {
        let next = self.events.clone();
        let error = self.events.clone();
        let complete = self.events.clone();
        let subscribed = self.subscribed.clone();
        Callbacks::<T>::new()
            .on_next(move |value| next.lock().unwrap().push(Event::Next(value)))
            .on_error(move |e| error.lock().unwrap().push(Event::Error(e)))
            .on_complete(move || complete.lock().unwrap().push(Event::Complete))
            .on_subscribe(move || *subscribed.lock().unwrap() += 1)
    }

    pub fn events(&self) -> Vec<Event<T>> {
        self.events.lock().unwrap().clone()
    }

    pub fn values(&self) -> Vec<T> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Next(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.events().iter().any(|event| matches!(event, Event::Complete))
    }

    pub fn error(&self) -> Option<StreamError> {
        self.events().into_iter().find_map(|event| match event {
            Event::Error(error) => Some(error),
            _ => None,
        })
    }

    /// Number of terminal signals received.
    pub fn terminations(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| !matches!(event, Event::Next(_)))
            .count()
    }

    pub fn subscriptions(&self) -> usize {
        *self.subscribed.lock().unwrap()
    }
}

/// A second driver: the direct driver without scheduling, named `"unscheduled"`.
#[derive(Default)]
pub struct UnscheduledDriver {
    inner: DirectDriver,
}

impl UnscheduledDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Driver for UnscheduledDriver {
    fn id(&self) -> DriverId {
        self.inner.id()
    }

    fn name(&self) -> &str {
        "unscheduled"
    }

    fn empty(&self) -> RawContext {
        self.inner.empty()
    }

    fn just(&self, item: Option<Item>) -> RawContext {
        self.inner.just(item)
    }

    fn just_all(&self, items: Vec<Item>) -> RawContext {
        self.inner.just_all(items)
    }

    fn filter(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError> {
        self.inner.filter(context, predicate)
    }

    fn find(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError> {
        self.inner.find(context, predicate)
    }

    fn first(&self, context: RawContext) -> Result<RawContext, ProactiveError> {
        self.inner.first(context)
    }

    fn flat_map(&self, context: RawContext, mapper: ItemMapper) -> Result<RawContext, ProactiveError> {
        self.inner.flat_map(context, mapper)
    }

    fn subscribe(&self, context: RawContext, callbacks: RawCallbacks) -> Result<(), ProactiveError> {
        self.inner.subscribe(context, callbacks)
    }
}
