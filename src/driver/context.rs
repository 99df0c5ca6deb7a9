// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Context handles and the type erasure at the driver boundary.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::DriverId;
use crate::errors::ProactiveError;
use crate::streams::{reactive, StreamError};
use crate::utils::sync::lock;

/// A value travelling through a driver with its static type erased.
pub type Item = Box<dyn Any + Send>;

/// The backend stream handle wrapped by every context.
pub type ItemPublisher = Arc<dyn reactive::Publisher<Item>>;

/// How many values a context can produce, tagging its stream handle.
pub enum Shape {
    /// Zero or one value.
    Single(ItemPublisher),
    /// Any number of values.
    Multi(ItemPublisher),
}

impl Shape {
    pub fn publisher(&self) -> &ItemPublisher {
        match self {
            Shape::Single(publisher) | Shape::Multi(publisher) => publisher,
        }
    }

    pub fn into_publisher(self) -> ItemPublisher {
        match self {
            Shape::Single(publisher) | Shape::Multi(publisher) => publisher,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Shape::Single(_))
    }
}

/// Type-erased context as seen by a [`Driver`](super::Driver).
pub struct RawContext {
    origin: DriverId,
    shape: Shape,
}

impl RawContext {
    pub fn single(origin: DriverId, publisher: ItemPublisher) -> Self {
        Self {
            origin,
            shape: Shape::Single(publisher),
        }
    }

    pub fn multi(origin: DriverId, publisher: ItemPublisher) -> Self {
        Self {
            origin,
            shape: Shape::Multi(publisher),
        }
    }

    /// The driver that produced this context.
    pub fn origin(&self) -> DriverId {
        self.origin
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }

    pub fn into_publisher(self) -> ItemPublisher {
        self.shape.into_publisher()
    }
}

impl fmt::Debug for RawContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawContext")
            .field("origin", &self.origin)
            .field("shape", &if self.shape.is_single() { "single" } else { "multi" })
            .finish()
    }
}

/// Opaque handle for an in-flight computation producing values of type `T`.
///
/// Contexts are created by [`DriverHandle`](super::DriverHandle) operations and
/// consumed exactly once, either by subscribing or by folding them into another
/// context.
pub struct Context<T> {
    raw: RawContext,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Context<T> {
    pub(crate) fn from_raw(raw: RawContext) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_raw(self) -> RawContext {
        self.raw
    }

    /// The driver that produced this context.
    pub fn origin(&self) -> DriverId {
        self.raw.origin()
    }

    /// Whether the context produces at most one value.
    pub fn is_single(&self) -> bool {
        self.raw.shape().is_single()
    }
}

impl<T> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("type", &type_name::<T>())
            .field("raw", &self.raw)
            .finish()
    }
}

pub(crate) fn erase<T: Send + 'static>(value: T) -> Item {
    Box::new(value)
}

pub(crate) fn unerase<T: 'static>(item: Item) -> Result<T, ProactiveError> {
    item.downcast::<T>()
        .map(|value| *value)
        .map_err(|_| ProactiveError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

/// Presents a typed publisher as an item publisher.
pub(crate) struct ErasingPublisher<T> {
    inner: Arc<dyn reactive::Publisher<T>>,
}

impl<T> ErasingPublisher<T> {
    pub(crate) fn new(inner: Arc<dyn reactive::Publisher<T>>) -> Self {
        Self { inner }
    }
}

impl<T: Send + 'static> reactive::Publisher<Item> for ErasingPublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<Item>>) {
        self.inner.subscribe(Arc::new(ErasingSubscriber { downstream: subscriber }));
    }
}

struct ErasingSubscriber {
    downstream: Arc<dyn reactive::Subscriber<Item>>,
}

impl<T: Send + 'static> reactive::Subscriber<T> for ErasingSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        self.downstream.on_subscribe(subscription);
    }

    fn on_next(&self, value: T) {
        self.downstream.on_next(erase(value));
    }

    fn on_error(&self, error: StreamError) {
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        self.downstream.on_complete();
    }
}

/// Presents an item publisher as a typed publisher.
pub(crate) struct TypedPublisher<T> {
    inner: ItemPublisher,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedPublisher<T> {
    pub(crate) fn new(inner: ItemPublisher) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<T: Send + 'static> reactive::Publisher<T> for TypedPublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<T>>) {
        self.inner.subscribe(Arc::new(TypedSubscriber::new(subscriber)));
    }
}

/// Restores item types for a typed subscriber.
///
/// A value of the wrong type cancels upstream and terminates the subscriber
/// with [`ProactiveError::TypeMismatch`].
pub(crate) struct TypedSubscriber<T> {
    downstream: Arc<dyn reactive::Subscriber<T>>,
    upstream: Mutex<Option<Arc<dyn reactive::Subscription>>>,
    failed: AtomicBool,
}

impl<T> TypedSubscriber<T> {
    pub(crate) fn new(downstream: Arc<dyn reactive::Subscriber<T>>) -> Self {
        Self {
            downstream,
            upstream: Mutex::new(None),
            failed: AtomicBool::new(false),
        }
    }
}

impl<T: Send + 'static> reactive::Subscriber<Item> for TypedSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        *lock(&self.upstream) = Some(subscription.clone());
        self.downstream.on_subscribe(subscription);
    }

    fn on_next(&self, item: Item) {
        if self.failed.load(Ordering::Acquire) {
            return;
        }
        match unerase::<T>(item) {
            Ok(value) => self.downstream.on_next(value),
            Err(error) => {
                if self.failed.swap(true, Ordering::AcqRel) {
                    return;
                }
                let upstream = lock(&self.upstream).take();
                if let Some(subscription) = upstream {
                    subscription.cancel();
                }
                self.downstream.on_error(error.into_stream_error());
            }
        }
    }

    fn on_error(&self, error: StreamError) {
        if !self.failed.load(Ordering::Acquire) {
            self.downstream.on_error(error);
        }
    }

    fn on_complete(&self) {
        if !self.failed.load(Ordering::Acquire) {
            self.downstream.on_complete();
        }
    }
}
