// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The backend contract statements are executed against.
//!
//! A [`Driver`] is the minimal operation algebra a push-stream backend has to
//! provide. It is object safe: values cross it type-erased as [`Item`]s, and
//! contexts as [`RawContext`]s. Statement code never talks to a `Driver`
//! directly; it goes through [`DriverHandle`], which restores static typing and
//! rejects contexts produced by any other driver.
//!
//! # Architecture
//!
//! ```text
//! Statement tree → DriverHandle (typed, checks DriverId) → dyn Driver (erased) → backend publishers
//! ```
//!
//! Backends become available in two ways:
//! * explicitly, via [`DriverRegistry::set_active`](registry::DriverRegistry::set_active)
//! * at link time, via `#[linkme::distributed_slice(DRIVERS)]` (see [`registry`])

mod callbacks;
mod context;
mod handle;
pub mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProactiveError;
use crate::streams::reactive;

pub use callbacks::{Callbacks, RawCallbacks};
pub use context::{Context, Item, ItemPublisher, RawContext, Shape};
pub use handle::DriverHandle;
pub use registry::{DriverRegistration, DriverRegistry, DRIVERS};

/// Type-erased predicate over items.
pub type ItemPredicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

/// Type-erased flat-map function. An `Err` is signalled downstream as a stream error.
pub type ItemMapper = Arc<dyn Fn(Item) -> Result<RawContext, crate::streams::StreamError> + Send + Sync>;

/// Work deferred by [`Driver::schedule`].
pub type ScheduledTask = Box<dyn FnOnce() + Send>;

/// Identity of one driver instance; stamped on every context it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverId(u64);

impl DriverId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        DriverId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The backend operation algebra.
///
/// Implementations receive only contexts they produced themselves;
/// [`DriverHandle`] enforces that before calling in.
pub trait Driver: Send + Sync {
    fn id(&self) -> DriverId;

    fn name(&self) -> &str;

    /// A context that completes immediately without values.
    fn empty(&self) -> RawContext;

    /// A context emitting `item` then completing; `None` completes without values.
    fn just(&self, item: Option<Item>) -> RawContext;

    /// A context emitting every item in order, then completing.
    fn just_all(&self, items: Vec<Item>) -> RawContext;

    fn filter(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError>;

    /// First item matching `predicate`, then completion. No match is not an error.
    fn find(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError>;

    /// At most the first item, then completion.
    fn first(&self, context: RawContext) -> Result<RawContext, ProactiveError>;

    fn flat_map(&self, context: RawContext, mapper: ItemMapper) -> Result<RawContext, ProactiveError>;

    /// Instrument `context` under `category`. Backends without logging return it untouched.
    fn log(&self, context: RawContext, _category: &str) -> Result<RawContext, ProactiveError> {
        Ok(context)
    }

    /// Start execution, delivering signals to `callbacks`.
    ///
    /// Implementations must request unbounded demand right after invoking the
    /// `on_subscribe` callback; statements perform no flow control of their own.
    fn subscribe(&self, context: RawContext, callbacks: RawCallbacks) -> Result<(), ProactiveError>;

    /// Start execution, delivering signals to an external subscriber that manages its own demand.
    fn subscribe_with(
        &self,
        context: RawContext,
        subscriber: Arc<dyn reactive::Subscriber<Item>>,
    ) -> Result<(), ProactiveError> {
        context.into_publisher().subscribe(subscriber);
        Ok(())
    }

    /// Lift an item publisher into a context owned by this driver.
    fn to_context(&self, publisher: ItemPublisher) -> RawContext {
        RawContext::multi(self.id(), publisher)
    }

    /// Whether [`Driver::schedule`] can currently defer work.
    fn can_schedule(&self) -> bool {
        false
    }

    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, _delay: Duration, _task: ScheduledTask) -> Result<(), ProactiveError> {
        Err(ProactiveError::SchedulingUnsupported {
            driver: self.name().to_string(),
        })
    }
}
