// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The flow protocol: the alternate stream shape accepted from and handed back to callers.

use std::fmt;
use std::sync::Arc;

use super::{reactive, StreamError};

/// A source of values pushed to subscribers on demand.
pub trait Publisher<T>: Send + Sync {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>);

    /// The reactive publisher this publisher forwards to, when it was produced by the adapter.
    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Publisher<T>>> {
        None
    }
}

/// Receives the signals of one subscription.
pub trait Subscriber<T>: Send + Sync {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    fn on_next(&self, item: T);

    fn on_error(&self, error: StreamError);

    fn on_complete(&self);

    /// The reactive subscriber this subscriber forwards to, when it was produced by the adapter.
    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Subscriber<T>>> {
        None
    }
}

/// Demand and cancellation channel from a subscriber back to its publisher.
pub trait Subscription: Send + Sync {
    fn request(&self, count: u64);

    fn cancel(&self);

    /// The reactive subscription this subscription forwards to, when it was produced by the adapter.
    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Subscription>> {
        None
    }
}

/// Callback invoked with the subscription when a subscriber is attached.
#[derive(Clone)]
pub enum OnSubscribe {
    Native(Arc<dyn Fn(Arc<dyn Subscription>) + Send + Sync>),
    Adapted(Box<reactive::OnSubscribe>),
}

impl OnSubscribe {
    pub fn native(callback: impl Fn(Arc<dyn Subscription>) + Send + Sync + 'static) -> Self {
        OnSubscribe::Native(Arc::new(callback))
    }

    pub fn accept(&self, subscription: Arc<dyn Subscription>) {
        match self {
            OnSubscribe::Native(callback) => callback(subscription),
            OnSubscribe::Adapted(reactive) => reactive.accept(crate::adapter::to_subscription(subscription)),
        }
    }
}

impl fmt::Debug for OnSubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnSubscribe::Native(_) => f.write_str("OnSubscribe::Native"),
            OnSubscribe::Adapted(inner) => f.debug_tuple("OnSubscribe::Adapted").field(inner).finish(),
        }
    }
}
