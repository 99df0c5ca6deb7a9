// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The reactive protocol: the stream shape drivers are built on.

use std::fmt;
use std::sync::Arc;

use super::{flow, StreamError};

/// A source of values pushed to subscribers on demand.
pub trait Publisher<T>: Send + Sync {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>);

    /// The flow publisher this publisher forwards to, when it was produced by the adapter.
    fn flow_origin(&self) -> Option<Arc<dyn flow::Publisher<T>>> {
        None
    }
}

/// Receives the signals of one subscription.
pub trait Subscriber<T>: Send + Sync {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    fn on_next(&self, value: T);

    fn on_error(&self, error: StreamError);

    fn on_complete(&self);

    /// The flow subscriber this subscriber forwards to, when it was produced by the adapter.
    fn flow_origin(&self) -> Option<Arc<dyn flow::Subscriber<T>>> {
        None
    }
}

/// Demand and cancellation channel from a subscriber back to its publisher.
pub trait Subscription: Send + Sync {
    fn request(&self, count: u64);

    fn cancel(&self);

    /// The flow subscription this subscription forwards to, when it was produced by the adapter.
    fn flow_origin(&self) -> Option<Arc<dyn flow::Subscription>> {
        None
    }
}

/// Callback invoked with the subscription when a subscriber is attached.
///
/// A tagged union rather than a bare closure so the adapter can tell its own
/// wrappers apart from native callbacks without inspecting concrete types.
#[derive(Clone)]
pub enum OnSubscribe {
    /// A callback written against this protocol.
    Native(Arc<dyn Fn(Arc<dyn Subscription>) + Send + Sync>),
    /// A flow callback seen through the adapter.
    Adapted(Box<flow::OnSubscribe>),
}

impl OnSubscribe {
    pub fn native(callback: impl Fn(Arc<dyn Subscription>) + Send + Sync + 'static) -> Self {
        OnSubscribe::Native(Arc::new(callback))
    }

    pub fn accept(&self, subscription: Arc<dyn Subscription>) {
        match self {
            OnSubscribe::Native(callback) => callback(subscription),
            OnSubscribe::Adapted(flow) => flow.accept(crate::adapter::to_flow_subscription(subscription)),
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
