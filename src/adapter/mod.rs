// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bidirectional adapter between the [`reactive`] and [`flow`] stream protocols.
//!
//! Every conversion follows the same rules:
//!
//! 1. An object that is itself an adapter wrapper for the opposite direction is
//!    unwrapped and its original returned, so round trips never stack layers and
//!    `Arc::ptr_eq` holds between the original and the round-tripped object.
//! 2. Anything else is wrapped in a thin forwarder. Every call is forwarded in
//!    the calling frame; demand counts and error payloads pass through unchanged.
//!
//! The `try_*` entry points accept a possibly missing reference and fail with
//! [`ProactiveError::MissingArgument`] instead of wrapping nothing.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use proactive::adapter;
//! use proactive::streams::{flow, reactive};
//!
//! struct Noop;
//!
//! impl reactive::Subscription for Noop {
//!     fn request(&self, _count: u64) {}
//!     fn cancel(&self) {}
//! }
//!
//! let original: Arc<dyn reactive::Subscription> = Arc::new(Noop);
//! let flow: Arc<dyn flow::Subscription> = adapter::to_flow_subscription(original.clone());
//! let back = adapter::to_subscription(flow);
//!
//! assert!(Arc::ptr_eq(&original, &back));
//! ```

mod wrappers;

use std::sync::Arc;

use crate::errors::ProactiveError;
use crate::streams::{flow, reactive};
use wrappers::*;

/// Adapt a flow publisher into a reactive publisher.
pub fn to_publisher<T: Send + 'static>(
    publisher: Arc<dyn flow::Publisher<T>>,
) -> Arc<dyn reactive::Publisher<T>> {
    match publisher.reactive_origin() {
        Some(original) => original,
        None => Arc::new(PublisherFromFlow { flow: publisher }),
    }
}

/// Adapt a reactive publisher into a flow publisher.
pub fn to_flow_publisher<T: Send + 'static>(
    publisher: Arc<dyn reactive::Publisher<T>>,
) -> Arc<dyn flow::Publisher<T>> {
    match publisher.flow_origin() {
        Some(original) => original,
        None => Arc::new(FlowPublisherFromReactive { reactive: publisher }),
    }
}

/// Adapt a flow subscriber into a reactive subscriber.
pub fn to_subscriber<T: Send + 'static>(
    subscriber: Arc<dyn flow::Subscriber<T>>,
) -> Arc<dyn reactive::Subscriber<T>> {
    match subscriber.reactive_origin() {
        Some(original) => original,
        None => Arc::new(SubscriberFromFlow { flow: subscriber }),
    }
}

/// Adapt a reactive subscriber into a flow subscriber.
pub fn to_flow_subscriber<T: Send + 'static>(
    subscriber: Arc<dyn reactive::Subscriber<T>>,
) -> Arc<dyn flow::Subscriber<T>> {
    match subscriber.flow_origin() {
        Some(original) => original,
        None => Arc::new(FlowSubscriberFromReactive { reactive: subscriber }),
    }
}

/// Adapt a flow subscription into a reactive subscription.
pub fn to_subscription(subscription: Arc<dyn flow::Subscription>) -> Arc<dyn reactive::Subscription> {
    match subscription.reactive_origin() {
        Some(original) => original,
        None => Arc::new(SubscriptionFromFlow { flow: subscription }),
    }
}

/// Adapt a reactive subscription into a flow subscription.
pub fn to_flow_subscription(subscription: Arc<dyn reactive::Subscription>) -> Arc<dyn flow::Subscription> {
    match subscription.flow_origin() {
        Some(original) => original,
        None => Arc::new(FlowSubscriptionFromReactive { reactive: subscription }),
    }
}

/// Adapt a flow on-subscribe callback into a reactive one.
pub fn to_on_subscribe(callback: flow::OnSubscribe) -> reactive::OnSubscribe {
    match callback {
        flow::OnSubscribe::Adapted(original) => *original,
        native => reactive::OnSubscribe::Adapted(Box::new(native)),
    }
}

/// Adapt a reactive on-subscribe callback into a flow one.
pub fn to_flow_on_subscribe(callback: reactive::OnSubscribe) -> flow::OnSubscribe {
    match callback {
        reactive::OnSubscribe::Adapted(original) => *original,
        native => flow::OnSubscribe::Adapted(Box::new(native)),
    }
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T, ProactiveError> {
    value.ok_or(ProactiveError::MissingArgument { name })
}

pub fn try_to_publisher<T: Send + 'static>(
    publisher: Option<Arc<dyn flow::Publisher<T>>>,
) -> Result<Arc<dyn reactive::Publisher<T>>, ProactiveError> {
    require(publisher, "flow_publisher").map(to_publisher)
}

pub fn try_to_flow_publisher<T: Send + 'static>(
    publisher: Option<Arc<dyn reactive::Publisher<T>>>,
) -> Result<Arc<dyn flow::Publisher<T>>, ProactiveError> {
    require(publisher, "publisher").map(to_flow_publisher)
}

pub fn try_to_subscriber<T: Send + 'static>(
    subscriber: Option<Arc<dyn flow::Subscriber<T>>>,
) -> Result<Arc<dyn reactive::Subscriber<T>>, ProactiveError> {
    require(subscriber, "flow_subscriber").map(to_subscriber)
}

pub fn try_to_flow_subscriber<T: Send + 'static>(
    subscriber: Option<Arc<dyn reactive::Subscriber<T>>>,
) -> Result<Arc<dyn flow::Subscriber<T>>, ProactiveError> {
    require(subscriber, "subscriber").map(to_flow_subscriber)
}

pub fn try_to_subscription(
    subscription: Option<Arc<dyn flow::Subscription>>,
) -> Result<Arc<dyn reactive::Subscription>, ProactiveError> {
    require(subscription, "flow_subscription").map(to_subscription)
}

pub fn try_to_flow_subscription(
    subscription: Option<Arc<dyn reactive::Subscription>>,
) -> Result<Arc<dyn flow::Subscription>, ProactiveError> {
    require(subscription, "subscription").map(to_flow_subscription)
}

pub fn try_to_on_subscribe(callback: Option<flow::OnSubscribe>) -> Result<reactive::OnSubscribe, ProactiveError> {
    require(callback, "flow_on_subscribe").map(to_on_subscribe)
}

pub fn try_to_flow_on_subscribe(
    callback: Option<reactive::OnSubscribe>,
) -> Result<flow::OnSubscribe, ProactiveError> {
    require(callback, "on_subscribe").map(to_flow_on_subscribe)
}
