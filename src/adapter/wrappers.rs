// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Thin forwarding wrappers produced by the adapter.

use std::sync::Arc;

use super::*;
use crate::streams::StreamError;

pub(super) struct PublisherFromFlow<T> {
    pub(super) flow: Arc<dyn flow::Publisher<T>>,
}

impl<T: Send + 'static> reactive::Publisher<T> for PublisherFromFlow<T> {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<T>>) {
        self.flow.subscribe(to_flow_subscriber(subscriber));
    }

    fn flow_origin(&self) -> Option<Arc<dyn flow::Publisher<T>>> {
        Some(self.flow.clone())
    }
}

pub(super) struct FlowPublisherFromReactive<T> {
    pub(super) reactive: Arc<dyn reactive::Publisher<T>>,
}

impl<T: Send + 'static> flow::Publisher<T> for FlowPublisherFromReactive<T> {
    fn subscribe(&self, subscriber: Arc<dyn flow::Subscriber<T>>) {
        self.reactive.subscribe(to_subscriber(subscriber));
    }

    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Publisher<T>>> {
        Some(self.reactive.clone())
    }
}

pub(super) struct SubscriberFromFlow<T> {
    pub(super) flow: Arc<dyn flow::Subscriber<T>>,
}

impl<T: Send + 'static> reactive::Subscriber<T> for SubscriberFromFlow<T> {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        self.flow.on_subscribe(to_flow_subscription(subscription));
    }

    fn on_next(&self, value: T) {
        self.flow.on_next(value);
    }

    fn on_error(&self, error: StreamError) {
        self.flow.on_error(error);
    }

    fn on_complete(&self) {
        self.flow.on_complete();
    }

    fn flow_origin(&self) -> Option<Arc<dyn flow::Subscriber<T>>> {
        Some(self.flow.clone())
    }
}

pub(super) struct FlowSubscriberFromReactive<T> {
    pub(super) reactive: Arc<dyn reactive::Subscriber<T>>,
}

impl<T: Send + 'static> flow::Subscriber<T> for FlowSubscriberFromReactive<T> {
    fn on_subscribe(&self, subscription: Arc<dyn flow::Subscription>) {
        self.reactive.on_subscribe(to_subscription(subscription));
    }

    fn on_next(&self, item: T) {
        self.reactive.on_next(item);
    }

    fn on_error(&self, error: StreamError) {
        self.reactive.on_error(error);
    }

    fn on_complete(&self) {
        self.reactive.on_complete();
    }

    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Subscriber<T>>> {
        Some(self.reactive.clone())
    }
}

pub(super) struct SubscriptionFromFlow {
    pub(super) flow: Arc<dyn flow::Subscription>,
}

impl reactive::Subscription for SubscriptionFromFlow {
    fn request(&self, count: u64) {
        self.flow.request(count);
    }

    fn cancel(&self) {
        self.flow.cancel();
    }

    fn flow_origin(&self) -> Option<Arc<dyn flow::Subscription>> {
        Some(self.flow.clone())
    }
}

pub(super) struct FlowSubscriptionFromReactive {
    pub(super) reactive: Arc<dyn reactive::Subscription>,
}

impl flow::Subscription for FlowSubscriptionFromReactive {
    fn request(&self, count: u64) {
        self.reactive.request(count);
    }

    fn cancel(&self) {
        self.reactive.cancel();
    }

    fn reactive_origin(&self) -> Option<Arc<dyn reactive::Subscription>> {
        Some(self.reactive.clone())
    }
}
