// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Filtering and instrumentation operators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::{Item, ItemPredicate, ItemPublisher};
use crate::observability::messages::{signal::SignalObserved, StructuredLog};
use crate::streams::{reactive, StreamError};
use crate::utils::sync::lock;

/// Passes items accepted by the predicate; with `take_one`, completes after the
/// first accepted item and cancels upstream.
pub(super) struct FilterPublisher {
    upstream: ItemPublisher,
    predicate: Option<ItemPredicate>,
    take_one: bool,
}

impl FilterPublisher {
    pub(super) fn filter(upstream: ItemPublisher, predicate: ItemPredicate) -> ItemPublisher {
        Arc::new(Self {
            upstream,
            predicate: Some(predicate),
            take_one: false,
        })
    }

    pub(super) fn find(upstream: ItemPublisher, predicate: ItemPredicate) -> ItemPublisher {
        Arc::new(Self {
            upstream,
            predicate: Some(predicate),
            take_one: true,
        })
    }

    pub(super) fn first(upstream: ItemPublisher) -> ItemPublisher {
        Arc::new(Self {
            upstream,
            predicate: None,
            take_one: true,
        })
    }
}

impl reactive::Publisher<Item> for FilterPublisher {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<Item>>) {
        self.upstream.subscribe(Arc::new(FilterSubscriber {
            downstream: subscriber,
            predicate: self.predicate.clone(),
            take_one: self.take_one,
            upstream: Mutex::new(None),
            done: AtomicBool::new(false),
        }));
    }
}

struct FilterSubscriber {
    downstream: Arc<dyn reactive::Subscriber<Item>>,
    predicate: Option<ItemPredicate>,
    take_one: bool,
    upstream: Mutex<Option<Arc<dyn reactive::Subscription>>>,
    done: AtomicBool,
}

impl FilterSubscriber {
    fn accepts(&self, item: &Item) -> bool {
        self.predicate.as_ref().map_or(true, |predicate| predicate(item))
    }
}

impl reactive::Subscriber<Item> for FilterSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        *lock(&self.upstream) = Some(subscription.clone());
        self.downstream.on_subscribe(subscription);
    }

    fn on_next(&self, item: Item) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        if !self.accepts(&item) {
            // The dropped item consumed one unit of demand.
            let upstream = lock(&self.upstream).clone();
            if let Some(upstream) = upstream {
                upstream.request(1);
            }
            return;
        }
        if !self.take_one {
            self.downstream.on_next(item);
            return;
        }
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        let upstream = lock(&self.upstream).take();
        if let Some(upstream) = upstream {
            upstream.cancel();
        }
        self.downstream.on_next(item);
        self.downstream.on_complete();
    }

    fn on_error(&self, error: StreamError) {
        if !self.done.swap(true, Ordering::AcqRel) {
            self.downstream.on_error(error);
        }
    }

    fn on_complete(&self) {
        if !self.done.swap(true, Ordering::AcqRel) {
            self.downstream.on_complete();
        }
    }
}

/// Logs every signal and every demand or cancel under a category.
pub(super) struct LogPublisher {
    upstream: ItemPublisher,
    category: Arc<str>,
}

impl LogPublisher {
    pub(super) fn shared(upstream: ItemPublisher, category: &str) -> ItemPublisher {
        Arc::new(Self {
            upstream,
            category: Arc::from(category),
        })
    }
}

fn observe(category: &str, signal: &str, detail: Option<&str>) {
    SignalObserved {
        category,
        signal,
        detail,
    }
    .log();
}

impl reactive::Publisher<Item> for LogPublisher {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<Item>>) {
        self.upstream.subscribe(Arc::new(LogSubscriber {
            downstream: subscriber,
            category: self.category.clone(),
        }));
    }
}

struct LogSubscriber {
    downstream: Arc<dyn reactive::Subscriber<Item>>,
    category: Arc<str>,
}

impl reactive::Subscriber<Item> for LogSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        observe(&self.category, "on_subscribe", None);
        self.downstream.on_subscribe(Arc::new(LogSubscription {
            upstream: subscription,
            category: self.category.clone(),
        }));
    }

    fn on_next(&self, item: Item) {
        observe(&self.category, "on_next", None);
        self.downstream.on_next(item);
    }

    fn on_error(&self, error: StreamError) {
        observe(&self.category, "on_error", Some(&error.to_string()));
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        observe(&self.category, "on_complete", None);
        self.downstream.on_complete();
    }
}

struct LogSubscription {
    upstream: Arc<dyn reactive::Subscription>,
    category: Arc<str>,
}

impl reactive::Subscription for LogSubscription {
    fn request(&self, count: u64) {
        let amount = if count == crate::streams::UNBOUNDED {
            "unbounded".to_string()
        } else {
            count.to_string()
        };
        observe(&self.category, "request", Some(&amount));
        self.upstream.request(count);
    }

    fn cancel(&self) {
        observe(&self.category, "cancel", None);
        self.upstream.cancel();
    }
}
