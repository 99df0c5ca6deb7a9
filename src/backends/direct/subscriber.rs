// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::driver::{Item, RawCallbacks};
use crate::observability::messages::{signal::ErrorDropped, StructuredLog};
use crate::streams::{reactive, StreamError, UNBOUNDED};

/// Terminal subscriber behind `Driver::subscribe`.
///
/// Runs the `on_subscribe` handler, then requests unbounded demand. At most one
/// terminal signal reaches the handlers.
pub(super) struct LambdaSubscriber {
    callbacks: RawCallbacks,
    done: AtomicBool,
}

impl LambdaSubscriber {
    pub(super) fn new(callbacks: RawCallbacks) -> Self {
        Self {
            callbacks,
            done: AtomicBool::new(false),
        }
    }
}

impl reactive::Subscriber<Item> for LambdaSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        let handler = self.callbacks.on_subscribe.clone();
        let start = reactive::OnSubscribe::native(move |subscription| {
            if let Some(handler) = &handler {
                handler();
            }
            subscription.request(UNBOUNDED);
        });
        start.accept(subscription);
    }

    fn on_next(&self, item: Item) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        if let Some(handler) = &self.callbacks.on_next {
            handler(item);
        }
    }

    fn on_error(&self, error: StreamError) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        match &self.callbacks.on_error {
            Some(handler) => handler(error),
            None => ErrorDropped { error: &*error }.log(),
        }
    }

    fn on_complete(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(handler) = &self.callbacks.on_complete {
            handler();
        }
    }
}
