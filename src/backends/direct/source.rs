// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-use publisher over a fixed list of items.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::{Item, ItemPublisher};
use crate::errors::ProactiveError;
use crate::streams::{reactive, UNBOUNDED};
use crate::utils::sync::lock;

/// Emits its items on demand, then completes. Completion needs no demand.
///
/// The items move into the first subscription; later subscribers receive
/// `on_error(ContextConsumed)`.
pub(super) struct SourcePublisher {
    items: Mutex<Option<VecDeque<Item>>>,
}

impl SourcePublisher {
    pub(super) fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: Mutex::new(Some(items.into_iter().collect())),
        }
    }

    pub(super) fn shared(items: impl IntoIterator<Item = Item>) -> ItemPublisher {
        Arc::new(Self::new(items))
    }
}

impl reactive::Publisher<Item> for SourcePublisher {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<Item>>) {
        let items = lock(&self.items).take();
        match items {
            Some(items) => {
                let subscription = Arc::new(SourceSubscription::new(items, subscriber.clone()));
                subscriber.on_subscribe(subscription.clone());
                subscription.drain();
            }
            None => {
                subscriber.on_subscribe(Arc::new(Inert));
                subscriber.on_error(ProactiveError::ContextConsumed.into_stream_error());
            }
        }
    }
}

/// Subscription with nothing behind it.
pub(super) struct Inert;

impl reactive::Subscription for Inert {
    fn request(&self, _count: u64) {}

    fn cancel(&self) {}
}

struct SourceState {
    items: VecDeque<Item>,
    demand: u64,
    downstream: Option<Arc<dyn reactive::Subscriber<Item>>>,
}

struct SourceSubscription {
    state: Mutex<SourceState>,
    wip: AtomicUsize,
}

enum Step {
    Next(Arc<dyn reactive::Subscriber<Item>>, Item),
    Complete(Arc<dyn reactive::Subscriber<Item>>),
    Idle,
}

impl SourceSubscription {
    fn new(items: VecDeque<Item>, downstream: Arc<dyn reactive::Subscriber<Item>>) -> Self {
        Self {
            state: Mutex::new(SourceState {
                items,
                demand: 0,
                downstream: Some(downstream),
            }),
            wip: AtomicUsize::new(0),
        }
    }

    /// Emit as much as demand allows. Reentrant calls from inside a signal
    /// are folded into the running loop instead of recursing.
    fn drain(&self) {
        if self.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }
        let mut missed = 1;
        loop {
            loop {
                match self.step() {
                    Step::Next(downstream, item) => downstream.on_next(item),
                    Step::Complete(downstream) => downstream.on_complete(),
                    Step::Idle => break,
                }
            }
            missed = self.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
            if missed == 0 {
                break;
            }
        }
    }

    fn step(&self) -> Step {
        let mut state = lock(&self.state);
        let Some(downstream) = state.downstream.clone() else {
            return Step::Idle;
        };
        if state.items.is_empty() {
            state.downstream = None;
            return Step::Complete(downstream);
        }
        if state.demand == 0 {
            return Step::Idle;
        }
        if state.demand != UNBOUNDED {
            state.demand -= 1;
        }
        match state.items.pop_front() {
            Some(item) => Step::Next(downstream, item),
            None => Step::Idle,
        }
    }
}

impl reactive::Subscription for SourceSubscription {
    fn request(&self, count: u64) {
        if count == 0 {
            let downstream = {
                let mut state = lock(&self.state);
                state.items.clear();
                state.downstream.take()
            };
            if let Some(downstream) = downstream {
                downstream.on_error(ProactiveError::InvalidDemand { requested: count }.into_stream_error());
            }
            return;
        }
        {
            let mut state = lock(&self.state);
            state.demand = state.demand.saturating_add(count);
        }
        self.drain();
    }

    fn cancel(&self) {
        let mut state = lock(&self.state);
        state.items.clear();
        state.downstream = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{CallLog, RecordingSubscriber};
    use crate::driver::Item;

    /// Logs items as their `i32` value.
    struct IntItems(Arc<RecordingSubscriber<i32>>);

    impl reactive::Subscriber<Item> for IntItems {
        fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
            reactive::Subscriber::on_subscribe(&*self.0, subscription);
        }
        fn on_next(&self, item: Item) {
            let value = *item.downcast::<i32>().unwrap();
            reactive::Subscriber::on_next(&*self.0, value);
        }
        fn on_error(&self, error: crate::streams::StreamError) {
            reactive::Subscriber::on_error(&*self.0, error);
        }
        fn on_complete(&self) {
            reactive::Subscriber::on_complete(&*self.0);
        }
    }

    fn items(values: &[i32]) -> Vec<Item> {
        values.iter().map(|v| Box::new(*v) as Item).collect()
    }

    fn subscribe(publisher: &SourcePublisher, log: &CallLog) -> Arc<RecordingSubscriber<i32>> {
        let recording = Arc::new(RecordingSubscriber::<i32>::new(log.clone()));
        reactive::Publisher::subscribe(publisher, Arc::new(IntItems(recording.clone())));
        recording
    }

    #[test]
    fn test_emits_only_what_was_requested() {
        let log = CallLog::default();
        let publisher = SourcePublisher::new(items(&[1, 2, 3]));
        let recording = subscribe(&publisher, &log);
        let subscription = recording.reactive_subscription().unwrap();

        subscription.request(2);
        assert_eq!(log.entries(), vec!["on_subscribe", "on_next(1)", "on_next(2)"]);

        subscription.request(5);
        assert_eq!(
            log.entries(),
            vec!["on_subscribe", "on_next(1)", "on_next(2)", "on_next(3)", "on_complete"]
        );
    }

    #[test]
    fn test_empty_source_completes_without_demand() {
        let log = CallLog::default();
        let publisher = SourcePublisher::new(Vec::new());
        subscribe(&publisher, &log);

        assert_eq!(log.entries(), vec!["on_subscribe", "on_complete"]);
    }

    #[test]
    fn test_second_subscription_is_rejected() {
        let log = CallLog::default();
        let publisher = SourcePublisher::new(items(&[1]));
        subscribe(&publisher, &log);

        let second = CallLog::default();
        subscribe(&publisher, &second);

        assert_eq!(
            second.entries(),
            vec!["on_subscribe", "on_error(Context has already been consumed)"]
        );
    }

    #[test]
    fn test_zero_demand_is_an_error() {
        let log = CallLog::default();
        let publisher = SourcePublisher::new(items(&[1]));
        let recording = subscribe(&publisher, &log);

        recording.reactive_subscription().unwrap().request(0);

        assert_eq!(
            log.entries(),
            vec!["on_subscribe", "on_error(Invalid demand: 0 (must be greater than zero))"]
        );
    }

    #[test]
    fn test_cancel_stops_emission() {
        let log = CallLog::default();
        let publisher = SourcePublisher::new(items(&[1, 2]));
        let recording = subscribe(&publisher, &log);
        let subscription = recording.reactive_subscription().unwrap();

        subscription.request(1);
        subscription.cancel();
        subscription.request(1);

        assert_eq!(log.entries(), vec!["on_subscribe", "on_next(1)"]);
    }
}
