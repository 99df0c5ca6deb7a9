// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flat-map: every upstream item becomes an inner stream, merged downstream.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::driver::{Item, ItemMapper, ItemPublisher};
use crate::errors::ProactiveError;
use crate::streams::{reactive, StreamError, UNBOUNDED};
use crate::utils::sync::lock;

/// Subscribes the mapped inner streams eagerly and merges their items.
///
/// Upstream and inner streams run with unbounded demand; downstream demand
/// is honored from a merge queue. The first error from anywhere cancels all
/// remaining sources and is delivered ahead of queued items.
pub(super) struct FlatMapPublisher {
    upstream: ItemPublisher,
    mapper: ItemMapper,
}

impl FlatMapPublisher {
    pub(super) fn shared(upstream: ItemPublisher, mapper: ItemMapper) -> ItemPublisher {
        Arc::new(Self { upstream, mapper })
    }
}

impl reactive::Publisher<Item> for FlatMapPublisher {
    fn subscribe(&self, subscriber: Arc<dyn reactive::Subscriber<Item>>) {
        let merge = Arc::new(Merge::new(subscriber.clone(), self.mapper.clone()));
        subscriber.on_subscribe(Arc::new(MergeSubscription(merge.clone())));
        self.upstream.subscribe(Arc::new(OuterSubscriber(merge)));
    }
}

#[derive(Default)]
struct MergeState {
    downstream: Option<Arc<dyn reactive::Subscriber<Item>>>,
    queue: VecDeque<Item>,
    demand: u64,
    upstream: Option<Arc<dyn reactive::Subscription>>,
    upstream_done: bool,
    inners: Vec<(usize, Arc<dyn reactive::Subscription>)>,
    next_inner: usize,
    active: usize,
    error: Option<StreamError>,
    terminated: bool,
}

enum Step {
    Next(Arc<dyn reactive::Subscriber<Item>>, Item),
    Error(Arc<dyn reactive::Subscriber<Item>>, StreamError),
    Complete(Arc<dyn reactive::Subscriber<Item>>),
    Idle,
}

struct Merge {
    state: Mutex<MergeState>,
    wip: AtomicUsize,
    mapper: ItemMapper,
}

impl Merge {
    fn new(downstream: Arc<dyn reactive::Subscriber<Item>>, mapper: ItemMapper) -> Self {
        Self {
            state: Mutex::new(MergeState {
                downstream: Some(downstream),
                ..MergeState::default()
            }),
            wip: AtomicUsize::new(0),
            mapper,
        }
    }

    fn drain(&self) {
        if self.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }
        let mut missed = 1;
        loop {
            loop {
                match self.step() {
                    Step::Next(downstream, item) => downstream.on_next(item),
                    Step::Error(downstream, error) => downstream.on_error(error),
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
        if state.terminated {
            return Step::Idle;
        }
        let Some(downstream) = state.downstream.clone() else {
            return Step::Idle;
        };
        if let Some(error) = state.error.take() {
            state.terminated = true;
            state.downstream = None;
            state.queue.clear();
            return Step::Error(downstream, error);
        }
        if state.demand > 0 {
            if let Some(item) = state.queue.pop_front() {
                if state.demand != UNBOUNDED {
                    state.demand -= 1;
                }
                return Step::Next(downstream, item);
            }
        }
        if state.queue.is_empty() && state.upstream_done && state.active == 0 {
            state.terminated = true;
            state.downstream = None;
            return Step::Complete(downstream);
        }
        Step::Idle
    }

    /// Record the first error and cancel every source.
    fn fail(&self, error: StreamError) {
        let sources = {
            let mut state = lock(&self.state);
            if state.terminated || state.error.is_some() {
                return;
            }
            state.error = Some(error);
            take_sources(&mut state)
        };
        for source in sources {
            source.cancel();
        }
        self.drain();
    }

    fn cancel(&self) {
        let sources = {
            let mut state = lock(&self.state);
            state.terminated = true;
            state.downstream = None;
            state.queue.clear();
            take_sources(&mut state)
        };
        for source in sources {
            source.cancel();
        }
    }

    fn is_stopped(&self) -> bool {
        let state = lock(&self.state);
        state.terminated || state.error.is_some()
    }
}

fn take_sources(state: &mut MergeState) -> Vec<Arc<dyn reactive::Subscription>> {
    let mut sources: Vec<_> = state.upstream.take().into_iter().collect();
    sources.extend(state.inners.drain(..).map(|(_, subscription)| subscription));
    sources
}

struct MergeSubscription(Arc<Merge>);

impl reactive::Subscription for MergeSubscription {
    fn request(&self, count: u64) {
        if count == 0 {
            self.0
                .fail(ProactiveError::InvalidDemand { requested: count }.into_stream_error());
            return;
        }
        {
            let mut state = lock(&self.0.state);
            state.demand = state.demand.saturating_add(count);
        }
        self.0.drain();
    }

    fn cancel(&self) {
        self.0.cancel();
    }
}

struct OuterSubscriber(Arc<Merge>);

impl reactive::Subscriber<Item> for OuterSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        {
            let mut state = lock(&self.0.state);
            if !(state.terminated || state.error.is_some()) {
                state.upstream = Some(subscription.clone());
                drop(state);
                subscription.request(UNBOUNDED);
                return;
            }
        }
        subscription.cancel();
    }

    fn on_next(&self, item: Item) {
        if self.0.is_stopped() {
            return;
        }
        let inner = match (self.0.mapper)(item) {
            Ok(inner) => inner,
            Err(error) => return self.0.fail(error),
        };
        let id = {
            let mut state = lock(&self.0.state);
            state.active += 1;
            state.next_inner += 1;
            state.next_inner
        };
        inner.into_publisher().subscribe(Arc::new(InnerSubscriber {
            merge: self.0.clone(),
            id,
        }));
    }

    fn on_error(&self, error: StreamError) {
        self.0.fail(error);
    }

    fn on_complete(&self) {
        {
            let mut state = lock(&self.0.state);
            state.upstream_done = true;
            state.upstream = None;
        }
        self.0.drain();
    }
}

struct InnerSubscriber {
    merge: Arc<Merge>,
    id: usize,
}

impl reactive::Subscriber<Item> for InnerSubscriber {
    fn on_subscribe(&self, subscription: Arc<dyn reactive::Subscription>) {
        {
            let mut state = lock(&self.merge.state);
            if !(state.terminated || state.error.is_some()) {
                state.inners.push((self.id, subscription.clone()));
                drop(state);
                subscription.request(UNBOUNDED);
                return;
            }
        }
        subscription.cancel();
    }

    fn on_next(&self, item: Item) {
        {
            let mut state = lock(&self.merge.state);
            if state.terminated || state.error.is_some() {
                return;
            }
            state.queue.push_back(item);
        }
        self.merge.drain();
    }

    fn on_error(&self, error: StreamError) {
        self.merge.fail(error);
    }

    fn on_complete(&self) {
        {
            let mut state = lock(&self.merge.state);
            state.active = state.active.saturating_sub(1);
            state.inners.retain(|(id, _)| *id != self.id);
        }
        self.merge.drain();
    }
}
