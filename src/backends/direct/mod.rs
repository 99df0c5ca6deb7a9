// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The built-in driver: synchronous push streams, timers from the ambient tokio runtime.
//!
//! Everything runs on the calling thread. Subscribing to a context built from
//! `just`/`just_all` delivers all of its signals before `subscribe` returns,
//! unless a lifted external publisher emits from elsewhere. Delayed execution
//! uses `tokio::time::sleep` on the current runtime when one is entered.

mod flat_map;
mod operators;
mod source;
mod subscriber;

use std::sync::Arc;
use std::time::Duration;

use linkme::distributed_slice;
use tokio::runtime::Handle;

use crate::driver::{
    Driver, DriverId, DriverRegistration, Item, ItemMapper, ItemPredicate, RawCallbacks, RawContext, ScheduledTask,
    Shape, DRIVERS,
};
use crate::errors::ProactiveError;

use flat_map::FlatMapPublisher;
use operators::{FilterPublisher, LogPublisher};
use source::SourcePublisher;
use subscriber::LambdaSubscriber;

pub const DIRECT_DRIVER_NAME: &str = "direct";

#[distributed_slice(DRIVERS)]
static DIRECT_DRIVER: DriverRegistration = DriverRegistration {
    name: DIRECT_DRIVER_NAME,
    create: create_direct_driver,
};

fn create_direct_driver() -> Arc<dyn Driver> {
    Arc::new(DirectDriver::new())
}

#[derive(Debug)]
pub struct DirectDriver {
    id: DriverId,
}

impl DirectDriver {
    pub fn new() -> Self {
        Self { id: DriverId::next() }
    }
}

impl Default for DirectDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for DirectDriver {
    fn id(&self) -> DriverId {
        self.id
    }

    fn name(&self) -> &str {
        DIRECT_DRIVER_NAME
    }

    fn empty(&self) -> RawContext {
        RawContext::single(self.id, SourcePublisher::shared(None::<Item>))
    }

    fn just(&self, item: Option<Item>) -> RawContext {
        RawContext::single(self.id, SourcePublisher::shared(item))
    }

    fn just_all(&self, items: Vec<Item>) -> RawContext {
        RawContext::multi(self.id, SourcePublisher::shared(items))
    }

    fn filter(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError> {
        Ok(match context.into_shape() {
            Shape::Single(upstream) => RawContext::single(self.id, FilterPublisher::filter(upstream, predicate)),
            Shape::Multi(upstream) => RawContext::multi(self.id, FilterPublisher::filter(upstream, predicate)),
        })
    }

    fn find(&self, context: RawContext, predicate: ItemPredicate) -> Result<RawContext, ProactiveError> {
        Ok(match context.into_shape() {
            Shape::Single(upstream) => RawContext::single(self.id, FilterPublisher::filter(upstream, predicate)),
            Shape::Multi(upstream) => RawContext::single(self.id, FilterPublisher::find(upstream, predicate)),
        })
    }

    fn first(&self, context: RawContext) -> Result<RawContext, ProactiveError> {
        Ok(match context.into_shape() {
            Shape::Single(upstream) => RawContext::single(self.id, upstream),
            Shape::Multi(upstream) => RawContext::single(self.id, FilterPublisher::first(upstream)),
        })
    }

    fn flat_map(&self, context: RawContext, mapper: ItemMapper) -> Result<RawContext, ProactiveError> {
        Ok(RawContext::multi(
            self.id,
            FlatMapPublisher::shared(context.into_publisher(), mapper),
        ))
    }

    fn log(&self, context: RawContext, category: &str) -> Result<RawContext, ProactiveError> {
        Ok(match context.into_shape() {
            Shape::Single(upstream) => RawContext::single(self.id, LogPublisher::shared(upstream, category)),
            Shape::Multi(upstream) => RawContext::multi(self.id, LogPublisher::shared(upstream, category)),
        })
    }

    fn subscribe(&self, context: RawContext, callbacks: RawCallbacks) -> Result<(), ProactiveError> {
        context
            .into_publisher()
            .subscribe(Arc::new(LambdaSubscriber::new(callbacks)));
        Ok(())
    }

    fn can_schedule(&self) -> bool {
        Handle::try_current().is_ok()
    }

    fn schedule(&self, delay: Duration, task: ScheduledTask) -> Result<(), ProactiveError> {
        let handle = Handle::try_current().map_err(|_| ProactiveError::SchedulingUnsupported {
            driver: DIRECT_DRIVER_NAME.to_string(),
        })?;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Ok(())
    }
}
