// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::type_name;
use std::sync::Arc;

use super::context::{unerase, Item};
use crate::observability::messages::{signal::ValueTypeMismatch, StructuredLog};
use crate::streams::StreamError;

/// Signal handlers for one execution of a statement.
///
/// Any subset may be supplied; a missing handler ignores its signal.
///
/// # Example
/// ```
/// use proactive::driver::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .on_next(|value: i32| println!("value = {}", value))
///     .on_error(|error| eprintln!("failed: {}", error))
///     .on_complete(|| println!("done"));
/// # drop(callbacks);
/// ```
pub struct Callbacks<T> {
    on_next: Option<Arc<dyn Fn(T) + Send + Sync>>,
    on_error: Option<Arc<dyn Fn(StreamError) + Send + Sync>>,
    on_complete: Option<Arc<dyn Fn() + Send + Sync>>,
    on_subscribe: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_next: None,
            on_error: None,
            on_complete: None,
            on_subscribe: None,
        }
    }
}

impl<T> Clone for Callbacks<T> {
    fn clone(&self) -> Self {
        Self {
            on_next: self.on_next.clone(),
            on_error: self.on_error.clone(),
            on_complete: self.on_complete.clone(),
            on_subscribe: self.on_subscribe.clone(),
        }
    }
}

impl<T: Send + 'static> Callbacks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle each value as it arrives.
    pub fn on_next(mut self, handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        self.on_next = Some(Arc::new(handler));
        self
    }

    /// Handle the error signal, if it occurs.
    pub fn on_error(mut self, handler: impl Fn(StreamError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Handle the completion signal, if it occurs.
    pub fn on_complete(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(handler));
        self
    }

    /// Handle the subscription signal.
    pub fn on_subscribe(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_subscribe = Some(Arc::new(handler));
        self
    }

    /// Deliver `error` to the error handler, if any, without a subscription.
    pub(crate) fn fail(&self, error: StreamError) {
        if let Some(handler) = &self.on_error {
            handler(error);
        }
    }

    pub(crate) fn into_raw(self) -> RawCallbacks {
        let on_next = self.on_next.map(|handler| {
            let erased: Arc<dyn Fn(Item) + Send + Sync> = Arc::new(move |item: Item| match unerase::<T>(item) {
                Ok(value) => handler(value),
                Err(_) => ValueTypeMismatch {
                    expected: type_name::<T>(),
                }
                .log(),
            });
            erased
        });

        RawCallbacks {
            on_next,
            on_error: self.on_error,
            on_complete: self.on_complete,
            on_subscribe: self.on_subscribe,
        }
    }
}

/// Type-erased signal handlers handed to [`Driver::subscribe`](super::Driver::subscribe).
#[derive(Clone, Default)]
pub struct RawCallbacks {
    pub on_next: Option<Arc<dyn Fn(Item) + Send + Sync>>,
    pub on_error: Option<Arc<dyn Fn(StreamError) + Send + Sync>>,
    pub on_complete: Option<Arc<dyn Fn() + Send + Sync>>,
    pub on_subscribe: Option<Arc<dyn Fn() + Send + Sync>>,
}
