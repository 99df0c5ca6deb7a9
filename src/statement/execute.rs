// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::Statement;
use crate::config::{DelayFallback, Runtime};
use crate::driver::{Callbacks, Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::observability::messages::statement::{
    DeferredExecutionDropped, DeferredExecutionFailed, DelayUnsupported, StatementDeferred, StatementDispatched,
};
use crate::observability::messages::StructuredLog;

/// Fresh context for one execution, instrumented when the runtime asks for it.
fn prepare<O, S>(runtime: &Runtime, statement: &S) -> Result<Context<O>, ProactiveError>
where
    O: Send + 'static,
    S: Statement<O> + ?Sized,
{
    let driver = runtime.driver();
    let context = statement.get(driver)?;
    match &runtime.options().log_category {
        Some(category) => driver.log(context, category),
        None => Ok(context),
    }
}

pub(super) fn dispatch<O, S>(runtime: &Runtime, statement: &S, callbacks: Callbacks<O>) -> Result<(), ProactiveError>
where
    O: Send + 'static,
    S: Statement<O> + ?Sized,
{
    let context = prepare(runtime, statement)?;
    let driver = runtime.driver();
    StatementDispatched {
        statement: statement.name(),
        driver: driver.name(),
    }
    .log();
    driver.subscribe(context, callbacks)
}

pub(super) fn defer<O, S>(
    runtime: &Runtime,
    statement: &S,
    delay: Duration,
    callbacks: Callbacks<O>,
) -> Result<(), ProactiveError>
where
    O: Send + 'static,
    S: Statement<O> + ?Sized,
{
    let driver = runtime.driver();
    let fallback = runtime.options().delay_fallback;

    if !driver.can_schedule() {
        if fallback == DelayFallback::Reject {
            return Err(ProactiveError::SchedulingUnsupported {
                driver: driver.name().to_string(),
            });
        }
        DelayUnsupported {
            statement: statement.name(),
            driver: driver.name(),
            delay,
            fallback: fallback.as_str(),
        }
        .log();
        return dispatch(runtime, statement, callbacks);
    }

    let context = prepare(runtime, statement)?;
    let name = statement.name();
    StatementDeferred {
        statement: name,
        driver: driver.name(),
        delay,
    }
    .log();

    let armed = Arc::new(AtomicBool::new(false));
    let pending = Deferred {
        statement: name,
        driver: driver.clone(),
        work: Some((context, callbacks)),
        armed: armed.clone(),
    };
    driver.schedule(delay, Box::new(move || pending.run()))?;
    armed.store(true, Ordering::Release);
    Ok(())
}

/// A scheduled execution.
///
/// Once the driver has accepted it, dropping it unrun fails its callbacks with
/// `Abandoned`. A rejected schedule is reported to the caller instead.
struct Deferred<O: Send + 'static> {
    statement: &'static str,
    driver: DriverHandle,
    work: Option<(Context<O>, Callbacks<O>)>,
    armed: Arc<AtomicBool>,
}

impl<O: Send + 'static> Deferred<O> {
    fn run(mut self) {
        let Some((context, callbacks)) = self.work.take() else {
            return;
        };
        if let Err(error) = self.driver.subscribe(context, callbacks) {
            DeferredExecutionFailed {
                statement: self.statement,
                error: &error,
            }
            .log();
        }
    }
}

impl<O: Send + 'static> Drop for Deferred<O> {
    fn drop(&mut self) {
        if !self.armed.load(Ordering::Acquire) {
            return;
        }
        if let Some((_, callbacks)) = self.work.take() {
            DeferredExecutionDropped {
                statement: self.statement,
                driver: self.driver.name(),
            }
            .log();
            callbacks.fail(ProactiveError::Abandoned.into_stream_error());
        }
    }
}
