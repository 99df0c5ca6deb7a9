// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{equal_to, matching, not_equal_to, truthy, Predicate};
use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::{Statement, Truthy};

/// Wait for the first truthy value of a statement, then complete.
///
/// Completes without a value when the statement never produces one.
pub struct Wait<O: Send + 'static> {
    requirement: Arc<dyn Statement<O>>,
}

impl<O: Send + 'static> Wait<O> {
    pub fn until(requirement: impl Statement<O> + 'static) -> Self {
        Self {
            requirement: Arc::new(requirement),
        }
    }

    /// Wait for the first value matching `predicate` instead.
    pub fn matches(self, predicate: impl Fn(&O) -> bool + Send + Sync + 'static) -> WaitUntil<O> {
        WaitUntil {
            requirement: self.requirement,
            predicate: matching(predicate),
        }
    }

    /// Wait for the first value equal to `expected` instead.
    pub fn is(self, expected: O) -> WaitUntil<O>
    where
        O: PartialEq + Sync,
    {
        WaitUntil {
            requirement: self.requirement,
            predicate: equal_to(expected),
        }
    }

    /// Wait for the first value different from `expected` instead.
    pub fn is_not(self, expected: O) -> WaitUntil<O>
    where
        O: PartialEq + Sync,
    {
        WaitUntil {
            requirement: self.requirement,
            predicate: not_equal_to(expected),
        }
    }
}

impl<O: Truthy + Send + 'static> Statement<O> for Wait<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        let upstream = self.requirement.get(driver)?;
        let predicate = truthy::<O>();
        driver.find(upstream, move |value: &O| predicate(value))
    }

    fn name(&self) -> &'static str {
        "wait"
    }
}

/// Wait for the first value meeting an explicit condition.
pub struct WaitUntil<O: Send + 'static> {
    requirement: Arc<dyn Statement<O>>,
    predicate: Predicate<O>,
}

impl<O: Send + 'static> Statement<O> for WaitUntil<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        let upstream = self.requirement.get(driver)?;
        let predicate = self.predicate.clone();
        driver.find(upstream, move |value: &O| predicate(value))
    }

    fn name(&self) -> &'static str {
        "wait"
    }
}
