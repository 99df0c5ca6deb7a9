// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{computed, constant, equal_to, matching, not_equal_to, truthy, Predicate, Step};
use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::{Statement, Truthy};

/// Branch on the values of a statement.
///
/// ```
/// use proactive::statement::Statement;
/// use proactive::statements::{Check, The};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let answer = Check::that(The::value(5))
///     .is(5)
///     .then(The::value("yes"))
///     .otherwise(The::value("no"));
///
/// assert_eq!(answer.resolve().await.unwrap(), vec!["yes"]);
/// # }
/// ```
pub struct Check<I: Send + 'static> {
    value: Arc<dyn Statement<I>>,
}

impl<I: Send + 'static> Check<I> {
    pub fn that(statement: impl Statement<I> + 'static) -> Self {
        Self {
            value: Arc::new(statement),
        }
    }

    /// Use `predicate` as the condition.
    pub fn matches(self, predicate: impl Fn(&I) -> bool + Send + Sync + 'static) -> Matches<I> {
        Matches {
            value: self.value,
            predicate: matching(predicate),
        }
    }

    /// Condition: the value equals `expected`.
    pub fn is(self, expected: I) -> Matches<I>
    where
        I: PartialEq + Sync,
    {
        Matches {
            value: self.value,
            predicate: equal_to(expected),
        }
    }

    /// Condition: the value differs from `expected`.
    pub fn is_not(self, expected: I) -> Matches<I>
    where
        I: PartialEq + Sync,
    {
        Matches {
            value: self.value,
            predicate: not_equal_to(expected),
        }
    }

    /// Run `statement` for every truthy value.
    pub fn then<O: Send + 'static>(self, statement: impl Statement<O> + 'static) -> Then<I, O>
    where
        I: Truthy,
    {
        Then::new(self.value, truthy(), constant(statement))
    }

    /// Run the statement built by `step` for every truthy value.
    pub fn then_with<O, S, F>(self, step: F) -> Then<I, O>
    where
        I: Truthy,
        O: Send + 'static,
        S: Statement<O> + 'static,
        F: Fn(I) -> S + Send + Sync + 'static,
    {
        Then::new(self.value, truthy(), computed(step))
    }
}

/// A `Check` with an explicit condition.
pub struct Matches<I: Send + 'static> {
    value: Arc<dyn Statement<I>>,
    predicate: Predicate<I>,
}

impl<I: Send + 'static> Matches<I> {
    /// Run `statement` for every value meeting the condition.
    pub fn then<O: Send + 'static>(self, statement: impl Statement<O> + 'static) -> Then<I, O> {
        Then::new(self.value, self.predicate, constant(statement))
    }

    /// Run the statement built by `step` for every value meeting the condition.
    pub fn then_with<O, S, F>(self, step: F) -> Then<I, O>
    where
        O: Send + 'static,
        S: Statement<O> + 'static,
        F: Fn(I) -> S + Send + Sync + 'static,
    {
        Then::new(self.value, self.predicate, computed(step))
    }
}

struct Branches<I: Send + 'static, O: Send + 'static> {
    value: Arc<dyn Statement<I>>,
    predicate: Predicate<I>,
    then: Step<I, O>,
    otherwise: Option<Step<I, O>>,
}

impl<I: Send + 'static, O: Send + 'static> Branches<I, O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        let upstream = self.value.get(driver)?;
        let predicate = self.predicate.clone();
        let then = self.then.clone();
        let otherwise = self.otherwise.clone();
        let branch_driver = driver.clone();

        driver.flat_map(upstream, move |value: I| {
            let branch = if predicate(&value) {
                Some(&then)
            } else {
                otherwise.as_ref()
            };
            match branch {
                Some(step) => step(value).get(&branch_driver),
                None => Ok(branch_driver.empty()),
            }
        })
    }
}

/// Values meeting the condition run the then-branch; others produce nothing.
pub struct Then<I: Send + 'static, O: Send + 'static> {
    branches: Branches<I, O>,
}

impl<I: Send + 'static, O: Send + 'static> Then<I, O> {
    fn new(value: Arc<dyn Statement<I>>, predicate: Predicate<I>, then: Step<I, O>) -> Self {
        Self {
            branches: Branches {
                value,
                predicate,
                then,
                otherwise: None,
            },
        }
    }

    /// Run `statement` for every value failing the condition.
    pub fn otherwise(self, statement: impl Statement<O> + 'static) -> Otherwise<I, O> {
        self.with_otherwise(constant(statement))
    }

    /// Run the statement built by `step` for every value failing the condition.
    pub fn otherwise_with<S, F>(self, step: F) -> Otherwise<I, O>
    where
        S: Statement<O> + 'static,
        F: Fn(I) -> S + Send + Sync + 'static,
    {
        self.with_otherwise(computed(step))
    }

    fn with_otherwise(self, otherwise: Step<I, O>) -> Otherwise<I, O> {
        Otherwise {
            branches: Branches {
                otherwise: Some(otherwise),
                ..self.branches
            },
        }
    }
}

impl<I: Send + 'static, O: Send + 'static> Statement<O> for Then<I, O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        self.branches.get(driver)
    }

    fn name(&self) -> &'static str {
        "check"
    }
}

/// Every value runs either the then-branch or the otherwise-branch.
pub struct Otherwise<I: Send + 'static, O: Send + 'static> {
    branches: Branches<I, O>,
}

impl<I: Send + 'static, O: Send + 'static> Statement<O> for Otherwise<I, O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        self.branches.get(driver)
    }

    fn name(&self) -> &'static str {
        "check"
    }
}
