// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The statement vocabulary.
//!
//! Each combinator holds its child statements and composes their contexts
//! with driver operations when executed:
//!
//! | Statement | Execution |
//! |-----------|-----------|
//! | [`Check`] → [`Then`] / [`Otherwise`] | `flat_map` into the matching branch, `empty` when none |
//! | [`Wait`] / [`WaitUntil`] | `find` the first value matching the condition |
//! | [`Try`] → [`TryThen`] | `flat_map` each value into the next stage |
//! | [`First`] | `first` |
//! | [`The`] | `just`, `just_all` or a lifted publisher |
//! | [`Logged`] | `log` |

mod check;
mod first;
mod logged;
mod the;
mod try_then;
mod wait;

#[cfg(test)]
mod integration_tests;

use std::sync::Arc;

use crate::statement::{Statement, Truthy};

pub use check::{Check, Matches, Otherwise, Then};
pub use first::First;
pub use logged::Logged;
pub use the::The;
pub use try_then::{Try, TryThen};
pub use wait::{Wait, WaitUntil};

/// Condition over a borrowed value.
pub(crate) type Predicate<I> = Arc<dyn Fn(&I) -> bool + Send + Sync>;

/// Chooses the statement to run for an upstream value.
pub(crate) type Step<I, O> = Arc<dyn Fn(I) -> Arc<dyn Statement<O>> + Send + Sync>;

pub(crate) fn truthy<I: Truthy>() -> Predicate<I> {
    Arc::new(|value: &I| value.is_truthy())
}

pub(crate) fn equal_to<I>(expected: I) -> Predicate<I>
where
    I: PartialEq + Send + Sync + 'static,
{
    Arc::new(move |value: &I| *value == expected)
}

pub(crate) fn not_equal_to<I>(expected: I) -> Predicate<I>
where
    I: PartialEq + Send + Sync + 'static,
{
    Arc::new(move |value: &I| *value != expected)
}

pub(crate) fn matching<I>(predicate: impl Fn(&I) -> bool + Send + Sync + 'static) -> Predicate<I> {
    Arc::new(predicate)
}

/// Always the same statement, whatever the value.
pub(crate) fn constant<I, O, S>(statement: S) -> Step<I, O>
where
    O: Send + 'static,
    S: Statement<O> + 'static,
{
    let statement: Arc<dyn Statement<O>> = Arc::new(statement);
    Arc::new(move |_| statement.clone())
}

/// A statement built from the value.
pub(crate) fn computed<I, O, S, F>(step: F) -> Step<I, O>
where
    O: Send + 'static,
    S: Statement<O> + 'static,
    F: Fn(I) -> S + Send + Sync + 'static,
{
    Arc::new(move |value| Arc::new(step(value)) as Arc<dyn Statement<O>>)
}
