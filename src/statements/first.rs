// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::Statement;

/// At most the first value of a statement, then completion.
pub struct First<O: Send + 'static> {
    source: Arc<dyn Statement<O>>,
}

impl<O: Send + 'static> First<O> {
    pub fn of(source: impl Statement<O> + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

impl<O: Send + 'static> Statement<O> for First<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        driver.first(self.source.get(driver)?)
    }

    fn name(&self) -> &'static str {
        "first"
    }
}
