// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::Statement;

/// A statement whose context is instrumented with the driver's `log`.
///
/// Built with [`StatementExt::logged`](crate::statement::StatementExt::logged).
pub struct Logged<O: Send + 'static> {
    inner: Arc<dyn Statement<O>>,
    category: String,
}

impl<O: Send + 'static> Logged<O> {
    pub fn new(inner: impl Statement<O> + 'static, category: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(inner),
            category: category.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl<O: Send + 'static> Statement<O> for Logged<O> {
    fn get(&self, driver: &DriverHandle) -> Result<Context<O>, ProactiveError> {
        driver.log(self.inner.get(driver)?, &self.category)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
