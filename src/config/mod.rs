// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;

pub use loader::{load_config, Config, DelayFallback, ExecutionOptions};
pub use runtime::Runtime;
