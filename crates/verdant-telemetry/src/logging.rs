// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger bootstrap for binaries and tests.

use env_logger::{Builder, Env};

/// Installs the global `env_logger` logger.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` (e.g. `"info"` or
/// `"verdant_bending=debug"`) is used. Calling this more than once is harmless:
/// later calls are ignored.
pub fn init(default_filter: &str) {
    if Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::trace!("Logger already initialized");
    }
}

/// Installs a logger suitable for `cargo test`, capturing output per test.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
