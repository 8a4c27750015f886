// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriber setup for hosts that embed the command.
//!
//! `RUST_LOG` overrides the default filter. Initialization is idempotent:
//! when a global subscriber is already installed it is left alone.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "wallhole_core=info,wallhole_geometry=info,wallhole_processing=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber, JSON lines when `json` is set.
///
/// Returns `false` if another subscriber was already installed.
pub fn init_logging(json: bool) -> bool {
    if json {
        init_json_logger()
    } else {
        init_compact_logger()
    }
}

fn init_compact_logger() -> bool {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

fn init_json_logger() -> bool {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .with_current_span(false),
        )
        .try_init()
        .is_ok()
}
