//! Test setup and layer fixtures shared by unit and integration tests

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{RawLayer, UNTAGGED_SENTINEL};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Deterministic 64 character hex identifier derived from `name`.
pub fn layer_id(name: &str) -> String {
    let hex: String = name.bytes().map(|b| format!("{:02x}", b)).collect();
    format!("{:0<64}", hex).chars().take(64).collect()
}

/// Engine record for `name` below `parent` (empty for base layers).
///
/// No tags yield the engine's untagged sentinel, like the engine reports it.
pub fn record(name: &str, parent: &str, tags: &[&str], size: u64) -> RawLayer {
    let parent_id = if parent.is_empty() {
        String::new()
    } else {
        layer_id(parent)
    };
    let tags: Vec<&str> = if tags.is_empty() {
        vec![UNTAGGED_SENTINEL]
    } else {
        tags.to_vec()
    };
    RawLayer::new(layer_id(name), parent_id)
        .with_tags(tags)
        .with_size(size)
}

/// `base` (tagged, 0 B) <- `mid` (untagged, 1 KiB) <- `app` (tagged, 1 MiB).
pub fn three_layer_chain() -> Vec<RawLayer> {
    vec![
        record("base", "", &["base"], 0),
        record("mid", "base", &[], 1024),
        record("app", "mid", &["app"], 1024 * 1024),
    ]
}
