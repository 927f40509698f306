//! src/tracing_bridge.rs
//! Bridge forwarding emitted records to the `tracing` ecosystem.
//!
//! [`TracingBackend`] turns every open-gate [`CallRecord`] into a `tracing`
//! debug event carrying the logger name, tier, call site, and rendered
//! fields. The tiered gate stays authoritative: suppressed tiers never reach
//! `tracing` at all, and whatever subscriber is installed handles formatting
//! and fan-out from there.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tiered_debug::{TieredLogger, Tier, TracingBackend, init_tracing};
//!
//! init_tracing();
//! let debug = TieredLogger::with_threshold("app", Tier::Lv3, Arc::new(TracingBackend::new()));
//! debug.lv2("visible through the tracing subscriber");
//! ```

use tracing::Level;

use crate::backend::Backend;
use crate::record::CallRecord;

/// Backend forwarding records as `tracing` debug events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingBackend;

impl TracingBackend {
    /// Creates the bridge backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for TracingBackend {
    fn emit(&self, record: CallRecord) {
        let fields = record
            .fields()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!(
            logger = record.logger(),
            tier = record.tier().get(),
            location = %record.call_site(),
            fields = %fields,
            error = record.error().unwrap_or(""),
            "{} {}",
            record.tier(),
            record.message(),
        );
    }
}

/// Installs a formatting subscriber suitable for tiered debug output.
///
/// Enables events down to [`Level::DEBUG`], which covers every record the
/// bridge emits. Panics if a global subscriber is already installed, matching
/// the `tracing-subscriber` convention for process-wide initialisation.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();
}

/// Installs a formatting subscriber filtered by the given [`EnvFilter`].
///
/// Combines environment-driven filtering (for example `RUST_LOG`) with the
/// tiered gate; the gate still decides first, the filter prunes afterwards.
///
/// [`EnvFilter`]: tracing_subscriber::EnvFilter
pub fn init_tracing_with_filter(filter: tracing_subscriber::EnvFilter) {
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
