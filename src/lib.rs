#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `tiered-debug` provides leveled debug dispatch on top of a host logging
//! facility. Messages carry an integer severity tier in `1..=5`; a
//! [`LevelGate`] holds the active threshold and forwards a message iff its
//! tier is at or below that threshold. [`TieredLogger`] wraps the gate
//! decision with caller-accurate attribution and hands each open-gate call to
//! an external [`Backend`], which owns formatting, transport, and handler
//! fan-out. A BEGIN/END tracer ([`trace_call`], [`BeginEndGuard`]) brackets
//! arbitrary operations with paired records attributed to the operation's
//! call site.
//!
//! # Design
//!
//! - **Strict validation, no clamping.** A [`Tier`] exists only in `1..=5`;
//!   out-of-range values fail at construction with [`TierRangeError`] and
//!   never mutate gate state.
//! - **Lazy formatting.** The closure and macro entry points defer all
//!   formatting work past the gate check; a suppressed tier costs one atomic
//!   load and an integer comparison.
//! - **Caller-accurate attribution.** Public entry points carry
//!   `#[track_caller]`, so records point at the invoking line. Wrapper layers
//!   that cannot chain the attribute account for themselves through
//!   [`StackOffset`]; the stack-walking fallback ([`resolve_frames`]) covers
//!   that path and degrades to [`CallSite::unknown`] rather than failing.
//! - **Explicit instances.** There is no global logger; construct a
//!   [`TieredLogger`] once and thread it to consumers by reference or `Arc`.
//!
//! # Invariants
//!
//! - The threshold is always a valid [`Tier`]; failed validation leaves the
//!   prior value untouched.
//! - Scoped threshold changes restore the enclosing value on every exit path,
//!   including unwinding, and nest correctly.
//! - A record always carries a [`FieldMap`]; absent fields mean an empty map,
//!   never a missing value.
//! - Logging calls never panic and never return errors for expected
//!   conditions (suppressed tier, unresolvable location).
//!
//! # Errors
//!
//! The only fallible surface is validation: [`Tier::new`] (and `TryFrom<u8>`)
//! reject values outside `1..=5` with [`TierRangeError`]. Backend write
//! failures stay inside the backend; [`RecordSink`] retains the first failure
//! for inspection via [`RecordSink::take_error`].
//!
//! # Examples
//!
//! Gate tiered messages and inspect what reached the backend:
//!
//! ```
//! use std::sync::Arc;
//! use tiered_debug::{CaptureBackend, Tier, TieredLogger, lv2, lv4};
//!
//! let backend = Arc::new(CaptureBackend::new());
//! let debug = TieredLogger::with_threshold("app", Tier::Lv2, backend.clone());
//!
//! debug.lv1("always emitted");
//! lv2!(debug, "copied {} files", 3);
//! lv4!(debug, "suppressed: threshold is {}", debug.gate().threshold());
//!
//! let records = backend.drain();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].message(), "copied 3 files");
//! ```
//!
//! Raise the threshold for one span and trace an operation:
//!
//! ```
//! use std::sync::Arc;
//! use tiered_debug::{CaptureBackend, Tier, TieredLogger, TraceSpec, trace_call};
//!
//! let backend = Arc::new(CaptureBackend::new());
//! let debug = TieredLogger::new("app", backend.clone());
//!
//! {
//!     let _verbose = debug.gate().scoped(Tier::Lv3);
//!     let total = trace_call(&debug, "merge", &TraceSpec::new(), || 40 + 2);
//!     assert_eq!(total, 42);
//! }
//! assert_eq!(debug.gate().threshold(), Tier::Lv1);
//!
//! let messages: Vec<_> = backend.drain();
//! assert_eq!(messages[0].message(), "BEGIN CALL: merge()");
//! assert_eq!(messages[1].message(), "END CALL: merge()");
//! ```
//!
//! # See also
//!
//! - [`RecordSink`] to stream rendered records into any [`std::io::Write`]
//!   target.
//! - The `tracing` feature for forwarding records into the `tracing`
//!   ecosystem.

mod backend;
mod gate;
mod logger;
mod macros;
mod record;
mod sink;
mod site;
mod tier;
mod trace;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use backend::{Backend, CaptureBackend};
pub use gate::{LevelGate, ThresholdGuard};
pub use logger::TieredLogger;
pub use record::{CallRecord, EmitOptions, FieldMap};
pub use sink::{LineMode, RecordSink};
pub use site::{CallSite, StackOffset, resolve_frames};
pub use tier::{Tier, TierRangeError};
pub use trace::{BeginEndGuard, TraceSpec, trace_call};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{TracingBackend, init_tracing, init_tracing_with_filter};
