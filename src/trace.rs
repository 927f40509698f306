//! src/trace.rs
//! BEGIN/END tracing around an operation, attributed to its call site.
//!
//! The tracer emits a BEGIN record before an operation runs and an END record
//! after it finishes. Both records carry the location of the line that
//! invoked the traced operation — where control logically re-enters the
//! caller — never a frame inside the tracer or inside the operation body.
//!
//! END fires unconditionally: it is emitted from a drop guard, so an
//! operation that unwinds still produces its END record. This makes the pair
//! reliable brackets for matching in log output.

use crate::logger::TieredLogger;
use crate::record::{EmitOptions, FieldMap};
use crate::site::{self, CallSite, StackOffset};
use crate::tier::Tier;

/// Configuration for one BEGIN/END pairing.
///
/// BEGIN defaults to [`Tier::Lv2`] and END to [`Tier::Lv3`]; END is commonly
/// the less verbose of the two so completion survives at thresholds where
/// entry chatter is suppressed. The two tiers are independent.
///
/// # Examples
///
/// ```
/// use tiered_debug::{Tier, TraceSpec};
///
/// let spec = TraceSpec::new().with_tiers(Tier::Lv1, Tier::Lv1);
/// assert_eq!(spec.begin, Tier::Lv1);
/// assert_eq!(spec.end, Tier::Lv1);
/// ```
#[derive(Clone, Debug)]
pub struct TraceSpec {
    /// Tier for the BEGIN record.
    pub begin: Tier,
    /// Tier for the END record.
    pub end: Tier,
    /// Additional frames to skip when this tracer is itself wrapped by a
    /// layer that cannot chain `#[track_caller]`. Zero resolves via the
    /// attribute chain; non-zero switches to stack walking.
    pub offset: StackOffset,
    /// Structured fields applied to both BEGIN and END records.
    pub fields: FieldMap,
}

impl TraceSpec {
    /// Creates a spec with the default tiers (BEGIN 2, END 3).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the BEGIN and END tiers.
    #[must_use]
    pub const fn with_tiers(mut self, begin: Tier, end: Tier) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    /// Adds wrapper frames to skip during call-site resolution.
    #[must_use]
    pub const fn with_offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Attaches structured fields to both records.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }
}

impl Default for TraceSpec {
    fn default() -> Self {
        Self {
            begin: Tier::Lv2,
            end: Tier::Lv3,
            offset: StackOffset::ZERO,
            fields: FieldMap::new(),
        }
    }
}

/// Guard emitting the BEGIN record on construction and the END record when
/// dropped, both attributed to the construction site.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tiered_debug::{BeginEndGuard, CaptureBackend, Tier, TieredLogger, TraceSpec};
///
/// let backend = Arc::new(CaptureBackend::new());
/// let debug = TieredLogger::with_threshold("demo", Tier::Lv3, backend.clone());
///
/// {
///     let _span = BeginEndGuard::enter(&debug, "rebuild_index", &TraceSpec::new());
///     // ... traced work ...
/// }
///
/// let records = backend.drain();
/// assert_eq!(records[0].message(), "BEGIN CALL: rebuild_index()");
/// assert_eq!(records[1].message(), "END CALL: rebuild_index()");
/// ```
#[derive(Debug)]
#[must_use = "the END record is emitted when the guard drops"]
pub struct BeginEndGuard<'log> {
    logger: &'log TieredLogger,
    name: String,
    end: Tier,
    site: CallSite,
    fields: FieldMap,
    offset: StackOffset,
}

impl<'log> BeginEndGuard<'log> {
    /// Emits the BEGIN record and arms the END record.
    #[track_caller]
    pub fn enter(logger: &'log TieredLogger, name: &str, spec: &TraceSpec) -> Self {
        let site = if spec.offset == StackOffset::ZERO {
            CallSite::caller()
        } else {
            site::resolve_frames(spec.offset)
        };

        let guard = Self {
            logger,
            name: name.to_string(),
            end: spec.end,
            site,
            fields: spec.fields.clone(),
            offset: spec.offset,
        };
        guard.emit(spec.begin, "BEGIN");
        guard
    }

    fn emit(&self, tier: Tier, phase: &str) {
        let name = &self.name;
        self.logger.log_with_opts(
            tier,
            || format!("{phase} CALL: {name}()"),
            EmitOptions::new()
                .at(self.site.clone())
                .with_offset(self.offset)
                .with_fields(self.fields.clone()),
        );
    }
}

impl Drop for BeginEndGuard<'_> {
    fn drop(&mut self) {
        self.emit(self.end, "END");
    }
}

/// Runs `op` bracketed by BEGIN and END records and returns its result.
///
/// The records are attributed to the line that called `trace_call`. If `op`
/// unwinds, END is still emitted before the unwind continues.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tiered_debug::{CaptureBackend, Tier, TieredLogger, TraceSpec, trace_call};
///
/// let backend = Arc::new(CaptureBackend::new());
/// let debug = TieredLogger::with_threshold("demo", Tier::Lv3, backend.clone());
///
/// let sum = trace_call(&debug, "add", &TraceSpec::new(), || 2 + 2);
/// assert_eq!(sum, 4);
/// assert_eq!(backend.drain().len(), 2);
/// ```
#[track_caller]
pub fn trace_call<R>(
    logger: &TieredLogger,
    name: &str,
    spec: &TraceSpec,
    op: impl FnOnce() -> R,
) -> R {
    let guard = BeginEndGuard::enter(logger, name, spec);
    let result = op();
    drop(guard);
    result
}
