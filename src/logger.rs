//! src/logger.rs
//! The tiered logger: gate check, call-site resolution, and backend dispatch.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::Backend;
use crate::gate::LevelGate;
use crate::record::{CallRecord, EmitOptions};
use crate::site::{self, CallSite, StackOffset};
use crate::tier::Tier;

/// Named logger gating tiered debug messages and forwarding open-gate calls
/// to a structured-logging backend with caller-accurate attribution.
///
/// Each instance owns its own [`LevelGate`] and default [`StackOffset`];
/// nothing is shared implicitly. Construct one at process start and thread it
/// to consumers by reference or `Arc` — independent instances keep tests and
/// subsystems isolated.
///
/// Every public logging entry point carries `#[track_caller]`, so records are
/// attributed to the line that invoked the logger rather than to any frame
/// inside this crate. Wrapper layers that cannot chain the attribute must
/// instead raise the stack offset they pass down (see
/// [`set_default_offset`](Self::set_default_offset)).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tiered_debug::{CaptureBackend, Tier, TieredLogger};
///
/// let backend = Arc::new(CaptureBackend::new());
/// let debug = TieredLogger::with_threshold("demo", Tier::Lv2, backend.clone());
///
/// debug.lv1("always emitted");
/// debug.lv2("emitted at threshold 2");
/// debug.lv3("suppressed");
///
/// let records = backend.drain();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].logger(), "demo");
/// ```
pub struct TieredLogger {
    name: Cow<'static, str>,
    gate: LevelGate,
    default_offset: AtomicUsize,
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for TieredLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredLogger")
            .field("name", &self.name)
            .field("gate", &self.gate)
            .field("default_offset", &self.default_offset)
            .finish_non_exhaustive()
    }
}

impl TieredLogger {
    /// Creates a logger with the default threshold of [`Tier::Lv1`].
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, backend: Arc<dyn Backend>) -> Self {
        Self::with_threshold(name, Tier::Lv1, backend)
    }

    /// Creates a logger with an explicit initial threshold.
    #[must_use]
    pub fn with_threshold(
        name: impl Into<Cow<'static, str>>,
        threshold: Tier,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            name: name.into(),
            gate: LevelGate::new(threshold),
            default_offset: AtomicUsize::new(StackOffset::ZERO.get()),
            backend,
        }
    }

    /// Returns the logger's identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the gate owning this logger's threshold state.
    #[must_use]
    pub const fn gate(&self) -> &LevelGate {
        &self.gate
    }

    /// Returns the baseline frame-skip applied when a call carries no
    /// explicit offset override.
    #[must_use]
    pub fn default_offset(&self) -> StackOffset {
        StackOffset::new(self.default_offset.load(Ordering::Relaxed))
    }

    /// Replaces the baseline frame-skip.
    ///
    /// Must be updated whenever a new wrapper layer is interposed between
    /// the public call and this logger; a stale value silently misattributes
    /// every record emitted through that path.
    pub fn set_default_offset(&self, offset: StackOffset) {
        self.default_offset.store(offset.get(), Ordering::Relaxed);
    }

    /// Logs `message` at `tier` if the gate is open.
    #[track_caller]
    pub fn log(&self, tier: Tier, message: &str) {
        self.log_with_opts(tier, || message.to_string(), EmitOptions::new());
    }

    /// Logs a lazily formatted message at `tier` if the gate is open.
    ///
    /// The closure is never invoked when the gate is closed, so callers can
    /// defer arbitrarily expensive formatting to the open-gate path.
    #[track_caller]
    pub fn log_with<F>(&self, tier: Tier, message: F)
    where
        F: FnOnce() -> String,
    {
        self.log_with_opts(tier, message, EmitOptions::new());
    }

    /// Logs a lazily formatted message with per-call overrides.
    ///
    /// A closed gate returns immediately: no formatting work, no call-site
    /// resolution, no backend call.
    #[track_caller]
    pub fn log_with_opts<F>(&self, tier: Tier, message: F, opts: EmitOptions)
    where
        F: FnOnce() -> String,
    {
        if !self.gate.is_open(tier) {
            return;
        }
        let caller = CallSite::caller();
        self.dispatch(tier, message(), caller, opts);
    }

    /// Logs a message at tier 1 (emitted under every threshold).
    #[track_caller]
    pub fn lv1(&self, message: &str) {
        self.log(Tier::Lv1, message);
    }

    /// Logs a message at tier 2 (emitted when the threshold is 2 or higher).
    #[track_caller]
    pub fn lv2(&self, message: &str) {
        self.log(Tier::Lv2, message);
    }

    /// Logs a message at tier 3 (emitted when the threshold is 3 or higher).
    #[track_caller]
    pub fn lv3(&self, message: &str) {
        self.log(Tier::Lv3, message);
    }

    /// Logs a message at tier 4 (emitted when the threshold is 4 or higher).
    #[track_caller]
    pub fn lv4(&self, message: &str) {
        self.log(Tier::Lv4, message);
    }

    /// Logs a message at tier 5 (emitted only when the threshold is 5).
    #[track_caller]
    pub fn lv5(&self, message: &str) {
        self.log(Tier::Lv5, message);
    }

    /// Open-gate emission pipeline: resolve the call site, merge fields,
    /// build the record, and hand it to the backend.
    fn dispatch(&self, tier: Tier, message: String, caller: CallSite, opts: EmitOptions) {
        let offset = opts.offset.unwrap_or_else(|| self.default_offset());

        let call_site = if let Some(site) = opts.call_site {
            site
        } else if offset == StackOffset::ZERO {
            caller
        } else {
            site::resolve_frames(offset)
        };

        let fields = opts.fields.unwrap_or_default();
        let backtrace = opts
            .capture_backtrace
            .then(|| format!("{:?}", backtrace::Backtrace::new()));

        self.backend.emit(CallRecord::new(
            self.name.clone(),
            tier,
            message,
            call_site,
            offset,
            fields,
            opts.error,
            backtrace,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CaptureBackend;
    use crate::record::FieldMap;

    fn logger_at(threshold: Tier) -> (TieredLogger, Arc<CaptureBackend>) {
        let backend = Arc::new(CaptureBackend::new());
        let logger = TieredLogger::with_threshold("test", threshold, backend.clone());
        (logger, backend)
    }

    #[test]
    fn open_gate_emits_and_closed_gate_does_not() {
        let (logger, backend) = logger_at(Tier::Lv2);

        logger.lv1("one");
        logger.lv2("two");
        logger.lv3("three");
        logger.lv4("four");
        logger.lv5("five");

        let records = backend.drain();
        let messages: Vec<_> = records.iter().map(CallRecord::message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn suppressed_call_never_runs_the_formatting_closure() {
        let (logger, backend) = logger_at(Tier::Lv1);

        logger.log_with(Tier::Lv5, || -> String {
            panic!("formatting must be deferred past the gate")
        });

        assert!(backend.is_empty());
    }

    #[test]
    fn records_are_attributed_to_the_invoking_line() {
        let (logger, backend) = logger_at(Tier::Lv5);

        let expected = line!() + 1;
        logger.lv3("attributed");

        let records = backend.drain();
        assert_eq!(records[0].call_site().line(), expected);
        assert!(records[0].call_site().file().ends_with("logger.rs"));
    }

    #[test]
    fn explicit_call_site_override_wins() {
        let (logger, backend) = logger_at(Tier::Lv1);

        logger.log_with_opts(
            Tier::Lv1,
            || "pinned".to_string(),
            EmitOptions::new().at(CallSite::from_parts("src/other.rs", 77)),
        );

        let records = backend.drain();
        assert_eq!(records[0].call_site().to_string(), "src/other.rs:77");
    }

    #[test]
    fn missing_fields_become_an_empty_map() {
        let (logger, backend) = logger_at(Tier::Lv1);
        logger.lv1("bare");

        let records = backend.drain();
        assert!(records[0].fields().is_empty());
    }

    #[test]
    fn supplied_fields_reach_the_backend() {
        let (logger, backend) = logger_at(Tier::Lv1);

        let mut fields = FieldMap::new();
        fields.insert("bytes", 1024);
        logger.log_with_opts(
            Tier::Lv1,
            || "with fields".to_string(),
            EmitOptions::new().with_fields(fields),
        );

        let records = backend.drain();
        assert_eq!(records[0].fields().get("bytes"), Some("1024"));
    }

    #[test]
    fn default_offset_is_read_back_and_recorded() {
        let (logger, backend) = logger_at(Tier::Lv1);
        assert_eq!(logger.default_offset(), StackOffset::ZERO);

        logger.set_default_offset(StackOffset::new(1));
        assert_eq!(logger.default_offset(), StackOffset::new(1));

        logger.lv1("offset recorded");
        let records = backend.drain();
        assert_eq!(records[0].offset(), StackOffset::new(1));
    }

    #[test]
    fn oversized_offset_degrades_to_unknown_location() {
        let (logger, backend) = logger_at(Tier::Lv1);

        logger.log_with_opts(
            Tier::Lv1,
            || "deep".to_string(),
            EmitOptions::new().with_offset(StackOffset::new(10_000)),
        );

        let records = backend.drain();
        assert!(records[0].call_site().is_unknown());
    }

    #[test]
    fn requested_backtrace_is_attached() {
        let (logger, backend) = logger_at(Tier::Lv1);

        logger.log_with_opts(
            Tier::Lv1,
            || "traced".to_string(),
            EmitOptions::new().with_backtrace(),
        );

        let records = backend.drain();
        assert!(records[0].backtrace().is_some());
    }

    #[test]
    fn logger_identity_reaches_every_record() {
        let backend = Arc::new(CaptureBackend::new());
        let first = TieredLogger::new("alpha", backend.clone());
        let second = TieredLogger::new("beta", backend.clone());

        first.lv1("from alpha");
        second.lv1("from beta");

        let records = backend.drain();
        assert_eq!(records[0].logger(), "alpha");
        assert_eq!(records[1].logger(), "beta");
    }

    #[test]
    fn scoped_threshold_applies_to_logger_calls() {
        let (logger, backend) = logger_at(Tier::Lv2);

        {
            let _raised = logger.gate().scoped(Tier::Lv5);
            logger.lv5("inside scope");
        }
        logger.lv5("outside scope");

        let records = backend.drain();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message(), "inside scope");
    }
}
