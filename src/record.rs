//! src/record.rs
//! Structured fields, per-call overrides, and the transient call record.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::site::{CallSite, StackOffset};
use crate::tier::Tier;

/// Ordered mapping of structured field names to rendered values.
///
/// A record always carries a field map; when the caller supplies none the
/// merged map is empty rather than absent, keeping the backend's formatting
/// contract stable.
///
/// # Examples
///
/// ```
/// use tiered_debug::FieldMap;
///
/// let mut fields = FieldMap::new();
/// fields.insert("attempt", 3);
/// fields.insert("peer", "10.0.0.2");
///
/// assert_eq!(fields.get("attempt"), Some("3"));
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMap(BTreeMap<String, String>);

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a field, rendering the value with its `Display` impl.
    ///
    /// Returns the previously rendered value when the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    /// Returns the rendered value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every field from `other` into this map, overwriting duplicates.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Per-call overrides accepted by the emission entry points.
///
/// The default value requests no overrides: the logger's configured default
/// offset applies, the field map is empty, and neither an error chain nor a
/// backtrace is captured.
///
/// # Examples
///
/// ```
/// use tiered_debug::{EmitOptions, FieldMap, StackOffset};
///
/// let mut fields = FieldMap::new();
/// fields.insert("path", "/tmp/a");
///
/// let opts = EmitOptions::new()
///     .with_offset(StackOffset::new(1))
///     .with_fields(fields)
///     .with_backtrace();
/// assert!(opts.capture_backtrace);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EmitOptions {
    /// Frame-skip override; `None` uses the logger's default offset.
    pub offset: Option<StackOffset>,
    /// Structured fields merged into the record; `None` means empty.
    pub fields: Option<FieldMap>,
    /// Pre-resolved call site; bypasses frame resolution entirely.
    pub call_site: Option<CallSite>,
    /// Rendered error chain attached to the record.
    pub error: Option<String>,
    /// Capture and attach a stack trace of the emission point.
    pub capture_backtrace: bool,
}

impl EmitOptions {
    /// Creates options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the frame-skip offset for this call.
    #[must_use]
    pub const fn with_offset(mut self, offset: StackOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attaches structured fields to the record.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Attributes the record to a pre-resolved call site.
    #[must_use]
    pub fn at(mut self, site: CallSite) -> Self {
        self.call_site = Some(site);
        self
    }

    /// Renders `error` and its source chain into the record.
    #[must_use]
    pub fn with_error(mut self, error: &dyn Error) -> Self {
        let mut rendered = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        self.error = Some(rendered);
        self
    }

    /// Requests a captured stack trace on the record.
    #[must_use]
    pub const fn with_backtrace(mut self) -> Self {
        self.capture_backtrace = true;
        self
    }
}

/// Transient record handed to the backend for one emission.
///
/// Constructed per open-gate call and never retained by the core; backends
/// own the record once [`Backend::emit`](crate::Backend::emit) is invoked.
#[derive(Clone, Debug)]
pub struct CallRecord {
    logger: Cow<'static, str>,
    tier: Tier,
    message: String,
    call_site: CallSite,
    offset: StackOffset,
    fields: FieldMap,
    error: Option<String>,
    backtrace: Option<String>,
}

impl CallRecord {
    pub(crate) fn new(
        logger: Cow<'static, str>,
        tier: Tier,
        message: String,
        call_site: CallSite,
        offset: StackOffset,
        fields: FieldMap,
        error: Option<String>,
        backtrace: Option<String>,
    ) -> Self {
        Self {
            logger,
            tier,
            message,
            call_site,
            offset,
            fields,
            error,
            backtrace,
        }
    }

    /// Name of the logger that produced the record.
    #[must_use]
    pub fn logger(&self) -> &str {
        &self.logger
    }

    /// Severity tier of the record.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Formatted message payload.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resolved caller location.
    #[must_use]
    pub const fn call_site(&self) -> &CallSite {
        &self.call_site
    }

    /// Frame-skip hint that was in effect for this emission.
    #[must_use]
    pub const fn offset(&self) -> StackOffset {
        self.offset
    }

    /// Structured fields merged into the record; empty when none were given.
    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Rendered error chain, when one was attached.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Captured stack trace, when one was requested.
    #[must_use]
    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} ({})",
            self.logger, self.tier, self.message, self.call_site
        )?;

        for (key, value) in self.fields.iter() {
            write!(f, " {key}={value}")?;
        }

        if let Some(error) = &self.error {
            write!(f, " error={error}")?;
        }

        Ok(())
    }
}
