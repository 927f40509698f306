//! src/site.rs
//! Caller location capture and stack-frame resolution.
//!
//! Two mechanisms produce a [`CallSite`]:
//!
//! - [`CallSite::caller`] uses the `#[track_caller]` intrinsic. It is free at
//!   runtime and is the mechanism of choice whenever every wrapper layer
//!   between the public API and the capture point carries the attribute.
//! - [`resolve_frames`] walks the live stack with the `backtrace` crate,
//!   skipping this crate's own frames plus a caller-supplied [`StackOffset`].
//!   It is the fallback for composition layers that cannot chain
//!   `#[track_caller]`, such as boxed closures.
//!
//! Resolution never fails loudly: when the requested offset exceeds the
//! resolvable stack depth, or symbols are unavailable, the result is
//! [`CallSite::unknown`]. A debug-logging facility must not abort caller code
//! because of its own introspection limits.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Placeholder path reported when a caller location cannot be resolved.
const UNKNOWN_FILE: &str = "<unknown>";

/// Number of stack frames to skip when resolving a caller location.
///
/// Every wrapper layer interposed between the public logging call and the
/// emission path adds one frame. Layers that cannot propagate
/// `#[track_caller]` must account for themselves by incrementing the offset
/// they pass down; a stale offset silently misattributes every record, which
/// is the central hazard of composing wrappers around the logger.
#[doc(alias = "stacklevel")]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackOffset(usize);

impl StackOffset {
    /// Offset of zero: attribute the record to the immediate caller.
    pub const ZERO: Self = Self(0);

    /// Creates an offset skipping `frames` caller frames.
    #[must_use]
    pub const fn new(frames: usize) -> Self {
        Self(frames)
    }

    /// Returns the number of frames to skip.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns this offset deepened by `frames` additional wrapper frames.
    #[must_use]
    pub const fn saturating_add(self, frames: usize) -> Self {
        Self(self.0.saturating_add(frames))
    }
}

impl fmt::Display for StackOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

/// Resolved source location a record is attributed to.
///
/// # Examples
///
/// ```
/// use tiered_debug::CallSite;
///
/// let site = CallSite::caller();
/// assert!(site.file().ends_with(".rs"));
/// assert!(site.line() > 0);
/// assert!(!site.is_unknown());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
}

impl CallSite {
    /// Captures the location of the calling code.
    ///
    /// Propagates through any chain of `#[track_caller]` functions, so a
    /// wrapper that carries the attribute is transparent to attribution.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }

    /// Creates a call site from macro-captured parts.
    #[must_use]
    pub const fn from_parts(file: &'static str, line: u32) -> Self {
        Self {
            file: Cow::Borrowed(file),
            line,
        }
    }

    /// Returns the well-formed placeholder used when resolution fails.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: 0,
        }
    }

    /// Returns true when this is the unresolved placeholder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE && self.line == 0
    }

    /// Returns the source file path.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number, or 0 for the unknown placeholder.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    fn resolved(file: String, line: u32) -> Self {
        Self {
            file: Cow::Owned(file),
            line,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str(UNKNOWN_FILE)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// Macro helper that captures the current source location.
///
/// # Examples
///
/// ```
/// use tiered_debug::{CallSite, call_site};
///
/// let site: CallSite = call_site!();
/// assert!(site.file().ends_with(".rs"));
/// assert!(site.line() > 0);
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::from_parts(file!(), line!())
    };
}

/// Resolves the caller location `offset` resolvable frames above this crate.
///
/// Frames belonging to this crate and to the unwinding machinery are skipped
/// before counting; frames without file and line information do not consume
/// the offset. Returns [`CallSite::unknown`] when the offset exceeds the
/// resolvable stack depth.
#[must_use]
pub fn resolve_frames(offset: StackOffset) -> CallSite {
    let mut remaining = offset.get();
    let mut found: Option<CallSite> = None;

    backtrace::trace(|frame| {
        let mut keep_going = true;
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            if symbol_is_internal(symbol) {
                return;
            }
            let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                return;
            };
            if remaining == 0 {
                found = Some(CallSite::resolved(file.display().to_string(), line));
                keep_going = false;
            } else {
                remaining -= 1;
            }
        });
        keep_going
    });

    found.unwrap_or_else(CallSite::unknown)
}

fn symbol_is_internal(symbol: &backtrace::Symbol) -> bool {
    symbol.name().is_some_and(|name| {
        let name = name.to_string();
        name.contains("tiered_debug::")
            || name.starts_with("backtrace::")
            || name.starts_with("std::backtrace")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_reports_this_file() {
        let site = CallSite::caller();
        assert!(site.file().ends_with("site.rs"));
        assert!(site.line() > 0);
        assert!(!site.is_unknown());
    }

    #[test]
    fn caller_propagates_through_tracked_wrappers() {
        #[track_caller]
        fn tracked() -> CallSite {
            CallSite::caller()
        }

        let expected = line!() + 1;
        let site = tracked();
        assert_eq!(site.line(), expected);
        assert!(site.file().ends_with("site.rs"));
    }

    #[test]
    fn unknown_placeholder_is_well_formed() {
        let site = CallSite::unknown();
        assert!(site.is_unknown());
        assert_eq!(site.line(), 0);
        assert_eq!(site.to_string(), "<unknown>");
    }

    #[test]
    fn display_joins_file_and_line() {
        let site = CallSite::from_parts("src/lib.rs", 42);
        assert_eq!(site.to_string(), "src/lib.rs:42");
    }

    #[test]
    fn call_site_macro_captures_invocation_line() {
        let expected = line!() + 1;
        let site = call_site!();
        assert_eq!(site.line(), expected);
        assert!(site.file().ends_with("site.rs"));
    }

    #[test]
    fn resolve_frames_past_stack_depth_degrades_to_unknown() {
        let site = resolve_frames(StackOffset::new(10_000));
        assert!(site.is_unknown());
    }

    #[test]
    fn resolve_frames_never_panics_at_zero_offset() {
        // Symbol availability varies by platform and build; only the
        // no-panic, well-formed-result contract is asserted here.
        let site = resolve_frames(StackOffset::ZERO);
        let rendered = site.to_string();
        assert!(!rendered.is_empty());
    }

    #[test]
    fn offsets_compose_with_saturation() {
        let offset = StackOffset::new(usize::MAX).saturating_add(2);
        assert_eq!(offset.get(), usize::MAX);
        assert_eq!(StackOffset::ZERO.saturating_add(3), StackOffset::new(3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn call_site_serde_round_trip() {
        let site = CallSite::from_parts("src/lib.rs", 7);
        let json = serde_json::to_string(&site).expect("serialize");
        let decoded: CallSite = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, site);
    }
}
