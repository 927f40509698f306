//! src/macros.rs
//! Convenience macros for tiered logging with deferred formatting.
//!
//! The macros expand the gate check ahead of `format!`, so a suppressed tier
//! performs no formatting work at all. Call-site capture uses `file!()` and
//! `line!()`, which resolve to the macro invocation, keeping attribution on
//! the caller's line.

/// Logs a formatted message at an arbitrary tier.
///
/// # Example
/// ```ignore
/// tiered_log!(debug, Tier::Lv2, "copied {} files", count);
/// ```
#[macro_export]
macro_rules! tiered_log {
    ($logger:expr, $tier:expr, $($arg:tt)*) => {{
        let logger = &$logger;
        let tier = $tier;
        if logger.gate().is_open(tier) {
            logger.log_with_opts(
                tier,
                || ::std::format!($($arg)*),
                $crate::EmitOptions::new().at($crate::call_site!()),
            );
        }
    }};
}

/// Logs a formatted message at tier 1 (emitted under every threshold).
///
/// # Example
/// ```ignore
/// lv1!(debug, "session {} opened", id);
/// ```
#[macro_export]
macro_rules! lv1 {
    ($logger:expr, $($arg:tt)*) => {
        $crate::tiered_log!($logger, $crate::Tier::Lv1, $($arg)*)
    };
}

/// Logs a formatted message at tier 2.
///
/// # Example
/// ```ignore
/// lv2!(debug, "negotiated protocol {}", version);
/// ```
#[macro_export]
macro_rules! lv2 {
    ($logger:expr, $($arg:tt)*) => {
        $crate::tiered_log!($logger, $crate::Tier::Lv2, $($arg)*)
    };
}

/// Logs a formatted message at tier 3.
///
/// # Example
/// ```ignore
/// lv3!(debug, "scanning {}", path);
/// ```
#[macro_export]
macro_rules! lv3 {
    ($logger:expr, $($arg:tt)*) => {
        $crate::tiered_log!($logger, $crate::Tier::Lv3, $($arg)*)
    };
}

/// Logs a formatted message at tier 4.
///
/// # Example
/// ```ignore
/// lv4!(debug, "block {} checksum {}", index, sum);
/// ```
#[macro_export]
macro_rules! lv4 {
    ($logger:expr, $($arg:tt)*) => {
        $crate::tiered_log!($logger, $crate::Tier::Lv4, $($arg)*)
    };
}

/// Logs a formatted message at tier 5 (the most detailed tier).
///
/// # Example
/// ```ignore
/// lv5!(debug, "raw frame: {:02x?}", bytes);
/// ```
#[macro_export]
macro_rules! lv5 {
    ($logger:expr, $($arg:tt)*) => {
        $crate::tiered_log!($logger, $crate::Tier::Lv5, $($arg)*)
    };
}

/// Builds a [`FieldMap`](crate::FieldMap) from `key => value` pairs.
///
/// Values are rendered with their `Display` impl at construction time.
///
/// # Example
/// ```
/// use tiered_debug::fields;
///
/// let fields = fields! { "attempt" => 2, "peer" => "10.0.0.2" };
/// assert_eq!(fields.get("attempt"), Some("2"));
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::FieldMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::FieldMap::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::backend::CaptureBackend;
    use crate::logger::TieredLogger;
    use crate::tier::Tier;

    fn logger_at(threshold: Tier) -> (TieredLogger, Arc<CaptureBackend>) {
        let backend = Arc::new(CaptureBackend::new());
        let logger = TieredLogger::with_threshold("macros", threshold, backend.clone());
        (logger, backend)
    }

    fn explode() -> String {
        panic!("format arguments must not be evaluated for suppressed tiers")
    }

    #[test]
    fn tier_macros_respect_the_gate() {
        let (logger, backend) = logger_at(Tier::Lv3);

        lv1!(logger, "one");
        lv2!(logger, "two {}", 2);
        lv3!(logger, "three");
        lv4!(logger, "four");
        lv5!(logger, "five");

        let records = backend.drain();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].message(), "two 2");
        assert_eq!(records[2].tier(), Tier::Lv3);
    }

    #[test]
    fn suppressed_macro_arguments_are_never_evaluated() {
        let (logger, backend) = logger_at(Tier::Lv1);

        lv5!(logger, "{}", explode());
        lv4!(logger, "{}", explode());

        assert!(backend.is_empty());
    }

    #[test]
    fn macro_records_attribute_to_the_invocation_line() {
        let (logger, backend) = logger_at(Tier::Lv5);

        let expected = line!() + 1;
        lv2!(logger, "here");

        let records = backend.drain();
        assert_eq!(records[0].call_site().line(), expected);
        assert!(records[0].call_site().file().ends_with("macros.rs"));
    }

    #[test]
    fn fields_macro_builds_ordered_maps() {
        let fields = fields! { "b" => 2, "a" => 1 };
        let collected: Vec<_> = fields.iter().collect();
        assert_eq!(collected, vec![("a", "1"), ("b", "2")]);

        let empty = fields! {};
        assert!(empty.is_empty());
    }

    #[test]
    fn tiered_log_accepts_runtime_tiers() {
        let (logger, backend) = logger_at(Tier::Lv2);

        let tier = Tier::new(2).expect("valid");
        tiered_log!(logger, tier, "runtime tier {}", tier.get());

        let records = backend.drain();
        assert_eq!(records[0].message(), "runtime tier 2");
    }
}
