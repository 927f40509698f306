//! src/sink.rs
//! Line-oriented writer backend for emitted records.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::backend::Backend;
use crate::record::CallRecord;

/// Controls whether a [`RecordSink`] appends a trailing newline per record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Append a newline terminator after each rendered record.
    #[default]
    WithNewline,
    /// Emit the rendered record without a trailing newline.
    WithoutNewline,
}

impl LineMode {
    const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }
}

/// Streaming sink that renders [`CallRecord`] values into an [`io::Write`]
/// target, one line per record by default.
///
/// The writer sits behind a mutex so the sink can serve as a shared
/// [`Backend`]. Write failures inside [`Backend::emit`] are retained rather
/// than swallowed or propagated; [`take_error`](Self::take_error) surfaces
/// the first failure to callers that care, matching the contract that
/// logging calls themselves never raise.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tiered_debug::{RecordSink, Tier, TieredLogger};
///
/// let sink = Arc::new(RecordSink::new(Vec::new()));
/// let debug = TieredLogger::with_threshold("demo", Tier::Lv2, sink.clone());
///
/// debug.lv2("transfer starting");
///
/// drop(debug);
/// let sink = Arc::try_unwrap(sink).expect("sole owner after the logger drops");
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(output.contains("DEBUG2 transfer starting"));
/// assert!(output.ends_with('\n'));
/// ```
#[derive(Debug)]
pub struct RecordSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
    error: Mutex<Option<io::Error>>,
}

impl<W> RecordSink<W> {
    /// Creates a sink that appends a newline after each rendered record.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
            error: Mutex::new(None),
        }
    }

    /// Returns the configured [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Returns exclusive access to the wrapped writer.
    #[must_use]
    pub fn get_mut(&mut self) -> &mut W {
        self.writer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns and clears the first write error observed during emission.
    #[must_use]
    pub fn take_error(&self) -> Option<io::Error> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn record_error(&self, error: io::Error) {
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(error);
        }
    }
}

impl<W> RecordSink<W>
where
    W: Write,
{
    /// Renders a single record to the underlying writer.
    ///
    /// The rendered line carries the logger name, tier prefix, message,
    /// resolved call site, structured fields, and error chain; a captured
    /// stack trace follows on its own lines when present.
    pub fn write_record(&self, record: &CallRecord) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        write!(writer, "{record}")?;
        if let Some(backtrace) = record.backtrace() {
            writeln!(writer)?;
            write!(writer, "{backtrace}")?;
        }
        if self.line_mode.append_newline() {
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl<W> Default for RecordSink<W>
where
    W: Default,
{
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W> Backend for RecordSink<W>
where
    W: Write + Send,
{
    fn emit(&self, record: CallRecord) {
        if let Err(error) = self.write_record(&record) {
            self.record_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::record::FieldMap;
    use crate::site::{CallSite, StackOffset};
    use crate::tier::Tier;

    fn record(tier: Tier, message: &str, backtrace: Option<String>) -> CallRecord {
        CallRecord::new(
            Cow::Borrowed("sinktest"),
            tier,
            message.to_string(),
            CallSite::from_parts("src/job.rs", 9),
            StackOffset::ZERO,
            FieldMap::new(),
            None,
            backtrace,
        )
    }

    #[test]
    fn sink_appends_newlines_by_default() {
        let sink = RecordSink::new(Vec::new());
        sink.emit(record(Tier::Lv1, "one", None));
        sink.emit(record(Tier::Lv2, "two", None));

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("sinktest: DEBUG1 one (src/job.rs:9)"));
        assert_eq!(lines.next(), Some("sinktest: DEBUG2 two (src/job.rs:9)"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn sink_without_newline_preserves_output() {
        let sink = RecordSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
        sink.emit(record(Tier::Lv1, "ready", None));

        let output = sink.into_inner();
        assert_eq!(output, b"sinktest: DEBUG1 ready (src/job.rs:9)".to_vec());
    }

    #[test]
    fn captured_backtrace_follows_on_its_own_lines() {
        let sink = RecordSink::new(Vec::new());
        sink.emit(record(
            Tier::Lv3,
            "with trace",
            Some("frame 0\nframe 1".to_string()),
        ));

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert!(output.starts_with("sinktest: DEBUG3 with trace"));
        assert!(output.contains("\nframe 0\nframe 1\n"));
    }

    #[test]
    fn get_mut_reaches_the_wrapped_writer() {
        let mut sink = RecordSink::new(Vec::new());
        sink.emit(record(Tier::Lv1, "queued", None));

        sink.get_mut().clear();
        sink.emit(record(Tier::Lv2, "after clear", None));

        let output = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert!(output.starts_with("sinktest: DEBUG2 after clear"));
    }

    #[test]
    fn write_failures_are_retained_not_raised() {
        struct FailingWriter;

        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = RecordSink::new(FailingWriter);
        sink.emit(record(Tier::Lv1, "lost", None));

        let error = sink.take_error().expect("first failure retained");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.take_error().is_none());
    }
}
