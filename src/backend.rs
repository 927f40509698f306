//! src/backend.rs
//! The backend seam and an in-memory capture backend for tests and batching.

use std::sync::{Mutex, PoisonError};

use crate::record::CallRecord;

/// External structured-logging collaborator that receives open-gate records.
///
/// The core constructs one [`CallRecord`] per emission and hands it over by
/// value; formatting, transport, and handler fan-out are entirely the
/// backend's responsibility. Implementations must not panic: logging calls
/// never abort caller code.
pub trait Backend: Send + Sync {
    /// Consumes one emitted record.
    fn emit(&self, record: CallRecord);
}

/// Backend collecting records in memory until drained.
///
/// Mirrors the collect-then-drain diagnostics pattern used for assertions in
/// tests and for batching records before routing them elsewhere.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tiered_debug::{CaptureBackend, Tier, TieredLogger};
///
/// let backend = Arc::new(CaptureBackend::new());
/// let debug = TieredLogger::new("demo", backend.clone());
///
/// debug.lv1("recorded");
/// let records = backend.drain();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message(), "recorded");
/// assert!(backend.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CaptureBackend {
    records: Mutex<Vec<CallRecord>>,
}

impl CaptureBackend {
    /// Creates an empty capture backend.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Removes and returns all collected records in emission order.
    #[must_use]
    pub fn drain(&self) -> Vec<CallRecord> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *records)
    }

    /// Returns the number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Backend for CaptureBackend {
    fn emit(&self, record: CallRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
