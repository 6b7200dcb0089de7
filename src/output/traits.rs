//! Record sink trait
//!
//! The coordinator hands each finished page's records to a sink exactly once.

use crate::extract::TherapistRecord;
use crate::state::LocalityTarget;
use crate::OutputResult;
use std::path::PathBuf;

/// Destination for extracted records
pub trait RecordSink {
    /// Appends one page worth of records for `target`
    ///
    /// Called even when `records` is empty so the locality's output exists
    /// for every run. Returns the location written to.
    fn append(
        &mut self,
        target: &LocalityTarget,
        records: &[TherapistRecord],
    ) -> OutputResult<PathBuf>;
}
