//! Publishing leaderboards.
//!
//! A [`ReportSink`] receives the finished [`Summary`]. [`ReportOutput`]
//! renders it once and mirrors the text to the terminal and an optional
//! report file.

mod jsonl;
mod output;
mod table;

use crate::github::IntakeError;
use crate::summary::Summary;

pub use jsonl::write_events_jsonl;
pub use output::ReportOutput;
pub use table::{NO_DATA, USER_HEADER, render_report, render_table};

/// Destination for the per-repository tables.
pub trait ReportSink {
    /// Publishes the summary's warnings and tables in order.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when the report cannot be written.
    fn publish(&mut self, summary: &Summary) -> Result<(), IntakeError>;
}

/// Converts an I/O error to an [`IntakeError::Io`].
fn io_error(error: &std::io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}
