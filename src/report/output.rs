//! Mirroring the rendered report to the terminal and a file.

use std::io::{self, Stderr, Stdout, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::info;

use crate::events::EventRecord;
use crate::github::IntakeError;
use crate::summary::Summary;

use super::jsonl::write_events_jsonl;
use super::table::render_report;
use super::{ReportSink, io_error};

/// Sends the report to the terminal, a file, or both.
///
/// The terminal receives the report when `print_to_terminal` is set or when
/// no output file is configured, so a run never finishes silently. The file
/// is overwritten on every publish. Event dumps go to the separate
/// diagnostics writer so they never mix with the report.
pub struct ReportOutput<W: Write = Stdout, D: Write = Stderr> {
    terminal: W,
    diagnostics: D,
    output_file: Option<Utf8PathBuf>,
    print_to_terminal: bool,
}

impl ReportOutput<Stdout, Stderr> {
    /// Output that reports on standard output and dumps events to standard
    /// error.
    #[must_use]
    pub fn stdout(output_file: Option<Utf8PathBuf>, print_to_terminal: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), output_file, print_to_terminal)
    }
}

impl<W: Write, D: Write> ReportOutput<W, D> {
    /// Output writing the report to `terminal` and event dumps to
    /// `diagnostics`.
    pub const fn new(
        terminal: W,
        diagnostics: D,
        output_file: Option<Utf8PathBuf>,
        print_to_terminal: bool,
    ) -> Self {
        Self {
            terminal,
            diagnostics,
            output_file,
            print_to_terminal,
        }
    }

    /// Writes `events` as JSON Lines to the diagnostics writer.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Io`] when the events cannot be written.
    pub fn dump_events(&mut self, events: &[EventRecord]) -> Result<(), IntakeError> {
        write_events_jsonl(&mut self.diagnostics, events)?;
        self.diagnostics.flush().map_err(|e| io_error(&e))
    }

    /// Consumes the output, returning the terminal and diagnostics writers.
    pub fn into_writers(self) -> (W, D) {
        (self.terminal, self.diagnostics)
    }

    const fn writes_terminal(&self) -> bool {
        self.print_to_terminal || self.output_file.is_none()
    }
}

impl<W: Write, D: Write> ReportSink for ReportOutput<W, D> {
    fn publish(&mut self, summary: &Summary) -> Result<(), IntakeError> {
        let rendered = render_report(summary);

        if self.writes_terminal() {
            writeln!(self.terminal, "{rendered}").map_err(|e| io_error(&e))?;
            self.terminal.flush().map_err(|e| io_error(&e))?;
        }

        if let Some(path) = self.output_file.as_deref() {
            write_report_file(path, &rendered)?;
            info!(path = %path, "Report saved to {path}");
        }
        Ok(())
    }
}

fn write_report_file(path: &Utf8Path, rendered: &str) -> Result<(), IntakeError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| IntakeError::Io {
        message: format!("invalid report path '{path}': no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| IntakeError::Io {
        message: format!("failed to open report directory '{parent}': {error}"),
    })?;
    dir.write(file_name, rendered).map_err(|error| IntakeError::Io {
        message: format!("failed to write report '{path}': {error}"),
    })
}
