//! Progress reporter
//!
//! Each step of a run is announced with `start` and closed with `succeed`,
//! `info` or `fail`. Finished steps print one line with a status symbol;
//! `start` lines are only printed in verbose mode.

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Outcome symbol of a progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Info,
    Success,
    Failure,
}

impl Status {
    /// Get Unicode symbol for this status
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Running => "…",
            Status::Info => "ℹ",
            Status::Success => "✔",
            Status::Failure => "✖",
        }
    }

    fn colored_symbol(&self) -> String {
        let symbol = self.symbol();
        match self {
            Status::Running => symbol.cyan().to_string(),
            Status::Info => symbol.blue().to_string(),
            Status::Success => symbol.green().to_string(),
            Status::Failure => symbol.red().to_string(),
        }
    }
}

/// Writes progress lines for the steps of one run
pub struct Progress {
    out: Mutex<Box<dyn Write + Send>>,
    current: Mutex<Option<String>>,
    use_color: bool,
    verbose: bool,
}

impl Progress {
    /// Progress lines on stderr
    pub fn stderr(use_color: bool, verbose: bool) -> Self {
        Self::with_writer(Box::new(io::stderr()), use_color, verbose)
    }

    /// Progress lines on any writer
    pub fn with_writer(out: Box<dyn Write + Send>, use_color: bool, verbose: bool) -> Self {
        Self {
            out: Mutex::new(out),
            current: Mutex::new(None),
            use_color,
            verbose,
        }
    }

    /// Discard all progress output
    pub fn silent() -> Self {
        Self::with_writer(Box::new(io::sink()), false, false)
    }

    /// Begin a step
    pub fn start(&self, text: impl Into<String>) {
        let text = text.into();
        if self.verbose {
            self.emit(Status::Running, &text);
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(text);
        }
    }

    /// Close the current step with an informational line
    pub fn info(&self, text: impl AsRef<str>) {
        self.finish(Status::Info, text.as_ref());
    }

    /// Close the current step as successful
    pub fn succeed(&self, text: impl AsRef<str>) {
        self.finish(Status::Success, text.as_ref());
    }

    /// Close the current step as failed
    pub fn fail(&self, text: impl AsRef<str>) {
        self.finish(Status::Failure, text.as_ref());
    }

    /// Text of the step started last and not yet finished
    pub fn current(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn finish(&self, status: Status, text: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        self.emit(status, text);
    }

    fn emit(&self, status: Status, text: &str) {
        let symbol = if self.use_color {
            status.colored_symbol()
        } else {
            status.symbol().to_string()
        };
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{} {}", symbol, text);
            let _ = out.flush();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SharedBuffer;
    use super::*;

    #[test]
    fn test_finished_steps_are_printed() {
        let buffer = SharedBuffer::default();
        let progress = Progress::with_writer(Box::new(buffer.clone()), false, false);

        progress.start("Parsing result into row...");
        assert_eq!(progress.current().as_deref(), Some("Parsing result into row..."));
        progress.succeed("Parsed result into row OK.");
        assert_eq!(progress.current(), None);
        progress.info("No JSON in stdin");
        progress.fail("Failed: boom");

        assert_eq!(
            buffer.contents(),
            "✔ Parsed result into row OK.\nℹ No JSON in stdin\n✖ Failed: boom\n"
        );
    }

    #[test]
    fn test_start_lines_only_in_verbose_mode() {
        let buffer = SharedBuffer::default();
        let progress = Progress::with_writer(Box::new(buffer.clone()), false, true);
        progress.start("Saving to CSV (file: results.csv)...");
        assert_eq!(buffer.contents(), "… Saving to CSV (file: results.csv)...\n");
    }

    #[test]
    fn test_silent_progress() {
        let progress = Progress::silent();
        progress.start("x");
        progress.succeed("y");
        assert_eq!(progress.current(), None);
    }
}
