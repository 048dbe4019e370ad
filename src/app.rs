//! Main application orchestration and execution

use crate::{
    error::Result,
    input::ReportLoader,
    logging::Logger,
    models::{Config, Row, TestReport},
    output::Progress,
    sinks::sinks_for_config,
    AppError,
};
use serde_json::Value;
use std::io::Read;

/// Runs one load, map and append pass
pub struct App {
    config: Config,
    progress: Progress,
    logger: Logger,
}

impl App {
    /// Create an application writing progress lines to stderr
    pub fn new(config: Config) -> Self {
        let progress = Progress::stderr(config.enable_color, config.verbose || config.debug);
        Self::with_progress(config, progress)
    }

    /// Create an application with a custom progress reporter
    pub fn with_progress(config: Config, progress: Progress) -> Self {
        let logger = Logger::with_config("app", &config);
        Self {
            config,
            progress,
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Run against the process stdin
    pub async fn run(&self) -> Result<()> {
        self.logger
            .debug("Starting run")
            .field("version", crate::VERSION)
            .log();
        let value = self.loader().load()?;
        self.process(value).await
    }

    /// Run with `stdin` standing in for the process stdin; `None` behaves
    /// like an interactive terminal.
    pub async fn run_with_input<R: Read>(&self, stdin: Option<R>) -> Result<()> {
        let value = self.loader().load_from(stdin)?;
        self.process(value).await
    }

    /// Print the failure line and the error detail
    pub fn report_failure(&self, error: &AppError) {
        let step = self.progress.current();
        self.progress.fail(format!("Failed: {}", error.message()));
        self.logger
            .error("Run failed")
            .field("step", step)
            .error_info(error)
            .log();
    }

    fn loader(&self) -> ReportLoader<'_> {
        ReportLoader::new(
            self.config.input_file.clone(),
            &self.progress,
            self.logger.child("input"),
        )
    }

    async fn process(&self, value: Value) -> Result<()> {
        self.progress.start("Parsing result into row...");
        let report = TestReport::from_json(value)?;
        let row = Row::from(&report);
        self.progress.succeed("Parsed result into row OK.");

        self.logger
            .debug("Mapped report")
            .field("log", report.is_log())
            .field("row", row.to_json())
            .log();

        let sinks = sinks_for_config(&self.config, &self.logger)?;
        if !self.config.has_sink() {
            self.logger.warn("No sink enabled; the row was not saved").log();
        }

        for sink in &sinks {
            sink.append(&row, &self.progress).await?;
            self.logger.info("Row saved").field("sink", sink.name()).log();
        }

        Ok(())
    }
}
