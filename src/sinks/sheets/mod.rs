//! Google spreadsheet sink
//!
//! Authenticates with a service account, finds the target worksheet by exact
//! title (creating it with the header row when missing) and appends the row
//! below the existing data.

pub mod auth;
pub mod client;

pub use auth::{ServiceAccountTokenProvider, StaticToken, TokenProvider};
pub use client::{SheetProperties, SheetsClient};

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::{Config, Row};
use crate::output::Progress;
use crate::sinks::RowSink;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Appends rows to one worksheet of a Google spreadsheet
pub struct SpreadsheetSink {
    spreadsheet_id: String,
    worksheet_name: String,
    header: Vec<String>,
    creds_file: PathBuf,
    api_url: String,
    timeout: Duration,
    token_provider: Option<Box<dyn TokenProvider>>,
    logger: Logger,
}

impl SpreadsheetSink {
    /// Build the sink from configuration. Credentials are read lazily, on
    /// the first append.
    pub fn from_config(config: &Config, logger: Logger) -> Result<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(AppError::config("Spreadsheet ID cannot be empty"));
        }

        Ok(Self {
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet_name: config.worksheet_name.clone(),
            header: config.header.clone(),
            creds_file: config.google_creds_file.clone(),
            api_url: config.sheets_api_url.clone(),
            timeout: config.timeout(),
            token_provider: None,
            logger,
        })
    }

    /// Use `provider` instead of the service account key file
    pub fn with_token_provider(mut self, provider: Box<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn worksheet_name(&self) -> &str {
        &self.worksheet_name
    }

    async fn access_token(&self, progress: &Progress) -> Result<String> {
        let creds = self.creds_file.display();
        progress.start(format!("Loading Google credentials (file: '{}')...", creds));

        let token = match &self.token_provider {
            Some(provider) => provider.access_token().await?,
            None => {
                let provider = ServiceAccountTokenProvider::from_file(&self.creds_file).await?;
                self.logger
                    .debug("Loaded service account key")
                    .field("client_email", provider.client_email())
                    .log();
                provider.access_token().await?
            }
        };

        progress.succeed(format!("Loaded Google credentials (file: '{}') OK", creds));
        Ok(token)
    }

    async fn ensure_worksheet(&self, client: &SheetsClient, progress: &Progress) -> Result<()> {
        progress.start(format!("Loading Google Spreadsheet (ID: {})...", self.spreadsheet_id));
        let worksheets = client.worksheets().await?;
        progress.succeed(format!("Loaded Google Spreadsheet (ID: {}) OK:", self.spreadsheet_id));

        self.logger
            .debug("Spreadsheet worksheets")
            .field(
                "titles",
                worksheets.iter().map(|w| w.title.as_str()).collect::<Vec<_>>(),
            )
            .log();

        progress.start(format!("Finding Worksheet (name: {})", self.worksheet_name));
        if worksheets.iter().any(|w| w.title == self.worksheet_name) {
            progress.succeed(format!("Found Worksheet (name: {}) OK.", self.worksheet_name));
            return Ok(());
        }

        progress.info(format!("No Worksheet found (name: {}).", self.worksheet_name));
        progress.start(format!("Creating Worksheet (name: {})...", self.worksheet_name));
        let created = client.add_worksheet(&self.worksheet_name).await?;
        client.set_header_row(&self.worksheet_name, &self.header).await?;
        progress.succeed(format!("Created Worksheet (name: {}) OK.", self.worksheet_name));

        self.logger
            .info("Created worksheet")
            .field("title", &created.title)
            .field("sheet_id", created.sheet_id)
            .log();
        Ok(())
    }
}

#[async_trait]
impl RowSink for SpreadsheetSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn append(&self, row: &Row, progress: &Progress) -> Result<()> {
        let token = self.access_token(progress).await?;
        let client = SheetsClient::new(
            &self.api_url,
            &self.spreadsheet_id,
            token,
            self.timeout,
            self.logger.child("api"),
        )?;

        self.ensure_worksheet(&client, progress).await?;

        progress.start(format!(
            "Adding result row to Google Spreadsheet (ID: {})...",
            self.spreadsheet_id
        ));
        client
            .append_row(&self.worksheet_name, &row.to_json_values(&self.header))
            .await?;
        progress.succeed(format!(
            "Added result row to Google Spreadsheet (ID: {}) OK.",
            self.spreadsheet_id
        ));
        Ok(())
    }
}
