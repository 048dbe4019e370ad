//! Google Sheets REST API (v4) client
//!
//! Only the four calls the spreadsheet sink needs: list worksheets, add a
//! worksheet, overwrite the header row and append a data row.

use crate::error::{AppError, Result};
use crate::logging::Logger;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Worksheet properties as returned in spreadsheet metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

/// A1 range covering `cell` of worksheet `title`. Titles are always quoted
/// so names such as `2026-09` are not read as cell references.
pub fn a1_range(title: &str, cell: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), cell)
}

/// Client bound to one spreadsheet document
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    token: String,
    logger: Logger,
}

impl SheetsClient {
    pub fn new(
        base_url: &str,
        spreadsheet_id: &str,
        token: String,
        timeout: Duration,
        logger: Logger,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::config(format!("Invalid Sheets API URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::sheets(format!("Failed to create Sheets API client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            token,
            logger,
        })
    }

    /// Worksheets of the document, in tab order
    pub async fn worksheets(&self) -> Result<Vec<SheetProperties>> {
        let mut url = self.document_url(None)?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title,index)");

        let response = self.send(self.request(Method::GET, url)).await?;
        let metadata: SpreadsheetMetadata = response
            .json()
            .await
            .map_err(|e| AppError::sheets(format!("Failed to parse spreadsheet metadata: {}", e)))?;

        Ok(metadata.sheets.into_iter().map(|s| s.properties).collect())
    }

    /// Add a worksheet titled `title` and return its properties
    pub async fn add_worksheet(&self, title: &str) -> Result<SheetProperties> {
        let url = self.document_url(Some(":batchUpdate"))?;
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": title } } }
            ]
        });

        let response = self.send(self.request(Method::POST, url).json(&body)).await?;
        let parsed: BatchUpdateResponse = response
            .json()
            .await
            .map_err(|e| AppError::sheets(format!("Failed to parse addSheet response: {}", e)))?;

        let properties = parsed
            .replies
            .first()
            .and_then(|reply| reply.pointer("/addSheet/properties"))
            .cloned()
            .ok_or_else(|| AppError::sheets("addSheet response did not include sheet properties"))?;

        serde_json::from_value(properties)
            .map_err(|e| AppError::sheets(format!("Invalid addSheet properties: {}", e)))
    }

    /// Overwrite the first row of worksheet `title` with `header`
    pub async fn set_header_row(&self, title: &str, header: &[String]) -> Result<()> {
        let mut url = self.values_url(&a1_range(title, "A1"), "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = json!({ "values": [header] });
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    /// Append one row of values after the last row of worksheet `title`
    pub async fn append_row(&self, title: &str, values: &[Value]) -> Result<()> {
        let mut url = self.values_url(&a1_range(title, "A1"), ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = json!({ "values": [values] });
        self.send(self.request(Method::POST, url).json(&body)).await?;
        Ok(())
    }

    fn document_url(&self, suffix: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("Sheets API URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets"])
            .push(&format!("{}{}", self.spreadsheet_id, suffix.unwrap_or("")));
        Ok(url)
    }

    fn values_url(&self, range: &str, suffix: &str) -> Result<Url> {
        let mut url = self.document_url(None)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("Sheets API URL '{}' cannot be a base", self.base_url)))?
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.logger
            .debug("Sheets API request")
            .field("method", method.as_str())
            .field("url", url.as_str())
            .log();
        self.client.request(method, url).bearer_auth(&self.token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(AppError::sheets(format!("HTTP {}: {}", status, message.trim())));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SheetsClient {
        SheetsClient::new(base, "doc-1", "tok".to_string(), Duration::from_secs(5), Logger::new("sheets")).unwrap()
    }

    #[test]
    fn test_a1_range_quotes_title() {
        assert_eq!(a1_range("2026-09", "A1"), "'2026-09'!A1");
        assert_eq!(a1_range("Bob's tab", "A1"), "'Bob''s tab'!A1");
    }

    #[test]
    fn test_document_url() {
        let c = client("https://sheets.googleapis.com");
        assert_eq!(
            c.document_url(None).unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/doc-1"
        );
        assert_eq!(
            c.document_url(Some(":batchUpdate")).unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/doc-1:batchUpdate"
        );
    }

    #[test]
    fn test_values_url_keeps_prefix_path() {
        let c = client("http://127.0.0.1:9000/proxy/");
        assert_eq!(
            c.values_url("'2026-09'!A1", ":append").unwrap().as_str(),
            "http://127.0.0.1:9000/proxy/v4/spreadsheets/doc-1/values/'2026-09'!A1:append"
        );
    }

    #[test]
    fn test_values_url_encodes_spaces() {
        let c = client("https://sheets.googleapis.com");
        assert_eq!(
            c.values_url(&a1_range("My Tab", "A1"), "").unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/doc-1/values/'My%20Tab'!A1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SheetsClient::new("::nope", "doc", String::new(), Duration::from_secs(1), Logger::new("t"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
