//! Row reader for the spreadsheet-backed content calendar.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of raw sheet rows.
///
/// Implementations report access failures as errors; the feed resolver
/// degrades a failed sheet to "no rows" instead of failing the request.
pub trait SheetReader {
    /// Fetch all rows of the named sheet as ordered string cells.
    fn read(
        &self,
        sheet_name: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>>> + Send;
}

/// Reads sheets through the Google Sheets REST API with a caller-supplied
/// OAuth access token.
pub struct GoogleSheetsReader {
    client: reqwest::Client,
    spreadsheet_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    properties: Option<SpreadsheetProperties>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: Option<String>,
}

impl GoogleSheetsReader {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        })
    }

    /// Title of the backing spreadsheet. Used by the health check to prove
    /// read access.
    pub async fn spreadsheet_title(&self) -> Result<String> {
        let url = format!(
            "{}/{}?fields=properties(title)",
            SHEETS_BASE, self.spreadsheet_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Sheets API returned {}",
                response.status()
            )));
        }

        let meta: SpreadsheetMeta = response.json().await?;
        Ok(meta
            .properties
            .and_then(|p| p.title)
            .unwrap_or_else(|| "Unknown".to_string()))
    }
}

impl SheetReader for GoogleSheetsReader {
    async fn read(&self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}!A:Z",
            SHEETS_BASE,
            self.spreadsheet_id,
            urlencoding::encode(sheet_name)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Sheets API returned {} for sheet {}",
                response.status(),
                sheet_name
            )));
        }

        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }
}
