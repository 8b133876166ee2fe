//! HTTP sheet source
//!
//! Fetches published spreadsheet exports (`.../pub?output=csv`) over plain
//! HTTP(S) using a blocking reqwest client.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::SheetSource;

/// Blocking HTTP fetcher for CSV exports
pub struct HttpSheetSource {
    client: Client,
    timeout: Duration,
}

impl HttpSheetSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Only absolute http(s) URLs are fetched
    fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| Error::fetch(format!("Invalid source URL: {}", e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(Error::fetch(format!(
                "Unsupported URL scheme '{}': source URLs must be http or https",
                scheme
            ))),
        }
    }

    /// Map reqwest errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::fetch(format!(
                "Connection timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            Error::fetch("Unable to connect to the spreadsheet host")
        } else {
            Error::fetch(format!("Sheet request failed: {}", error))
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: &reqwest::blocking::Response) -> Result<()> {
        match response.status().as_u16() {
            200 => Ok(()),
            401 | 403 => Err(Error::fetch(
                "Spreadsheet is not published or access was denied. \
                Publish the sheet to the web as CSV and use the export URL",
            )),
            404 => Err(Error::fetch("Spreadsheet export not found (HTTP 404)")),
            status => Err(Error::fetch(format!("Spreadsheet host error: HTTP {}", status))),
        }
    }
}

impl SheetSource for HttpSheetSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = Self::parse_url(url)?;
        debug!(host = parsed.host_str().unwrap_or(""), "fetching sheet");

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        self.check_response_status(&response)?;

        let text = response
            .text()
            .map_err(|e| Error::fetch(format!("Failed to read response body: {}", e)))?;

        info!(bytes = text.len(), "fetched sheet");
        Ok(text)
    }
}
