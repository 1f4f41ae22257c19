//! Outbound client for the Google Sheets v4 REST API.
//!
//! Four calls are exposed: metadata fetch, literal range update, row append,
//! and a structural row insert via batchUpdate. Every failure surfaces as a
//! [`SheetsError`], the sole input to the error classifier.

pub mod auth;
pub mod types;

pub use auth::{ServiceAccountKey, parse_service_account_key};

use serde::de::DeserializeOwned;
use thiserror::Error;

use types::{
    AppendResponse, BatchUpdateRequest, DimensionRange, ErrorEnvelope, InsertDimension, Request,
    Spreadsheet, UpdateValuesResponse, ValueRangeInput,
};

/// Row inserts always target the first grid sheet.
pub const DEFAULT_SHEET_ID: i64 = 0;

#[derive(Debug, Error)]
pub enum SheetsError {
    /// The API answered with an error status. `code` comes from the Google
    /// error envelope when it parses, otherwise from the HTTP status.
    #[error("Google Sheets API error {code}: {message}")]
    Api { code: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Metadata used for range validation and error enrichment.
#[derive(Debug, Clone)]
pub struct SpreadsheetMetadata {
    pub title: String,
    pub sheet_names: Vec<String>,
}

pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SheetsClient {
    /// Authenticates with the given key and returns a ready client.
    pub async fn connect(
        http: reqwest::Client,
        base_url: impl Into<String>,
        key: &ServiceAccountKey,
    ) -> Result<Self, SheetsError> {
        let access_token = auth::fetch_access_token(&http, key).await?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub async fn spreadsheet_metadata(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetMetadata, SheetsError> {
        let url = self.url_with_segments(&["spreadsheets", spreadsheet_id])?;
        let response = self
            .http
            .get(url)
            .query(&[("includeGridData", "false")])
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let spreadsheet: Spreadsheet = self.handle_response(response).await?;
        Ok(SpreadsheetMetadata {
            title: spreadsheet.properties.title,
            sheet_names: spreadsheet
                .sheets
                .into_iter()
                .map(|sheet| sheet.properties.title)
                .collect(),
        })
    }

    /// Writes one single-value row into the literal range, replacing any
    /// existing content.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        value: &str,
    ) -> Result<UpdateValuesResponse, SheetsError> {
        let url = self.url_with_segments(&["spreadsheets", spreadsheet_id, "values", range])?;
        let body = ValueRangeInput {
            range: range.to_string(),
            major_dimension: "ROWS".to_string(),
            values: vec![vec![value.to_string()]],
        };
        let response = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Appends one single-value row to `target` (a sheet name or range),
    /// letting the service pick the next empty row.
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        target: &str,
        value: &str,
    ) -> Result<AppendResponse, SheetsError> {
        let url = self.url_with_segments(&[
            "spreadsheets",
            spreadsheet_id,
            "values",
            &format!("{target}:append"),
        ])?;
        let body = ValueRangeInput {
            range: target.to_string(),
            major_dimension: "ROWS".to_string(),
            values: vec![vec![value.to_string()]],
        };
        let response = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Structurally inserts one blank row at `start_index` (0-based) on the
    /// first grid sheet.
    pub async fn insert_row(
        &self,
        spreadsheet_id: &str,
        start_index: i64,
    ) -> Result<(), SheetsError> {
        let url =
            self.url_with_segments(&["spreadsheets", &format!("{spreadsheet_id}:batchUpdate")])?;
        let body = BatchUpdateRequest {
            requests: vec![Request {
                insert_dimension: InsertDimension {
                    range: DimensionRange {
                        sheet_id: DEFAULT_SHEET_ID,
                        dimension: "ROWS".to_string(),
                        start_index,
                        end_index: start_index + 1,
                    },
                    inherit_from_before: false,
                },
            }],
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        self.handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<reqwest::Url, SheetsError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| SheetsError::Other(format!("invalid API base URL: {err}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| SheetsError::Other("API base URL cannot be a base".to_string()))?;
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.code, envelope.error.message),
                Err(_) => (status.as_u16(), body),
            };
            tracing::warn!(code, %message, "Sheets API request failed");
            Err(SheetsError::Api { code, message })
        }
    }
}
