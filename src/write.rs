//! Write orchestration: validate, authenticate, check the range against real
//! sheet names, dispatch one write strategy, and normalize the result.
//!
//! The pipeline is strictly sequential and request-scoped. Every remote
//! failure is caught here and mapped through [`classify`]; no raw error
//! crosses the HTTP boundary.

use crate::errors::{WriteError, classify};
use crate::model::{WriteMode, WriteOutcome, WriteRequest};
use crate::sheets::{self, SheetsClient};
use crate::state::AppState;
use crate::validate;
use chrono::{SecondsFormat, Utc};
use {once_cell::sync::Lazy, regex::Regex};

static ROW_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Handles one write request end to end. This is the single entry point the
/// transport layer calls; all validation happens here.
pub async fn handle_write(state: &AppState, req: WriteRequest) -> Result<WriteOutcome, WriteError> {
    let req = validate::validate(req)?;

    let key = sheets::parse_service_account_key(&req.service_account_key)
        .map_err(|err| WriteError::CredentialInvalid {
            detail: err.to_string(),
        })?;

    tracing::info!(spreadsheet_id = %req.spreadsheet_id, mode = %req.mode, "write requested");

    let client = SheetsClient::connect(
        state.http().clone(),
        &state.config().sheets_endpoint,
        &key,
    )
    .await
    .map_err(classify)?;

    let metadata = client
        .spreadsheet_metadata(&req.spreadsheet_id)
        .await
        .map_err(classify)?;

    validate::validate_range(&req.range, &metadata.sheet_names)?;

    let updated_range = match req.mode {
        WriteMode::Overwrite => {
            client
                .update_values(&req.spreadsheet_id, &req.range, &req.value)
                .await
                .map_err(classify)?
                .updated_range
        }
        WriteMode::Append => {
            let target = append_target(&req.range);
            client
                .append_row(&req.spreadsheet_id, target, &req.value)
                .await
                .map_err(classify)?
                .updates
                .updated_range
        }
        WriteMode::Insert => {
            // The structural insert always lands on the first grid sheet; a
            // sheet qualifier in the range is not resolved to a sheet id.
            // Only the value write below uses the literal range.
            let row = insert_row_number(&req.range);
            client
                .insert_row(&req.spreadsheet_id, row - 1)
                .await
                .map_err(classify)?;
            client
                .update_values(&req.spreadsheet_id, &req.range, &req.value)
                .await
                .map_err(classify)?
                .updated_range
        }
    };

    tracing::info!(%updated_range, mode = %req.mode, "write completed");

    Ok(WriteOutcome {
        message: format!(
            "Successfully wrote data to Google Sheet in {} mode.",
            req.mode
        ),
        updated_range,
        mode: req.mode,
        sheet_name: metadata.sheet_names.first().cloned().unwrap_or_default(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Append operates on a sheet as a whole: if the range carries a sheet
/// qualifier, everything from the `!` on is dropped.
fn append_target(range: &str) -> &str {
    range.split('!').next().unwrap_or(range)
}

/// First integer found anywhere in the range, as a 1-based row number.
/// Defaults to row 1 when the range names no row. A row too large for the
/// wire format saturates so the remote rejects it instead of the value
/// landing silently on row 1.
fn insert_row_number(range: &str) -> i64 {
    ROW_NUMBER
        .find(range)
        .map(|m| m.as_str().parse().unwrap_or(i64::MAX))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_target_strips_sheet_qualifier() {
        assert_eq!(append_target("Tasks!A1"), "Tasks");
        assert_eq!(append_target("Tasks!A1:B2"), "Tasks");
    }

    #[test]
    fn append_target_keeps_bare_sheet_name() {
        assert_eq!(append_target("Tasks"), "Tasks");
    }

    #[test]
    fn insert_row_number_finds_first_integer() {
        assert_eq!(insert_row_number("A5"), 5);
        assert_eq!(insert_row_number("B12:C14"), 12);
        assert_eq!(insert_row_number("Data!A7"), 7);
    }

    #[test]
    fn insert_row_number_defaults_to_one() {
        assert_eq!(insert_row_number("Tasks"), 1);
    }

    #[test]
    fn insert_row_number_saturates_oversized_rows() {
        assert_eq!(insert_row_number("A99999999999999999999"), i64::MAX);
    }
}
