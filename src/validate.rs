//! Request validation.
//!
//! One entry point, invoked exactly once at the orchestration boundary:
//! [`validate`] first aggregates every missing field name into a single
//! response, then checks each present field individually. Range grammar is
//! validated separately by [`validate_range`] because it needs the sheet
//! names from spreadsheet metadata, which is only available after
//! authentication.

use crate::errors::WriteError;
use crate::model::{WriteMode, WriteRequest};
use {once_cell::sync::Lazy, regex::Regex};

/// Bare cell or block reference: `A1`, `b5`, `A1:B10`.
static CELL_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+\d+(?::[A-Za-z]+\d+)?$").expect("valid regex"));

/// Sheet-qualified cell or block: `Sheet1!A1`, `Data!A1:C3`.
static SHEET_QUALIFIED_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^!]+![A-Za-z]+\d+(?::[A-Za-z]+\d+)?$").expect("valid regex"));

/// Bare sheet name, no `!` and no cell reference: `Tasks`.
static SHEET_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^!]+$").expect("valid regex"));

const SPREADSHEET_ID_HELP: &str = "Provide the spreadsheet id from the URL: \
     https://docs.google.com/spreadsheets/d/[SPREADSHEET_ID]/edit";
const RANGE_FIELD_HELP: &str =
    "Use A1 notation like \"Sheet1!A1\" or \"A1\" for the first sheet";
const VALUE_HELP: &str = "Provide the data you want to write to the sheet";

/// A structurally valid write request. Nothing network-facing runs before
/// one of these exists.
#[derive(Debug)]
pub struct ValidWrite {
    pub spreadsheet_id: String,
    pub range: String,
    pub value: String,
    pub mode: WriteMode,
    pub service_account_key: String,
}

pub fn validate(req: WriteRequest) -> Result<ValidWrite, WriteError> {
    let mut missing = Vec::new();
    if req.spreadsheet_id.is_none() {
        missing.push("spreadsheet_id");
    }
    if req.range.is_none() {
        missing.push("range");
    }
    if req.value.is_none() {
        missing.push("value");
    }
    if req.mode.is_none() {
        missing.push("mode");
    }
    let key = req.secrets.and_then(|s| s.service_account_key);
    if key.is_none() {
        missing.push("secrets.service_account_key");
    }
    if !missing.is_empty() {
        return Err(WriteError::MissingParams { missing });
    }

    let spreadsheet_id = req.spreadsheet_id.unwrap_or_default();
    let range = req.range.unwrap_or_default();
    let value = req.value.unwrap_or_default();
    let service_account_key = key.unwrap_or_default();

    if spreadsheet_id.trim().is_empty() {
        return Err(WriteError::EmptyParam {
            field: "spreadsheet_id",
            help: SPREADSHEET_ID_HELP,
        });
    }
    if range.trim().is_empty() {
        return Err(WriteError::EmptyParam {
            field: "range",
            help: RANGE_FIELD_HELP,
        });
    }
    if value.trim().is_empty() {
        return Err(WriteError::EmptyParam {
            field: "value",
            help: VALUE_HELP,
        });
    }
    if service_account_key.trim().is_empty() {
        return Err(WriteError::CredentialNotConfigured);
    }

    Ok(ValidWrite {
        spreadsheet_id,
        range,
        value,
        mode: req.mode.unwrap_or_default(),
        service_account_key,
    })
}

/// Checks the range expression against the three accepted shapes. Runs only
/// after metadata has been fetched so the rejection can list real sheet
/// names.
pub fn validate_range(range: &str, sheet_names: &[String]) -> Result<(), WriteError> {
    if CELL_RANGE.is_match(range)
        || SHEET_QUALIFIED_RANGE.is_match(range)
        || SHEET_NAME.is_match(range)
    {
        Ok(())
    } else {
        Err(WriteError::InvalidRange {
            available_sheets: sheet_names.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Secrets;
    use assert_matches::assert_matches;

    fn full_request() -> WriteRequest {
        WriteRequest {
            spreadsheet_id: Some("S1".to_string()),
            range: Some("A1".to_string()),
            value: Some("hello".to_string()),
            mode: Some(WriteMode::Overwrite),
            secrets: Some(Secrets {
                service_account_key: Some("{}".to_string()),
            }),
        }
    }

    #[test]
    fn empty_request_lists_every_missing_field() {
        let err = validate(WriteRequest::default()).unwrap_err();
        assert_matches!(err, WriteError::MissingParams { missing } => {
            assert_eq!(
                missing,
                vec![
                    "spreadsheet_id",
                    "range",
                    "value",
                    "mode",
                    "secrets.service_account_key",
                ]
            );
        });
    }

    #[test]
    fn missing_subset_lists_only_those_fields() {
        let mut req = full_request();
        req.range = None;
        req.mode = None;
        let err = validate(req).unwrap_err();
        assert_matches!(err, WriteError::MissingParams { missing } => {
            assert_eq!(missing, vec!["range", "mode"]);
        });
    }

    #[test]
    fn missing_nested_credential_is_named_with_its_path() {
        let mut req = full_request();
        req.secrets = Some(Secrets {
            service_account_key: None,
        });
        let err = validate(req).unwrap_err();
        assert_matches!(err, WriteError::MissingParams { missing } => {
            assert_eq!(missing, vec!["secrets.service_account_key"]);
        });
    }

    #[test]
    fn blank_credential_gets_setup_steps_error() {
        let mut req = full_request();
        req.secrets = Some(Secrets {
            service_account_key: Some("   ".to_string()),
        });
        assert_matches!(
            validate(req).unwrap_err(),
            WriteError::CredentialNotConfigured
        );
    }

    #[test]
    fn blank_value_is_an_individual_error() {
        let mut req = full_request();
        req.value = Some(String::new());
        assert_matches!(
            validate(req).unwrap_err(),
            WriteError::EmptyParam { field: "value", .. }
        );
    }

    #[test]
    fn valid_request_passes_through() {
        let valid = validate(full_request()).unwrap();
        assert_eq!(valid.spreadsheet_id, "S1");
        assert_eq!(valid.mode, WriteMode::Overwrite);
    }

    #[test]
    fn accepted_range_shapes() {
        let sheets = vec!["Sheet1".to_string()];
        for range in ["A1", "b5", "A1:B10", "Sheet1!A1", "Data!A1:C3", "Tasks"] {
            assert!(validate_range(range, &sheets).is_ok(), "rejected {range}");
        }
    }

    #[test]
    fn rejected_ranges_list_available_sheets() {
        let sheets = vec!["Sheet1".to_string(), "Tasks".to_string()];
        for range in ["Tasks!", "Sheet1!A", "!A1", "Data!1A"] {
            let err = validate_range(range, &sheets).unwrap_err();
            assert_matches!(err, WriteError::InvalidRange { available_sheets } => {
                assert_eq!(available_sheets, sheets);
            });
        }
    }
}
