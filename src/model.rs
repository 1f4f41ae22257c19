use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Payload for `POST /write`.
///
/// Every field is optional at the wire level so the validator can report all
/// missing names in one aggregated response instead of failing on the first.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct WriteRequest {
    /// The spreadsheet id (from the document URL).
    pub spreadsheet_id: Option<String>,
    /// The A1 notation range to write to (e.g. "A1", "Sheet1!A1:B2"), or a
    /// bare sheet name for append mode.
    pub range: Option<String>,
    /// The text value to write.
    pub value: Option<String>,
    /// The write strategy to use.
    pub mode: Option<WriteMode>,
    /// Caller-supplied credentials.
    pub secrets: Option<Secrets>,
}

/// Nested credential container.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct Secrets {
    /// A Google service-account key as a JSON string.
    pub service_account_key: Option<String>,
}

/// Write strategy selected by the caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteMode {
    /// Replace the contents of the literal range.
    #[default]
    Overwrite,
    /// Add a row after the last populated row of a sheet.
    Append,
    /// Structurally insert a blank row, then write into it.
    Insert,
}

/// Success body returned by `POST /write`.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub message: String,
    /// The updated range as reported by the Sheets API.
    pub updated_range: String,
    pub mode: WriteMode,
    /// First sheet name of the target spreadsheet.
    pub sheet_name: String,
    /// ISO-8601 timestamp generated at response time.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_request_deserializes_partial_payloads() {
        let req: WriteRequest =
            serde_json::from_str(r#"{"spreadsheet_id": "S1", "mode": "append"}"#).unwrap();
        assert_eq!(req.spreadsheet_id.as_deref(), Some("S1"));
        assert_eq!(req.mode, Some(WriteMode::Append));
        assert!(req.range.is_none());
        assert!(req.secrets.is_none());
    }

    #[test]
    fn write_mode_rejects_unknown_strings() {
        let err = serde_json::from_str::<WriteMode>(r#""upsert""#).unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn write_mode_defaults_to_overwrite() {
        assert_eq!(WriteMode::default(), WriteMode::Overwrite);
        assert_eq!(WriteMode::Overwrite.to_string(), "overwrite");
    }

    #[test]
    fn write_outcome_serializes_camel_case() {
        let outcome = WriteOutcome {
            message: "ok".to_string(),
            updated_range: "Sheet1!A1".to_string(),
            mode: WriteMode::Overwrite,
            sheet_name: "Sheet1".to_string(),
            timestamp: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["updatedRange"], "Sheet1!A1");
        assert_eq!(json["sheetName"], "Sheet1");
        assert_eq!(json["mode"], "overwrite");
    }
}
