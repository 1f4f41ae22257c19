//! Error response bodies and the upstream-failure classifier.
//!
//! Every failure is converted into one of the typed variants below before it
//! crosses the HTTP boundary; no raw error ever reaches the caller. Each
//! variant owns its body shape, so the fields a category requires are
//! enforced by the type system rather than by convention.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::sheets::SheetsError;

pub const RANGE_HELP: &str = "Use A1 notation like \"A1\", \"B5\", \"A1:B10\", \
     \"Sheet1!A1\", or just \"Sheet1\" for append mode";

pub const RANGE_EXAMPLES: [&str; 6] = [
    "A1 - Single cell",
    "B5 - Single cell",
    "A1:B10 - Range of cells",
    "Sheet1!A1 - Specific sheet and cell",
    "Tasks - Sheet name (for append mode)",
    "Data!A1 - Sheet named \"Data\"",
];

const UNKNOWN_WRITE_ERROR: &str = "An unknown error occurred while writing to Google Sheets.";

/// Failure categories for a write request.
#[derive(Debug, PartialEq)]
pub enum WriteError {
    /// One or more required fields absent from the payload.
    MissingParams { missing: Vec<&'static str> },
    /// A required field is present but empty.
    EmptyParam {
        field: &'static str,
        help: &'static str,
    },
    /// The credential field is present but blank.
    CredentialNotConfigured,
    /// The credential blob does not parse as JSON. Signals a misconfigured
    /// key, not a bad call.
    CredentialInvalid { detail: String },
    /// The remote service denied access to the spreadsheet.
    AccessDenied,
    /// The remote service reported the spreadsheet missing.
    SpreadsheetNotFound,
    /// The range expression matches none of the accepted shapes.
    InvalidRange { available_sheets: Vec<String> },
    /// The remote service rejected the request shape.
    UpstreamBadRequest,
    /// Any other remote failure, surfaced verbatim.
    Upstream {
        message: String,
        upstream_code: Option<u16>,
    },
}

impl WriteError {
    pub fn status(&self) -> StatusCode {
        match self {
            WriteError::MissingParams { .. }
            | WriteError::EmptyParam { .. }
            | WriteError::InvalidRange { .. }
            | WriteError::UpstreamBadRequest => StatusCode::BAD_REQUEST,
            WriteError::AccessDenied => StatusCode::FORBIDDEN,
            WriteError::SpreadsheetNotFound => StatusCode::NOT_FOUND,
            WriteError::CredentialNotConfigured
            | WriteError::CredentialInvalid { .. }
            | WriteError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WriteError::MissingParams { .. } => "MISSING_PARAMS",
            WriteError::EmptyParam { .. } => "EMPTY_PARAM",
            WriteError::CredentialNotConfigured => "CREDENTIAL_NOT_CONFIGURED",
            WriteError::CredentialInvalid { .. } => "CREDENTIAL_INVALID",
            WriteError::AccessDenied => "ACCESS_DENIED",
            WriteError::SpreadsheetNotFound => "SPREADSHEET_NOT_FOUND",
            WriteError::InvalidRange { .. } => "INVALID_RANGE",
            WriteError::UpstreamBadRequest => "UPSTREAM_BAD_REQUEST",
            WriteError::Upstream { .. } => "UPSTREAM_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MissingParamsBody {
    code: &'static str,
    error: String,
    help: &'static str,
    missing: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmptyParamBody {
    code: &'static str,
    error: String,
    help: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialNotConfiguredBody {
    code: &'static str,
    error: &'static str,
    help: &'static str,
    setup_steps: [&'static str; 3],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialInvalidBody {
    code: &'static str,
    error: &'static str,
    help: &'static str,
    detail: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessDeniedBody {
    code: &'static str,
    error: &'static str,
    help: &'static str,
    solution: &'static str,
    service_account_email: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotFoundBody {
    code: &'static str,
    error: &'static str,
    help: &'static str,
    solution: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvalidRangeBody {
    code: &'static str,
    error: &'static str,
    help: &'static str,
    examples: [&'static str; 6],
    available_sheets: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamBody {
    code: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_code: Option<u16>,
}

impl IntoResponse for WriteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let body = match self {
            WriteError::MissingParams { missing } => Json(MissingParamsBody {
                code,
                error: format!("Missing required parameter(s): {}", missing.join(", ")),
                help: "Please provide all required parameters.",
                missing,
            })
            .into_response(),
            WriteError::EmptyParam { field, help } => Json(EmptyParamBody {
                code,
                error: format!("{field} is required"),
                help,
            })
            .into_response(),
            WriteError::CredentialNotConfigured => Json(CredentialNotConfiguredBody {
                code,
                error: "Google service account key not configured",
                help: "Provide a service account key and make sure the spreadsheet is \
                       shared with the service account email.",
                setup_steps: [
                    "1. Get the service account email from the client_email field of the JSON key",
                    "2. Share your Google Sheet with that email",
                    "3. Pass the JSON key in secrets.service_account_key",
                ],
            })
            .into_response(),
            WriteError::CredentialInvalid { detail } => Json(CredentialInvalidBody {
                code,
                error: "Invalid service account key format. Must be valid JSON.",
                help: "Make sure the key is passed as a single-line JSON string.",
                detail,
            })
            .into_response(),
            WriteError::AccessDenied => Json(AccessDeniedBody {
                code,
                error: "Access denied to Google Sheet",
                help: "The service account does not have access to this spreadsheet.",
                solution: "Share the spreadsheet with the service account email \
                           or make it editable by link.",
                service_account_email: "Check the client_email field of your service account key",
            })
            .into_response(),
            WriteError::SpreadsheetNotFound => Json(NotFoundBody {
                code,
                error: "Google Sheet not found",
                help: "The spreadsheet id is invalid or the document has been deleted.",
                solution: "Check the id in the URL: \
                           https://docs.google.com/spreadsheets/d/[SPREADSHEET_ID]/edit",
            })
            .into_response(),
            WriteError::InvalidRange { available_sheets } => Json(InvalidRangeBody {
                code,
                error: "Invalid range format",
                help: RANGE_HELP,
                examples: RANGE_EXAMPLES,
                available_sheets,
            })
            .into_response(),
            WriteError::UpstreamBadRequest => Json(UpstreamBody {
                code,
                error: "Invalid request. Check your range format.".to_string(),
                help: Some("Use A1 notation like \"A1\" or \"Sheet1!A1\"."),
                upstream_code: Some(400),
            })
            .into_response(),
            WriteError::Upstream {
                message,
                upstream_code,
            } => {
                let error = if message.trim().is_empty() {
                    UNKNOWN_WRITE_ERROR.to_string()
                } else {
                    message
                };
                Json(UpstreamBody {
                    code,
                    error,
                    help: None,
                    upstream_code,
                })
                .into_response()
            }
        };
        (status, body).into_response()
    }
}

/// Maps a remote-service failure to a response body. Pure and total; never
/// retries.
pub fn classify(err: SheetsError) -> WriteError {
    match err {
        SheetsError::Api { code: 403, .. } => WriteError::AccessDenied,
        SheetsError::Api { code: 404, .. } => WriteError::SpreadsheetNotFound,
        SheetsError::Api { code: 400, .. } => WriteError::UpstreamBadRequest,
        SheetsError::Api { code, message } => WriteError::Upstream {
            message,
            upstream_code: Some(code),
        },
        SheetsError::Http(err) => WriteError::Upstream {
            upstream_code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        },
        SheetsError::Other(message) => WriteError::Upstream {
            message,
            upstream_code: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn classify_maps_access_denied() {
        let err = SheetsError::Api {
            code: 403,
            message: "The caller does not have permission".to_string(),
        };
        assert_matches!(classify(err), WriteError::AccessDenied);
    }

    #[test]
    fn classify_maps_not_found() {
        let err = SheetsError::Api {
            code: 404,
            message: "Requested entity was not found.".to_string(),
        };
        assert_matches!(classify(err), WriteError::SpreadsheetNotFound);
    }

    #[test]
    fn classify_maps_bad_request_to_range_guidance() {
        let err = SheetsError::Api {
            code: 400,
            message: "Unable to parse range".to_string(),
        };
        assert_matches!(classify(err), WriteError::UpstreamBadRequest);
    }

    #[test]
    fn classify_echoes_other_codes_verbatim() {
        let err = SheetsError::Api {
            code: 429,
            message: "Quota exceeded".to_string(),
        };
        assert_matches!(
            classify(err),
            WriteError::Upstream {
                message,
                upstream_code: Some(429),
            } if message == "Quota exceeded"
        );
    }

    #[test]
    fn status_classes_follow_category() {
        assert_eq!(
            WriteError::MissingParams { missing: vec!["range"] }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(WriteError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            WriteError::SpreadsheetNotFound.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WriteError::CredentialInvalid { detail: String::new() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credential_invalid_is_distinct_from_generic_upstream() {
        let config = WriteError::CredentialInvalid {
            detail: "expected value at line 1".to_string(),
        };
        let generic = WriteError::Upstream {
            message: "boom".to_string(),
            upstream_code: None,
        };
        assert_eq!(config.status(), generic.status());
        assert_ne!(config.code(), generic.code());
    }

    #[tokio::test]
    async fn upstream_body_uses_fixed_text_when_message_empty() {
        let response = WriteError::Upstream {
            message: "  ".to_string(),
            upstream_code: None,
        }
        .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], UNKNOWN_WRITE_ERROR);
        assert_eq!(body["code"], "UPSTREAM_ERROR");
    }
}
