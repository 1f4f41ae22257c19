//! sheet-relay: a validating HTTP relay for Google Sheets writes.
//!
//! A single `POST /write` endpoint accepts a spreadsheet id, an A1 range, a
//! text value, a write mode, and a caller-supplied service-account key. The
//! core validates the request, authenticates against the Sheets API, checks
//! the range against the spreadsheet's real sheet names, performs exactly one
//! write (overwrite, append, or insert-row), and maps every failure into a
//! structured JSON error body. No state is retained across requests.

pub mod config;
pub mod errors;
pub mod model;
pub mod server;
pub mod sheets;
pub mod state;
pub mod validate;
pub mod write;
