//! Verification request parsing and validation.
//!
//! Requests arrive as JSON (HTTP) or JSON/YAML files (CLI). They are checked
//! against an embedded JSON Schema first, then semantically.

mod parser;
mod schema;

pub use parser::{RequestError, VerificationRequest};
pub use schema::validate_request_schema;
