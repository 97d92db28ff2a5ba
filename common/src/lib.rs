//! Shared primitives for the spiritual dashboard workspace.
//!
//! Everything here is dependency-light and used by every other crate:
//!
//! - **ErrorLocation**: file/line/column captured at error construction
//! - **HttpStatusCode**: status code categorization used by the error classifier
//! - **RedactedToken**: bearer token that never leaks through Debug/Display/Serialize

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
