//! Shared leaf types for the hwcctl workspace.
//!
//! Nothing in here knows about credentials resolution, signing or retries.
//! These are the building blocks the other crates agree on:
//!
//! - [`ErrorLocation`]: file/line/column captured with `#[track_caller]`
//! - [`HttpStatusCode`]: status codes kept as numbers, never parsed from messages
//! - [`RedactedSecret`]: secret strings that cannot leak through logs or serde

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
