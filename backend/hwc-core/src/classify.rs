//! Maps raw failures onto the [`ErrorKind`] taxonomy.
//!
//! Precedence:
//! 1. An already-typed [`CloudError`] is passed through untouched
//! 2. Response body substrings (case-sensitive, first match wins)
//! 3. The HTTP status table

use crate::error::{CloudError, ErrorKind};

use common::HttpStatusCode;

struct BodyPattern {
    needles: &'static [&'static str],
    kind: ErrorKind,
    code: &'static str,
    message: &'static str,
}

const BODY_PATTERNS: &[BodyPattern] = &[
    BodyPattern {
        needles: &["Invalid", "invalid"],
        kind: ErrorKind::Validation,
        code: "InvalidParameter",
        message: "invalid request parameters",
    },
    BodyPattern {
        needles: &["Unauthorized", "unauthorized"],
        kind: ErrorKind::Auth,
        code: "Unauthorized",
        message: "authentication failed, check the access key",
    },
    BodyPattern {
        needles: &["Forbidden", "forbidden"],
        kind: ErrorKind::Permission,
        code: "Forbidden",
        message: "insufficient permissions, check the account policy",
    },
];

/// Stateless, table-driven error classifier.
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify whatever is known about a failure.
    ///
    /// A `typed` error wins outright; classification never overrides an explicit verdict.
    #[track_caller]
    pub fn classify(
        status: Option<u16>,
        body: Option<&str>,
        typed: Option<CloudError>,
    ) -> CloudError {
        if let Some(error) = typed {
            return error;
        }

        let status = status.map(HttpStatusCode);

        if let Some(body) = body {
            if let Some(error) = Self::match_body(status, body) {
                return error;
            }
        }

        match status {
            Some(status) => CloudError::from_status(status, body.unwrap_or_default()),
            None => {
                let error = CloudError::new(ErrorKind::Unknown, "Unknown", "unclassified failure");
                match body {
                    Some(body) if !body.is_empty() => error.with_details(body),
                    _ => error,
                }
            }
        }
    }

    /// Status-only classification.
    #[track_caller]
    pub fn classify_status(status: u16) -> CloudError {
        CloudError::from_status(HttpStatusCode(status), String::new())
    }

    /// Classification of a non-success HTTP response.
    #[track_caller]
    pub fn classify_response(status: u16, body: &str) -> CloudError {
        Self::classify(Some(status), Some(body), None)
    }

    #[track_caller]
    fn match_body(status: Option<HttpStatusCode>, body: &str) -> Option<CloudError> {
        BODY_PATTERNS
            .iter()
            .find(|pattern| pattern.needles.iter().any(|needle| body.contains(needle)))
            .map(|pattern| {
                CloudError::from_body_pattern(
                    pattern.kind,
                    pattern.code,
                    pattern.message,
                    status,
                    body,
                )
            })
    }
}
