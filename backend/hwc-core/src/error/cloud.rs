//! Classified errors for calls against cloud APIs.
//!
//! Retryability is fixed in the constructor from kind and code; the builder
//! methods only attach context. Every error carries an [`ErrorLocation`].

use common::{ErrorLocation, HttpStatusCode};

use std::fmt;

use thiserror::Error as ThisError;

/// Codes that make an otherwise unclassified error transient.
const RETRYABLE_UNKNOWN_CODES: &[&str] = &[
    "RequestTimeout",
    "ServiceUnavailable",
    "InternalError",
    "ThrottleException",
];

/// Closed taxonomy of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Permission,
    Validation,
    NotFound,
    Throttle,
    Network,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "AuthenticationError",
            ErrorKind::Permission => "PermissionError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Throttle => "ThrottleError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Server => "ServerError",
            ErrorKind::Unknown => "UnknownError",
        }
    }

    /// Static verdict for a kind. `Unknown` defers to the error code.
    pub fn is_retryable(&self, code: &str) -> bool {
        match self {
            ErrorKind::Network | ErrorKind::Server | ErrorKind::Throttle => true,
            ErrorKind::Auth | ErrorKind::Permission | ErrorKind::Validation | ErrorKind::NotFound => {
                false
            }
            ErrorKind::Unknown => RETRYABLE_UNKNOWN_CODES
                .iter()
                .any(|retryable| code.contains(retryable)),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by (or on the way to) a cloud API, with a fixed retry verdict.
#[derive(Debug, Clone, ThisError)]
#[error("[{code}] {message}{} {location}", request_id_suffix(.request_id))]
pub struct CloudError {
    kind: ErrorKind,
    code: String,
    message: String,
    details: Option<String>,
    request_id: Option<String>,
    status: Option<HttpStatusCode>,
    retryable: bool,
    location: ErrorLocation,
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (RequestID: {id})"),
        None => String::new(),
    }
}

impl CloudError {
    #[track_caller]
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let retryable = kind.is_retryable(&code);
        Self {
            kind,
            code,
            message: message.into(),
            details: None,
            request_id: None,
            status: None,
            retryable,
            location: ErrorLocation::caller(),
        }
    }

    /// Error derived purely from an HTTP status; the body is kept as details.
    #[track_caller]
    pub fn from_status(status: HttpStatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            kind: kind_for_status(status),
            code: format!("HTTP{}", status.0),
            message: message_for_status(status),
            details: (!body.is_empty()).then_some(body),
            request_id: None,
            status: Some(status),
            retryable: status.is_retryable(),
            location: ErrorLocation::caller(),
        }
    }

    /// Error recognised from a response body pattern, with the status it arrived with.
    #[track_caller]
    pub(crate) fn from_body_pattern(
        kind: ErrorKind,
        code: &str,
        message: &str,
        status: Option<HttpStatusCode>,
        body: &str,
    ) -> Self {
        let mut error = Self::new(kind, code, message);
        error.status = status;
        error.details = Some(body.to_string());
        error
    }

    #[track_caller]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, "AuthenticationFailed", message)
    }

    #[track_caller]
    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permission, "PermissionDenied", message)
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, "InvalidParameter", message)
    }

    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, "NetworkError", message)
    }

    #[track_caller]
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, "ServerError", message)
    }

    #[track_caller]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::NotFound,
            "NotFound",
            format!("resource '{resource}' does not exist"),
        )
    }

    /// The request body is a stream and cannot be read for hashing.
    #[track_caller]
    pub fn unreadable_body() -> Self {
        Self::new(
            ErrorKind::Network,
            "UnreadableBody",
            "request body is a stream and cannot be hashed for signing",
        )
    }

    /// Create from reqwest error with proper categorization.
    #[track_caller]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::new(ErrorKind::Network, "RequestTimeout", error.to_string());
        }
        if error.is_connect() {
            return Self::new(ErrorKind::Network, "ConnectionFailed", error.to_string());
        }

        if let Some(status) = error.status() {
            return Self::from_status(HttpStatusCode(status.as_u16()), error.to_string());
        }

        Self::new(ErrorKind::Network, "NetworkError", error.to_string())
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        if !request_id.is_empty() {
            self.request_id = Some(request_id);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn status(&self) -> Option<HttpStatusCode> {
        self.status
    }

    pub fn location(&self) -> ErrorLocation {
        self.location
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

fn kind_for_status(status: HttpStatusCode) -> ErrorKind {
    match status.0 {
        401 => ErrorKind::Auth,
        403 => ErrorKind::Permission,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::Throttle,
        _ if status.is_client_error() => ErrorKind::Validation,
        _ if status.is_server_error() => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    }
}

fn message_for_status(status: HttpStatusCode) -> String {
    match status.0 {
        400 => "bad request parameters".to_string(),
        401 => "authentication failed".to_string(),
        403 => "insufficient permissions".to_string(),
        404 => "resource not found".to_string(),
        429 => "request rate too high".to_string(),
        500 => "internal server error".to_string(),
        502 => "bad gateway".to_string(),
        503 => "service unavailable".to_string(),
        504 => "gateway timeout".to_string(),
        other => format!("HTTP error {other}"),
    }
}
