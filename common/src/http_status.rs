//! HTTP status code helpers shared by error classification and retry logic.

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const BAD_REQUEST: Self = Self(400);
    pub const UNAUTHORIZED: Self = Self(401);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const TOO_MANY_REQUESTS: Self = Self(429);
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);
    pub const BAD_GATEWAY: Self = Self(502);
    pub const SERVICE_UNAVAILABLE: Self = Self(503);
    pub const GATEWAY_TIMEOUT: Self = Self(504);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// Throttling and every 5xx are transient; other codes are not.
    pub fn is_retryable(&self) -> bool {
        self.0 == 429 || self.is_server_error()
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
