//! AWS4-HMAC-SHA256 request signing.
//!
//! The signer adds `X-Amz-Date` (or `X-Sdk-Date`) and `Host` before building the
//! canonical request, then sets `Authorization`. A fresh timestamp is taken on
//! every call, so re-signing a retried request always yields a new signature.

pub mod canonical;
pub mod key;

pub use canonical::CanonicalHeaders;
pub use key::SigningKey;

use crate::IAM_SERVICE_NAME;
use crate::config::Credentials;
use crate::error::CloudError;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HOST, HeaderName, HeaderValue};

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const TERMINATOR: &str = "aws4_request";
pub const AMZ_DATE_HEADER: &str = "x-amz-date";
pub const SDK_DATE_HEADER: &str = "x-sdk-date";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Which header carries the signing timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateHeader {
    #[default]
    Amz,
    Sdk,
}

impl DateHeader {
    pub fn name(&self) -> &'static str {
        match self {
            DateHeader::Amz => AMZ_DATE_HEADER,
            DateHeader::Sdk => SDK_DATE_HEADER,
        }
    }
}

/// Parts of the `Authorization` header, returned for inspection and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub timestamp: String,
    pub credential_scope: String,
    pub signed_headers: String,
    pub signature: String,
}

impl Signature {
    pub fn authorization(&self, access_key_id: &str) -> String {
        format!(
            "{ALGORITHM} Credential={access_key_id}/{}, SignedHeaders={}, Signature={}",
            self.credential_scope, self.signed_headers, self.signature
        )
    }
}

#[derive(Debug, Clone)]
pub struct Signer {
    service: String,
    date_header: DateHeader,
}

impl Default for Signer {
    fn default() -> Self {
        Self::new(IAM_SERVICE_NAME)
    }
}

impl Signer {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            date_header: DateHeader::default(),
        }
    }

    pub fn with_date_header(mut self, date_header: DateHeader) -> Self {
        self.date_header = date_header;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn date_header(&self) -> DateHeader {
        self.date_header
    }

    /// Sign `request` in place with the current time.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` [`CloudError`] if the URL has no host or a header value
    /// is not UTF-8, and a `Network` one if the body is a stream. Streaming bodies only
    /// exist with reqwest's `stream` feature, which this crate does not enable.
    pub fn sign(
        &self,
        request: &mut Request,
        credentials: &Credentials,
    ) -> Result<Signature, CloudError> {
        self.sign_at(request, credentials, Utc::now())
    }

    /// Sign `request` in place as of `now`.
    pub fn sign_at(
        &self,
        request: &mut Request,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<Signature, CloudError> {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let date = now.format(DATE_FORMAT).to_string();

        let body_hash = match request.body() {
            None => canonical::sha256_hex(b""),
            Some(body) => match body.as_bytes() {
                Some(bytes) => canonical::sha256_hex(bytes),
                // Streaming body; unreachable without reqwest's `stream` feature.
                None => return Err(CloudError::unreadable_body()),
            },
        };

        let host = host_header(request)?;
        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        headers.insert(
            HeaderName::from_static(self.date_header.name()),
            header_value(&timestamp)?,
        );
        headers.insert(HOST, header_value(&host)?);

        let canonical_headers = CanonicalHeaders::from_header_map(request.headers())?;
        let canonical_request = canonical::canonical_request(
            request.method().as_str(),
            canonical::canonical_uri(request.url()),
            canonical::canonical_query(request.url()),
            &canonical_headers,
            &body_hash,
        );
        debug!("Canonical request:\n{canonical_request}");

        let credential_scope =
            canonical::credential_scope(&date, &credentials.region, &self.service);
        let string_to_sign =
            canonical::string_to_sign(&timestamp, &credential_scope, &canonical_request);

        let key = SigningKey::derive(
            credentials.secret_access_key.as_str(),
            &date,
            &credentials.region,
            &self.service,
        );

        let signature = Signature {
            timestamp,
            credential_scope,
            signed_headers: canonical_headers.signed_headers(),
            signature: key.sign(&string_to_sign),
        };

        let authorization = signature.authorization(&credentials.access_key_id);
        request
            .headers_mut()
            .insert(AUTHORIZATION, header_value(&authorization)?);

        Ok(signature)
    }
}

fn host_header(request: &Request) -> Result<String, CloudError> {
    let url = request.url();
    let host = url
        .host_str()
        .ok_or_else(|| CloudError::validation(format!("request URL '{url}' has no host")))?;

    // `Url::port` is `None` for the scheme's default port.
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn header_value(value: &str) -> Result<HeaderValue, CloudError> {
    HeaderValue::from_str(value)
        .map_err(|e| CloudError::validation(format!("invalid header value '{value}': {e}")))
}
