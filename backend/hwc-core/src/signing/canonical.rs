//! Canonical request construction.
//!
//! Header names are lower-cased and sorted, so the output does not depend on
//! insertion order or the case the caller used.

use super::ALGORITHM;
use crate::error::CloudError;

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use sha2::{Digest, Sha256};
use url::Url;

/// Lower-cased, sorted view of a request's headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders {
    entries: BTreeMap<String, Vec<String>>,
}

impl CanonicalHeaders {
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in pairs {
            entries
                .entry(name.as_ref().to_ascii_lowercase())
                .or_default()
                .push(value.as_ref().to_string());
        }
        Self { entries }
    }

    /// # Errors
    ///
    /// Returns a `Validation` [`CloudError`] for a header value that is not UTF-8;
    /// signing a lossy copy would not match the bytes on the wire.
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, CloudError> {
        let pairs = headers
            .iter()
            .map(|(name, value)| {
                std::str::from_utf8(value.as_bytes())
                    .map(|value| (name.as_str(), value))
                    .map_err(|_| {
                        CloudError::validation(format!("header {name} is not valid UTF-8"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_pairs(pairs))
    }

    /// `name:value1,value2\n` for every header, in name order.
    pub fn canonical(&self) -> String {
        self.entries
            .iter()
            .map(|(name, values)| format!("{name}:{}\n", values.join(",")))
            .collect()
    }

    /// `;`-joined sorted header names.
    pub fn signed_headers(&self) -> String {
        self.entries
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Already-escaped path of the URL, `/` when empty.
pub fn canonical_uri(url: &Url) -> &str {
    match url.path() {
        "" => "/",
        path => path,
    }
}

/// Raw query string exactly as it appears in the URL.
pub fn canonical_query(url: &Url) -> &str {
    url.query().unwrap_or_default()
}

pub fn canonical_request(
    method: &str,
    uri: &str,
    query: &str,
    headers: &CanonicalHeaders,
    body_hash: &str,
) -> String {
    format!(
        "{method}\n{uri}\n{query}\n{}\n{}\n{body_hash}",
        headers.canonical(),
        headers.signed_headers()
    )
}

pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{}", super::TERMINATOR)
}

pub fn string_to_sign(timestamp: &str, credential_scope: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    )
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
