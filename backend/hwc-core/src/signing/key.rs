use super::TERMINATOR;

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Key derived from the secret for one date/region/service, as four chained
/// HMAC-SHA256 rounds over `"AWS4" + secret`.
#[derive(Clone)]
pub struct SigningKey(Hmac<Sha256>);

impl SigningKey {
    pub fn derive(secret_key: &str, date: &str, region: &str, service: &str) -> Self {
        let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
        let region_key = hmac_sha256(&date_key, region.as_bytes());
        let service_key = hmac_sha256(&region_key, service.as_bytes());
        let signing_key = hmac_sha256(&service_key, TERMINATOR.as_bytes());

        Self(Hmac::new_from_slice(&signing_key).expect("HMAC can take key of any size"))
    }

    /// Lowercase hex HMAC of `string_to_sign`.
    pub fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = self.0.clone();
        mac.update(string_to_sign.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of a hex signature against `string_to_sign`.
    pub fn verify(&self, string_to_sign: &str, signature_hex: &str) -> bool {
        let Ok(expected) = hex::decode(signature_hex) else {
            return false;
        };
        let mut mac = self.0.clone();
        mac.update(string_to_sign.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey([REDACTED])")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
