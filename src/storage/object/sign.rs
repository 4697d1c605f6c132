//! Keyed-HMAC request signing for the object-store client.
//!
//! Every request carries a date header and an `Authorization` header whose
//! signature covers the method, the path with query, and the date. The
//! store verifies the signature with the secret belonging to the access
//! key.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt::Write;

/// Name of the request date header covered by the signature.
pub(crate) const DATE_HEADER: &str = "x-kftpd-date";

const SCHEME: &str = "KFTPD1-HMAC-SHA256";

/// The access/secret key pair identifying the server against the store.
#[derive(Clone)]
pub(crate) struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in logs.
        f.debug_struct("Credentials").field("access_key", &self.access_key).finish()
    }
}

impl Credentials {
    /// The value for the `Authorization` header of one request.
    pub fn authorization(&self, method: &str, path_and_query: &str, date: &str) -> String {
        let string_to_sign = format!("{}\n{}\n{}", method, path_and_query, date);
        let signature = hmac_sha256_hex(self.secret_key.as_bytes(), string_to_sign.as_bytes());
        format!(
            "{} Credential={},Signature={}",
            SCHEME, self.access_key, signature
        )
    }
}

/// The date header value for `now`, second precision, UTC.
pub(crate) fn date_value(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(message);
    let digest = mac.finalize().into_bytes();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn hmac_matches_rfc4231_vector() {
        // RFC 4231, test case 2.
        assert_eq!(
            hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn authorization_shape() {
        let creds = Credentials {
            access_key: "AK".to_string(),
            secret_key: "SK".to_string(),
        };
        let auth = creds.authorization("GET", "/storage/v1/b/bkt/o/key", "20200517T103000Z");
        assert!(auth.starts_with("KFTPD1-HMAC-SHA256 Credential=AK,Signature="));
        let signature = auth.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_deterministic_and_keyed() {
        let creds = Credentials {
            access_key: "AK".to_string(),
            secret_key: "SK".to_string(),
        };
        let other = Credentials {
            secret_key: "OTHER".to_string(),
            ..creds.clone()
        };
        let a = creds.authorization("GET", "/p", "20200517T103000Z");
        let b = creds.authorization("GET", "/p", "20200517T103000Z");
        let c = other.authorization("GET", "/p", "20200517T103000Z");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn date_format() {
        let when = Utc.with_ymd_and_hms(2020, 5, 17, 10, 30, 0).unwrap();
        assert_eq!(date_value(when), "20200517T103000Z");
    }
}
