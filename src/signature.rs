use axum::body::Bytes;
use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const ALGORITHM_PREFIX: &[u8] = b"sha256=";

#[derive(Debug, PartialEq)]
pub enum Signature {
    Valid(Bytes),
    Missing,
    InvalidAlgorithm,
    InvalidDigest,
}

impl Signature {
    pub fn status(&self) -> StatusCode {
        match self {
            Signature::Valid(_) => StatusCode::OK,
            Signature::Missing | Signature::InvalidAlgorithm => StatusCode::BAD_REQUEST,
            Signature::InvalidDigest => StatusCode::UNAUTHORIZED,
        }
    }

    /// What the caller gets to see. Decoding and comparison failures share
    /// one code.
    pub fn response_text(&self) -> &'static str {
        match self {
            Signature::Valid(_) => "OK",
            Signature::Missing => "MISSING_SIGNATURE",
            Signature::InvalidAlgorithm => "INVALID_SIGNATURE_HASH",
            Signature::InvalidDigest => "INVALID_DIGEST",
        }
    }

    pub fn log_message(&self) -> &'static str {
        match self {
            Signature::Valid(_) => "Received request with a valid signature",
            Signature::Missing => "Received request with a missing signature",
            Signature::InvalidAlgorithm => "Received request with an unexpected hash algorithm",
            Signature::InvalidDigest => "Received request with an invalid digest",
        }
    }
}

/// Checks a GitHub `X-Hub-Signature-256` header against the raw body.
///
/// Without a secret nothing can be authenticated, so every digest is rejected.
pub fn verify_signature(body: Bytes, header: Option<&[u8]>, secret: Option<&str>) -> Signature {
    let Some(header) = header else {
        return Signature::Missing;
    };

    let Some(raw_digest) = header.strip_prefix(ALGORITHM_PREFIX) else {
        return Signature::InvalidAlgorithm;
    };

    let Ok(digest) = hex::decode(raw_digest) else {
        return Signature::InvalidDigest;
    };

    let Some(secret) = secret else {
        return Signature::InvalidDigest;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return Signature::InvalidDigest;
    };
    mac.update(&body);

    // verify_slice compares in constant time
    match mac.verify_slice(&digest) {
        Ok(()) => Signature::Valid(body),
        Err(_) => Signature::InvalidDigest,
    }
}

#[cfg(test)]
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
