//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use ed25519_dalek::{Signer, SigningKey};
use seatlock_license::{DeviceId, TokenIssuer};

/// Fixed seed so signatures are reproducible across runs.
pub const TEST_SEED: [u8; 32] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
    26, 27, 28, 29, 30, 31, 32,
];

/// Returns an issuer built from the fixed seed.
pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::from_seed(&TEST_SEED)
}

/// A fixed instant all scenarios start from.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn device(raw: &str) -> DeviceId {
    DeviceId::parse(raw).unwrap()
}

/// Signs an arbitrary payload string the same way the issuer does:
/// `base64url(payload_json).base64url(signature)`, signature over the encoded payload.
pub fn sign_raw(payload_json: &str) -> String {
    let signing_key = SigningKey::from_bytes(&TEST_SEED);
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    let signature = signing_key.sign(payload_b64.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
    format!("{payload_b64}.{sig_b64}")
}
