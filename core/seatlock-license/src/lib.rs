//! License clock, signed session tokens and device identifiers for Seatlock.
//!
//! This crate is pure computation. It never touches storage:
//! - Remaining license time derived from an immutable activation timestamp
//! - Ed25519-signed bearer tokens bound to an account and a device
//! - Validated device identifiers
//!
//! # Token Format
//!
//! Tokens are formatted as: `base64url(payload).base64url(signature)`
//! The payload is a JSON object signed with Ed25519, containing:
//! - Account ID, device ID, issued-at, expiry and a random token ID
//!
//! A token that verifies here is not necessarily usable: the session
//! registry decides whether it is still the live token for its device.

mod clock;
mod device;
mod error;
mod token;

pub use clock::{is_expired, remaining, Clock, ManualClock, SystemClock};
pub use device::{DeviceId, MAX_DEVICE_ID_LEN};
pub use error::{LicenseError, LicenseResult};
pub use token::{TokenClaims, TokenIssuer, TokenVerifier, MAX_CLOCK_SKEW_SECS};
