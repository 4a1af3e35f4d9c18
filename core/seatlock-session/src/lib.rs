//! Single-device session enforcement and license flows for Seatlock.
//!
//! This crate wires the license clock and token issuer to the account store:
//! - [`SessionRegistry`]: one live `(device, token)` pair per account
//! - [`SessionValidator`]: the four-step gate in front of protected calls
//! - [`LicenseService`]: login, refresh, check and the diagnostic validity check
//! - [`AdminService`]: account provisioning and license extension
//!
//! # Design Principles
//!
//! - **Derived, never cached**: remaining time and exclusivity are recomputed
//!   from the store on every request
//! - **Last login wins**: a new login supersedes any other device; the old
//!   device finds out on its next call
//! - **Tokens die with the license**: a token's lifetime is the remaining
//!   license time at the moment it was minted

mod admin;
mod credential;
mod error;
mod registry;
mod service;
mod validator;

pub use admin::{AdminService, MAX_ACCOUNT_ID_LEN};
pub use credential::{constant_time_eq, Argon2Credentials, CredentialVerifier, KdfParams};
pub use error::{AuthError, AuthResult};
pub use registry::SessionRegistry;
pub use service::{LicenseCheck, LicenseService, SessionGrant};
pub use validator::{SessionValidator, ValidatedSession};
