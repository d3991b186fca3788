//! Session auth types shared across portal crates.
//!
//! Provides session JWT validation (and issuance behind the `issuer` feature),
//! the session cookie builders, and the `Session` extractor with its role gate.

pub mod cookie;
pub mod session;
pub mod token;
