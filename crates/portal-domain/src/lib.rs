//! Domain types shared across portal crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod request;
pub mod user;
