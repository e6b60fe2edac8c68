//! `riap-domain` — shared types for the Riap client crates.
//!
//! Holds the error type, the TOML-backed configuration and the structured
//! trace events that every other crate in the workspace builds on.

pub mod config;
pub mod error;
pub mod trace;
