//! Access control and per-user command configuration for the Aia chat bot.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - [`aia_error`] error types
//! - [`aia_core`] command registry view and normalized identifiers
//! - [`aia_access`] whitelist, user profiles and the reloadable configuration unit

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use aia_access::*;
pub use aia_core::*;
pub use aia_error::*;
