//! Core data types for the Aia bot configuration unit.
//!
//! This crate provides the identifiers and the read-only command registry view
//! shared by the access-control stores and the dispatch layer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod command;
mod ident;

pub use command::{Command, CommandRegistry};
pub use ident::{Keyword, UserId};
