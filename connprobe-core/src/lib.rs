// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # connprobe Core
//!
//! Core types shared by every connprobe crate:
//!
//! - [`ProbeRequest`] - the (kind, connection string) pair a probe starts from
//! - [`ProbeKind`] - which backend to talk to, with SQL as the fallback
//! - [`ProbeOutcome`] - the uniform (status code, message) result
//! - [`ProbeError`] - the failure taxonomy and its status-code mapping
//! - [`ParsedFields`] - lenient `Key=Value;...` connection-string parsing

pub mod connection_string;
pub mod error;
pub mod models;

pub use connection_string::ParsedFields;
pub use error::ProbeError;
pub use models::{ProbeKind, ProbeOutcome, ProbeRequest};
