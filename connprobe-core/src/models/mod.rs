//! Domain models for connprobe.
//!
//! ## Submodules
//!
//! - [`kind`] - Backend selection (`ProbeKind`)
//! - [`request`] - Probe input (`ProbeRequest`)
//! - [`outcome`] - Uniform probe result (`ProbeOutcome`)

mod kind;
mod outcome;
mod request;

pub use kind::ProbeKind;
pub use outcome::ProbeOutcome;
pub use request::ProbeRequest;
#[cfg(test)]
mod serde_tests;
