//! Prober trait.
//!
//! A prober implements one capability: given the raw connection input,
//! attempt a handshake with one kind of backend and produce a diagnostic
//! outcome.

use async_trait::async_trait;
use connprobe_core::{ProbeError, ProbeOutcome};

use crate::context::ProbeContext;

/// A handshake against one kind of backend.
///
/// ## Implementing a Prober
///
/// ```ignore
/// struct EchoProber;
///
/// #[async_trait]
/// impl Prober for EchoProber {
///     fn id(&self) -> &str {
///         "echo"
///     }
///
///     async fn probe(&self, _ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
///         Ok(ProbeOutcome::ok(format!("Echo: {input}")))
///     }
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Identifier of the backend kind (e.g. `cosmos`, or the SQL driver name).
    fn id(&self) -> &str;

    /// Runs one probe attempt.
    ///
    /// Returns `Ok` for every answer that should be reported as-is, including
    /// pass-through outcomes carrying a downstream error status. `Err` is for
    /// failures detected locally or while talking to the backend; callers turn
    /// it into an outcome with [`ProbeOutcome::from`].
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError>;
}
