//! Open-then-ping probe.

use async_trait::async_trait;
use connprobe_core::{ProbeError, ProbeOutcome};
use connprobe_fetch::{ProbeContext, Prober};
use tracing::{debug, instrument, warn};

use super::driver::SqlDriver;

/// Probes a database through a named driver.
#[derive(Debug, Clone)]
pub struct SqlProber {
    driver_name: String,
}

impl SqlProber {
    /// Creates a prober for the driver registered under `driver_name`.
    pub fn new(driver_name: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
        }
    }
}

#[async_trait]
impl Prober for SqlProber {
    fn id(&self) -> &str {
        &self.driver_name
    }

    // The connection string carries credentials; keep it out of spans.
    #[instrument(skip_all, fields(driver = %self.driver_name))]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        let options = SqlDriver::from_name(&self.driver_name)
            .and_then(|driver| driver.open(input, ctx.trust_store.as_deref()))
            .map_err(|e| ProbeError::invalid_endpoint("Connect", e))?;

        debug!("Pinging database");
        match tokio::time::timeout(ctx.timeout(), options.ping()).await {
            Ok(Ok(())) => Ok(ProbeOutcome::ok(format!(
                "Connect to {} with {input} Success!",
                self.driver_name
            ))),
            Ok(Err(e)) => {
                warn!(error = %e, "Database ping failed");
                Err(e)
            }
            Err(_) => Err(ProbeError::transport(
                "Ping",
                format!("timed out after {:?}", ctx.timeout()),
            )),
        }
    }
}
