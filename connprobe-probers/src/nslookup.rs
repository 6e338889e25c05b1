//! DNS lookup prober.

use std::net::IpAddr;

use async_trait::async_trait;
use connprobe_core::{ProbeError, ProbeOutcome};
use connprobe_fetch::{ProbeContext, Prober};
use tracing::{debug, instrument};

/// Resolves a hostname with the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct NslookupProber;

impl NslookupProber {
    /// Creates a new DNS lookup prober.
    pub fn new() -> Self {
        Self
    }
}

/// `LookupIP: <name> -> <ip> <ip> ` with a space after every address.
pub fn format_lookup(name: &str, ips: &[IpAddr]) -> String {
    let all: String = ips.iter().map(|ip| format!("{ip} ")).collect();
    format!("LookupIP: {name} -> {all}")
}

#[async_trait]
impl Prober for NslookupProber {
    fn id(&self) -> &str {
        "nslookup"
    }

    #[instrument(skip(self, ctx))]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        let lookup = tokio::net::lookup_host((input, 0));
        let addrs = tokio::time::timeout(ctx.timeout(), lookup)
            .await
            .map_err(|_| {
                ProbeError::transport("Lookup", format!("lookup {input}: timed out after {:?}", ctx.timeout()))
            })?
            .map_err(|e| ProbeError::transport("Lookup", format!("lookup {input}: {e}")))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        debug!(count = ips.len(), "Resolved addresses");

        Ok(ProbeOutcome::ok(format_lookup(input, &ips)))
    }
}
