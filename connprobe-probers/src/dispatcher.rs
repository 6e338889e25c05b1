//! Kind dispatch.
//!
//! Maps a request's kind to its prober and turns every result into an
//! outcome. Built-in kinds match exactly; anything else is a SQL driver name.

use connprobe_core::{ProbeKind, ProbeOutcome, ProbeRequest};
use connprobe_fetch::{ProbeContext, Prober};
use tracing::{debug, info, instrument};

use crate::cosmos::CosmosProber;
use crate::descriptor::KindDescriptor;
use crate::insights::InsightsProber;
use crate::keyvault::KeyVaultProber;
use crate::nslookup::NslookupProber;
use crate::registry::KindRegistry;
use crate::sql::SqlProber;
use crate::storage::StorageProber;

/// Routes probe requests to probers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeDispatcher;

impl ProbeDispatcher {
    /// Creates a new dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Returns the prober for `kind`.
    pub fn prober_for(kind: &ProbeKind) -> Box<dyn Prober> {
        match kind {
            ProbeKind::Nslookup => Box::new(NslookupProber::new()),
            ProbeKind::KeyVault => Box::new(KeyVaultProber::new()),
            ProbeKind::Cosmos => Box::new(CosmosProber::new()),
            ProbeKind::Storage => Box::new(StorageProber::new()),
            ProbeKind::Insights => Box::new(InsightsProber::new()),
            ProbeKind::Sql(driver) => Box::new(SqlProber::new(driver.clone())),
        }
    }

    /// Runs one probe. Never fails; errors become outcomes.
    #[instrument(skip_all, fields(kind = %request.kind()))]
    pub async fn dispatch(&self, ctx: &ProbeContext, request: &ProbeRequest) -> ProbeOutcome {
        let kind = request.probe_kind();
        let prober = Self::prober_for(&kind);
        debug!(prober = prober.id(), sql = kind.is_sql(), "Dispatching probe");

        let outcome = prober
            .probe(ctx, request.connection_string())
            .await
            .unwrap_or_else(ProbeOutcome::from);

        info!(status = outcome.status_code, "Probe finished");
        outcome
    }

    /// Descriptors of the kinds this dispatcher knows by name.
    pub fn descriptors() -> &'static [KindDescriptor] {
        KindRegistry::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing() {
        let cases = [
            ("nslookup", "nslookup"),
            ("keyvault", "keyvault"),
            ("cosmos", "cosmos"),
            ("storage", "storage"),
            ("insights", "insights"),
            ("mysql", "mysql"),
            ("Cosmos", "Cosmos"),
            ("mssql", "mssql"),
        ];
        for (kind, id) in cases {
            assert_eq!(ProbeDispatcher::prober_for(&ProbeKind::parse(kind)).id(), id, "{kind}");
        }
    }

    #[tokio::test]
    async fn test_errors_become_outcomes() {
        let ctx = ProbeContext::new();
        let outcome = ProbeDispatcher::new()
            .dispatch(&ctx, &ProbeRequest::new("cosmos", "AccountKey=abc"))
            .await;
        assert_eq!(outcome, ProbeOutcome::new(400, "Unknown AccountEndpoint"));

        let outcome = ProbeDispatcher::new()
            .dispatch(&ctx, &ProbeRequest::new("oracle", "x"))
            .await;
        assert_eq!(outcome.status_code, 500);
        assert!(outcome.message.starts_with("Connect Error: sql: unknown driver \"oracle\""));
    }

    #[tokio::test]
    async fn test_empty_kind_is_unknown_driver() {
        let outcome = ProbeDispatcher::new()
            .dispatch(&ProbeContext::new(), &ProbeRequest::new("", "x"))
            .await;
        assert_eq!(
            outcome.message,
            "Connect Error: sql: unknown driver \"\" (forgotten import?)"
        );
    }
}
