//! Probe command - run one probe and report the outcome.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use connprobe_core::{ProbeOutcome, ProbeRequest};
use connprobe_fetch::{HttpClient, ProbeContext, TrustStore};
use connprobe_probers::ProbeDispatcher;
use tracing::{debug, warn};

use crate::config::Config;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the probe command.
#[derive(Args, Debug, Default)]
pub struct ProbeArgs {
    /// Backend kind (nslookup, keyvault, cosmos, storage, insights, or a SQL driver name).
    #[arg(long = "type", short = 't', value_name = "KIND")]
    pub kind: Option<String>,

    /// Connection string for the backend.
    #[arg(long, short = 'c', value_name = "STRING")]
    pub connection: Option<String>,
}

/// Runs the probe command and returns the outcome.
pub async fn run(args: &ProbeArgs, cli: &Cli, config: &Config) -> Result<ProbeOutcome> {
    let Some(kind) = args.kind.as_deref() else {
        bail!("missing --type; run `connprobe kinds` to list kinds");
    };
    let request = ProbeRequest::new(kind, args.connection.as_deref().unwrap_or_default());
    let probe_kind = request.probe_kind();

    let settings = config.probe_settings(cli.timeout);
    let http = HttpClient::try_with_timeout(settings.timeout).context("failed to build HTTP client")?;

    let mut builder = ProbeContext::builder().http(Arc::new(http)).settings(settings);
    match TrustStore::load(&config.trust_source()) {
        Ok(store) => {
            debug!(count = store.len(), "Trust store ready");
            builder = builder.trust_store(Arc::new(store));
        }
        Err(e) if probe_kind.is_sql() => {
            return Err(e).context("failed to initialise trust store");
        }
        Err(e) => warn!(error = %e, "Trust store unavailable"),
    }
    let ctx = builder.build();

    let outcome = ProbeDispatcher::new().dispatch(&ctx, &request).await;

    match cli.format {
        OutputFormat::Text if cli.quiet => println!("{}", outcome.message),
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_outcome(&outcome));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_outcome(request.kind(), &outcome)?);
        }
    }

    Ok(outcome)
}
