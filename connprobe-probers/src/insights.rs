//! Application Insights prober.
//!
//! Queries a metric with an app id and API key and reports the answer
//! verbatim. The connection string is `<app-id>;<app-key>`; everything after
//! the first `;` is the key, so keys containing `;` survive.

use async_trait::async_trait;
use connprobe_core::{ProbeError, ProbeOutcome};
use connprobe_fetch::{ProbeContext, Prober};
use tracing::{debug, instrument};
use url::Url;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Message for inputs that cannot hold an id and a key.
pub const FORMAT_HINT: &str =
    "Unexpected Connection String Format, should be \"<app-id>;<app-key>\"";

/// Splits `<app-id>;<app-key>` at the first `;`.
///
/// Without a `;` the whole input is the id and the key is empty.
pub fn split_app_credentials(input: &str) -> (&str, &str) {
    input.split_once(';').unwrap_or((input, ""))
}

/// Probes the telemetry query API with an app id and key.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightsProber;

impl InsightsProber {
    /// Creates a new Application Insights prober.
    pub fn new() -> Self {
        Self
    }

    fn metric_url(base: &str, app_id: &str) -> Result<Url, ProbeError> {
        let mut url = Url::parse(base).map_err(|e| ProbeError::invalid_endpoint("URL Parse", e))?;
        url.path_segments_mut()
            .map_err(|()| ProbeError::invalid_endpoint("URL Parse", format!("{base} cannot be a base")))?
            .pop_if_empty()
            .extend(["v1", "apps", app_id, "metrics", "requests", "duration"]);
        Ok(url)
    }
}

#[async_trait]
impl Prober for InsightsProber {
    fn id(&self) -> &str {
        "insights"
    }

    #[instrument(skip_all)]
    async fn probe(&self, ctx: &ProbeContext, input: &str) -> Result<ProbeOutcome, ProbeError> {
        if input.len() < 2 {
            return Err(ProbeError::Format(FORMAT_HINT.to_string()));
        }

        let (app_id, app_key) = split_app_credentials(input);
        let url = Self::metric_url(&ctx.settings.endpoints.insights_url, app_id)?;

        debug!(url = %url, "Querying Application Insights metric");
        let request = ctx.http.get(url).header(API_KEY_HEADER, app_key);

        Ok(ctx.http.execute(request).await)
    }
}
