//! `details` command: per-ad detail fetch for every id in a collection file.

use std::path::Path;
use std::time::Duration;

use adreach_client::rate_limit::retry_rate_limited;
use adreach_client::AdLibraryClient;
use adreach_core::{AdId, AppConfig};
use serde_json::{json, Value};

use crate::output::{read_json, write_json_pretty};

/// Ids of every collection entry that has one, in file order.
pub(crate) fn ad_ids_from_collection(data: &Value) -> Vec<AdId> {
    data.as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("id").and_then(AdId::from_json))
        .collect()
}

/// Placeholder written in place of a detail payload that could not be
/// fetched.
pub(crate) fn failed_fetch_entry(id: &AdId, error: &str) -> Value {
    json!({ "ad_id": id.to_request_value(), "error": error })
}

/// Fetches details for each id of `input` sequentially and writes the raw
/// payloads, in input order, to `output`.
///
/// # Errors
///
/// Returns an error if credentials are missing, the input cannot be read,
/// authentication fails, or the output cannot be written. A failed fetch for
/// a single ad is recorded in the output and does not stop the run.
pub(crate) async fn run_details(
    config: &AppConfig,
    input: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let credentials = config.require_credentials()?;
    let ids = ad_ids_from_collection(&read_json(input)?);
    println!("found {} ad ids to process", ids.len());

    let mut client = AdLibraryClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.api_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build ad library client: {e}"))?;
    client
        .authenticate(&credentials)
        .await
        .map_err(|e| anyhow::anyhow!("authentication failed: {e}"))?;

    let backoff = Duration::from_secs(config.rate_limit_backoff_secs);
    let total = ids.len();
    let mut details = Vec::with_capacity(total);
    let mut failures = 0usize;

    for (index, id) in ids.iter().enumerate() {
        tracing::info!(ad_id = %id, "[{}/{total}] fetching ad details", index + 1);

        let fetched = retry_rate_limited(backoff, config.rate_limit_max_retries, || {
            client.fetch_ad_details(id)
        })
        .await;

        match fetched {
            Ok(payload) => details.push(payload),
            Err(e) => {
                tracing::warn!(ad_id = %id, error = %e, "failed to fetch ad details");
                failures += 1;
                details.push(failed_fetch_entry(id, &e.to_string()));
            }
        }
    }

    write_json_pretty(output, &details)?;
    println!(
        "saved {} ad details to {} ({failures} failed)",
        details.len(),
        output.display()
    );
    Ok(())
}
