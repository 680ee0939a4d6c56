//! `collect` command: date-windowed ad id collection for one or more search
//! terms.

use std::path::Path;

use adreach_client::{collect_ad_ids, AdLibraryClient, CollectorSettings, SearchTarget, StopReason};
use adreach_core::AppConfig;
use chrono::Local;

use crate::output::{collection_file_name, write_json_pretty};

/// Collects every term in turn and writes one collection file per term.
///
/// Credentials are checked before any request is made. Terms are
/// independent: request failures inside a term only cost the affected
/// chunks, and a term whose output cannot be written does not stop the
/// remaining terms.
///
/// # Errors
///
/// Returns an error if credentials are missing, the client cannot be built
/// or authenticated, the output directory cannot be created, or any term's
/// output file could not be written.
pub(crate) async fn run_collect(
    config: &AppConfig,
    terms: &[String],
    country: Option<&str>,
    months_back: Option<u32>,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let credentials = config.require_credentials()?;
    let country = country.unwrap_or(&config.country);
    let months_back = months_back.unwrap_or(config.months_back);

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

    std::fs::create_dir_all(output_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create output directory {}: {e}",
            output_dir.display()
        )
    })?;

    let settings = CollectorSettings::from_config(config);
    let mut failed_terms = Vec::new();

    for term in terms {
        let target = SearchTarget {
            term: term.as_str(),
            country,
            months_back,
        };
        let collection =
            collect_ad_ids(&client, &target, &settings, Local::now().date_naive()).await;

        let path = output_dir.join(collection_file_name(
            country,
            term,
            &collection.window,
            Local::now().naive_local(),
        ));

        if let Err(e) = write_json_pretty(&path, &collection.ads) {
            tracing::error!(term = %term, error = %e, "failed to save collection");
            failed_terms.push(term.as_str());
            continue;
        }

        let note = match collection.stop {
            StopReason::TotalCapReached => " (per-term cap reached)",
            StopReason::WindowExhausted => "",
        };
        println!(
            "{term}: saved {} ads to {}{note}",
            collection.ads.len(),
            path.display()
        );
        if collection.chunks_abandoned > 0 {
            println!(
                "{term}: {} date chunk(s) were cut short by request errors",
                collection.chunks_abandoned
            );
        }
    }

    if !failed_terms.is_empty() {
        anyhow::bail!(
            "could not save results for {} term(s): {}",
            failed_terms.len(),
            failed_terms.join(", ")
        );
    }

    Ok(())
}
