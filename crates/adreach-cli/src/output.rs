//! File naming and JSON persistence for command output.

use std::path::Path;

use adreach_client::DateWindow;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Replaces every non-alphanumeric character of a search term with `_`.
pub(crate) fn keyword_safe(term: &str) -> String {
    term.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `tiktok_ad_ids_{country}_{keyword}_{start}_to_{end}_{run timestamp}.json`
pub(crate) fn collection_file_name(
    country: &str,
    term: &str,
    window: &DateWindow,
    run_at: NaiveDateTime,
) -> String {
    format!(
        "tiktok_ad_ids_{country}_{keyword}_{start}_to_{end}_{stamp}.json",
        keyword = keyword_safe(term),
        start = window.start.format("%Y%m%d"),
        end = window.end.format("%Y%m%d"),
        stamp = run_at.format("%Y%m%d_%H%M%S"),
    )
}

/// Writes `value` to `path` as indented JSON, replacing any existing file.
pub(crate) fn write_json_pretty<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("failed to serialize output for {}: {e}", path.display()))?;
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}

/// Reads and parses a JSON file.
pub(crate) fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {e}", path.display()))
}
