//! `plot` command: daily reach chart from a file of ad payloads.

use std::path::Path;

use adreach_volume::{daily_totals, load_records_from_path, render_chart, ChartOptions, LoadError};

/// Loads ads from `input`, sums reach per day, and writes the chart to
/// `output`.
///
/// A missing input file or an input with no usable ads prints a diagnostic
/// and returns without writing a chart.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed for a reason
/// other than not existing, or if the chart cannot be written.
pub(crate) fn run_plot(input: &Path, output: &Path, title: Option<String>) -> anyhow::Result<()> {
    let outcome = match load_records_from_path(input) {
        Ok(outcome) => outcome,
        Err(LoadError::NotFound { path }) => {
            println!(
                "input file {} was not found; check the path and try again",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if outcome.rejected_total() > 0 {
        let reasons: Vec<String> = outcome
            .rejected
            .iter()
            .map(|(reason, count)| format!("{reason}={count}"))
            .collect();
        println!(
            "skipped {} malformed ad entries ({})",
            outcome.rejected_total(),
            reasons.join(", ")
        );
    }

    if outcome.records.is_empty() {
        println!("no ad data was processed; check the input file");
        return Ok(());
    }

    let totals = daily_totals(&outcome.records);
    let options = title.map_or_else(ChartOptions::default, |title| ChartOptions { title });
    std::fs::write(output, render_chart(&totals, &options))
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", output.display()))?;

    println!(
        "charted {} ads over {} days to {}",
        outcome.records.len(),
        totals.len(),
        output.display()
    );
    Ok(())
}
