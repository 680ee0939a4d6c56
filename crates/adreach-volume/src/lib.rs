//! Reach normalization and daily aggregation of collected ads.
//!
//! Raw ad payloads are normalized into [`AdRecord`]s, expanded into one row
//! per day shown, summed into daily reach totals, and rendered as an HTML
//! chart.

pub mod chart;
pub mod daily;
pub mod dates;
pub mod reach;
pub mod records;

pub use chart::{render_chart, ChartOptions};
pub use daily::{aggregate_daily, daily_totals, expand_daily, DailyRow, DailyTotal};
pub use dates::parse_compact_date;
pub use reach::{parse_reach_value, ReachParseError};
pub use records::{
    load_records, load_records_from_path, normalize_entry, AdRecord, LoadError, LoadOutcome,
    Rejection,
};
