//! Expansion of ads into per-day rows and aggregation into daily reach
//! totals.

use std::collections::BTreeMap;

use adreach_core::AdId;
use chrono::NaiveDate;
use serde::Serialize;

use crate::records::AdRecord;

/// One day on which one ad was shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub ad_id: AdId,
    pub reach_volume: f64,
    pub advertiser: String,
}

/// Summed reach of every ad shown on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_reach: f64,
}

/// Emits one row per calendar day from `first_shown` through `last_shown`
/// inclusive for every record. Each row carries its record's full reach.
#[must_use]
pub fn expand_daily(records: &[AdRecord]) -> Vec<DailyRow> {
    records
        .iter()
        .flat_map(|record| {
            record
                .first_shown
                .iter_days()
                .take_while(move |day| *day <= record.last_shown)
                .map(move |date| DailyRow {
                    date,
                    ad_id: record.id.clone(),
                    reach_volume: record.reach_volume,
                    advertiser: record.advertiser.clone(),
                })
        })
        .collect()
}

/// Sums reach per date. One total per distinct date, ascending.
#[must_use]
pub fn aggregate_daily(rows: &[DailyRow]) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.date).or_insert(0.0) += row.reach_volume;
    }
    totals
        .into_iter()
        .map(|(date, total_reach)| DailyTotal { date, total_reach })
        .collect()
}

/// [`expand_daily`] followed by [`aggregate_daily`].
#[must_use]
pub fn daily_totals(records: &[AdRecord]) -> Vec<DailyTotal> {
    aggregate_daily(&expand_daily(records))
}
