//! Lookback window and its partition into fixed-length date chunks.
//!
//! Each chunk becomes the published-date filter of one paginated search. The
//! server applies the filter itself, so ads near a chunk boundary may show up
//! in two neighbouring chunks; the collector deduplicates them.

use chrono::{Days, Months, NaiveDate};

/// The overall collection window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One sub-interval of a [`DateWindow`], both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window ending yesterday and reaching `months` calendar months back.
    ///
    /// Today is excluded because its data is still incomplete. Month
    /// arithmetic clamps to the last day of shorter months
    /// (2024-03-31 minus one month is 2024-02-29).
    #[must_use]
    pub fn lookback(today: NaiveDate, months: u32) -> Self {
        let end = today.checked_sub_days(Days::new(1)).unwrap_or(NaiveDate::MIN);
        let start = end
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Splits the window into consecutive chunks of `chunk_days` days.
    ///
    /// Chunks start at `start` and advance by `chunk_days`; the last chunk is
    /// clipped to `end`. A chunk is only started while its first day is
    /// before `end`, so a zero-length window yields no chunks. `chunk_days`
    /// of zero is treated as one.
    #[must_use]
    pub fn chunks(&self, chunk_days: u32) -> Vec<DateChunk> {
        let step = u64::from(chunk_days.max(1));
        let mut chunks = Vec::new();
        let mut cursor = self.start;

        while cursor < self.end {
            let chunk_end = cursor
                .checked_add_days(Days::new(step - 1))
                .map_or(self.end, |d| d.min(self.end));
            chunks.push(DateChunk {
                start: cursor,
                end: chunk_end,
            });

            match cursor.checked_add_days(Days::new(step)) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        chunks
    }
}
