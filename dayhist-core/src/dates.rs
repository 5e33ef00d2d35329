//! Target-date generation for historic ranges.
//!
//! Given a reference date (today), the generator lists the strictly earlier
//! calendar dates that share its month and day (annual) or its day-of-month
//! (monthly). Candidates that do not exist in a given year or month, such as
//! Feb 29 in a non-leap year or the 31st in a 30-day month, are skipped
//! rather than shifted to a neighbouring day.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::HistoricRange;

/// Years searched in annual mode when no lower bound is known.
pub const DEFAULT_ANNUAL_LOOKBACK_YEARS: u32 = 10;

/// Months searched in monthly mode when no lower bound is known.
pub const DEFAULT_MONTHLY_LOOKBACK_MONTHS: u32 = 36;

/// Earliest date worth querying when the source's first-recorded date is unknown.
pub fn fallback_lower_bound(reference: NaiveDate, range: HistoricRange) -> NaiveDate {
    let months = match range {
        HistoricRange::Annual => DEFAULT_ANNUAL_LOOKBACK_YEARS * 12,
        HistoricRange::Monthly => DEFAULT_MONTHLY_LOOKBACK_MONTHS,
    };
    reference
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Generates the target dates for `reference`, most recent first.
///
/// `lower_bound` is the earliest date data could exist; candidates before it
/// are not produced. `None` falls back to [`fallback_lower_bound`].
pub fn target_dates(
    reference: NaiveDate,
    range: HistoricRange,
    lower_bound: Option<NaiveDate>,
) -> Vec<NaiveDate> {
    let lower_bound = lower_bound.unwrap_or_else(|| fallback_lower_bound(reference, range));

    let dates = match range {
        HistoricRange::Annual => annual_dates(reference, lower_bound),
        HistoricRange::Monthly => monthly_dates(reference, lower_bound),
    };

    log::debug!(
        "Generated {} {} target dates for {} (lower bound {}).",
        dates.len(),
        range,
        reference,
        lower_bound
    );
    dates
}

fn annual_dates(reference: NaiveDate, lower_bound: NaiveDate) -> Vec<NaiveDate> {
    let (month, day) = (reference.month(), reference.day());

    ((lower_bound.year()..reference.year()).rev())
        .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| *date >= lower_bound)
        .collect()
}

fn monthly_dates(reference: NaiveDate, lower_bound: NaiveDate) -> Vec<NaiveDate> {
    let day = reference.day();
    let first_month = month_index(lower_bound);

    // Walk month indices (year * 12 + month0) from last month backwards.
    ((first_month..month_index(reference)).rev())
        .filter_map(|index| {
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .filter(|date| *date >= lower_bound)
        .collect()
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}
