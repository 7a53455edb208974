//! Trading-day coverage diagnostics for a return panel.

use cartera_primitives::Date;
use chrono::{Datelike, Duration, Weekday};

use crate::ReturnPanel;

/// Expected trading days per calendar month.
const TRADING_DAYS_PER_MONTH: usize = 21;

/// Trading days per year used for the coverage ratio.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Coverage of the observed panel dates against the calendar.
///
/// All quantities are derived from the panel's own first and last dates,
/// not from the requested window: a thinly traded universe reports the span
/// it actually covers.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingDayReport {
    /// First observed date.
    pub start: Date,
    /// Last observed date.
    pub end: Date,
    /// Calendar days spanned, endpoints inclusive.
    pub calendar_days: i64,
    /// Distinct dates with at least one observation.
    pub trading_days: usize,
    /// `trading_days / 252`.
    pub year_fraction: f64,
    /// Calendar months touched by the span times 21.
    pub expected_trading_days: usize,
    /// `(month name, year, observations)` per calendar month, ascending.
    pub monthly_trading_days: Vec<(String, i32, usize)>,
    /// Weekdays (Mon..Fri) in the span with no observation.
    pub missing_weekdays: Vec<Date>,
}

impl TradingDayReport {
    /// Build the report from a non-empty panel's observation dates.
    ///
    /// Returns `None` when the panel has no dates at all.
    #[must_use]
    pub fn from_panel(panel: &ReturnPanel) -> Option<Self> {
        let dates = panel.dates();
        let (&start, &end) = (dates.first()?, dates.last()?);

        let calendar_days = (end - start).num_days() + 1;
        let trading_days = dates.len();

        let months_spanned = (end.year() - start.year()) * 12
            + end.month0() as i32
            - start.month0() as i32
            + 1;
        let expected_trading_days = months_spanned.max(0) as usize * TRADING_DAYS_PER_MONTH;

        let mut monthly: Vec<(String, i32, usize)> = Vec::new();
        for d in dates {
            let key = (month_name(d.month()), d.year());
            match monthly.last_mut() {
                Some((name, year, count)) if *name == key.0 && *year == key.1 => *count += 1,
                _ => monthly.push((key.0, key.1, 1)),
            }
        }

        let mut missing_weekdays = Vec::new();
        let mut day = start;
        while day <= end {
            let weekday = day.weekday();
            if weekday != Weekday::Sat
                && weekday != Weekday::Sun
                && dates.binary_search(&day).is_err()
            {
                missing_weekdays.push(day);
            }
            day += Duration::days(1);
        }

        Some(Self {
            start,
            end,
            calendar_days,
            trading_days,
            year_fraction: trading_days as f64 / TRADING_DAYS_PER_YEAR,
            expected_trading_days,
            monthly_trading_days: monthly,
            missing_weekdays,
        })
    }
}

fn month_name(month: u32) -> String {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES[(month as usize).saturating_sub(1).min(11)].to_string()
}
