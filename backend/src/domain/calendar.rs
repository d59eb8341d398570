//! Calendar grid logic for the booking calendar.
//!
//! This module owns everything that depends only on the shape of the
//! Gregorian calendar: month arithmetic, the fixed 6×7 grid for a month,
//! human-readable month and weekday labels, and month navigation. Nothing
//! here knows about availability or selection; those are layered on by the
//! classifier.

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::info;

/// Number of slots in a month grid (6 weeks × 7 days)
pub const GRID_SLOTS: usize = 42;

/// Week rows are Sunday-first
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Identifies the month currently displayed (month is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Create a cursor, carrying out-of-range months into the year.
    ///
    /// `new(2024, 13)` is January 2025 and `new(2024, 0)` is December 2023.
    /// Years are clamped to 1..=9999.
    pub fn new(year: i32, month: i32) -> Self {
        let zero_based = i64::from(month) - 1;
        let year = i64::from(year) + zero_based.div_euclid(12);
        let month = zero_based.rem_euclid(12) as u32 + 1;

        if year < i64::from(MIN_YEAR) {
            return Self { year: MIN_YEAR, month: 1 };
        }
        if year > i64::from(MAX_YEAR) {
            return Self { year: MAX_YEAR, month: 12 };
        }

        Self { year: year as i32, month }
    }

    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month() as i32)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a number of months (negative goes back)
    pub fn offset(&self, months: i32) -> Self {
        Self::new(self.year, self.month as i32 + months)
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }

    pub fn previous(&self) -> Self {
        self.offset(-1)
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        // Always valid: year is clamped and month is 1..=12
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last day of the month
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human-readable label, e.g. "June 2024"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// One slot of the month grid before any classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub date: NaiveDate,
    pub is_current_month: bool,
}

/// Build the 42-slot grid for a month.
///
/// The grid starts on the Sunday on or before the 1st, so the first row holds
/// trailing days of the previous month and the last rows hold leading days of
/// the next month.
pub fn generate_grid(cursor: MonthCursor) -> Vec<GridSlot> {
    let first = cursor.first_day();
    let padding_before = first.weekday().num_days_from_sunday();
    let grid_start = first - Days::new(u64::from(padding_before));

    grid_start
        .iter_days()
        .take(GRID_SLOTS)
        .map(|date| GridSlot {
            date,
            is_current_month: cursor.contains(date),
        })
        .collect()
}

/// Owns the month cursor that seeds the grid
#[derive(Debug, Clone)]
pub struct MonthNavigator {
    cursor: MonthCursor,
}

impl MonthNavigator {
    pub fn new(cursor: MonthCursor) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    /// Navigate to the previous month
    pub fn navigate_previous_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.previous();
        info!("Navigated to previous month: {}", self.cursor.label());
        self.cursor
    }

    /// Navigate to the next month
    pub fn navigate_next_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.next();
        info!("Navigated to next month: {}", self.cursor.label());
        self.cursor
    }

    /// Jump to an arbitrary month; out-of-range months carry into the year
    pub fn go_to(&mut self, year: i32, month: i32) -> MonthCursor {
        self.cursor = MonthCursor::new(year, month);
        info!("Navigated to {}", self.cursor.label());
        self.cursor
    }

    /// Jump to the month containing a date
    pub fn go_to_date(&mut self, date: NaiveDate) -> MonthCursor {
        self.go_to(date.year(), date.month() as i32)
    }
}
