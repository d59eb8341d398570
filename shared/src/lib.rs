use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Wire format for every date that crosses a boundary (`YYYY-MM-DD`)
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// Surrounding whitespace is ignored. Anything else that does not name a real
/// calendar day (e.g. "2024-02-30") yields `None`.
pub fn parse_iso_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), ISO_DATE_FORMAT).ok()
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Booked and checkout-only dates for one property, as returned by an availability source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub property_id: String,
    /// Nights that are already taken (`YYYY-MM-DD`)
    pub booked_dates: Vec<String>,
    /// Days on which an existing booking ends (`YYYY-MM-DD`)
    pub checkout_only_dates: Vec<String>,
}

/// Loading state of the availability data behind a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// No property has been loaded yet
    Idle,
    /// A load is in flight; day availability is unknown
    Loading,
    /// Availability data is present and current
    Ready,
    /// The last load failed; the message is shown to the user as-is
    Failed { message: String },
}

impl AvailabilityStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AvailabilityStatus::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AvailabilityStatus::Loading)
    }

    /// Error message of a failed load, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AvailabilityStatus::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Selection change pushed to the host on every range change.
///
/// Unset ends are empty strings, matching what hosts bind to form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub start_date: String,
    pub end_date: String,
}

impl SelectionChange {
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start.map(format_iso_date).unwrap_or_default(),
            end_date: end.map(format_iso_date).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_empty() && self.end_date.is_empty()
    }
}

/// A fully classified day cell, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for padding days borrowed from the previous or next month
    pub is_current_month: bool,
    pub is_past: bool,
    pub is_today: bool,
    pub is_booked: bool,
    pub is_checkout_only: bool,
    /// Day may become either end of a range
    pub is_selectable: bool,
    /// Day may become the start of a range (checkout-only policy applied)
    pub can_check_in: bool,
    pub is_selected: bool,
    pub is_range_start: bool,
    pub is_range_end: bool,
    pub is_hover_preview: bool,
    /// False while availability is idle, loading or failed
    pub availability_known: bool,
}

/// Render-ready month view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1 = January
    pub month: u32,
    /// e.g. "June 2024"
    pub label: String,
    pub weekday_labels: Vec<String>,
    pub status: AvailabilityStatus,
    /// Always 42 days (6 weeks, Sunday first)
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Look up the classified cell for a date, if it is visible in this grid
    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.date == date)
    }

    /// The grid split into its six week rows
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }
}
