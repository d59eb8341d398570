//! Day classification.
//!
//! Combines a grid slot with today's date, the selection bounds, the
//! availability index, the current range and the hover preview into a
//! render-ready [`CalendarDay`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::CalendarDay;

use super::availability::AvailabilityIndex;
use super::calendar::GridSlot;
use super::selection::DateRange;

/// Whether a checkout-only day may start a new range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutOnlyPolicy {
    /// Checkout-only days may end a range but never start one
    #[default]
    BlockCheckIn,
    /// Checkout-only days behave like any other free day
    Allow,
}

/// Caller-supplied limits on selectable dates. Today is always an implicit floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl SelectionBounds {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self { min, max }
    }

    /// Tighten the maximum to `today + days` if that is earlier than the current one
    pub fn with_max_advance(self, today: NaiveDate, days: Option<u32>) -> Self {
        let advance_limit = days.and_then(|d| today.checked_add_days(Days::new(u64::from(d))));
        let max = match (self.max, advance_limit) {
            (Some(max), Some(limit)) => Some(max.min(limit)),
            (max, limit) => max.or(limit),
        };
        Self { max, ..self }
    }

    /// Whether `date` lies within today, the minimum and the maximum
    pub fn allows(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date >= today
            && self.min.map_or(true, |min| date >= min)
            && self.max.map_or(true, |max| date <= max)
    }
}

/// The fixed rules a calendar classifies days against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingRules {
    pub bounds: SelectionBounds,
    pub checkout_only_policy: CheckoutOnlyPolicy,
}

/// Everything needed to classify the days of one render pass
#[derive(Debug, Clone, Copy)]
pub struct DayClassifier<'a> {
    today: NaiveDate,
    rules: BookingRules,
    /// `None` while availability is unknown (idle, loading or failed)
    availability: Option<&'a AvailabilityIndex>,
    range: DateRange,
    hover_span: Option<(NaiveDate, NaiveDate)>,
}

impl<'a> DayClassifier<'a> {
    pub fn new(today: NaiveDate, rules: BookingRules, availability: Option<&'a AvailabilityIndex>) -> Self {
        Self {
            today,
            rules,
            availability,
            range: DateRange::empty(),
            hover_span: None,
        }
    }

    pub fn with_range(self, range: DateRange) -> Self {
        Self { range, ..self }
    }

    pub fn with_hover_span(self, hover_span: Option<(NaiveDate, NaiveDate)>) -> Self {
        Self { hover_span, ..self }
    }

    fn is_booked(&self, date: NaiveDate) -> bool {
        self.availability.map_or(false, |index| index.is_booked(date))
    }

    fn is_checkout_only(&self, date: NaiveDate) -> bool {
        self.availability.map_or(false, |index| index.is_checkout_only(date))
    }

    /// A day may become a range endpoint: availability is known, the day is
    /// within bounds and not booked
    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.availability.is_some()
            && self.rules.bounds.allows(date, self.today)
            && !self.is_booked(date)
    }

    /// A day may become the start of a range
    pub fn can_check_in(&self, date: NaiveDate) -> bool {
        self.is_selectable(date)
            && (self.rules.checkout_only_policy == CheckoutOnlyPolicy::Allow
                || !self.is_checkout_only(date))
    }

    pub fn classify(&self, slot: GridSlot) -> CalendarDay {
        let date = slot.date;
        CalendarDay {
            date,
            is_current_month: slot.is_current_month,
            is_past: date < self.today,
            is_today: date == self.today,
            is_booked: self.is_booked(date),
            is_checkout_only: self.is_checkout_only(date),
            is_selectable: self.is_selectable(date),
            can_check_in: self.can_check_in(date),
            is_selected: self.range.contains(date),
            is_range_start: self.range.start() == Some(date),
            is_range_end: self.range.end() == Some(date),
            is_hover_preview: self
                .hover_span
                .map_or(false, |(from, to)| from <= date && date <= to),
            availability_known: self.availability.is_some(),
        }
    }

    pub fn classify_grid(&self, slots: &[GridSlot]) -> Vec<CalendarDay> {
        slots.iter().map(|slot| self.classify(*slot)).collect()
    }
}
