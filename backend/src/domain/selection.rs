//! Two-click range selection.
//!
//! The selection is a [`DateRange`] whose state (`Empty`, `AwaitingEnd`,
//! `Complete`) is derived from which ends are set. Transitions are computed as
//! pure values by [`DateRange::after_click`] so callers can inspect a candidate
//! range before committing it; [`RangeSelection`] commits ranges and notifies
//! the host listener whenever the range actually changes.

use std::fmt;

use chrono::NaiveDate;
use shared::{parse_iso_date, SelectionChange};
use tracing::debug;

/// Listener invoked synchronously with the new range after every change
pub type SelectionListener = Box<dyn FnMut(&SelectionChange) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    AwaitingEnd,
    Complete,
}

/// A check-in/check-out range; `start <= end` whenever both are set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A range with only a start chosen
    pub fn starting(start: NaiveDate) -> Self {
        Self { start: Some(start), end: None }
    }

    /// A complete range; the ends are swapped if given out of order
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        Self { start: Some(a.min(b)), end: Some(a.max(b)) }
    }

    /// Build a range from host-supplied `YYYY-MM-DD` strings.
    ///
    /// An unparsable start degrades to an empty range and an unparsable end
    /// degrades to a start-only range.
    pub fn from_strings(start: &str, end: &str) -> Self {
        match (parse_iso_date(start), parse_iso_date(end)) {
            (Some(start), Some(end)) => Self::between(start, end),
            (Some(start), None) => Self::starting(start),
            (None, _) => Self::empty(),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn state(&self) -> SelectionState {
        match (self.start, self.end) {
            (Some(_), Some(_)) => SelectionState::Complete,
            (Some(_), None) => SelectionState::AwaitingEnd,
            (None, _) => SelectionState::Empty,
        }
    }

    /// Inclusive membership; only a complete range contains anything
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// Number of nights between check-in and check-out of a complete range
    pub fn nights(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }

    /// The range that a click on `date` would produce.
    ///
    /// From `Empty` or `Complete` the click starts a fresh selection. From
    /// `AwaitingEnd` it completes the range, swapping the ends when the click
    /// lands before the current start.
    pub fn after_click(&self, date: NaiveDate) -> DateRange {
        match (self.state(), self.start) {
            (SelectionState::AwaitingEnd, Some(start)) if date < start => {
                DateRange { start: Some(date), end: Some(start) }
            }
            (SelectionState::AwaitingEnd, Some(start)) => {
                DateRange { start: Some(start), end: Some(date) }
            }
            _ => DateRange::starting(date),
        }
    }

    pub fn to_change(&self) -> SelectionChange {
        SelectionChange::from_dates(self.start, self.end)
    }
}

/// Holds the current range and notifies the host on every change
pub struct RangeSelection {
    range: DateRange,
    listener: Option<SelectionListener>,
}

impl RangeSelection {
    pub fn new(initial: DateRange) -> Self {
        Self { range: initial, listener: None }
    }

    pub fn with_listener(initial: DateRange, listener: SelectionListener) -> Self {
        Self { range: initial, listener: Some(listener) }
    }

    pub fn set_listener(&mut self, listener: SelectionListener) {
        self.listener = Some(listener);
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn state(&self) -> SelectionState {
        self.range.state()
    }

    /// Reset to `Empty`; returns whether the range changed
    pub fn clear(&mut self) -> bool {
        self.commit(DateRange::empty())
    }

    /// Replace the range, notifying the listener if it differs from the current one
    pub fn commit(&mut self, next: DateRange) -> bool {
        if next == self.range {
            return false;
        }

        debug!("Selection {:?} -> {:?} ({:?})", self.range, next, next.state());
        self.range = next;

        if let Some(listener) = self.listener.as_mut() {
            listener(&next.to_change());
        }
        true
    }

    /// Replace the range without notifying, for seeding host-supplied values
    pub fn commit_silently(&mut self, next: DateRange) {
        self.range = next;
    }
}

impl fmt::Debug for RangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSelection")
            .field("range", &self.range)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
