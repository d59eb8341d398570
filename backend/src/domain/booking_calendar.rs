//! The booking calendar widget engine.
//!
//! `BookingCalendar` owns one widget's state: the month cursor, the current
//! range, the hovered day, the availability of the property it is scoped to,
//! and the loader fetching that availability. Hosts feed it clicks, hovers and
//! navigation, call [`BookingCalendar::view`] to get a render-ready month, and
//! receive a [`SelectionChange`] through their listener every time the range
//! changes.
//!
//! Interaction is disabled until availability is ready: while a load is in
//! flight, or after it failed, clicks and hovers are ignored and no day is
//! selectable.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{AvailabilityStatus, CalendarMonth, SelectionChange};
use tracing::{debug, error, info};

use super::availability::AvailabilityIndex;
use super::calendar::{generate_grid, MonthCursor, MonthNavigator, WEEKDAY_LABELS};
use super::classifier::{BookingRules, DayClassifier};
use super::errors::{CalendarError, CalendarResult};
use super::hover::preview_span;
use super::loader::{AvailabilityLoader, LoadOutcome};
use super::models::validate_property_id;
use super::selection::{DateRange, RangeSelection, SelectionListener, SelectionState};
use crate::config::CalendarConfig;
use crate::storage::AvailabilitySource;

pub struct BookingCalendar {
    today: NaiveDate,
    config: CalendarConfig,
    rules: BookingRules,
    navigator: MonthNavigator,
    selection: RangeSelection,
    hovered: Option<NaiveDate>,
    property_id: Option<String>,
    availability: Option<AvailabilityIndex>,
    status: AvailabilityStatus,
    loader: AvailabilityLoader,
}

impl BookingCalendar {
    /// Create a calendar showing the month of `today`, with no selection and no property
    pub fn new(source: Arc<dyn AvailabilitySource>, config: CalendarConfig, today: NaiveDate) -> Self {
        let rules = config.rules(today);
        Self {
            today,
            config,
            rules,
            navigator: MonthNavigator::new(MonthCursor::containing(today)),
            selection: RangeSelection::new(DateRange::empty()),
            hovered: None,
            property_id: None,
            availability: None,
            status: AvailabilityStatus::Idle,
            loader: AvailabilityLoader::new(source),
        }
    }

    /// Seed the selection from host-supplied `YYYY-MM-DD` strings.
    ///
    /// Malformed input degrades to a partial or empty selection. The calendar
    /// opens on the month of the initial start date. No notification is sent.
    pub fn with_initial_selection(mut self, start: &str, end: &str) -> Self {
        let range = DateRange::from_strings(start, end);
        if let Some(start) = range.start() {
            self.navigator.go_to_date(start);
        }
        self.selection.commit_silently(range);
        self
    }

    /// Register the listener notified on every selection change
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&SelectionChange) + Send + 'static,
    {
        let listener: SelectionListener = Box::new(listener);
        self.selection.set_listener(listener);
        self
    }

    // --- availability -----------------------------------------------------

    /// Scope the calendar to a property and start loading its availability.
    ///
    /// Switching to a different property drops the previous property's data
    /// immediately. Any load still in flight is superseded. On error the
    /// calendar is left untouched.
    pub fn load_property(&mut self, property_id: &str) -> CalendarResult<()> {
        validate_property_id(property_id)?;
        let generation = self.loader.start(property_id)?;

        if self.property_id.as_deref() != Some(property_id) {
            self.availability = None;
            self.property_id = Some(property_id.to_string());
        }
        self.status = AvailabilityStatus::Loading;
        self.hovered = None;
        info!("Loading availability for property {} (load #{})", property_id, generation);
        Ok(())
    }

    /// Load the current property's availability again, e.g. after a failure
    pub fn reload(&mut self) -> CalendarResult<()> {
        let property_id = self.property_id.clone().ok_or(CalendarError::NoProperty)?;
        self.load_property(&property_id)
    }

    /// Apply a finished load without waiting; returns whether state changed
    pub fn process_pending(&mut self) -> bool {
        match self.loader.try_next() {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait for the current load (if any) to finish and apply it
    pub async fn settle(&mut self) {
        if let Some(outcome) = self.loader.wait_current().await {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        if self.property_id.as_deref() != Some(outcome.property_id.as_str()) {
            debug!("Ignoring availability for property {} no longer shown", outcome.property_id);
            return;
        }

        match outcome.result {
            Ok(response) => {
                let index = AvailabilityIndex::from_response(&response);
                info!(
                    "Availability ready for property {}: {} booked, {} checkout-only",
                    outcome.property_id,
                    index.booked_count(),
                    index.checkout_only_count()
                );
                self.availability = Some(index);
                self.status = AvailabilityStatus::Ready;
            }
            Err(message) => {
                error!("Failed to load availability for property {}: {}", outcome.property_id, message);
                self.status = AvailabilityStatus::Failed { message };
            }
        }
    }

    pub fn status(&self) -> &AvailabilityStatus {
        &self.status
    }

    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    /// The last successfully loaded availability of the current property
    pub fn availability(&self) -> Option<&AvailabilityIndex> {
        self.availability.as_ref()
    }

    // --- selection --------------------------------------------------------

    fn classifier(&self) -> DayClassifier<'_> {
        let availability = if self.status.is_ready() {
            self.availability.as_ref()
        } else {
            None
        };
        DayClassifier::new(self.today, self.rules, availability)
    }

    /// The range a click on `date` would produce, or `None` if the click is
    /// refused: the day is not selectable, or it would become the start of the
    /// range without admitting check-in.
    fn range_after_click(&self, date: NaiveDate) -> Option<DateRange> {
        let classifier = self.classifier();
        if !classifier.is_selectable(date) {
            return None;
        }

        let current = self.selection.range();
        let next = current.after_click(date);
        let start_moves = next.start() != current.start() || current.state() != SelectionState::AwaitingEnd;
        match next.start() {
            Some(start) if start_moves && !classifier.can_check_in(start) => None,
            _ => Some(next),
        }
    }

    /// Handle a click on a day; returns whether the range changed
    pub fn click(&mut self, date: NaiveDate) -> bool {
        match self.range_after_click(date) {
            Some(next) => {
                self.hovered = None;
                self.selection.commit(next)
            }
            None => {
                debug!("Ignoring click on {}", date);
                false
            }
        }
    }

    /// Point at a day (or at nothing). Only tracked while a start is chosen
    /// and a click on the day would be accepted; anything else clears the
    /// preview.
    pub fn hover(&mut self, date: Option<NaiveDate>) {
        self.hovered = match date {
            Some(date)
                if self.selection.state() == SelectionState::AwaitingEnd
                    && self.range_after_click(date).is_some() =>
            {
                Some(date)
            }
            _ => None,
        };
    }

    /// Reset the selection; returns whether the range changed
    pub fn clear_selection(&mut self) -> bool {
        self.hovered = None;
        self.selection.clear()
    }

    pub fn selection(&self) -> DateRange {
        self.selection.range()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn hovered(&self) -> Option<NaiveDate> {
        self.hovered
    }

    // --- navigation -------------------------------------------------------

    pub fn cursor(&self) -> MonthCursor {
        self.navigator.cursor()
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.navigator.navigate_next_month()
    }

    pub fn previous_month(&mut self) -> MonthCursor {
        self.navigator.navigate_previous_month()
    }

    pub fn go_to(&mut self, year: i32, month: i32) -> MonthCursor {
        self.navigator.go_to(year, month)
    }

    pub fn go_to_today(&mut self) -> MonthCursor {
        self.navigator.go_to_date(self.today)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Move the "today" reference, e.g. when the host crosses midnight
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
        self.rules = self.config.rules(today);
        self.hover(self.hovered);
    }

    // --- rendering --------------------------------------------------------

    /// Classify the displayed month for rendering
    pub fn view(&self) -> CalendarMonth {
        let cursor = self.navigator.cursor();
        let range = self.selection.range();
        let classifier = self
            .classifier()
            .with_range(range)
            .with_hover_span(preview_span(&range, self.hovered));

        CalendarMonth {
            year: cursor.year(),
            month: cursor.month(),
            label: cursor.label(),
            weekday_labels: WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
            status: self.status.clone(),
            days: classifier.classify_grid(&generate_grid(cursor)),
        }
    }
}
