//! Hover preview of a tentative range.
//!
//! While only a start date is chosen, pointing at another day previews the
//! range a click there would produce. The preview is a pure function of the
//! start, the hovered day and the visible days; nothing here is stored.

use chrono::NaiveDate;

use super::selection::{DateRange, SelectionState};

/// Inclusive span previewed between the chosen start and the hovered day.
///
/// Returns `None` unless the range is awaiting its end and a day is hovered.
/// Hovering before the start previews the would-be swapped range.
pub fn preview_span(range: &DateRange, hovered: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    if range.state() != SelectionState::AwaitingEnd {
        return None;
    }
    let start = range.start()?;
    let hovered = hovered?;
    Some((start.min(hovered), start.max(hovered)))
}

/// Preview flag for each of the given days, in order
pub fn preview_flags(range: &DateRange, hovered: Option<NaiveDate>, days: &[NaiveDate]) -> Vec<bool> {
    let span = preview_span(range, hovered);
    days.iter()
        .map(|day| span.map_or(false, |(from, to)| from <= *day && *day <= to))
        .collect()
}
