//! # Domain Module
//!
//! Contains the availability calendar engine behind the booking widget.
//!
//! ## Module Organization
//!
//! - **calendar**: Month arithmetic, the 6×7 month grid and month navigation
//! - **availability**: Booked and checkout-only day lookup for one property
//! - **selection**: The two-click check-in/check-out range
//! - **hover**: Preview of the range a click would produce
//! - **classifier**: Per-day flags combining today, bounds, availability and selection
//! - **loader**: Asynchronous availability loads where the latest request wins
//! - **booking_calendar**: The widget facade hosts drive
//! - **models**: Bookings and the availability they imply
//!
//! ## Business Rules
//!
//! - Past days, booked days and days outside the configured bounds are never selectable
//! - The range start never lies after the range end
//! - Checkout-only days can end a stay; whether they can start one is configurable
//! - Nothing is selectable until the property's availability has loaded

pub mod availability;
pub mod booking_calendar;
pub mod calendar;
pub mod classifier;
pub mod errors;
pub mod hover;
pub mod loader;
pub mod models;
pub mod selection;

pub use availability::AvailabilityIndex;
pub use booking_calendar::BookingCalendar;
pub use calendar::{generate_grid, GridSlot, MonthCursor, MonthNavigator};
pub use classifier::{BookingRules, CheckoutOnlyPolicy, DayClassifier, SelectionBounds};
pub use errors::{CalendarError, CalendarResult};
pub use loader::{AvailabilityLoader, LoadOutcome};
pub use selection::{DateRange, RangeSelection, SelectionListener, SelectionState};
