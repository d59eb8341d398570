//! Error types for the calendar engine.
//!
//! Interaction with the engine (clicks, hovers, navigation) never fails; it
//! can only be a no-op. The errors here cover starting availability loads.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    #[error("availability loads need a running tokio runtime")]
    NoRuntime,

    #[error("no property has been selected for this calendar")]
    NoProperty,

    #[error("invalid property id: {0:?}")]
    InvalidPropertyId(String),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
