//! # Storage Module
//!
//! Availability data sources for the calendar engine:
//! - **traits**: the `AvailabilitySource` abstraction
//! - **memory**: an in-memory source for hosts and tests
//! - **csv**: a file-backed booking store that derives availability

pub mod traits;
pub mod memory;
pub mod csv;

pub use traits::*;
pub use memory::*;
pub use self::csv::{CsvBookingRepository, CsvConnection};
