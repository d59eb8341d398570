//! Bookings and the availability they imply.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{format_iso_date, AvailabilityResponse};

use crate::domain::errors::CalendarError;

/// A confirmed stay: nights from `check_in` up to, not including, `check_out`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Format: "booking::<property_id>::<epoch_millis>"
    pub id: String,
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Booking {
    pub fn generate_id(property_id: &str, epoch_millis: u64) -> String {
        format!("booking::{}::{}", property_id, epoch_millis)
    }

    /// Booked nights, check-out day excluded
    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |night| *night < check_out)
    }

    pub fn overlaps(&self, other: &Booking) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Property ids double as directory names, so they must be plain path segments
pub fn validate_property_id(property_id: &str) -> Result<(), CalendarError> {
    let valid = !property_id.trim().is_empty()
        && property_id != "."
        && property_id != ".."
        && !property_id.chars().any(|c| c == '/' || c == '\\' || c.is_control());

    if valid {
        Ok(())
    } else {
        Err(CalendarError::InvalidPropertyId(property_id.to_string()))
    }
}

/// Derive the availability of a property from its bookings.
///
/// Every night of a booking is booked. A booking's check-out day is
/// checkout-only unless another booking occupies that night.
pub fn availability_from_bookings(property_id: &str, bookings: &[Booking]) -> AvailabilityResponse {
    let booked: BTreeSet<NaiveDate> = bookings.iter().flat_map(Booking::nights).collect();
    let checkout_only: BTreeSet<NaiveDate> = bookings
        .iter()
        .map(|booking| booking.check_out)
        .filter(|day| !booked.contains(day))
        .collect();

    AvailabilityResponse {
        property_id: property_id.to_string(),
        booked_dates: booked.into_iter().map(format_iso_date).collect(),
        checkout_only_dates: checkout_only.into_iter().map(format_iso_date).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn booking(id: &str, check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        Booking {
            id: id.to_string(),
            property_id: "p1".to_string(),
            check_in,
            check_out,
        }
    }

    #[test]
    fn test_generate_booking_id() {
        assert_eq!(Booking::generate_id("p1", 1702516122000), "booking::p1::1702516122000");
    }

    #[test]
    fn test_nights_exclude_check_out() {
        let stay = booking("b1", date(2024, 6, 10), date(2024, 6, 13));
        let nights: Vec<NaiveDate> = stay.nights().collect();
        assert_eq!(nights, vec![date(2024, 6, 10), date(2024, 6, 11), date(2024, 6, 12)]);
    }

    #[test]
    fn test_overlaps() {
        let first = booking("b1", date(2024, 6, 10), date(2024, 6, 13));
        let back_to_back = booking("b2", date(2024, 6, 13), date(2024, 6, 15));
        let overlapping = booking("b3", date(2024, 6, 12), date(2024, 6, 14));

        assert!(!first.overlaps(&back_to_back));
        assert!(first.overlaps(&overlapping));
        assert!(overlapping.overlaps(&back_to_back));
    }

    #[test]
    fn test_availability_from_bookings() {
        let bookings = vec![
            booking("b1", date(2024, 6, 10), date(2024, 6, 12)),
            booking("b2", date(2024, 6, 20), date(2024, 6, 21)),
        ];

        let response = availability_from_bookings("p1", &bookings);
        assert_eq!(response.property_id, "p1");
        assert_eq!(response.booked_dates, vec!["2024-06-10", "2024-06-11", "2024-06-20"]);
        assert_eq!(response.checkout_only_dates, vec!["2024-06-12", "2024-06-21"]);
    }

    #[test]
    fn test_back_to_back_check_out_is_booked_not_checkout_only() {
        let bookings = vec![
            booking("b1", date(2024, 6, 10), date(2024, 6, 12)),
            booking("b2", date(2024, 6, 12), date(2024, 6, 14)),
        ];

        let response = availability_from_bookings("p1", &bookings);
        assert!(response.booked_dates.contains(&"2024-06-12".to_string()));
        assert_eq!(response.checkout_only_dates, vec!["2024-06-14"]);
    }

    #[test]
    fn test_validate_property_id() {
        assert!(validate_property_id("beach-house-7").is_ok());
        assert!(validate_property_id("").is_err());
        assert!(validate_property_id("  ").is_err());
        assert!(validate_property_id("..").is_err());
        assert!(validate_property_id("a/b").is_err());
        assert!(validate_property_id("a\\b").is_err());
    }
}
