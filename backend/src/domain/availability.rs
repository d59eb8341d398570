//! Availability index for a single property.
//!
//! Holds the booked and checkout-only dates as hash sets of calendar dates so
//! the classifier can answer membership in O(1). Wire strings are parsed once,
//! when the index is built from an [`AvailabilityResponse`].

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::{parse_iso_date, AvailabilityResponse};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    property_id: String,
    booked: HashSet<NaiveDate>,
    checkout_only: HashSet<NaiveDate>,
}

impl AvailabilityIndex {
    /// Build an index from already-parsed dates.
    ///
    /// A date present in both sets is kept only as booked.
    pub fn new(
        property_id: impl Into<String>,
        booked: impl IntoIterator<Item = NaiveDate>,
        checkout_only: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        let property_id = property_id.into();
        let booked: HashSet<NaiveDate> = booked.into_iter().collect();
        let mut checkout_only: HashSet<NaiveDate> = checkout_only.into_iter().collect();

        let overlap = checkout_only.iter().filter(|d| booked.contains(d)).count();
        if overlap > 0 {
            warn!(
                "Property {}: {} date(s) are both booked and checkout-only; treating them as booked",
                property_id, overlap
            );
            checkout_only.retain(|d| !booked.contains(d));
        }

        Self { property_id, booked, checkout_only }
    }

    /// Build an index from a source response, skipping unparsable dates
    pub fn from_response(response: &AvailabilityResponse) -> Self {
        let booked = parse_dates(&response.property_id, "booked", &response.booked_dates);
        let checkout_only = parse_dates(
            &response.property_id,
            "checkout-only",
            &response.checkout_only_dates,
        );
        Self::new(response.property_id.clone(), booked, checkout_only)
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.booked.contains(&date)
    }

    pub fn is_checkout_only(&self, date: NaiveDate) -> bool {
        self.checkout_only.contains(&date)
    }

    pub fn booked_count(&self) -> usize {
        self.booked.len()
    }

    pub fn checkout_only_count(&self) -> usize {
        self.checkout_only.len()
    }
}

fn parse_dates(property_id: &str, kind: &str, raw: &[String]) -> Vec<NaiveDate> {
    raw.iter()
        .filter_map(|value| {
            let parsed = parse_iso_date(value);
            if parsed.is_none() {
                warn!("Property {}: skipping unparsable {} date {:?}", property_id, kind, value);
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn response(booked: &[&str], checkout_only: &[&str]) -> AvailabilityResponse {
        AvailabilityResponse {
            property_id: "p1".to_string(),
            booked_dates: booked.iter().map(|s| s.to_string()).collect(),
            checkout_only_dates: checkout_only.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_membership_queries() {
        let index = AvailabilityIndex::from_response(&response(
            &["2024-06-15", "2024-06-16"],
            &["2024-06-17"],
        ));

        assert_eq!(index.property_id(), "p1");
        assert!(index.is_booked(date(2024, 6, 15)));
        assert!(index.is_booked(date(2024, 6, 16)));
        assert!(!index.is_booked(date(2024, 6, 17)));
        assert!(index.is_checkout_only(date(2024, 6, 17)));
        assert!(!index.is_checkout_only(date(2024, 6, 15)));
    }

    #[test]
    fn test_unparsable_dates_are_skipped() {
        let index = AvailabilityIndex::from_response(&response(
            &["2024-06-15", "garbage", "2024-13-01"],
            &["", "2024-06-20"],
        ));

        assert_eq!(index.booked_count(), 1);
        assert_eq!(index.checkout_only_count(), 1);
        assert!(index.is_checkout_only(date(2024, 6, 20)));
    }

    #[test]
    fn test_overlapping_date_is_treated_as_booked() {
        let index = AvailabilityIndex::from_response(&response(
            &["2024-06-15"],
            &["2024-06-15", "2024-06-16"],
        ));

        assert!(index.is_booked(date(2024, 6, 15)));
        assert!(!index.is_checkout_only(date(2024, 6, 15)));
        assert!(index.is_checkout_only(date(2024, 6, 16)));
    }

    #[test]
    fn test_empty_index() {
        let index = AvailabilityIndex::default();
        assert!(!index.is_booked(date(2024, 6, 15)));
        assert!(!index.is_checkout_only(date(2024, 6, 15)));
    }
}
