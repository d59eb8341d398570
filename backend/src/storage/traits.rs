//! # Storage Traits
//!
//! Abstraction over where availability data comes from, so the calendar
//! engine can be driven by an in-memory map, the CSV booking store, or any
//! host-provided client without modification.

use anyhow::Result;
use async_trait::async_trait;
use shared::AvailabilityResponse;

/// Supplies booked and checkout-only dates for a property
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Load the full availability of a property.
    ///
    /// Errors are shown to the user as-is, so their message should be
    /// human-readable.
    async fn load_availability(&self, property_id: &str) -> Result<AvailabilityResponse>;
}
