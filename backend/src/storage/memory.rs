//! In-memory availability source, keyed by property id.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use shared::AvailabilityResponse;
use tracing::debug;

use super::traits::AvailabilitySource;

#[derive(Debug, Default)]
pub struct InMemoryAvailabilitySource {
    entries: RwLock<HashMap<String, AvailabilityResponse>>,
}

impl InMemoryAvailabilitySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the availability of `response.property_id`
    pub fn set_availability(&self, response: AvailabilityResponse) {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(response.property_id.clone(), response);
    }

    pub fn remove_availability(&self, property_id: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(property_id).is_some()
    }
}

#[async_trait]
impl AvailabilitySource for InMemoryAvailabilitySource {
    async fn load_availability(&self, property_id: &str) -> Result<AvailabilityResponse> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let response = entries.get(property_id).cloned().unwrap_or_else(|| {
            debug!("No availability stored for property {}; treating it as fully open", property_id);
            AvailabilityResponse {
                property_id: property_id.to_string(),
                ..AvailabilityResponse::default()
            }
        });
        Ok(response)
    }
}
