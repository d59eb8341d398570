//! Asynchronous availability loading bound to a calendar's lifetime.
//!
//! Each load runs as a tokio task tagged with a generation number and reports
//! back over an mpsc channel. Only the outcome of the latest generation is
//! ever handed out; older outcomes are dropped. Starting a new load aborts the
//! previous task, and dropping the loader aborts whatever is still in flight.

use std::sync::Arc;

use shared::AvailabilityResponse;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::errors::{CalendarError, CalendarResult};
use crate::storage::AvailabilitySource;

/// Result of one availability load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub generation: u64,
    pub property_id: String,
    /// Error text is kept verbatim for display
    pub result: Result<AvailabilityResponse, String>,
}

pub struct AvailabilityLoader {
    source: Arc<dyn AvailabilitySource>,
    generation: u64,
    /// Generation still waiting for its outcome
    pending: Option<u64>,
    in_flight: Option<JoinHandle<()>>,
    sender: mpsc::UnboundedSender<LoadOutcome>,
    receiver: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl AvailabilityLoader {
    pub fn new(source: Arc<dyn AvailabilitySource>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            source,
            generation: 0,
            pending: None,
            in_flight: None,
            sender,
            receiver,
        }
    }

    /// Generation of the most recently started load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start loading availability for a property, superseding any earlier load
    pub fn start(&mut self, property_id: &str) -> CalendarResult<u64> {
        let runtime = Handle::try_current().map_err(|_| CalendarError::NoRuntime)?;

        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(generation);

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let property_id = property_id.to_string();

        debug!("Starting availability load #{} for property {}", generation, property_id);
        self.in_flight = Some(runtime.spawn(async move {
            let result = source
                .load_availability(&property_id)
                .await
                .map_err(|e| format!("{:#}", e));

            let outcome = LoadOutcome { generation, property_id, result };
            if sender.send(outcome).is_err() {
                debug!("Availability load #{} finished after its calendar was dropped", generation);
            }
        }));

        Ok(generation)
    }

    /// Abort the in-flight load, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        self.pending = None;
    }

    /// Take the outcome of the current load if it has arrived, without waiting
    pub fn try_next(&mut self) -> Option<LoadOutcome> {
        while let Ok(outcome) = self.receiver.try_recv() {
            if let Some(current) = self.accept(outcome) {
                return Some(current);
            }
        }
        None
    }

    /// Wait for the outcome of the current load.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn wait_current(&mut self) -> Option<LoadOutcome> {
        while self.pending.is_some() {
            let outcome = self.receiver.recv().await?;
            if let Some(current) = self.accept(outcome) {
                return Some(current);
            }
        }
        None
    }

    /// Push an outcome as if a load task had sent it
    #[cfg(test)]
    pub(crate) fn deliver(&self, outcome: LoadOutcome) {
        let _ = self.sender.send(outcome);
    }

    fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if self.pending != Some(outcome.generation) {
            warn!(
                "Discarding stale availability for property {} (load #{}, current #{})",
                outcome.property_id, outcome.generation, self.generation
            );
            return None;
        }
        self.pending = None;
        self.in_flight = None;
        Some(outcome)
    }
}

impl Drop for AvailabilityLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryAvailabilitySource;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn response(property_id: &str, booked: &[&str]) -> AvailabilityResponse {
        AvailabilityResponse {
            property_id: property_id.to_string(),
            booked_dates: booked.iter().map(|s| s.to_string()).collect(),
            checkout_only_dates: Vec::new(),
        }
    }

    /// Source that never answers, counting how many loads were started
    struct HangingSource {
        started: AtomicUsize,
    }

    #[async_trait]
    impl AvailabilitySource for HangingSource {
        async fn load_availability(&self, _property_id: &str) -> Result<AvailabilityResponse> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_load_delivers_outcome() {
        let source = Arc::new(InMemoryAvailabilitySource::new());
        source.set_availability(response("p1", &["2024-06-15"]));
        let mut loader = AvailabilityLoader::new(source);

        let generation = loader.start("p1").unwrap();
        let outcome = loader.wait_current().await.unwrap();

        assert_eq!(outcome.generation, generation);
        assert_eq!(outcome.property_id, "p1");
        assert_eq!(outcome.result.unwrap().booked_dates, vec!["2024-06-15".to_string()]);
        assert!(!loader.is_pending());
    }

    #[tokio::test]
    async fn test_wait_without_pending_load_returns_none() {
        let mut loader = AvailabilityLoader::new(Arc::new(InMemoryAvailabilitySource::new()));
        assert!(loader.wait_current().await.is_none());
        assert!(loader.try_next().is_none());
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let mut loader = AvailabilityLoader::new(Arc::new(HangingSource { started: AtomicUsize::new(0) }));
        let old = loader.start("a").unwrap();
        let current = loader.start("b").unwrap();
        assert!(current > old);

        assert_eq!(loader.generation(), current);

        // A late answer for the superseded load arrives first
        loader.deliver(LoadOutcome {
            generation: old,
            property_id: "a".to_string(),
            result: Ok(response("a", &["2024-06-01"])),
        });
        assert!(loader.try_next().is_none());

        loader.deliver(LoadOutcome {
            generation: current,
            property_id: "b".to_string(),
            result: Ok(response("b", &["2024-06-02"])),
        });
        let outcome = loader.try_next().unwrap();
        assert_eq!(outcome.property_id, "b");
    }

    #[tokio::test]
    async fn test_errors_are_reported_verbatim() {
        struct FailingSource;

        #[async_trait]
        impl AvailabilitySource for FailingSource {
            async fn load_availability(&self, _property_id: &str) -> Result<AvailabilityResponse> {
                Err(anyhow::anyhow!("availability service unreachable"))
            }
        }

        let mut loader = AvailabilityLoader::new(Arc::new(FailingSource));
        loader.start("p1").unwrap();
        let outcome = loader.wait_current().await.unwrap();
        assert_eq!(outcome.result, Err("availability service unreachable".to_string()));
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight_load() {
        let source = Arc::new(HangingSource { started: AtomicUsize::new(0) });
        let mut loader = AvailabilityLoader::new(source.clone());
        loader.start("p1").unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.started.load(Ordering::SeqCst), 1);

        drop(loader);
        tokio::time::sleep(Duration::from_millis(20)).await;
        // The aborted task released its clone of the source
        assert_eq!(Arc::strong_count(&source), 1);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let mut loader = AvailabilityLoader::new(Arc::new(InMemoryAvailabilitySource::new()));
        assert_eq!(loader.start("p1"), Err(CalendarError::NoRuntime));
    }
}
