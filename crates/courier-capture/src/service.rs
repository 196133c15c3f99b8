//! The capture pipeline

use crate::{CaptureError, CourierConfig, RecordFactory};
use courier_dispatch::DeliveryDispatcher;
use courier_domain::{DurableSlot, Fields, Record, RecordCollection, RecordId};
use courier_enrich::EnrichmentClient;
use courier_store::{ConfiguredSlot, RecordStore};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

type SharedStore<S> = Arc<Mutex<RecordStore<S>>>;

/// Captures records, persists them, and runs enrichment and delivery in the
/// background
///
/// The store lock is never held across an `.await`; each mutation is saved
/// before the lock is released.
pub struct CaptureService<S> {
    store: SharedStore<S>,
    factory: RecordFactory,
    enrichment: EnrichmentClient,
    dispatcher: DeliveryDispatcher,
    background: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<S> CaptureService<S>
where
    S: DurableSlot + Send + 'static,
    S::Error: fmt::Display,
{
    /// Create a service around an opened store
    pub fn new(
        store: RecordStore<S>,
        factory: RecordFactory,
        enrichment: EnrichmentClient,
        dispatcher: DeliveryDispatcher,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            factory,
            enrichment,
            dispatcher,
            background: Mutex::new(Vec::new()),
        }
    }

    /// Capture a record
    ///
    /// The record is persisted before this returns and the returned value is
    /// a snapshot with a pending origin. Origin resolution, the follow-up
    /// save and, if `should_dispatch`, delivery then run in a detached task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn capture(&self, fields: Fields, should_dispatch: bool) -> Record {
        let record = self.factory.create(fields);
        lock(&self.store).append(record.clone());
        tracing::debug!(record_id = %record.id, should_dispatch, "Record captured");

        let store = Arc::clone(&self.store);
        let enrichment = self.enrichment.clone();
        let dispatcher = self.dispatcher.clone();
        let mut enriched = record.clone();

        let handle = tokio::spawn(async move {
            let origin = enrichment.resolve_origin().await;
            enriched.settle_origin(origin.clone());

            let settled = lock(&store).set_origin(&enriched.id, origin);
            if !settled {
                tracing::debug!(record_id = %enriched.id, "Record no longer pending in store");
            }

            if should_dispatch {
                let report = dispatcher.deliver(&enriched).await;
                tracing::debug!("{}", report.summary());
            }
        });

        let mut background = lock(&self.background);
        background.retain(|h| !h.is_finished());
        background.push(handle);

        record
    }

    /// Snapshot of every stored record, in capture order
    pub fn list_all(&self) -> RecordCollection {
        lock(&self.store).records().clone()
    }

    /// Snapshot of one record
    pub fn get(&self, id: &RecordId) -> Option<Record> {
        lock(&self.store).get(id).cloned()
    }

    /// Remove every stored record
    ///
    /// Background work already in flight still completes; its origin update
    /// becomes a no-op.
    pub fn clear(&self) {
        lock(&self.store).clear();
        tracing::info!("Record collection cleared");
    }

    /// Number of background tasks not yet finished
    pub fn pending_tasks(&self) -> usize {
        lock(&self.background)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait for all background work, including work started meanwhile
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *lock(&self.background));
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!("Background capture task failed: {}", e);
                }
            }
        }
    }

    /// Settle background work and write the collection a final time
    ///
    /// Returns whether the final save succeeded.
    pub async fn shutdown(&self) -> bool {
        self.settle().await;
        let saved = lock(&self.store).flush();
        tracing::info!(saved, "Capture service shut down");
        saved
    }
}

impl CaptureService<ConfiguredSlot> {
    /// Assemble a service from configuration
    pub fn from_config(config: &CourierConfig) -> Result<Self, CaptureError> {
        config.validate()?;

        let store = config.store.open()?;
        let mut factory =
            RecordFactory::new().with_expected_fields(config.capture.expected_fields.clone());
        if let Some(context) = &config.capture.client_context {
            factory = factory.with_client_context(context.clone());
        }
        let enrichment = EnrichmentClient::from_config(&config.enrichment)?;
        let dispatcher = DeliveryDispatcher::from_config(&config.delivery)?;

        tracing::info!(
            enrichment = enrichment.is_enabled(),
            delivery = dispatcher.is_enabled(),
            "Capture service ready"
        );
        Ok(Self::new(store, factory, enrichment, dispatcher))
    }
}

impl<S> fmt::Debug for CaptureService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureService")
            .field("factory", &self.factory)
            .field("enrichment", &self.enrichment)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
