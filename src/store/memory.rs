use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;

use crate::models::UserRecord;

use super::{RecordStore, StoreError};

/// Process-local record store. Clones share the same records, so a second
/// controller built on a clone sees what the first one saved. Failures and
/// latency can be injected per operation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, UserRecord>,
    lookup_failure: Option<StoreError>,
    upsert_failure: Option<StoreError>,
    lookup_delay: Option<Duration>,
    upsert_delay: Option<Duration>,
    lookups: usize,
    upserts: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: UserRecord) -> Self {
        let store = Self::new();
        store.insert(record);
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, record: UserRecord) {
        self.state().records.insert(record.email.clone(), record);
    }

    pub fn get(&self, email: &str) -> Option<UserRecord> {
        self.state().records.get(email).cloned()
    }

    pub fn fail_lookups(&self, failure: Option<StoreError>) {
        self.state().lookup_failure = failure;
    }

    pub fn fail_upserts(&self, failure: Option<StoreError>) {
        self.state().upsert_failure = failure;
    }

    pub fn delay_lookups(&self, delay: Option<Duration>) {
        self.state().lookup_delay = delay;
    }

    pub fn delay_upserts(&self, delay: Option<Duration>) {
        self.state().upsert_delay = delay;
    }

    pub fn lookup_count(&self) -> usize {
        self.state().lookups
    }

    pub fn upsert_count(&self) -> usize {
        self.state().upserts
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn lookup(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let delay = {
            let mut state = self.state();
            state.lookups += 1;
            state.lookup_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        match &state.lookup_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(state.records.get(email).cloned()),
        }
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let delay = {
            let mut state = self.state();
            state.upserts += 1;
            state.upsert_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if let Some(failure) = &state.upsert_failure {
            return Err(failure.clone());
        }
        state.records.insert(record.email.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourlyDataPoint;

    #[tokio::test]
    async fn upsert_replaces_without_merging() {
        let store = InMemoryStore::new();
        store
            .upsert(&UserRecord::new(
                "a@b.com",
                vec![
                    HourlyDataPoint::new("00:00", 1, 1),
                    HourlyDataPoint::new("04:00", 2, 2),
                ],
            ))
            .await
            .unwrap();
        store
            .upsert(&UserRecord::new(
                "a@b.com",
                vec![HourlyDataPoint::new("08:00", 3, 3)],
            ))
            .await
            .unwrap();

        let saved = store.lookup("a@b.com").await.unwrap().unwrap();
        assert_eq!(saved.hourly_data, vec![HourlyDataPoint::new("08:00", 3, 3)]);
        assert_eq!(store.upsert_count(), 2);
    }

    #[tokio::test]
    async fn injected_failures_apply_until_cleared() {
        let store = InMemoryStore::with_record(UserRecord::new("a@b.com", Vec::new()));
        store.fail_lookups(Some(StoreError::Transport("offline".into())));

        assert!(store.lookup("a@b.com").await.is_err());

        store.fail_lookups(None);
        assert!(store.lookup("a@b.com").await.unwrap().is_some());
        assert_eq!(store.lookup_count(), 2);
    }

    #[tokio::test]
    async fn failed_upsert_leaves_record_untouched() {
        let original = UserRecord::new("a@b.com", vec![HourlyDataPoint::new("00:00", 1, 1)]);
        let store = InMemoryStore::with_record(original.clone());
        store.fail_upserts(Some(StoreError::Service {
            status: 500,
            message: "boom".into(),
        }));

        assert!(store
            .upsert(&UserRecord::new("a@b.com", Vec::new()))
            .await
            .is_err());
        assert_eq!(store.get("a@b.com"), Some(original));
    }
}
