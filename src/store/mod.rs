//! Remote record store: one saved dataset per email.
//!
//! The session controller only sees the `RecordStore` trait so it can run
//! against Supabase, the unconfigured fallback, or the in-memory store.

mod error;
pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::config::{AppConfig, ANON_KEY_VAR, URL_VAR};
use crate::models::UserRecord;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use supabase::SupabaseStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by email. `Ok(None)` when no record exists.
    async fn lookup(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert or replace the record keyed by `record.email`.
    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError>;

    fn is_configured(&self) -> bool {
        true
    }
}

pub type SharedRecordStore = Arc<dyn RecordStore>;

/// Stand-in used when no credentials are configured: nothing is ever found
/// and every save fails with `StoreError::NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl RecordStore for UnconfiguredStore {
    async fn lookup(&self, _email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(None)
    }

    async fn upsert(&self, _record: &UserRecord) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

pub fn from_config(config: &AppConfig) -> Result<SharedRecordStore, StoreError> {
    match &config.remote {
        Some(remote) => {
            let store = SupabaseStore::new(remote, config.remote_timeout)?;
            info!("Saving dashboards to {}", store.endpoint());
            Ok(Arc::new(store))
        }
        None => {
            warn!(
                "Remote store not configured; edits will not persist. Set {URL_VAR} and {ANON_KEY_VAR} to enable saving."
            );
            Ok(Arc::new(UnconfiguredStore))
        }
    }
}
