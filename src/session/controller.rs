use std::{mem, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::{sync::Mutex, time};
use uuid::Uuid;

use crate::{
    config::DEFAULT_REMOTE_TIMEOUT,
    dashboard::DashboardView,
    models::{default_hourly_data, parse_field_value, HourlyDataPoint, HourlyField, UserRecord},
    settings::{KeyValueStore, USER_EMAIL_KEY},
    store::{RecordStore, StoreError},
};

use super::{
    events::SessionEvents, NotificationKind, PhaseKind, SessionPhase, SessionSnapshot,
    SessionState,
};

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
const SAVED_MESSAGE: &str = "Your data has been saved successfully!";
const LOADED_MESSAGE: &str = "Your previous data has been loaded!";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound on every lookup and upsert.
    pub remote_timeout: Duration,
    /// How long a notification stays up; zero keeps it until dismissed.
    pub notification_ttl: Duration,
    pub initial_data: Vec<HourlyDataPoint>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            notification_ttl: NOTIFICATION_TTL,
            initial_data: default_hourly_data(),
        }
    }
}

/// Drives the edit workflow: identity capture, editing, save with
/// overwrite confirmation. The state lock is never held across a remote call.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn RecordStore>,
    identity_store: Arc<dyn KeyValueStore>,
    events: Arc<dyn SessionEvents>,
    remote_timeout: Duration,
    notification_ttl: Duration,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn RecordStore>,
        identity_store: Arc<dyn KeyValueStore>,
        events: Arc<dyn SessionEvents>,
        options: SessionOptions,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(options.initial_data))),
            store,
            identity_store,
            events,
            remote_timeout: options.remote_timeout,
            notification_ttl: options.notification_ttl,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn dashboard(&self) -> DashboardView {
        DashboardView::new(self.snapshot().await, self.store.is_configured())
    }

    /// Adopts the identity stored by a previous run and shows its saved data.
    /// Failures are logged; the dashboard keeps its current data.
    pub async fn restore(&self) -> SessionSnapshot {
        let stored = match self.identity_store.get(USER_EMAIL_KEY) {
            Ok(stored) => stored.filter(|email| !email.is_empty()),
            Err(err) => {
                warn!("Failed to read stored identity: {err:#}");
                None
            }
        };

        let Some(email) = stored else {
            return self.snapshot().await;
        };

        let ticket = {
            let mut state = self.state.lock().await;
            if state.identity.is_some() || state.phase.kind() != PhaseKind::Viewing {
                debug!("Session already in use; skipping restore of {email}");
                return state.snapshot();
            }
            state.identity = Some(email.clone());
            state.generation
        };
        info!("Restored session identity {email}");

        let record = match self.lookup(&email).await {
            Ok(Some(record)) if !record.hourly_data.is_empty() => record,
            Ok(_) => {
                debug!("No saved data to load for {email}");
                return self.publish_current().await;
            }
            Err(err) => {
                warn!("Failed to load saved data for {email}: {err}");
                return self.publish_current().await;
            }
        };

        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.is_current(ticket)
                || state.phase.kind() != PhaseKind::Viewing
                || state.identity.as_deref() != Some(email.as_str())
            {
                info!("Discarding saved data for {email}; session moved on while loading");
                return state.snapshot();
            }
            state.displayed = record.hourly_data;
            self.raise(&mut state, NotificationKind::Info, LOADED_MESSAGE);
            state.snapshot()
        };
        self.publish(&snapshot);
        snapshot
    }

    pub async fn request_edit(&self) -> Result<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::Viewing)?;
            if state.identity.is_some() {
                let buffer = state.displayed.clone();
                state.transition(SessionPhase::Editing { buffer });
            } else {
                state.transition(SessionPhase::CapturingEmail);
            }
            state.snapshot()
        };
        self.publish(&snapshot);
        Ok(snapshot)
    }

    pub async fn submit_email(&self, candidate: &str) -> Result<SessionSnapshot> {
        let email = candidate.trim();

        let ticket = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::CapturingEmail)?;
            if !is_valid_email(email) {
                self.raise(&mut state, NotificationKind::Danger, INVALID_EMAIL_MESSAGE);
                let snapshot = state.snapshot();
                drop(state);
                self.publish(&snapshot);
                return Ok(snapshot);
            }
            state.begin_remote()?
        };

        let existing = match self.lookup(email).await {
            Ok(found) => found,
            Err(err) => {
                warn!("Lookup for {email} failed, continuing without saved data: {err}");
                None
            }
        };

        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.is_current(ticket) {
                info!("Discarding lookup result for {email}; email capture was closed");
                return Ok(state.snapshot());
            }
            // The identity is only committed once the capture completes.
            state.identity = Some(email.to_string());
            state.existing = existing.map(|record| record.hourly_data);
            let buffer = state.displayed.clone();
            state.transition(SessionPhase::Editing { buffer });
            state.snapshot()
        };

        if let Err(err) = self.identity_store.set(USER_EMAIL_KEY, email) {
            warn!("Failed to persist session identity {email}: {err:#}");
        }

        self.publish(&snapshot);
        Ok(snapshot)
    }

    pub async fn edit_field(
        &self,
        index: usize,
        field: HourlyField,
        raw: &str,
    ) -> Result<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::Editing)?;
            if state.busy {
                return Err(anyhow!("cannot edit while a save is in flight"));
            }
            let value = parse_field_value(raw);
            let SessionPhase::Editing { buffer } = &mut state.phase else {
                return Err(anyhow!("edit buffer missing"));
            };
            let rows = buffer.len();
            let updated = buffer
                .get(index)
                .map(|row| row.with_field(field, value))
                .ok_or_else(|| anyhow!("row {index} out of range for {rows} rows"))?;
            buffer[index] = updated;
            state.snapshot()
        };
        self.publish(&snapshot);
        Ok(snapshot)
    }

    pub async fn request_save(&self) -> Result<SessionSnapshot> {
        let (ticket, email) = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::Editing)?;
            let email = state
                .identity
                .clone()
                .ok_or_else(|| anyhow!("no session identity to save under"))?;
            (state.begin_remote()?, email)
        };

        // Always re-check: a record may have been created since the email was entered.
        let existing = match self.lookup(&email).await {
            Ok(found) => found,
            Err(err) => {
                warn!("Pre-save lookup for {email} failed, saving without confirmation: {err}");
                None
            }
        };

        let Some(record) = existing else {
            return self.persist_and_finish(ticket, email).await;
        };

        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.is_current(ticket) {
                info!("Discarding pre-save lookup for {email}; edit was closed");
                return Ok(state.snapshot());
            }
            state.existing = Some(record.hourly_data);
            let buffer = mem::take(&mut state.phase)
                .into_buffer()
                .ok_or_else(|| anyhow!("edit buffer missing"))?;
            state.transition(SessionPhase::ConfirmingOverwrite { buffer });
            state.snapshot()
        };
        info!("Saved data already exists for {email}; asking before overwrite");
        self.publish(&snapshot);
        Ok(snapshot)
    }

    pub async fn confirm_overwrite(&self) -> Result<SessionSnapshot> {
        let (ticket, email) = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::ConfirmingOverwrite)?;
            let email = state
                .identity
                .clone()
                .ok_or_else(|| anyhow!("no session identity to save under"))?;
            (state.begin_remote()?, email)
        };
        self.persist_and_finish(ticket, email).await
    }

    pub async fn cancel_overwrite(&self) -> Result<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.expect_phase(PhaseKind::ConfirmingOverwrite)?;
            let buffer = mem::take(&mut state.phase)
                .into_buffer()
                .ok_or_else(|| anyhow!("edit buffer missing"))?;
            state.transition(SessionPhase::Editing { buffer });
            state.snapshot()
        };
        self.publish(&snapshot);
        Ok(snapshot)
    }

    pub async fn cancel_edit(&self) -> Result<SessionSnapshot> {
        self.close(PhaseKind::Editing).await
    }

    pub async fn cancel_email_capture(&self) -> Result<SessionSnapshot> {
        self.close(PhaseKind::CapturingEmail).await
    }

    pub async fn dismiss_notification(&self, id: Uuid) -> SessionSnapshot {
        let (cleared, snapshot) = {
            let mut state = self.state.lock().await;
            (state.clear_notification(id), state.snapshot())
        };
        if cleared {
            self.publish(&snapshot);
        }
        snapshot
    }

    async fn close(&self, expected: PhaseKind) -> Result<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.expect_phase(expected)?;
            state.existing = None;
            state.transition(SessionPhase::Viewing);
            state.snapshot()
        };
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Writes the edit buffer under `email`. Success closes whichever modal is
    /// open; failure leaves it open with an error notification.
    async fn persist_and_finish(&self, ticket: u64, email: String) -> Result<SessionSnapshot> {
        let record = {
            let state = self.state.lock().await;
            if !state.is_current(ticket) {
                return Ok(state.snapshot());
            }
            let buffer = state
                .phase
                .buffer()
                .ok_or_else(|| anyhow!("edit buffer missing"))?
                .to_vec();
            UserRecord::new(email, buffer).stamped(Utc::now())
        };

        let outcome = self.upsert(&record).await;

        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.is_current(ticket) {
                info!(
                    "Discarding save result for {}; edit was closed",
                    record.email
                );
                return Ok(state.snapshot());
            }
            match outcome {
                Ok(()) => {
                    info!(
                        "Saved {} hourly rows for {}",
                        record.hourly_data.len(),
                        record.email
                    );
                    state.displayed = record.hourly_data;
                    state.existing = None;
                    state.transition(SessionPhase::Viewing);
                    self.raise(&mut state, NotificationKind::Success, SAVED_MESSAGE);
                }
                Err(err) => {
                    error!("Failed to save data for {}: {err}", record.email);
                    state.busy = false;
                    self.raise(&mut state, NotificationKind::Danger, err.save_failure_message());
                }
            }
            state.snapshot()
        };
        self.publish(&snapshot);
        Ok(snapshot)
    }

    async fn lookup(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        time::timeout(self.remote_timeout, self.store.lookup(email))
            .await
            .unwrap_or(Err(StoreError::Timeout(self.remote_timeout)))
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        time::timeout(self.remote_timeout, self.store.upsert(record))
            .await
            .unwrap_or(Err(StoreError::Timeout(self.remote_timeout)))
    }

    /// Replaces the active notification and schedules its expiry. An expiry
    /// only clears the notification it was scheduled for.
    fn raise(&self, state: &mut SessionState, kind: NotificationKind, message: &str) {
        let notification = super::Notification::new(kind, message);
        let id = notification.id;
        state.notification = Some(notification);

        if self.notification_ttl.is_zero() {
            return;
        }

        let shared = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let ttl = self.notification_ttl;
        tokio::spawn(async move {
            time::sleep(ttl).await;
            let snapshot = {
                let mut guard = shared.lock().await;
                if !guard.clear_notification(id) {
                    return;
                }
                guard.snapshot()
            };
            events.state_changed(&snapshot);
        });
    }

    async fn publish_current(&self) -> SessionSnapshot {
        let snapshot = self.snapshot().await;
        self.publish(&snapshot);
        snapshot
    }

    fn publish(&self, snapshot: &SessionSnapshot) {
        self.events.state_changed(snapshot);
    }
}

fn is_valid_email(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.contains('@')
}
