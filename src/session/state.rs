use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::HourlyDataPoint;

/// Number of pre-existing rows shown in the overwrite dialog.
pub const PREVIEW_ROWS: usize = 3;

/// Where the edit workflow currently is. Exactly one modal can be open
/// because there is exactly one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Viewing,
    CapturingEmail,
    Editing {
        buffer: Vec<HourlyDataPoint>,
    },
    ConfirmingOverwrite {
        buffer: Vec<HourlyDataPoint>,
    },
}

impl SessionPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            SessionPhase::Viewing => PhaseKind::Viewing,
            SessionPhase::CapturingEmail => PhaseKind::CapturingEmail,
            SessionPhase::Editing { .. } => PhaseKind::Editing,
            SessionPhase::ConfirmingOverwrite { .. } => PhaseKind::ConfirmingOverwrite,
        }
    }

    pub fn buffer(&self) -> Option<&[HourlyDataPoint]> {
        match self {
            SessionPhase::Editing { buffer } | SessionPhase::ConfirmingOverwrite { buffer } => {
                Some(buffer)
            }
            SessionPhase::Viewing | SessionPhase::CapturingEmail => None,
        }
    }

    pub fn into_buffer(self) -> Option<Vec<HourlyDataPoint>> {
        match self {
            SessionPhase::Editing { buffer } | SessionPhase::ConfirmingOverwrite { buffer } => {
                Some(buffer)
            }
            SessionPhase::Viewing | SessionPhase::CapturingEmail => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Viewing,
    CapturingEmail,
    Editing,
    ConfirmingOverwrite,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Success,
    Danger,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub identity: Option<String>,
    pub displayed: Vec<HourlyDataPoint>,
    pub edit_buffer: Option<Vec<HourlyDataPoint>>,
    pub existing_preview: Option<Vec<HourlyDataPoint>>,
    pub notification: Option<Notification>,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub identity: Option<String>,
    pub displayed: Vec<HourlyDataPoint>,
    /// Saved data found for the identity, kept for the overwrite preview.
    pub existing: Option<Vec<HourlyDataPoint>>,
    pub notification: Option<Notification>,
    /// Bumped on every phase change; remote results carry the value they
    /// started under and are dropped when it no longer matches.
    pub generation: u64,
    /// A lookup or save is in flight for the current generation.
    pub busy: bool,
}

impl SessionState {
    pub fn new(displayed: Vec<HourlyDataPoint>) -> Self {
        Self {
            phase: SessionPhase::Viewing,
            identity: None,
            displayed,
            existing: None,
            notification: None,
            generation: 0,
            busy: false,
        }
    }

    pub fn transition(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.generation = self.generation.wrapping_add(1);
        self.busy = false;
    }

    pub fn expect_phase(&self, expected: PhaseKind) -> Result<()> {
        let current = self.phase.kind();
        if current != expected {
            bail!("expected {expected:?} phase but session is {current:?}");
        }
        Ok(())
    }

    /// Marks a remote call as started and returns the generation it belongs to.
    pub fn begin_remote(&mut self) -> Result<u64> {
        if self.busy {
            bail!("a remote request is already in flight");
        }
        self.busy = true;
        Ok(self.generation)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation == ticket
    }

    /// Clears the notification only if it is still the one identified by `id`.
    pub fn clear_notification(&mut self, id: Uuid) -> bool {
        match &self.notification {
            Some(active) if active.id == id => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase.kind(),
            identity: self.identity.clone(),
            displayed: self.displayed.clone(),
            edit_buffer: self.phase.buffer().map(<[HourlyDataPoint]>::to_vec),
            existing_preview: self
                .existing
                .as_ref()
                .map(|rows| rows.iter().take(PREVIEW_ROWS).cloned().collect()),
            notification: self.notification.clone(),
            busy: self.busy,
        }
    }
}
