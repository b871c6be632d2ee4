use super::SessionSnapshot;

/// Event name the webview listens on for snapshot updates.
pub const SESSION_STATE_CHANGED: &str = "session-state-changed";

/// Receives every snapshot the controller publishes.
pub trait SessionEvents: Send + Sync {
    fn state_changed(&self, snapshot: &SessionSnapshot);
}

pub struct NoopEvents;

impl SessionEvents for NoopEvents {
    fn state_changed(&self, _snapshot: &SessionSnapshot) {}
}

#[cfg(feature = "desktop")]
impl<R: tauri::Runtime> SessionEvents for tauri::AppHandle<R> {
    fn state_changed(&self, snapshot: &SessionSnapshot) {
        use tauri::Emitter;

        if let Err(err) = self.emit(SESSION_STATE_CHANGED, snapshot) {
            log::warn!("Failed to emit {SESSION_STATE_CHANGED}: {err}");
        }
    }
}
