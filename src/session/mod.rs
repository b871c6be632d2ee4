#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod events;
pub mod state;

pub use controller::{SessionController, SessionOptions};
pub use events::{NoopEvents, SessionEvents};
pub use state::{
    Notification, NotificationKind, PhaseKind, SessionPhase, SessionSnapshot, SessionState,
};
