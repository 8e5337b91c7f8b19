//! Notification emission seam.
//!
//! # Responsibility
//! - Define the contract the embedding presentation layer implements to
//!   deliver platform notifications.
//!
//! # Invariants
//! - The scheduler only calls `notify` while `permission()` reports
//!   granted.

use log::info;
use std::fmt::{Display, Formatter};

/// Platform notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => f.write_str("granted"),
            Self::Denied => f.write_str("denied"),
        }
    }
}

/// One notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Ask the platform to keep the notification on screen until the
    /// user interacts with it.
    pub require_interaction: bool,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            require_interaction: false,
        }
    }

    pub fn require_interaction(mut self) -> Self {
        self.require_interaction = true;
        self
    }
}

/// Emission contract implemented by the embedding layer.
pub trait Notifier {
    /// Asks the platform for permission. Called once per scheduler
    /// lifetime, at start.
    fn request_permission(&mut self) -> Permission;
    /// Current permission state; consulted on every tick so a grant made
    /// later in the session takes effect without re-prompting.
    fn permission(&self) -> Permission;
    fn notify(&mut self, notification: &Notification);
}

/// Log-only notifier for headless and smoke runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&mut self, notification: &Notification) {
        info!(
            "event=notification module=notify status=ok title={:?} body={:?} require_interaction={}",
            notification.title, notification.body, notification.require_interaction
        );
    }
}
