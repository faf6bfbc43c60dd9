/*!
 * Presentation seam of the session layer.
 *
 * The session manager never renders anything itself; it reports
 * notifications and navigation requests to a `Presenter`.
 */

use std::sync::Arc;

use log::{error, info, warn};
use parking_lot::Mutex;

use super::models::{Notification, NotificationStatus, Route};
use crate::i18n::Translate;

/// Receiver of user-facing side effects
pub trait Presenter: Send + Sync {
    /// Show a notification
    fn notify(&self, notification: Notification);

    /// Switch to another view
    fn navigate(&self, route: Route);
}

/// Something a presenter was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Notified(Notification),
    Navigated(Route),
}

/// Presenter that records every event, for headless use and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in order
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().clone()
    }

    /// Recorded notifications in order
    pub fn notifications(&self) -> Vec<Notification> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Notified(n) => Some(n.clone()),
                PresenterEvent::Navigated(_) => None,
            })
            .collect()
    }

    /// Recorded navigations in order
    pub fn routes(&self) -> Vec<Route> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Navigated(route) => Some(route.clone()),
                PresenterEvent::Notified(_) => None,
            })
            .collect()
    }

    /// The most recent navigation
    pub fn last_route(&self) -> Option<Route> {
        self.routes().pop()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, notification: Notification) {
        self.events.lock().push(PresenterEvent::Notified(notification));
    }

    fn navigate(&self, route: Route) {
        self.events.lock().push(PresenterEvent::Navigated(route));
    }
}

/// Presenter that writes notifications to the log, translating keys when a
/// translator is attached
#[derive(Clone, Default)]
pub struct LogPresenter {
    translator: Option<Arc<dyn Translate>>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translator(translator: Arc<dyn Translate>) -> Self {
        Self {
            translator: Some(translator),
        }
    }

    fn render(&self, text: &str) -> String {
        match &self.translator {
            Some(translator) => translator.translate(text),
            None => text.to_string(),
        }
    }
}

impl Presenter for LogPresenter {
    fn notify(&self, notification: Notification) {
        let title = self.render(&notification.title);
        let description = self.render(&notification.description);
        match notification.status {
            NotificationStatus::Error => error!("{}: {}", title, description),
            NotificationStatus::Warning => warn!("{}: {}", title, description),
            NotificationStatus::Success | NotificationStatus::Info => {
                info!("{}: {}", title, description)
            }
        }
    }

    fn navigate(&self, route: Route) {
        log::debug!("Navigate to {:?}", route);
    }
}
