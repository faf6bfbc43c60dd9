/*!
 * Session management.
 *
 * This module provides:
 * - `context`: the explicit session context (tokens + cached user)
 * - `token`: access token payload inspection
 * - `manager`: the authentication lifecycle
 * - `presenter`: the seam through which notifications and navigation leave
 *   the session layer
 */

pub mod context;
pub mod manager;
pub mod models;
pub mod presenter;
pub mod token;

// Re-export main types
pub use context::SessionContext;
pub use manager::SessionManager;
pub use models::{Notification, NotificationStatus, Route, Session};
pub use presenter::{LogPresenter, Presenter, PresenterEvent, RecordingPresenter};
