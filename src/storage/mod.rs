/*!
 * Persistent key/value storage for session state.
 *
 * This module provides SQLite-based persistence for the handful of strings
 * that outlive a process: the access token, the refresh token and the
 * preferred language.
 */

pub mod connection;
pub mod schema;
pub mod store;

// Re-export main types
pub use connection::StoreConnection;
pub use store::{LocalStore, ACCESS_TOKEN_KEY, PREFERRED_LANGUAGE_KEY, REFRESH_TOKEN_KEY};
