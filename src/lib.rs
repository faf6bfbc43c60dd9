/*!
 * # panelkit
 *
 * Client-side core of the admin panel: the session lifecycle and the
 * translation resolution the panel's views rely on.
 *
 * ## Features
 *
 * - Log in, log out, refresh and restore sessions against the backend
 * - Persist the token pair and language preference in a local SQLite store
 * - Derive the logged-in state from the access token's expiry claim
 * - Log out implicitly when the backend rejects the access token
 * - Load per-language translation tables and resolve keys with `{name}`
 *   placeholder substitution
 * - Account, user and translation administration endpoints
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `storage`: Persistent key/value store for session state
 * - `client`: REST collaborators and their reqwest-backed implementation
 * - `session`: Session context, token inspection and the session manager
 * - `i18n`: Translation tables, their cache and the resolver
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod client;
pub mod errors;
pub mod i18n;
pub mod language_utils;
pub mod session;
pub mod storage;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use client::ApiClient;
pub use errors::{ApiError, AppError, SessionError, TranslationError};
pub use i18n::{TranslationResolver, Translate, resolve_language};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use session::{SessionContext, SessionManager};
pub use storage::LocalStore;
