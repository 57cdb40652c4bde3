//! Shared test utilities for the confsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`home`]: [`TestHome`] sandbox with a home directory, an XDG config
//!   directory, a backup store and a logs directory side by side

pub mod home;

pub use home::TestHome;
