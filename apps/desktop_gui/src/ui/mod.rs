//! UI layer for the teller window.

pub mod app;

pub use app::{PersistedForm, TellerApp, SETTINGS_STORAGE_KEY};
