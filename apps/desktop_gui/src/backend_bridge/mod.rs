//! Bridge between the UI thread and the ledger worker thread.

pub mod commands;
pub mod runtime;
