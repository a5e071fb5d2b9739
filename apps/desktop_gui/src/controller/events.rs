//! UI/backend events and error modeling for the teller window.

use shared::{
    domain::{LedgerPayload, OperationKind},
    error::{LedgerError, LedgerErrorKind},
};

#[derive(Debug, Clone)]
pub enum UiEvent {
    BackendReady,
    Error(UiError),
    OperationFinished {
        kind: OperationKind,
        outcome: Result<LedgerPayload, UiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Connectivity,
    Authorization,
    Ledger,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
    Operation,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Connectivity => "Connectivity",
        UiErrorCategory::Authorization => "Authorization",
        UiErrorCategory::Ledger => "Rejected by ledger",
        UiErrorCategory::Validation => "Invalid input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_ledger(err: &LedgerError) -> Self {
        let category = match err.kind() {
            LedgerErrorKind::Connectivity => UiErrorCategory::Connectivity,
            LedgerErrorKind::Authorization => UiErrorCategory::Authorization,
            LedgerErrorKind::RejectedByLedger => UiErrorCategory::Ledger,
            LedgerErrorKind::InvalidInput => UiErrorCategory::Validation,
        };
        Self {
            category,
            context: UiErrorContext::Operation,
            message: err.message().to_string(),
        }
    }

    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
