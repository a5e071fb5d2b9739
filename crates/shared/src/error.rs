use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes reported in a ledger gateway error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Rejected,
    Unavailable,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerErrorKind {
    /// The gateway or its peers could not be reached in time.
    Connectivity,
    /// The identity is unknown or not allowed to run the call.
    Authorization,
    /// The chaincode or the ordering service turned the call down.
    RejectedByLedger,
    /// The request was malformed before or at the gateway.
    InvalidInput,
}

impl LedgerErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connectivity => "Connectivity",
            Self::Authorization => "Authorization",
            Self::RejectedByLedger => "Rejected by ledger",
            Self::InvalidInput => "Invalid input",
        }
    }
}

/// Failure of a single ledger call. Displays as the bare message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LedgerError {
    kind: LedgerErrorKind,
    message: String,
}

impl LedgerError {
    pub fn new(kind: LedgerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Connectivity, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::Authorization, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::RejectedByLedger, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(LedgerErrorKind::InvalidInput, message)
    }

    pub fn kind(&self) -> LedgerErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ErrorCode> for LedgerErrorKind {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::Unauthorized | ErrorCode::Forbidden => Self::Authorization,
            ErrorCode::Validation => Self::InvalidInput,
            ErrorCode::Unavailable => Self::Connectivity,
            ErrorCode::NotFound | ErrorCode::Rejected | ErrorCode::Internal => {
                Self::RejectedByLedger
            }
        }
    }
}

impl From<ApiError> for LedgerError {
    fn from(value: ApiError) -> Self {
        Self::new(value.code.into(), value.message)
    }
}
