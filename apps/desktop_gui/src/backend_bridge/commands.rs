//! Backend commands queued from UI to the ledger worker.

use shared::domain::OperationKind;

/// One form action with the raw field values it was submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    QueryBalance {
        username: String,
    },
    Deposit {
        username: String,
        amount: String,
    },
    Withdraw {
        username: String,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
}

impl BackendCommand {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::QueryBalance { .. } => OperationKind::QueryBalance,
            Self::Deposit { .. } => OperationKind::Deposit,
            Self::Withdraw { .. } => OperationKind::Withdraw,
            Self::Transfer { .. } => OperationKind::Transfer,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryBalance { .. } => "query_balance",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Transfer { .. } => "transfer",
        }
    }

    /// The account the action is signed by.
    pub fn username(&self) -> &str {
        match self {
            Self::QueryBalance { username }
            | Self::Deposit { username, .. }
            | Self::Withdraw { username, .. } => username,
            Self::Transfer { from, .. } => from,
        }
    }

    /// Builds the command for a form button from the three field values.
    /// Returns `None` for operations the form does not offer.
    pub fn from_form(
        kind: OperationKind,
        username: &str,
        amount: &str,
        recipient: &str,
    ) -> Option<Self> {
        let command = match kind {
            OperationKind::QueryBalance => Self::QueryBalance {
                username: username.to_string(),
            },
            OperationKind::Deposit => Self::Deposit {
                username: username.to_string(),
                amount: amount.to_string(),
            },
            OperationKind::Withdraw => Self::Withdraw {
                username: username.to_string(),
                amount: amount.to_string(),
            },
            OperationKind::Transfer => Self::Transfer {
                from: username.to_string(),
                to: recipient.to_string(),
                amount: amount.to_string(),
            },
            OperationKind::CreateAccount
            | OperationKind::GetAccount
            | OperationKind::GetTransfer
            | OperationKind::GetTransferByStateKey
            | OperationKind::ListAccounts
            | OperationKind::ListTransfers
            | OperationKind::ListTransactions => return None,
        };
        Some(command)
    }
}
