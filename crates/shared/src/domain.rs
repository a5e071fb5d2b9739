use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a chaincode function only reads ledger state or submits a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Query,
    Invoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    QueryBalance,
    Deposit,
    Withdraw,
    Transfer,
    CreateAccount,
    GetAccount,
    GetTransfer,
    GetTransferByStateKey,
    ListAccounts,
    ListTransfers,
    ListTransactions,
}

impl OperationKind {
    /// Name of the chaincode function this operation calls.
    pub fn function_name(self) -> &'static str {
        match self {
            Self::QueryBalance => "queryBalance",
            Self::Deposit => "depositFunds",
            Self::Withdraw => "withdrawFunds",
            Self::Transfer => "transferFunds",
            Self::CreateAccount => "CreateAccount",
            Self::GetAccount => "GetAccount",
            Self::GetTransfer => "GetTransfer",
            Self::GetTransferByStateKey => "GetTransferByStateKey",
            Self::ListAccounts => "GetAllAccounts",
            Self::ListTransfers => "GetAllTransfers",
            Self::ListTransactions => "GetAllTransactions",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Self::QueryBalance
            | Self::GetAccount
            | Self::GetTransfer
            | Self::GetTransferByStateKey
            | Self::ListAccounts
            | Self::ListTransfers
            | Self::ListTransactions => Access::Query,
            Self::Deposit | Self::Withdraw | Self::Transfer | Self::CreateAccount => {
                Access::Invoke
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::QueryBalance => "query balance",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Transfer => "transfer",
            Self::CreateAccount => "create account",
            Self::GetAccount => "get account",
            Self::GetTransfer => "get transfer",
            Self::GetTransferByStateKey => "get transfer by state key",
            Self::ListAccounts => "list accounts",
            Self::ListTransfers => "list transfers",
            Self::ListTransactions => "list transactions",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A ledger user as resolved by the ledger client for a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub org: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msp_id: Option<String>,
}

impl Identity {
    pub fn new(org: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            username: username.into(),
            msp_id: None,
        }
    }
}

/// Fixed routing for every chaincode call: channel, endorsing peers and chaincode name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeTarget {
    pub channel: String,
    pub peers: Vec<String>,
    pub chaincode: String,
}

/// One chaincode call, built fresh for each user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    kind: OperationKind,
    requestor: Identity,
    args: Vec<String>,
    target: ChaincodeTarget,
}

impl OperationRequest {
    pub fn new(
        kind: OperationKind,
        requestor: Identity,
        args: Vec<String>,
        target: ChaincodeTarget,
    ) -> Self {
        Self {
            kind,
            requestor,
            args,
            target,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn function_name(&self) -> &'static str {
        self.kind.function_name()
    }

    pub fn requestor(&self) -> &Identity {
        &self.requestor
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn channel(&self) -> &str {
        &self.target.channel
    }

    pub fn peers(&self) -> &[String] {
        &self.target.peers
    }

    pub fn chaincode(&self) -> &str {
        &self.target.chaincode
    }
}

/// Opaque result returned by the ledger for a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerPayload(pub String);

impl LedgerPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LedgerPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for LedgerPayload {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LedgerPayload {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Account record as stored by the banking chaincode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    #[serde(rename = "aadhaarHash")]
    pub aadhaar_hash: String,
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub role: String,
    pub balance: f64,
}

/// Ledger record of one account-to-account transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    #[serde(rename = "senderID")]
    pub sender_id: String,
    #[serde(rename = "receiverID")]
    pub receiver_id: String,
    #[serde(rename = "referenceNumber")]
    pub reference_number: String,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// Deposit or withdrawal entry kept per account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "referenceNumber")]
    pub reference_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// Input for opening a new account; hashes are computed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub user_id: String,
    pub name: String,
    pub aadhaar_hash: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub role: String,
    pub opening_balance: String,
}
