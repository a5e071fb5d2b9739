use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{
    domain::{
        Access, Account, ChaincodeTarget, Identity, LedgerPayload, NewAccount, OperationKind,
        OperationRequest, TransactionRecord, TransferRecord,
    },
    error::LedgerError,
};
use tracing::{info, warn};

pub mod config;
mod http;

pub use config::{load_profile, NetworkProfile, ProfileOverrides};
pub use http::HttpLedgerClient;

/// Remote side of the ledger: identity resolution plus read-only and
/// state-changing chaincode calls.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_user(&self, org: &str, username: &str) -> Result<Identity, LedgerError>;
    async fn chaincode_query(&self, request: &OperationRequest)
        -> Result<LedgerPayload, LedgerError>;
    async fn chaincode_invoke(
        &self,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError>;
}

/// Builds one [`OperationRequest`] per call against a fixed organization and
/// chaincode target, and routes it to the query or invoke path.
pub struct LedgerGateway<C: LedgerClient> {
    client: C,
    org: String,
    target: ChaincodeTarget,
}

impl<C: LedgerClient> LedgerGateway<C> {
    pub fn new(client: C, org: impl Into<String>, target: ChaincodeTarget) -> Self {
        Self {
            client,
            org: org.into(),
            target,
        }
    }

    pub fn from_profile(client: C, profile: &NetworkProfile) -> Self {
        Self::new(client, profile.org.clone(), profile.target())
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn target(&self) -> &ChaincodeTarget {
        &self.target
    }

    /// Resolves `username` within the gateway's organization and runs `kind`
    /// with `args` exactly as given. No retries.
    pub async fn invoke(
        &self,
        kind: OperationKind,
        username: &str,
        args: Vec<String>,
    ) -> Result<LedgerPayload, LedgerError> {
        let identity = match self.client.get_user(&self.org, username).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(
                    operation = %kind,
                    org = %self.org,
                    requestor = username,
                    error = %err,
                    "ledger: identity resolution failed"
                );
                return Err(err);
            }
        };

        let request = OperationRequest::new(kind, identity, args, self.target.clone());
        info!(
            operation = %kind,
            function = request.function_name(),
            requestor = username,
            channel = request.channel(),
            chaincode = request.chaincode(),
            "ledger: submitting call"
        );

        let result = match kind.access() {
            Access::Query => self.client.chaincode_query(&request).await,
            Access::Invoke => self.client.chaincode_invoke(&request).await,
        };

        match &result {
            Ok(payload) => info!(
                operation = %kind,
                payload_len = payload.as_str().len(),
                "ledger: call completed"
            ),
            Err(err) => warn!(
                operation = %kind,
                error_kind = ?err.kind(),
                error = %err,
                "ledger: call failed"
            ),
        }
        result
    }

    pub async fn query_balance(&self, username: &str) -> Result<LedgerPayload, LedgerError> {
        let username = required("username", username)?;
        self.invoke(
            OperationKind::QueryBalance,
            &username,
            vec![username.clone()],
        )
        .await
    }

    pub async fn deposit(&self, username: &str, amount: &str) -> Result<LedgerPayload, LedgerError> {
        let username = required("username", username)?;
        let amount = positive_amount(amount)?;
        self.invoke(OperationKind::Deposit, &username, vec![username.clone(), amount])
            .await
    }

    pub async fn withdraw(
        &self,
        username: &str,
        amount: &str,
    ) -> Result<LedgerPayload, LedgerError> {
        let username = required("username", username)?;
        let amount = positive_amount(amount)?;
        self.invoke(OperationKind::Withdraw, &username, vec![username.clone(), amount])
            .await
    }

    /// Moves `amount` from `from` to `to`, signed by `from`.
    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<LedgerPayload, LedgerError> {
        let from = required("username", from)?;
        let to = required("recipient", to)?;
        let amount = positive_amount(amount)?;
        self.invoke(
            OperationKind::Transfer,
            &from,
            vec![from.clone(), to, amount],
        )
        .await
    }

    pub async fn create_account(
        &self,
        requestor: &str,
        account: &NewAccount,
    ) -> Result<LedgerPayload, LedgerError> {
        let requestor = required("requestor", requestor)?;
        let args = vec![
            required("user id", &account.user_id)?,
            required("name", &account.name)?,
            account.aadhaar_hash.trim().to_string(),
            account.email.trim().to_string(),
            account.password_hash.trim().to_string(),
            account.phone_number.trim().to_string(),
            required("role", &account.role)?,
            opening_balance(&account.opening_balance)?,
        ];
        self.invoke(OperationKind::CreateAccount, &requestor, args)
            .await
    }

    pub async fn get_account(&self, requestor: &str, user_id: &str) -> Result<Account, LedgerError> {
        let requestor = required("requestor", requestor)?;
        let user_id = required("user id", user_id)?;
        let payload = self
            .invoke(OperationKind::GetAccount, &requestor, vec![user_id])
            .await?;
        decode_record(&payload, "account")
    }

    /// Looks up a transfer by the sender, receiver and reference number it was booked under.
    pub async fn get_transfer(
        &self,
        requestor: &str,
        sender: &str,
        receiver: &str,
        reference: &str,
    ) -> Result<TransferRecord, LedgerError> {
        let requestor = required("requestor", requestor)?;
        let args = vec![
            required("sender", sender)?,
            required("receiver", receiver)?,
            required("reference number", reference)?,
        ];
        let payload = self
            .invoke(OperationKind::GetTransfer, &requestor, args)
            .await?;
        decode_record(&payload, "transfer")
    }

    pub async fn get_transfer_by_state_key(
        &self,
        requestor: &str,
        state_key: &str,
    ) -> Result<TransferRecord, LedgerError> {
        let requestor = required("requestor", requestor)?;
        let state_key = required("state key", state_key)?;
        let payload = self
            .invoke(OperationKind::GetTransferByStateKey, &requestor, vec![state_key])
            .await?;
        decode_record(&payload, "transfer")
    }

    pub async fn list_accounts(&self, requestor: &str) -> Result<Vec<Account>, LedgerError> {
        self.list(OperationKind::ListAccounts, requestor, "account")
            .await
    }

    pub async fn list_transfers(&self, requestor: &str) -> Result<Vec<TransferRecord>, LedgerError> {
        self.list(OperationKind::ListTransfers, requestor, "transfer")
            .await
    }

    pub async fn list_transactions(
        &self,
        requestor: &str,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.list(OperationKind::ListTransactions, requestor, "transaction")
            .await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        kind: OperationKind,
        requestor: &str,
        what: &str,
    ) -> Result<Vec<T>, LedgerError> {
        let requestor = required("requestor", requestor)?;
        let payload = self.invoke(kind, &requestor, Vec::new()).await?;
        // An empty ledger answers with no payload at all.
        if payload.as_str().trim().is_empty() {
            return Ok(Vec::new());
        }
        decode_record(&payload, what)
    }
}

fn decode_record<T: DeserializeOwned>(payload: &LedgerPayload, what: &str) -> Result<T, LedgerError> {
    serde_json::from_str(payload.as_str())
        .map_err(|err| LedgerError::rejected(format!("malformed {what} record: {err}")))
}

fn required(field: &str, value: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::invalid_input(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn positive_amount(value: &str) -> Result<String, LedgerError> {
    let value = required("amount", value)?;
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(value),
        _ => Err(LedgerError::invalid_input(format!(
            "amount must be a positive number, got '{value}'"
        ))),
    }
}

fn opening_balance(value: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok("0".to_string());
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Ok(value.to_string()),
        _ => Err(LedgerError::invalid_input(format!(
            "opening balance must be zero or more, got '{value}'"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
