use super::*;
use shared::error::LedgerErrorKind;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallPath {
    Query,
    Invoke,
}

#[derive(Debug, Clone)]
struct RecordedCall {
    path: CallPath,
    function: String,
    requestor: Identity,
    args: Vec<String>,
}

struct RecordingClient {
    payload: String,
    fail_with: Option<LedgerError>,
    identity_error: Option<LedgerError>,
    users_resolved: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingClient {
    fn ok(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            fail_with: None,
            identity_error: None,
            users_resolved: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: LedgerError) -> Self {
        let mut client = Self::ok("");
        client.fail_with = Some(err);
        client
    }

    fn unknown_identity(err: LedgerError) -> Self {
        let mut client = Self::ok("");
        client.identity_error = Some(err);
        client
    }

    async fn record(
        &self,
        path: CallPath,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError> {
        self.calls.lock().await.push(RecordedCall {
            path,
            function: request.function_name().to_string(),
            requestor: request.requestor().clone(),
            args: request.args().to_vec(),
        });
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(LedgerPayload(self.payload.clone())),
        }
    }
}

#[async_trait]
impl LedgerClient for RecordingClient {
    async fn get_user(&self, org: &str, username: &str) -> Result<Identity, LedgerError> {
        self.users_resolved
            .lock()
            .await
            .push((org.to_string(), username.to_string()));
        if let Some(err) = &self.identity_error {
            return Err(err.clone());
        }
        Ok(Identity {
            org: org.to_string(),
            username: username.to_string(),
            msp_id: Some("Org1MSP".to_string()),
        })
    }

    async fn chaincode_query(
        &self,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError> {
        self.record(CallPath::Query, request).await
    }

    async fn chaincode_invoke(
        &self,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError> {
        self.record(CallPath::Invoke, request).await
    }
}

fn gateway(client: RecordingClient) -> LedgerGateway<RecordingClient> {
    LedgerGateway::from_profile(client, &NetworkProfile::default())
}

async fn run_core_operation(
    gateway: &LedgerGateway<RecordingClient>,
    kind: OperationKind,
) -> Result<LedgerPayload, LedgerError> {
    match kind {
        OperationKind::QueryBalance => gateway.query_balance("alice").await,
        OperationKind::Deposit => gateway.deposit("alice", "50").await,
        OperationKind::Withdraw => gateway.withdraw("alice", "20").await,
        OperationKind::Transfer => gateway.transfer("alice", "bob", "10").await,
        other => panic!("{other} is not a form operation"),
    }
}

const CORE_OPERATIONS: [OperationKind; 4] = [
    OperationKind::QueryBalance,
    OperationKind::Deposit,
    OperationKind::Withdraw,
    OperationKind::Transfer,
];

#[tokio::test]
async fn deposit_sends_username_then_amount_on_invoke_path() {
    let gateway = gateway(RecordingClient::ok("ok"));
    gateway.deposit("alice", "50").await.expect("deposit");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, CallPath::Invoke);
    assert_eq!(calls[0].function, "depositFunds");
    assert_eq!(calls[0].args, vec!["alice", "50"]);
    assert_eq!(calls[0].requestor.org, "org1.example.com");
    assert_eq!(calls[0].requestor.username, "alice");
}

#[tokio::test]
async fn transfer_sends_from_to_amount_in_order() {
    let gateway = gateway(RecordingClient::ok("ok"));
    gateway.transfer("alice", "bob", "10").await.expect("transfer");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, CallPath::Invoke);
    assert_eq!(calls[0].function, "transferFunds");
    assert_eq!(calls[0].args, vec!["alice", "bob", "10"]);
    assert_eq!(calls[0].requestor.username, "alice");
}

#[tokio::test]
async fn withdraw_uses_withdraw_function() {
    let gateway = gateway(RecordingClient::ok("ok"));
    gateway.withdraw("alice", "20").await.expect("withdraw");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].path, CallPath::Invoke);
    assert_eq!(calls[0].function, "withdrawFunds");
    assert_eq!(calls[0].args, vec!["alice", "20"]);
}

#[tokio::test]
async fn query_balance_never_touches_invoke_path() {
    let gateway = gateway(RecordingClient::ok("150"));
    let payload = gateway.query_balance("alice").await.expect("query");
    assert_eq!(payload.as_str(), "150");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, CallPath::Query);
    assert_eq!(calls[0].function, "queryBalance");
    assert_eq!(calls[0].args, vec!["alice"]);
}

#[tokio::test]
async fn mutating_operations_never_touch_query_path() {
    let gateway = gateway(RecordingClient::ok("ok"));
    for kind in [
        OperationKind::Deposit,
        OperationKind::Withdraw,
        OperationKind::Transfer,
    ] {
        run_core_operation(&gateway, kind).await.expect("operation");
    }

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.path == CallPath::Invoke));
}

#[tokio::test]
async fn every_operation_returns_the_stubbed_payload() {
    let gateway = gateway(RecordingClient::ok("tx-8c1f committed"));
    for kind in CORE_OPERATIONS {
        let payload = run_core_operation(&gateway, kind).await.expect("operation");
        assert_eq!(payload.to_string(), "tx-8c1f committed", "{kind}");
    }
}

#[tokio::test]
async fn every_operation_surfaces_the_client_failure_message() {
    let gateway = gateway(RecordingClient::failing(LedgerError::rejected(
        "insufficient balance",
    )));
    for kind in CORE_OPERATIONS {
        let err = run_core_operation(&gateway, kind)
            .await
            .expect_err("stub fails");
        assert_eq!(err.to_string(), "insufficient balance", "{kind}");
        assert_eq!(err.kind(), LedgerErrorKind::RejectedByLedger);
    }
}

#[tokio::test]
async fn identity_failure_stops_before_any_chaincode_call() {
    let gateway = gateway(RecordingClient::unknown_identity(
        LedgerError::authorization("identity mallory not enrolled"),
    ));
    let err = gateway.deposit("mallory", "5").await.expect_err("unknown user");
    assert_eq!(err.kind(), LedgerErrorKind::Authorization);
    assert_eq!(err.message(), "identity mallory not enrolled");
    assert!(gateway.client().calls.lock().await.is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_client() {
    let gateway = gateway(RecordingClient::ok("ok"));

    let cases = [
        gateway.query_balance("   ").await,
        gateway.deposit("alice", "").await,
        gateway.deposit("alice", "fifty").await,
        gateway.withdraw("alice", "-3").await,
        gateway.withdraw("alice", "0").await,
        gateway.transfer("alice", "", "10").await,
        gateway.transfer("alice", "bob", "NaN").await,
    ];
    for result in cases {
        let err = result.expect_err("rejected locally");
        assert_eq!(err.kind(), LedgerErrorKind::InvalidInput, "{err}");
    }

    assert!(gateway.client().users_resolved.lock().await.is_empty());
    assert!(gateway.client().calls.lock().await.is_empty());
}

#[tokio::test]
async fn field_values_are_trimmed_but_otherwise_verbatim() {
    let gateway = gateway(RecordingClient::ok("ok"));
    gateway.deposit("  alice ", " 12.50 ").await.expect("deposit");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].args, vec!["alice", "12.50"]);
}

#[tokio::test]
async fn create_account_orders_args_like_the_chaincode() {
    let gateway = gateway(RecordingClient::ok(""));
    let account = NewAccount {
        user_id: "USER_001".into(),
        name: "John Doe".into(),
        aadhaar_hash: "aa11".into(),
        email: "john@example.com".into(),
        password_hash: "pp22".into(),
        phone_number: "1234567890".into(),
        role: "user".into(),
        opening_balance: "1000".into(),
    };
    gateway
        .create_account("admin", &account)
        .await
        .expect("create account");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].path, CallPath::Invoke);
    assert_eq!(calls[0].function, "CreateAccount");
    assert_eq!(calls[0].requestor.username, "admin");
    assert_eq!(
        calls[0].args,
        vec![
            "USER_001",
            "John Doe",
            "aa11",
            "john@example.com",
            "pp22",
            "1234567890",
            "user",
            "1000"
        ]
    );
}

#[tokio::test]
async fn get_account_decodes_the_account_record() {
    let gateway = gateway(RecordingClient::ok(
        r#"{"userID":"USER_001","name":"John Doe","aadhaarHash":"aa11","email":"john@example.com","passwordHash":"pp22","phoneNumber":"1234567890","role":"user","balance":1000.0}"#,
    ));
    let account = gateway
        .get_account("admin", "USER_001")
        .await
        .expect("account");
    assert_eq!(account.user_id, "USER_001");
    assert_eq!(account.balance, 1000.0);

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].path, CallPath::Query);
    assert_eq!(calls[0].function, "GetAccount");
    assert_eq!(calls[0].args, vec!["USER_001"]);
}

#[tokio::test]
async fn get_account_rejects_garbage_payload() {
    let gateway = gateway(RecordingClient::ok("not json"));
    let err = gateway
        .get_account("admin", "USER_001")
        .await
        .expect_err("malformed");
    assert_eq!(err.kind(), LedgerErrorKind::RejectedByLedger);
    assert!(err.message().starts_with("malformed account record"));
}

#[tokio::test]
async fn get_transfer_queries_with_sender_receiver_reference() {
    let gateway = gateway(RecordingClient::ok(
        r#"{"senderID":"alice","receiverID":"bob","referenceNumber":"TRF-42","amount":10.0,"timestamp":"2024-05-01T10:00:00Z"}"#,
    ));
    let record = gateway
        .get_transfer("admin", " alice ", "bob", "TRF-42")
        .await
        .expect("transfer");
    assert_eq!(record.reference_number, "TRF-42");
    assert_eq!(record.amount, 10.0);

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, CallPath::Query);
    assert_eq!(calls[0].function, "GetTransfer");
    assert_eq!(calls[0].args, vec!["alice", "bob", "TRF-42"]);
    assert_eq!(calls[0].requestor.username, "admin");
}

#[tokio::test]
async fn get_transfer_needs_a_reference_number() {
    let gateway = gateway(RecordingClient::ok("{}"));
    let err = gateway
        .get_transfer("admin", "alice", "bob", "  ")
        .await
        .expect_err("missing reference");
    assert_eq!(err.kind(), LedgerErrorKind::InvalidInput);
    assert!(gateway.client().calls.lock().await.is_empty());
}

#[tokio::test]
async fn transfer_by_state_key_passes_the_key_through() {
    let gateway = gateway(RecordingClient::ok(
        r#"{"senderID":"alice","receiverID":"bob","referenceNumber":"TRF-7","amount":3.5}"#,
    ));
    let record = gateway
        .get_transfer_by_state_key("admin", "TRANSFER_alice_bob_TRF-7")
        .await
        .expect("transfer");
    assert_eq!(record.receiver_id, "bob");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].path, CallPath::Query);
    assert_eq!(calls[0].function, "GetTransferByStateKey");
    assert_eq!(calls[0].args, vec!["TRANSFER_alice_bob_TRF-7"]);
}

#[tokio::test]
async fn listings_are_argument_free_queries() {
    let gateway = gateway(RecordingClient::ok(
        r#"[{"senderID":"alice","receiverID":"bob","referenceNumber":"TRF-1","amount":1.0}]"#,
    ));
    let transfers = gateway.list_transfers("admin").await.expect("transfers");
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].sender_id, "alice");

    let calls = gateway.client().calls.lock().await;
    assert_eq!(calls[0].path, CallPath::Query);
    assert_eq!(calls[0].function, "GetAllTransfers");
    assert!(calls[0].args.is_empty());
}

#[tokio::test]
async fn empty_listing_payload_means_no_records() {
    let gateway = gateway(RecordingClient::ok(""));
    assert!(gateway.list_accounts("admin").await.expect("accounts").is_empty());
    assert!(gateway
        .list_transactions("admin")
        .await
        .expect("transactions")
        .is_empty());

    let calls = gateway.client().calls.lock().await;
    let functions: Vec<_> = calls.iter().map(|call| call.function.as_str()).collect();
    assert_eq!(functions, vec!["GetAllAccounts", "GetAllTransactions"]);
    assert!(calls.iter().all(|call| call.path == CallPath::Query));
}
