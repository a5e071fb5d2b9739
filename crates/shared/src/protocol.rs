//! JSON bodies exchanged with the ledger REST gateway.

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, OperationRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestorRef {
    pub org: String,
    pub username: String,
}

impl From<&Identity> for RequestorRef {
    fn from(value: &Identity) -> Self {
        Self {
            org: value.org.clone(),
            username: value.username.clone(),
        }
    }
}

/// Body of `POST /channels/{channel}/chaincodes/{chaincode}/{query|invoke}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeCall {
    pub requestor: RequestorRef,
    pub peers: Vec<String>,
    pub fcn: String,
    pub args: Vec<String>,
}

impl From<&OperationRequest> for ChaincodeCall {
    fn from(request: &OperationRequest) -> Self {
        Self {
            requestor: RequestorRef::from(request.requestor()),
            peers: request.peers().to_vec(),
            fcn: request.function_name().to_string(),
            args: request.args().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeResponse {
    #[serde(default)]
    pub payload: String,
}

/// Body of `GET /identities/{org}/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub org: String,
    pub username: String,
    #[serde(default)]
    pub msp_id: Option<String>,
}

impl From<IdentityResponse> for Identity {
    fn from(value: IdentityResponse) -> Self {
        Self {
            org: value.org,
            username: value.username,
            msp_id: value.msp_id,
        }
    }
}
