//! [`LedgerClient`] over a ledger REST gateway speaking JSON.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Identity, LedgerPayload, OperationRequest},
    error::{ApiError, ErrorCode, LedgerError, LedgerErrorKind},
    protocol::{ChaincodeCall, ChaincodeResponse, IdentityResponse},
};
use tracing::debug;
use url::Url;

use crate::{config::NetworkProfile, LedgerClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Identity,
    Chaincode,
}

pub struct HttpLedgerClient {
    http: Client,
    base_url: Url,
}

impl HttpLedgerClient {
    pub fn new(gateway_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(gateway_url)
            .with_context(|| format!("invalid ledger gateway url '{gateway_url}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("ledger gateway url '{gateway_url}' cannot carry a path");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build ledger gateway HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn from_profile(profile: &NetworkProfile) -> Result<Self> {
        Self::new(&profile.gateway_url, profile.request_timeout())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post_chaincode(
        &self,
        request: &OperationRequest,
        action: &str,
    ) -> Result<LedgerPayload, LedgerError> {
        let url = self.endpoint(&[
            "channels",
            request.channel(),
            "chaincodes",
            request.chaincode(),
            action,
        ]);
        debug!(%url, function = request.function_name(), "ledger gateway: POST");

        let response = self
            .http
            .post(url)
            .json(&ChaincodeCall::from(request))
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response, Endpoint::Chaincode).await?;
        let body: ChaincodeResponse = response.json().await.map_err(|err| {
            LedgerError::rejected(format!("malformed ledger gateway response: {err}"))
        })?;
        Ok(LedgerPayload(body.payload))
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn get_user(&self, org: &str, username: &str) -> Result<Identity, LedgerError> {
        let url = self.endpoint(&["identities", org, username]);
        debug!(%url, "ledger gateway: GET identity");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response, Endpoint::Identity).await?;
        let body: IdentityResponse = response.json().await.map_err(|err| {
            LedgerError::authorization(format!("malformed identity response: {err}"))
        })?;

        if body.org != org || body.username != username {
            return Err(LedgerError::authorization(format!(
                "ledger gateway resolved '{}@{}' when asked for '{username}@{org}'",
                body.username, body.org
            )));
        }
        Ok(body.into())
    }

    async fn chaincode_query(
        &self,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError> {
        self.post_chaincode(request, "query").await
    }

    async fn chaincode_invoke(
        &self,
        request: &OperationRequest,
    ) -> Result<LedgerPayload, LedgerError> {
        self.post_chaincode(request, "invoke").await
    }
}

fn transport_error(err: reqwest::Error) -> LedgerError {
    if err.is_timeout() {
        LedgerError::connectivity(format!("ledger gateway timed out: {err}"))
    } else {
        LedgerError::connectivity(format!("ledger gateway unreachable: {err}"))
    }
}

async fn ensure_success(response: Response, endpoint: Endpoint) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let raw = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiError>(&raw).ok();
    Err(classify_failure(status, body, &raw, endpoint))
}

fn classify_failure(
    status: StatusCode,
    body: Option<ApiError>,
    raw: &str,
    endpoint: Endpoint,
) -> LedgerError {
    let code = body.as_ref().map(|body| body.code);
    let kind = match (code, status.as_u16()) {
        (Some(ErrorCode::NotFound), _) | (None, 404) if endpoint == Endpoint::Identity => {
            LedgerErrorKind::Authorization
        }
        (Some(code), _) => code.into(),
        (None, 401 | 403) => LedgerErrorKind::Authorization,
        (None, 400 | 422) => LedgerErrorKind::InvalidInput,
        (None, 502..=504) => LedgerErrorKind::Connectivity,
        (None, _) => LedgerErrorKind::RejectedByLedger,
    };

    let message = match body {
        Some(body) if !body.message.trim().is_empty() => body.message,
        _ if !raw.trim().is_empty() => raw.trim().to_string(),
        _ => format!("ledger gateway returned {status}"),
    };
    LedgerError::new(kind, message)
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
