//! Authenticated HTTP gateway (REST).
//!
//! # Design
//! - Every authenticated call goes through [`ApiClient::send`], which owns
//!   the refresh-and-retry protocol: one shared refresh, FIFO waiters, and
//!   at most one retry per call.
//! - Callers without a usable token fail fast with `Unauthenticated`; no
//!   network request is made.
//! - State, storage and the cookie are updated together on every refresh
//!   outcome, through the session transitions and the storage helpers.

use crate::core::error::{ApiError, is_token_rejection, should_refresh_and_retry};
use crate::core::refresh::{GateEntry, RefreshError, RefreshGate, wait};
use crate::core::store::AppStore;
use crate::core::token;
use crate::services::storage;
use gloo_net::http::{Request, Response};
use helpdesk_api_models::{ApiEnvelope, ApiErrorBody, LoginRequest, TokenGrant, UserClaims};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::Url;
use yewdux::prelude::Dispatch;

/// HTTP method for a gateway call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
}

/// Shared API client carrying the base URL and the refresh gate.
#[derive(Clone)]
pub(crate) struct ApiClient {
    base_url: String,
    gate: RefreshGate,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            gate: RefreshGate::new(),
        }
    }

    /// Perform an authenticated call, refreshing and retrying once on a
    /// token rejection.
    pub(crate) async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let mut token = self.current_token().ok_or(ApiError::Unauthenticated)?;
        let mut refreshed = false;
        loop {
            match self.attempt(method, path, body, &token).await {
                // One refresh per call; a second rejection surfaces.
                Err(err) if should_refresh_and_retry(&err, refreshed) => {
                    token = self.refresh_shared().await.map_err(ApiError::from)?;
                    refreshed = true;
                }
                other => return other,
            }
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::Get, path, None).await
    }

    /// Exchange credentials for a token and decoded claims.
    pub(crate) async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserClaims, String), ApiError> {
        let request = Request::post(&self.url("/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(match classify_failure(&response).await {
                ApiError::AuthRejected { message, .. } | ApiError::Http { message, .. } => {
                    ApiError::InvalidCredentials(message)
                }
                other => other,
            });
        }
        let envelope: ApiEnvelope<TokenGrant> = response
            .json()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        decode_grant(envelope.data)
    }

    /// Best-effort server-side logout; local state is cleared regardless.
    pub(crate) async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/auth/logout"))
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if response.ok() {
            Ok(())
        } else {
            Err(classify_failure(&response).await)
        }
    }

    /// Run the single-flight refresh protocol, returning the new token.
    ///
    /// Overlapping callers share one attempt; all of them observe the same
    /// outcome. On failure the session and storage are cleared before the
    /// error is fanned out.
    pub(crate) async fn refresh_shared(&self) -> Result<String, RefreshError> {
        match self.gate.enter() {
            GateEntry::Leader => {
                let outcome = self.run_refresh().await;
                self.gate.settle(&outcome);
                outcome
            }
            GateEntry::Follower(receiver) => wait(receiver).await,
        }
    }

    /// Drop any parked refresh waiters; used on logout.
    pub(crate) fn reset_refresh(&self) {
        self.gate.reset();
    }

    async fn run_refresh(&self) -> Result<String, RefreshError> {
        let dispatch = Dispatch::<AppStore>::new();
        let Some(current) = dispatch.get().session.token.clone() else {
            return Err(RefreshError::new("no credential to refresh"));
        };
        dispatch.reduce_mut(|store| store.session.refresh_started());
        match self.refresh_raw(&current).await {
            Ok((claims, new_token)) => {
                storage::persist(&new_token, &claims);
                dispatch.reduce_mut(|store| store.session.refresh_succeeded(claims, new_token.clone()));
                Ok(new_token)
            }
            Err(err) => {
                storage::clear();
                dispatch.reduce_mut(|store| store.session.refresh_failed());
                Err(RefreshError::new(err.to_string()))
            }
        }
    }

    async fn refresh_raw(&self, current: &str) -> Result<(UserClaims, String), ApiError> {
        let response = Request::post(&self.url("/auth/refresh"))
            .header("Authorization", &format!("Bearer {current}"))
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(classify_failure(&response).await);
        }
        let envelope: ApiEnvelope<TokenGrant> = response
            .json()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        decode_grant(envelope.data)
    }

    async fn attempt<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        let mut request = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
        };
        request = request.header("Authorization", &format!("Bearer {token}"));
        let request = match body {
            Some(body) => request
                .json(body)
                .map_err(|err| ApiError::Network(err.to_string()))?,
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(classify_failure(&response).await);
        }
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(envelope.data)
    }

    fn current_token(&self) -> Option<String> {
        Dispatch::<AppStore>::new()
            .get()
            .session
            .token
            .clone()
            .filter(|token| token::is_well_formed(token))
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn decode_grant(grant: TokenGrant) -> Result<(UserClaims, String), ApiError> {
    // A malformed token is never decoded further or retried.
    if !token::is_well_formed(&grant.access_token) {
        return Err(ApiError::MalformedToken);
    }
    let decoded = token::decode(&grant.access_token).map_err(|_| ApiError::MalformedToken)?;
    Ok((decoded.claims, grant.access_token))
}

async fn classify_failure(response: &Response) -> ApiError {
    let status = response.status();
    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.unwrap_or(body.message))
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    response.status_text()
                } else {
                    text
                }
            }),
        Err(_) => response.status_text(),
    };
    if is_token_rejection(status, &message) {
        ApiError::AuthRejected { status, message }
    } else {
        ApiError::Http { status, message }
    }
}

/// Resolve the API origin from the page location.
///
/// The dev server runs the UI on port 3000 with the API on 8080; any other
/// deployment serves both from one origin.
pub(crate) fn api_base_url() -> String {
    let href = gloo::utils::window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    if let Ok(url) = Url::new(&href) {
        let mapped_port = match url.port().as_str() {
            "" => None,
            "3000" => Some("8080".to_string()),
            other => Some(other.to_string()),
        };
        let mut base = format!("{}//{}", url.protocol(), url.hostname());
        if let Some(port) = mapped_port {
            base.push(':');
            base.push_str(&port);
        }
        return base;
    }
    "http://localhost:8080".to_string()
}
