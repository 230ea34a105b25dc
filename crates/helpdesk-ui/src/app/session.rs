//! Session orchestration: hydration, login, logout and the expiry watch.
//!
//! # Design
//! - Every flow here moves store state, localStorage and the cookie mirror
//!   together, through the named session transitions and the storage
//!   helpers.
//! - An undecodable credential is signed out, never refreshed; refresh is
//!   reserved for structurally valid tokens nearing expiry.

use crate::core::store::AppStore;
use crate::core::token;
use crate::services::api::ApiClient;
use crate::services::storage;
use gloo::console;
use yewdux::prelude::Dispatch;

/// Load any persisted credential into the store, exactly once at boot.
pub(crate) fn hydrate() {
    let dispatch = Dispatch::<AppStore>::new();
    match storage::hydrate() {
        Some((token_str, claims)) => {
            // Re-mirror so a cookie cleared out-of-band comes back in sync.
            storage::mirror_cookie(&token_str);
            dispatch.reduce_mut(|store| store.session.hydrated_ok(claims, token_str));
        }
        None => dispatch.reduce_mut(|store| store.session.hydrated_empty()),
    }
}

/// Refresh the credential when it is expired or inside the refresh horizon.
///
/// Runs at boot and on every tick of the expiry watch. Does nothing when
/// signed out.
pub(crate) async fn check_expiry(client: &ApiClient) {
    let dispatch = Dispatch::<AppStore>::new();
    let Some(current) = dispatch.get().session.token.clone() else {
        return;
    };
    match token::decode(&current) {
        Ok(decoded) => {
            if token::needs_refresh(decoded.expires_at, chrono::Utc::now().timestamp()) {
                if let Err(err) = client.refresh_shared().await {
                    // The failed transition already cleared the session.
                    console::warn!("scheduled refresh failed", err.to_string());
                }
            }
        }
        Err(err) => {
            console::warn!("stored token undecodable, signing out", err.to_string());
            storage::clear();
            dispatch.reduce_mut(|store| store.session.logged_out());
        }
    }
}

/// Exchange credentials for a session; failures leave any prior session
/// untouched and surface the error.
pub(crate) async fn login(client: &ApiClient, email: &str, password: &str) {
    let dispatch = Dispatch::<AppStore>::new();
    dispatch.reduce_mut(|store| store.session.login_started());
    match client.login(email, password).await {
        Ok((claims, token_str)) => {
            storage::persist(&token_str, &claims);
            dispatch.reduce_mut(|store| store.session.login_succeeded(claims, token_str));
        }
        Err(err) => dispatch.reduce_mut(|store| store.session.login_failed(err.to_string())),
    }
}

/// Sign out locally and best-effort on the server.
pub(crate) async fn logout(client: &ApiClient) {
    let dispatch = Dispatch::<AppStore>::new();
    let token_str = dispatch.get().session.token.clone();
    if let Some(token_str) = token_str {
        if let Err(err) = client.logout(&token_str).await {
            console::warn!("server-side logout failed", err.to_string());
        }
    }
    client.reset_refresh();
    storage::clear();
    dispatch.reduce_mut(|store| {
        store.session.logged_out();
        store.tickets.stream.clear();
    });
}
