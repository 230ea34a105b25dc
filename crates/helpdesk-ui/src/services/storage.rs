//! Durable credential mirror: localStorage plus the cookie copy.
//!
//! # Design
//! - State, storage and the cookie always move together; the three write
//!   helpers here are the only code that touches any of them.
//! - Hydration self-heals: a malformed stored token or unparseable claims
//!   blob clears everything instead of reaching the session manager.

use crate::core::token;
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use helpdesk_api_models::UserClaims;
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const USER_KEY: &str = "user";

const COOKIE_MAX_AGE_SECS: u32 = 86_400;

/// Write token, claims and the cookie mirror as one unit.
pub(crate) fn persist(token: &str, claims: &UserClaims) {
    set_storage(ACCESS_TOKEN_KEY, token);
    set_storage(USER_KEY, claims);
    mirror_cookie(token);
}

/// Remove token, claims and the cookie mirror; idempotent.
pub(crate) fn clear() {
    LocalStorage::delete(ACCESS_TOKEN_KEY);
    LocalStorage::delete(USER_KEY);
    write_cookie("access_token=; path=/; expires=Thu, 01 Jan 1970 00:00:00 GMT");
}

/// Read the persisted credential, self-healing invalid entries.
pub(crate) fn hydrate() -> Option<(String, UserClaims)> {
    let stored_token = LocalStorage::get::<String>(ACCESS_TOKEN_KEY).ok()?;
    if !token::is_well_formed(&stored_token) {
        console::warn!("stored token failed format validation, clearing credentials");
        clear();
        return None;
    }
    match LocalStorage::get::<UserClaims>(USER_KEY) {
        Ok(claims) => Some((stored_token, claims)),
        Err(_) => {
            console::warn!("stored claims unreadable, clearing credentials");
            clear();
            None
        }
    }
}

/// Re-write the cookie copy of the token (24h, path-scoped, lax).
pub(crate) fn mirror_cookie(token: &str) {
    write_cookie(&format!(
        "access_token={token}; path=/; max-age={COOKIE_MAX_AGE_SECS}; SameSite=Lax"
    ));
}

fn write_cookie(value: &str) {
    let Ok(document) = gloo::utils::document().dyn_into::<HtmlDocument>() else {
        console::error!("document does not expose the cookie API");
        return;
    };
    if let Err(err) = document.set_cookie(value) {
        console::error!("cookie write failed", err);
    }
}

fn set_storage<T: serde::Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        console::error!("storage write failed", key, err.to_string());
    }
}
