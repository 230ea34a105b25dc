#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Helpdesk web UI.
//!
//! A multi-tenant ticketing front-end built around a client-side session
//! manager: token validation and decoding, proactive refresh inside a
//! five-minute horizon, a single-flight refresh gate for overlapping
//! calls, and a reconnectable realtime comment channel per ticket. The
//! `core` modules are DOM-free and test on the host; everything touching
//! the browser lives behind the wasm32 target.

pub mod core;
pub mod features;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

#[cfg(test)]
mod tests {
    use crate::core::guard::{GuardVerdict, evaluate};
    use crate::core::logic::COMMENT_HISTORY_LIMIT;
    use crate::core::token::{REFRESH_HORIZON_SECS, is_well_formed, needs_refresh};

    #[test]
    fn session_policy_constants_line_up() {
        // The expiry watch period must cover the refresh horizon.
        assert_eq!(REFRESH_HORIZON_SECS, 300);
        assert!(COMMENT_HISTORY_LIMIT >= 1);
    }

    #[test]
    fn a_fresh_visitor_is_left_on_public_pages() {
        assert_eq!(evaluate("/login", false, true), GuardVerdict::Stay);
        assert_eq!(evaluate("/signup", false, true), GuardVerdict::Stay);
    }

    #[test]
    fn format_check_and_horizon_compose() {
        assert!(is_well_formed("h.p.s"));
        assert!(needs_refresh(1000, 1000 - REFRESH_HORIZON_SECS));
    }
}
