//! Ticket feature wiring.
//!
//! # Design
//! - Listing, detail and the live comment panel stay in one feature slice.
//! - API calls are restricted to this feature's `api` module; views go
//!   through the shared client for auth and retry handling.

#[cfg(target_arch = "wasm32")]
pub mod api;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
