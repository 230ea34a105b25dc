//! App-wide yewdux store.
//!
//! # Design
//! - One store holds the shared slices; components select what they need.
//! - Session mutations go through the named transitions on
//!   [`SessionState`]; nothing writes its fields directly.

use crate::core::session::SessionState;
use crate::features::tickets::state::TicketsState;
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Authentication state.
    pub session: SessionState,
    /// Ticket list and attached comment stream.
    pub tickets: TicketsState,
}
