//! DOM-free core: token handling, session lifecycle, refresh gating,
//! comment stream state and the route guard policy.

pub mod comments;
pub mod error;
pub mod guard;
pub mod logic;
pub mod refresh;
pub mod session;
pub mod store;
pub mod token;
