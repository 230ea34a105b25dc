//! Pure path/URL builders shared by transport and tests.
//!
//! # Design
//! - Keep string munging out of the wasm-only services so it can be
//!   exercised on the host.

use helpdesk_api_models::RoleKind;

/// History page size requested when attaching a ticket.
pub const COMMENT_HISTORY_LIMIT: u32 = 100;

/// Build the comment history path for a ticket.
#[must_use]
pub fn build_comments_path(ticket_id: &str, limit: u32, offset: u32) -> String {
    format!("/ticket/{ticket_id}/comments?limit={limit}&offset={offset}")
}

/// Build the ticket listing path appropriate for a role.
///
/// Admins see the tenant-wide listing; technicians and customers see the
/// listings scoped to them.
#[must_use]
pub fn build_ticket_listing_path(role: RoleKind, limit: u32, offset: u32) -> String {
    let scope = match role {
        RoleKind::Technician => "/ticket/technician",
        RoleKind::Customer | RoleKind::Other => "/ticket/customer",
        RoleKind::Admin => "/ticket",
    };
    format!("{scope}?limit={limit}&offset={offset}")
}

/// Build the duplex channel URL for a ticket, swapping to the ws scheme.
#[must_use]
pub fn build_channel_url(base_url: &str, ticket_id: &str, token: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/v1/ws/ticket/{ticket_id}?token={token}")
}

#[cfg(test)]
mod tests {
    use super::{build_channel_url, build_comments_path, build_ticket_listing_path};
    use helpdesk_api_models::RoleKind;

    #[test]
    fn comments_path_carries_paging() {
        assert_eq!(
            build_comments_path("t1", 100, 0),
            "/ticket/t1/comments?limit=100&offset=0"
        );
    }

    #[test]
    fn listing_path_depends_on_role() {
        assert_eq!(
            build_ticket_listing_path(RoleKind::Admin, 50, 0),
            "/ticket?limit=50&offset=0"
        );
        assert_eq!(
            build_ticket_listing_path(RoleKind::Technician, 50, 0),
            "/ticket/technician?limit=50&offset=0"
        );
        assert_eq!(
            build_ticket_listing_path(RoleKind::Customer, 50, 10),
            "/ticket/customer?limit=50&offset=10"
        );
    }

    #[test]
    fn channel_url_swaps_scheme_and_addresses_the_ticket() {
        assert_eq!(
            build_channel_url("http://localhost:8080", "t1", "a.b.c"),
            "ws://localhost:8080/v1/ws/ticket/t1?token=a.b.c"
        );
        assert_eq!(
            build_channel_url("https://desk.example.org/", "t2", "x.y.z"),
            "wss://desk.example.org/v1/ws/ticket/t2?token=x.y.z"
        );
    }
}
