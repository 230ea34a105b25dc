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
//! Shared HTTP and websocket DTOs for the helpdesk API.
//!
//! These types mirror the server contract exactly: every REST response is a
//! `{message, data}` envelope and every realtime frame is a JSON comment
//! record. Keeping them in one crate means the UI and its tests decode the
//! wire format from a single source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success envelope wrapping every REST payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    /// Human-readable status message.
    pub message: String,
    /// Typed payload for the call.
    pub data: T,
}

/// Error body surfaced on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Human-readable status message.
    pub message: String,
    /// Diagnostic detail from the server.
    #[serde(default)]
    pub error: Option<String>,
}

/// Identity attributes decoded from the bearer token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserClaims {
    /// Stable user identifier.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Role name as issued by the server (`Admin`, `Technician`, ...).
    pub role: String,
    /// Tenant memberships for the user.
    #[serde(default)]
    pub tenants: Vec<String>,
}

impl UserClaims {
    /// Coarse role classification for dashboard/listing decisions.
    #[must_use]
    pub fn role_kind(&self) -> RoleKind {
        match self.role.as_str() {
            "Admin" => RoleKind::Admin,
            "Technician" => RoleKind::Technician,
            "Customer" => RoleKind::Customer,
            _ => RoleKind::Other,
        }
    }
}

/// Coarse role buckets used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    /// Tenant administrator.
    Admin,
    /// Assigned technician.
    Technician,
    /// End customer.
    Customer,
    /// Unknown role string; treated as least privileged.
    Other,
}

/// Login request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Token payload returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenGrant {
    /// Raw bearer token string.
    pub access_token: String,
}

/// Ticket lifecycle states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Newly created, unassigned or awaiting triage.
    Open,
    /// Being worked by a technician.
    InProgress,
    /// Fixed and awaiting confirmation.
    Resolved,
    /// Closed out.
    Closed,
}

/// Ticket urgency levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    /// Routine request.
    Low,
    /// Default priority.
    Medium,
    /// Needs prompt attention.
    High,
    /// Service-affecting.
    Urgent,
}

/// Ticket record as exchanged with the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket identifier; absent on creation requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning tenant.
    pub tenant_id: String,
    /// Customer who raised the ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Technician assignment, when any.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Short summary.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle state; server-assigned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// Urgency level.
    pub priority: TicketPriority,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `data` payload of the single-ticket endpoints, which nest the record
/// under a `ticket` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketHolder {
    /// The requested ticket.
    pub ticket: Ticket,
}

/// Single ticket comment, both in history pages and live frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Comment identifier.
    pub id: String,
    /// Ticket the comment belongs to.
    pub ticket_id: String,
    /// Authoring user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Authoring user display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Comment text.
    pub comment: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// `data` payload of the comment history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentPage {
    /// Comments in ascending creation order.
    pub comments: Vec<Comment>,
}

/// `data` payload of the ticket listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketPage {
    /// Tickets for the requested page.
    pub tickets: Vec<Ticket>,
}

/// Outbound websocket frame posting a new comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundComment {
    /// Comment text to append to the ticket.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::{
        ApiEnvelope, Comment, RoleKind, TicketHolder, TicketPriority, TicketStatus, UserClaims,
    };

    #[test]
    fn envelope_round_trips_token_grant() {
        let json = r#"{"message":"ok","data":{"access_token":"a.b.c"}}"#;
        let envelope: ApiEnvelope<super::TokenGrant> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.access_token, "a.b.c");
    }

    #[test]
    fn ticket_enums_use_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&TicketPriority::Urgent).unwrap(),
            "\"URGENT\""
        );
    }

    #[test]
    fn single_ticket_payload_is_nested_under_a_ticket_key() {
        // Detail, create and update responses wrap the record one level
        // deeper than the listing endpoints.
        let json = r#"{"message":"success","data":{"ticket":{"id":"t1","tenant_id":"tn1","title":"printer on fire","priority":"HIGH"}}}"#;
        let envelope: ApiEnvelope<TicketHolder> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.ticket.id.as_deref(), Some("t1"));
        assert_eq!(envelope.data.ticket.tenant_id, "tn1");
        assert_eq!(envelope.data.ticket.priority, TicketPriority::High);
        assert!(envelope.data.ticket.status.is_none());
    }

    #[test]
    fn comment_frame_decodes_with_optional_author() {
        let json = r#"{"id":"c1","ticket_id":"t1","comment":"hi","created_at":"2025-01-01T00:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, "c1");
        assert!(comment.user_id.is_none());
    }

    #[test]
    fn role_kind_maps_known_roles() {
        let claims = |role: &str| UserClaims {
            id: "u1".into(),
            username: "u".into(),
            role: role.into(),
            tenants: vec![],
        };
        assert_eq!(claims("Admin").role_kind(), RoleKind::Admin);
        assert_eq!(claims("Technician").role_kind(), RoleKind::Technician);
        assert_eq!(claims("Customer").role_kind(), RoleKind::Customer);
        assert_eq!(claims("root").role_kind(), RoleKind::Other);
    }
}
