//! API helpers for tickets and comment history.
//!
//! # Design
//! - Keep HTTP calls localized to the feature layer.
//! - Reuse the shared client so every call gets the refresh-and-retry
//!   protocol for free.

use crate::core::error::ApiError;
use crate::core::logic::{COMMENT_HISTORY_LIMIT, build_comments_path, build_ticket_listing_path};
use crate::services::api::{ApiClient, Method};
use helpdesk_api_models::{Comment, CommentPage, RoleKind, Ticket, TicketHolder, TicketPage};

/// Page size for ticket listings.
const LISTING_LIMIT: u32 = 50;

/// Fetch the first page of tickets visible to `role`.
pub(crate) async fn list_tickets(
    client: &ApiClient,
    role: RoleKind,
) -> Result<Vec<Ticket>, ApiError> {
    let page: TicketPage = client
        .get_json(&build_ticket_listing_path(role, LISTING_LIMIT, 0))
        .await?;
    Ok(page.tickets)
}

/// Fetch one ticket by id.
///
/// Single-ticket responses nest the record under a `ticket` key, unlike
/// the listing payloads.
pub(crate) async fn fetch_ticket(client: &ApiClient, ticket_id: &str) -> Result<Ticket, ApiError> {
    let holder: TicketHolder = client.get_json(&format!("/ticket/{ticket_id}")).await?;
    Ok(holder.ticket)
}

/// Fetch the comment history page for a ticket, oldest first.
pub(crate) async fn fetch_comment_history(
    client: &ApiClient,
    ticket_id: &str,
) -> Result<Vec<Comment>, ApiError> {
    let page: CommentPage = client
        .get_json(&build_comments_path(ticket_id, COMMENT_HISTORY_LIMIT, 0))
        .await?;
    Ok(page.comments)
}

/// Create a new ticket; the server assigns id, status and timestamps.
pub(crate) async fn create_ticket(client: &ApiClient, ticket: &Ticket) -> Result<Ticket, ApiError> {
    let holder: TicketHolder = client.send(Method::Post, "/ticket", Some(ticket)).await?;
    Ok(holder.ticket)
}

/// Update an existing ticket in place.
pub(crate) async fn update_ticket(
    client: &ApiClient,
    ticket_id: &str,
    ticket: &Ticket,
) -> Result<Ticket, ApiError> {
    let holder: TicketHolder = client
        .send(Method::Put, &format!("/ticket/{ticket_id}"), Some(ticket))
        .await?;
    Ok(holder.ticket)
}
