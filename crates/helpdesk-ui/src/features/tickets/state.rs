//! Ticket feature state.
//!
//! # Design
//! - Listing rows and the attached comment stream live together so the
//!   detail view has one slice to select.
//! - Mutations are named so the listing and the stream stay predictable.

use crate::core::comments::CommentStream;
use helpdesk_api_models::{Ticket, TicketPriority, UserClaims};

/// Ticket list and comment stream state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TicketsState {
    /// Tickets for the current listing.
    pub rows: Vec<Ticket>,
    /// Whether a listing fetch is in flight.
    pub loading: bool,
    /// Last listing error, if any.
    pub error: Option<String>,
    /// Comment stream for the attached ticket.
    pub stream: CommentStream,
}

impl TicketsState {
    /// Listing fetch started.
    pub fn load_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Listing fetch succeeded.
    pub fn loaded(&mut self, rows: Vec<Ticket>) {
        self.rows = rows;
        self.loading = false;
        self.error = None;
    }

    /// Listing fetch failed.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}

/// Build a creation draft on behalf of the signed-in user.
///
/// The server requires the raising customer's id on every create, so the
/// draft always carries `user.id`. Returns `None` when the account has no
/// tenant membership to file the ticket under.
#[must_use]
pub fn new_ticket_draft(
    user: &UserClaims,
    title: &str,
    description: Option<String>,
) -> Option<Ticket> {
    let tenant_id = user.tenants.first()?.clone();
    Some(Ticket {
        id: None,
        tenant_id,
        customer_id: Some(user.id.clone()),
        assigned_to: None,
        title: title.to_string(),
        description,
        status: None,
        priority: TicketPriority::Medium,
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::{TicketsState, new_ticket_draft};
    use helpdesk_api_models::{Ticket, TicketPriority, UserClaims};

    fn ticket(id: &str) -> Ticket {
        Ticket {
            id: Some(id.into()),
            tenant_id: "tn1".into(),
            customer_id: None,
            assigned_to: None,
            title: "printer on fire".into(),
            description: None,
            status: None,
            priority: TicketPriority::High,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn load_cycle_replaces_rows_and_clears_error() {
        let mut state = TicketsState::default();
        state.load_failed("boom");
        state.load_started();
        assert!(state.loading);
        assert!(state.error.is_none());
        state.loaded(vec![ticket("t1"), ticket("t2")]);
        assert_eq!(state.rows.len(), 2);
        assert!(!state.loading);
    }

    #[test]
    fn draft_files_under_the_first_tenant_as_the_signed_in_customer() {
        let user = UserClaims {
            id: "u7".into(),
            username: "ada".into(),
            role: "Customer".into(),
            tenants: vec!["tn1".into(), "tn2".into()],
        };
        let draft = new_ticket_draft(&user, "printer on fire", Some("again".into())).unwrap();
        assert_eq!(draft.customer_id.as_deref(), Some("u7"));
        assert_eq!(draft.tenant_id, "tn1");
        assert_eq!(draft.priority, TicketPriority::Medium);
        assert!(draft.id.is_none());
        assert!(draft.status.is_none());
    }

    #[test]
    fn draft_requires_a_tenant_membership() {
        let user = UserClaims {
            id: "u7".into(),
            username: "ada".into(),
            role: "Customer".into(),
            tenants: vec![],
        };
        assert!(new_ticket_draft(&user, "no home", None).is_none());
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut state = TicketsState::default();
        state.loaded(vec![ticket("t1")]);
        state.load_started();
        state.load_failed("http 500");
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.error.as_deref(), Some("http 500"));
    }
}
