//! In-memory comment stream for the attached ticket.
//!
//! # Design
//! - Exactly one ticket is attached at a time; seeding replaces the whole
//!   sequence, live frames only ever append.
//! - A live frame whose id already appears is dropped, which resolves the
//!   history/live race window without reordering anything.
//! - Frames addressed to another ticket are discarded so a stale channel
//!   can never leak comments across tickets.

use helpdesk_api_models::Comment;

/// Ordered comment sequence for exactly one ticket.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CommentStream {
    /// Ticket the stream is bound to; `None` before the first attach.
    pub ticket_id: Option<String>,
    /// Comments in display order: history page first, then live appends.
    pub comments: Vec<Comment>,
    /// Whether the live channel is currently open.
    pub live: bool,
    /// Whether the history fetch is in flight.
    pub loading: bool,
}

impl CommentStream {
    /// Bind the stream to a ticket and seed it with the history page.
    pub fn seed(&mut self, ticket_id: impl Into<String>, history: Vec<Comment>) {
        self.ticket_id = Some(ticket_id.into());
        self.comments = history;
        self.loading = false;
    }

    /// Append a live frame in arrival order.
    ///
    /// Returns `false` when the frame was discarded: wrong ticket, no ticket
    /// attached, or an id that is already present.
    pub fn append_live(&mut self, comment: Comment) -> bool {
        let Some(ticket_id) = &self.ticket_id else {
            return false;
        };
        if comment.ticket_id != *ticket_id {
            return false;
        }
        if self.comments.iter().any(|existing| existing.id == comment.id) {
            return false;
        }
        self.comments.push(comment);
        true
    }

    /// Drop the sequence and the ticket binding.
    pub fn clear(&mut self) {
        self.ticket_id = None;
        self.comments.clear();
        self.live = false;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::CommentStream;
    use chrono::{TimeZone, Utc};
    use helpdesk_api_models::Comment;

    fn comment(id: &str, ticket: &str) -> Comment {
        Comment {
            id: id.into(),
            ticket_id: ticket.into(),
            user_id: Some("u1".into()),
            username: Some("ada".into()),
            comment: format!("comment {id}"),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn live_frames_extend_history_in_arrival_order() {
        let mut stream = CommentStream::default();
        stream.seed("t1", vec![comment("c1", "t1")]);
        assert!(stream.append_live(comment("c2", "t1")));
        let ids: Vec<&str> = stream.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut stream = CommentStream::default();
        stream.seed("t1", vec![comment("c1", "t1")]);
        assert!(!stream.append_live(comment("c1", "t1")));
        assert_eq!(stream.comments.len(), 1);
    }

    #[test]
    fn frames_for_other_tickets_are_discarded() {
        let mut stream = CommentStream::default();
        stream.seed("t2", vec![]);
        assert!(!stream.append_live(comment("c9", "t1")));
        assert!(stream.comments.is_empty());
    }

    #[test]
    fn frames_before_any_attach_are_discarded() {
        let mut stream = CommentStream::default();
        assert!(!stream.append_live(comment("c1", "t1")));
    }

    #[test]
    fn reseeding_rebinds_the_stream() {
        let mut stream = CommentStream::default();
        stream.seed("t1", vec![comment("c1", "t1")]);
        stream.seed("t2", vec![comment("c3", "t2")]);
        assert_eq!(stream.ticket_id.as_deref(), Some("t2"));
        assert_eq!(stream.comments.len(), 1);
        assert!(stream.append_live(comment("c4", "t2")));
        assert!(!stream.append_live(comment("c2", "t1")));
    }

    #[test]
    fn clear_resets_everything() {
        let mut stream = CommentStream::default();
        stream.seed("t1", vec![comment("c1", "t1")]);
        stream.live = true;
        stream.clear();
        assert!(stream.ticket_id.is_none());
        assert!(stream.comments.is_empty());
        assert!(!stream.live);
    }
}
