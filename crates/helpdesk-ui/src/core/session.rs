//! Session state machine shared across the UI.
//!
//! # Design
//! - All mutations go through named transitions so state, storage and the
//!   cookie mirror can move together at the call sites.
//! - `authenticated` is true iff both user and token are present; the
//!   transitions maintain that invariant rather than exposing raw fields.
//! - Keep this module DOM-free so the lifecycle is testable on the host.

use helpdesk_api_models::UserClaims;

/// Lifecycle phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No credential; public routes only.
    #[default]
    Anonymous,
    /// Login request in flight.
    Authenticating,
    /// Valid credential loaded.
    Authenticated,
    /// Refresh request in flight.
    Refreshing,
}

/// Shared authentication state for the UI.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Identity claims for the signed-in user.
    pub user: Option<UserClaims>,
    /// Raw bearer token string.
    pub token: Option<String>,
    /// Whether both user and token are present.
    pub authenticated: bool,
    /// Whether an auth operation is in flight.
    pub loading: bool,
    /// Last user-visible auth error.
    pub error: Option<String>,
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// One-time flag set after storage hydration has run.
    pub hydrated: bool,
}

impl SessionState {
    /// Login request issued.
    pub fn login_started(&mut self) {
        self.phase = SessionPhase::Authenticating;
        self.loading = true;
        self.error = None;
    }

    /// Login accepted; the decoded claims and token become the session.
    pub fn login_succeeded(&mut self, user: UserClaims, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.authenticated = true;
        self.loading = false;
        self.error = None;
        self.phase = SessionPhase::Authenticated;
    }

    /// Login rejected; the error is surfaced and any prior session survives.
    pub fn login_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.settle_phase();
    }

    /// Refresh attempt started.
    pub fn refresh_started(&mut self) {
        self.phase = SessionPhase::Refreshing;
        self.loading = true;
        self.error = None;
    }

    /// Refresh succeeded with a new credential.
    pub fn refresh_succeeded(&mut self, user: UserClaims, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.authenticated = true;
        self.loading = false;
        self.error = None;
        self.phase = SessionPhase::Authenticated;
    }

    /// Refresh failed terminally; the session is cleared atomically.
    pub fn refresh_failed(&mut self) {
        self.clear();
        self.error = Some("Session expired. Please login again.".to_string());
    }

    /// Explicit sign-out; the session is cleared without an error.
    pub fn logged_out(&mut self) {
        self.clear();
    }

    /// Storage hydration found a valid credential.
    pub fn hydrated_ok(&mut self, user: UserClaims, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.authenticated = true;
        self.loading = false;
        self.phase = SessionPhase::Authenticated;
        self.hydrated = true;
    }

    /// Storage hydration found nothing usable.
    pub fn hydrated_empty(&mut self) {
        self.clear();
        self.hydrated = true;
    }

    fn clear(&mut self) {
        self.user = None;
        self.token = None;
        self.authenticated = false;
        self.loading = false;
        self.error = None;
        self.phase = SessionPhase::Anonymous;
    }

    fn settle_phase(&mut self) {
        if self.user.is_some() && self.token.is_some() {
            self.authenticated = true;
            self.phase = SessionPhase::Authenticated;
        } else {
            self.authenticated = false;
            self.phase = SessionPhase::Anonymous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionPhase, SessionState};
    use helpdesk_api_models::UserClaims;

    fn claims() -> UserClaims {
        UserClaims {
            id: "u1".into(),
            username: "ada".into(),
            role: "Admin".into(),
            tenants: vec!["t1".into()],
        }
    }

    #[test]
    fn login_flow_reaches_authenticated() {
        let mut state = SessionState::default();
        state.login_started();
        assert_eq!(state.phase, SessionPhase::Authenticating);
        assert!(state.loading);
        state.login_succeeded(claims(), "a.b.c".into());
        assert!(state.authenticated);
        assert!(!state.loading);
        assert_eq!(state.phase, SessionPhase::Authenticated);
    }

    #[test]
    fn login_failure_surfaces_error_without_clearing_session() {
        let mut state = SessionState::default();
        state.login_succeeded(claims(), "a.b.c".into());
        state.login_started();
        state.login_failed("Invalid credentials");
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(state.authenticated);
        assert_eq!(state.phase, SessionPhase::Authenticated);
    }

    #[test]
    fn login_failure_from_anonymous_stays_anonymous() {
        let mut state = SessionState::default();
        state.login_started();
        state.login_failed("Invalid credentials");
        assert!(!state.authenticated);
        assert_eq!(state.phase, SessionPhase::Anonymous);
    }

    #[test]
    fn refresh_failure_clears_everything_and_sets_message() {
        let mut state = SessionState::default();
        state.login_succeeded(claims(), "a.b.c".into());
        state.refresh_started();
        state.refresh_failed();
        assert!(!state.authenticated);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert_eq!(
            state.error.as_deref(),
            Some("Session expired. Please login again.")
        );
        assert_eq!(state.phase, SessionPhase::Anonymous);
    }

    #[test]
    fn logout_clears_without_error() {
        let mut state = SessionState::default();
        state.login_succeeded(claims(), "a.b.c".into());
        state.logged_out();
        assert!(!state.authenticated);
        assert!(state.error.is_none());
    }

    #[test]
    fn hydration_sets_the_one_time_flag_in_both_outcomes() {
        let mut found = SessionState::default();
        found.hydrated_ok(claims(), "a.b.c".into());
        assert!(found.hydrated);
        assert!(found.authenticated);

        let mut empty = SessionState::default();
        empty.hydrated_empty();
        assert!(empty.hydrated);
        assert!(!empty.authenticated);
    }

    #[test]
    fn authenticated_tracks_user_and_token_presence() {
        let mut state = SessionState::default();
        assert!(!state.authenticated);
        state.refresh_succeeded(claims(), "x.y.z".into());
        assert!(state.authenticated);
        state.refresh_failed();
        assert!(!state.authenticated);
    }
}
