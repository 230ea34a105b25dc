//! Declarative redirect policy for route access.
//!
//! # Design
//! - Pure function of `(path, authenticated, hydrated)` so the policy is
//!   testable without a router.
//! - Nothing is evaluated before storage hydration completes, avoiding a
//!   redirect flash on first paint.

/// Paths reachable only without a session.
const PUBLIC_ONLY: [&str; 3] = ["/", "/login", "/signup"];

/// Path prefixes that require a session; one entry per routed section.
const PROTECTED: [&str; 3] = ["/dashboard", "/tickets", "/profile"];

/// Redirect decision for the current location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    /// No redirect needed (or hydration is still pending).
    Stay,
    /// Unauthenticated access to a protected path.
    RedirectToLogin,
    /// Authenticated access to a public-only path.
    RedirectToDashboard,
}

/// Evaluate the redirect policy for `path`.
#[must_use]
pub fn evaluate(path: &str, authenticated: bool, hydrated: bool) -> GuardVerdict {
    if !hydrated {
        return GuardVerdict::Stay;
    }
    let protected = PROTECTED
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")));
    if protected && !authenticated {
        return GuardVerdict::RedirectToLogin;
    }
    if authenticated && PUBLIC_ONLY.contains(&path) {
        return GuardVerdict::RedirectToDashboard;
    }
    GuardVerdict::Stay
}

#[cfg(test)]
mod tests {
    use super::{GuardVerdict, evaluate};

    #[test]
    fn protected_paths_require_a_session() {
        assert_eq!(
            evaluate("/dashboard", false, true),
            GuardVerdict::RedirectToLogin
        );
        assert_eq!(
            evaluate("/tickets/t1", false, true),
            GuardVerdict::RedirectToLogin
        );
        assert_eq!(evaluate("/tickets", true, true), GuardVerdict::Stay);
    }

    #[test]
    fn public_only_paths_bounce_signed_in_users() {
        assert_eq!(
            evaluate("/login", true, true),
            GuardVerdict::RedirectToDashboard
        );
        assert_eq!(evaluate("/", true, true), GuardVerdict::RedirectToDashboard);
        assert_eq!(evaluate("/login", false, true), GuardVerdict::Stay);
    }

    #[test]
    fn nothing_happens_before_hydration() {
        assert_eq!(evaluate("/dashboard", false, false), GuardVerdict::Stay);
        assert_eq!(evaluate("/login", true, false), GuardVerdict::Stay);
    }

    #[test]
    fn unknown_paths_are_left_alone() {
        assert_eq!(evaluate("/404", false, true), GuardVerdict::Stay);
        assert_eq!(evaluate("/ticketsummary", false, true), GuardVerdict::Stay);
        // Unrouted sections fall through to the not-found page instead.
        assert_eq!(evaluate("/tenants", false, true), GuardVerdict::Stay);
        assert_eq!(evaluate("/technicians", false, true), GuardVerdict::Stay);
    }
}
