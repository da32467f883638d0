//! Access decisions for session-gated views.
//!
//! Rendering and routing belong to the application; these functions only say
//! whether the current session may enter, and where to send it otherwise.

use super::{Role, User};

/// Where a refused visitor should be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The sign-in view; the caller should remember the original location.
    SignIn,
    /// The landing page (course list).
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Redirect),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Gate for views that need a signed-in user, optionally with a given role.
pub fn require_session(user: Option<&User>, role: Option<Role>) -> Access {
    match (user, role) {
        (None, _) => Access::Redirect(Redirect::SignIn),
        (Some(u), Some(required)) if u.role != required => Access::Redirect(Redirect::Home),
        _ => Access::Allow,
    }
}

/// Gate for sign-in / registration views: signed-in users go home.
pub fn guest_only(user: Option<&User>) -> Access {
    match user {
        Some(_) => Access::Redirect(Redirect::Home),
        None => Access::Allow,
    }
}
