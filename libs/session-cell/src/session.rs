use std::fmt;

use shared_models::Role;

/// Who the panel is currently acting as.
#[derive(Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Admin(String),
    Doctor(String),
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::Admin(_) => Some(Role::Admin),
            Session::Doctor(_) => Some(Role::Doctor),
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Admin(token) | Session::Doctor(token) => Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    /// Navbar label: `Admin Panel`, `Doctor Panel`, or bare `Panel`.
    pub fn panel_label(&self) -> String {
        match self.role() {
            Some(role) => format!("{} Panel", role),
            None => "Panel".to_string(),
        }
    }
}

// Tokens stay out of debug output and logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Anonymous => write!(f, "Anonymous"),
            Session::Admin(_) => write!(f, "Admin(<redacted>)"),
            Session::Doctor(_) => write!(f, "Doctor(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_tokens() {
        let session = Session::Doctor("secret-token".into());
        assert_eq!(format!("{:?}", session), "Doctor(<redacted>)");
        assert_eq!(session.token(), Some("secret-token"));
    }

    #[test]
    fn labels_follow_role() {
        assert_eq!(Session::Admin("a".into()).panel_label(), "Admin Panel");
        assert_eq!(Session::Anonymous.panel_label(), "Panel");
        assert!(!Session::Anonymous.is_authenticated());
    }
}
