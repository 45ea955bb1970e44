//! Per-user interview session state.

/// Mutated only by question generation. Concurrent requests for the
/// same session race with last-write-wins semantics; there is no
/// cross-request synchronization by design.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_profession: Option<String>,
    pub first_question_pending: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current_profession: None,
            first_question_pending: true,
        }
    }

    /// Reset the session when the requested profession differs from
    /// the one the session was opened for. Returns true when a reset
    /// happened.
    pub fn reset_if_profession_changed(&mut self, profession: &str) -> bool {
        if self.current_profession.as_deref() != Some(profession) {
            self.current_profession = Some(profession.to_string());
            self.first_question_pending = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_pending_first_question() {
        let session = SessionState::new();
        assert!(session.first_question_pending);
        assert!(session.current_profession.is_none());
    }

    #[test]
    fn test_default_matches_new() {
        let session = SessionState::default();
        assert!(session.first_question_pending);
        assert!(session.current_profession.is_none());
    }

    #[test]
    fn test_profession_change_resets() {
        let mut session = SessionState::new();
        assert!(session.reset_if_profession_changed("nurse"));
        session.first_question_pending = false;

        // Same profession: no reset.
        assert!(!session.reset_if_profession_changed("nurse"));
        assert!(!session.first_question_pending);

        // Different profession: reset.
        assert!(session.reset_if_profession_changed("teacher"));
        assert!(session.first_question_pending);
        assert_eq!(session.current_profession.as_deref(), Some("teacher"));
    }
}
