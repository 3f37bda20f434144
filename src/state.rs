use chrono::{DateTime, Local};

/// Outcome tag for a finished request. Styling keys off this tag, never
/// off the message text itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failure,
}

/// A user-facing status message with its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Failure,
            text: text.into(),
        }
    }
}

/// Result of the last verify call. Request failures are reported as
/// `Invalid`; a backend rejection and a transport error look the same
/// to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyStatus {
    Valid,
    Invalid,
}

impl VerifyStatus {
    pub fn label(self) -> &'static str {
        match self {
            VerifyStatus::Valid => "Token is valid",
            VerifyStatus::Invalid => "Token is invalid",
        }
    }
}

#[derive(Default)]
pub struct AppState {
    pub token_input: String,
    pub post_text: String,
    pub verify_status: Option<VerifyStatus>,
    pub save_message: Option<StatusLine>,
    pub access_token_message: Option<StatusLine>,
    pub post_status: Option<StatusLine>,
    pub saved_token: String,
    pub saved_access_token: String,
    pub last_refreshed: Option<DateTime<Local>>,
    pub is_loading: bool,
}

impl AppState {
    /// Verify and Save need a non-empty token and no request in flight.
    pub fn can_submit_token(&self) -> bool {
        !self.is_loading && !self.token_input.is_empty()
    }

    /// Get Access Token is gated by the loading flag alone; it uses
    /// whatever token the backend already has saved.
    pub fn can_fetch_access_token(&self) -> bool {
        !self.is_loading
    }

    pub fn can_post(&self) -> bool {
        !self.is_loading && !self.post_text.is_empty()
    }

    pub fn post_char_count(&self) -> usize {
        self.post_text.chars().count()
    }
}
