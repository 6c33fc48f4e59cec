//! The authentication context.
//!
//! One context per process: established at sign-in, cleared at sign-out.
//! Consumers only ever see an immutable view of the session.

use tracing::debug;

/// An established identity. Fields are read-only to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    uid: String,
    email: String,
}

impl AuthSession {
    /// Identity provider subject id.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Process-wide authentication context, threaded explicitly into every
/// component that needs the current identity.
#[derive(Debug, Default)]
pub struct AuthContext {
    session: Option<AuthSession>,
}

impl AuthContext {
    /// A signed-out context, the state at application start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session after the identity provider resolves.
    pub fn sign_in(&mut self, uid: impl Into<String>, email: impl Into<String>) -> &AuthSession {
        self.session.insert(AuthSession {
            uid: uid.into(),
            email: email.into(),
        })
    }

    /// Tear the session down.
    pub fn sign_out(&mut self) {
        self.session = None;
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// The only message a failed sign-in ever shows, regardless of the actual
/// cause. Raw provider errors go to the diagnostic log, never to the user.
pub const LOGIN_FAILURE_MESSAGE: &str = "Incorrect email or password. Please try again.";

/// Map a sign-in failure to its user-facing message, logging the real
/// cause on the diagnostic channel.
pub fn login_failure_message<E: std::fmt::Display>(cause: &E) -> &'static str {
    debug!("sign-in failed: {}", cause);
    LOGIN_FAILURE_MESSAGE
}
