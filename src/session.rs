//! Explicit session state, created at sign-in and torn down on logout or
//! when a provider reports that the session is no longer valid.

use web_time::SystemTime;

use crate::error::ProviderError;
use crate::types::MemberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: Option<MemberId>,
    pub expires_at: Option<SystemTime>,
}

impl Session {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous session.
    pub fn sign_in(&mut self, session: Session) {
        if self.current.is_some() {
            log::debug!("replacing active session");
        }
        self.current = Some(session);
    }

    /// Drops the session. Returns whether one was active.
    pub fn sign_out(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self, now: SystemTime) -> bool {
        self.current.as_ref().is_some_and(|s| !s.is_expired(now))
    }

    /// `Authorization` header value for an outgoing request.
    pub fn bearer(&self, now: SystemTime) -> Result<String, ProviderError> {
        match &self.current {
            None => Err(ProviderError::unauthorized("no access token, sign in first")),
            Some(s) if s.is_expired(now) => Err(ProviderError::unauthorized("session expired")),
            Some(s) => Ok(format!("Bearer {}", s.access_token)),
        }
    }

    /// Feeds a provider failure through the session. An auth failure ends the
    /// session; the return value tells the caller to show the expiry prompt.
    pub fn observe(&mut self, err: &ProviderError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        if self.sign_out() {
            log::warn!("session ended by provider: {}", err.message);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session(expires_in: Option<u64>, now: SystemTime) -> Session {
        Session {
            access_token: "tok".to_string(),
            user_id: Some(3),
            expires_at: expires_in.map(|s| now + Duration::from_secs(s)),
        }
    }

    #[test]
    fn bearer_requires_a_live_session() {
        let now = SystemTime::now();
        let mut ctx = SessionContext::new();

        assert!(ctx.bearer(now).unwrap_err().is_unauthorized());

        ctx.sign_in(session(Some(60), now));
        assert_eq!(ctx.bearer(now).unwrap(), "Bearer tok");
        assert!(ctx.is_authenticated(now));

        let later = now + Duration::from_secs(61);
        assert!(!ctx.is_authenticated(later));
        assert!(ctx.bearer(later).unwrap_err().is_unauthorized());
    }

    #[test]
    fn session_without_expiry_never_expires() {
        let now = SystemTime::now();
        let mut ctx = SessionContext::new();
        ctx.sign_in(session(None, now));

        assert!(ctx.is_authenticated(now + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn unauthorized_error_tears_down_session() {
        let now = SystemTime::now();
        let mut ctx = SessionContext::new();
        ctx.sign_in(session(None, now));

        assert!(!ctx.observe(&ProviderError::upstream("boom")));
        assert!(ctx.session().is_some());

        assert!(ctx.observe(&ProviderError::from_status(401, "expired")));
        assert!(ctx.session().is_none());
        assert!(!ctx.sign_out());
    }
}
