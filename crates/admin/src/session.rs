//! Persisted admin session: a logged-in flag plus the current username.

use showcase_core::{LoginRejection, SessionState, ShowcaseError, ShowcaseResult};
use showcase_storage::{keys, SharedStore, StoreExt};
use std::sync::Arc;
use tracing::{info, warn};

use crate::credentials::CredentialVerifier;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

pub struct AdminSession {
    store: SharedStore,
    verifier: Arc<dyn CredentialVerifier>,
    state: SessionState,
}

impl AdminSession {
    /// Restore whatever session the store remembers.
    pub fn restore(store: SharedStore, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let mut session = Self {
            store,
            verifier,
            state: SessionState::default(),
        };
        session.reload();
        session
    }

    /// Re-read the session flag and username from the store.
    pub fn reload(&mut self) {
        let is_logged_in: bool = self.store.get(keys::ADMIN_AUTH, false);
        self.state = if is_logged_in {
            SessionState {
                is_logged_in,
                current_admin: self.store.get(keys::CURRENT_ADMIN, None),
            }
        } else {
            SessionState::default()
        };
    }

    /// Validate the input shape, then check the credentials.
    ///
    /// Shape failures are reported before the verifier is consulted. A
    /// verifier miss yields [`LoginRejection::InvalidCredentials`] whether
    /// the username or the password was wrong.
    pub fn login(&mut self, username: &str, password: &str) -> ShowcaseResult<()> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(LoginRejection::MissingFields.into());
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(LoginRejection::UsernameTooShort.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LoginRejection::PasswordTooShort.into());
        }
        if !self.verifier.verify(username, password) {
            warn!(username, "Admin login failed");
            return Err(ShowcaseError::Login(LoginRejection::InvalidCredentials));
        }

        self.state = SessionState {
            is_logged_in: true,
            current_admin: Some(username.to_string()),
        };
        self.store.set(keys::ADMIN_AUTH, &true);
        self.store.set(keys::CURRENT_ADMIN, username);
        info!(username, "Admin logged in");
        Ok(())
    }

    /// End the session and forget it in the store.
    pub fn logout(&mut self) {
        let was = self.state.current_admin.take();
        self.state = SessionState::default();
        self.store.clear(keys::ADMIN_AUTH);
        self.store.clear(keys::CURRENT_ADMIN);
        info!(username = was.as_deref().unwrap_or("-"), "Admin logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in
    }

    pub fn current_admin(&self) -> Option<&str> {
        self.state.current_admin.as_deref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Fail with an authorization error unless an admin is logged in.
    pub fn require_admin(&self) -> ShowcaseResult<()> {
        if self.state.is_logged_in {
            Ok(())
        } else {
            Err(ShowcaseError::admin_required())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticCredentials;
    use showcase_core::AdminAccount;
    use showcase_storage::{MemoryStore, PersistentStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingVerifier {
        inner: StaticCredentials,
        calls: AtomicUsize,
    }

    impl CredentialVerifier for CountingVerifier {
        fn verify(&self, username: &str, password: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(username, password)
        }
    }

    fn setup() -> (Arc<MemoryStore>, Arc<CountingVerifier>, AdminSession) {
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(CountingVerifier {
            inner: StaticCredentials::new(vec![
                AdminAccount::new("admin", "secret123"),
                AdminAccount::new("manager", "manager456"),
            ]),
            calls: AtomicUsize::new(0),
        });
        let session = AdminSession::restore(store.clone(), verifier.clone());
        (store, verifier, session)
    }

    fn rejection(err: ShowcaseError) -> LoginRejection {
        match err {
            ShowcaseError::Login(r) => r,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_username_never_consults_verifier() {
        let (_, verifier, mut session) = setup();
        let err = session.login("ad", "123456").unwrap_err();
        assert_eq!(rejection(err), LoginRejection::UsernameTooShort);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_validation_order() {
        let (_, verifier, mut session) = setup();
        assert_eq!(
            rejection(session.login("", "whatever").unwrap_err()),
            LoginRejection::MissingFields
        );
        assert_eq!(
            rejection(session.login("admin", "   ").unwrap_err()),
            LoginRejection::MissingFields
        );
        assert_eq!(
            rejection(session.login("ad", "12").unwrap_err()),
            LoginRejection::UsernameTooShort
        );
        assert_eq!(
            rejection(session.login("admin", "12345").unwrap_err()),
            LoginRejection::PasswordTooShort
        );
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wrong_username_and_wrong_password_look_the_same() {
        let (store, _, mut session) = setup();
        let a = rejection(session.login("nobody", "secret123").unwrap_err());
        let b = rejection(session.login("admin", "wrongpass").unwrap_err());
        assert_eq!(a, LoginRejection::InvalidCredentials);
        assert_eq!(a, b);
        assert!(!session.is_logged_in());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_login_persists_and_restores() {
        let (store, verifier, mut session) = setup();
        session.login(" manager ", "manager456").unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.current_admin(), Some("manager"));
        assert!(session.require_admin().is_ok());

        let restored = AdminSession::restore(store.clone(), verifier.clone());
        assert!(restored.is_logged_in());
        assert_eq!(restored.current_admin(), Some("manager"));
    }

    #[test]
    fn test_logout_clears_persisted_fields() {
        let (store, verifier, mut session) = setup();
        session.login("admin", "secret123").unwrap();
        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.current_admin(), None);
        assert!(store.read(keys::ADMIN_AUTH).unwrap().is_none());
        assert!(store.read(keys::CURRENT_ADMIN).unwrap().is_none());
        assert!(matches!(
            session.require_admin(),
            Err(ShowcaseError::Unauthorized(_))
        ));

        let restored = AdminSession::restore(store, verifier);
        assert!(!restored.is_logged_in());
    }

    #[test]
    fn test_non_boolean_flag_means_logged_out() {
        let (store, verifier, _) = setup();
        store.write(keys::ADMIN_AUTH, "\"yes\"").unwrap();
        store.write(keys::CURRENT_ADMIN, "\"admin\"").unwrap();
        let session = AdminSession::restore(store, verifier);
        assert!(!session.is_logged_in());
        assert_eq!(session.current_admin(), None);
    }
}
