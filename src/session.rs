use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::types::{
    AuthResponse, LoginRequest, ProfileUpdateRequest, RegistrationRequest, UserProfile,
};
use crate::api_client::ApiClient;
use crate::credential_store::CredentialStore;
use crate::errors::{BankError, BankResult};
use crate::validation::InputValidator;

/// Client-side view of the authentication lifecycle.
///
/// Values are immutable snapshots; transitions build a new state instead of
/// mutating in place, so the rendering layer always observes a consistent
/// whole.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated {
        /// Cached snapshot; `None` when the token survived a restart but the
        /// profile cache did not. Re-fetched on the next dashboard view.
        profile: Option<UserProfile>,
    },
}

impl SessionState {
    pub fn begin_authentication(&self) -> SessionState {
        SessionState::Authenticating
    }

    pub fn complete(&self, profile: UserProfile) -> SessionState {
        SessionState::Authenticated {
            profile: Some(profile),
        }
    }

    pub fn reject(&self) -> SessionState {
        SessionState::Anonymous
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

/// Orchestrates login, registration and profile updates, keeping the
/// credential store consistent with server-confirmed identity.
pub struct SessionManager {
    state: RwLock<SessionState>,
    credentials: CredentialStore,
    client: Arc<ApiClient>,
    validator: InputValidator,
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl SessionManager {
    pub fn new(client: Arc<ApiClient>, credentials: CredentialStore) -> BankResult<Self> {
        Ok(Self {
            state: RwLock::new(SessionState::Anonymous),
            credentials,
            client,
            validator: InputValidator::new()?,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Re-enter an authenticated session from persisted state, if any.
    /// The cached profile is display data only; the server stays
    /// authoritative.
    pub fn restore(&self) -> BankResult<SessionState> {
        let next = if self.credentials.token()?.is_some() {
            SessionState::Authenticated {
                profile: self.credentials.profile()?,
            }
        } else {
            SessionState::Anonymous
        };
        *self.state.write() = next.clone();
        Ok(next)
    }

    pub async fn login(&self, email: &str, password: &str) -> BankResult<UserProfile> {
        self.validator.require("Email", email)?;
        self.validator.require("Password", password)?;

        self.transition(|s| s.begin_authentication());
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.client.post("/users/login/", &request).await {
            Ok(response) => self.accept_auth_response(&response.body),
            Err(err) => {
                self.transition(|s| s.reject());
                Err(Self::login_outcome(err))
            }
        }
    }

    /// Same shape as login against the account-creation endpoint; no
    /// pre-existing token is required.
    pub async fn register(&self, form: &RegistrationForm) -> BankResult<UserProfile> {
        self.validator.validate_email(&form.email)?;
        self.validator.require("Password", &form.password)?;
        self.validator.require("First name", &form.first_name)?;
        self.validator.require("Last name", &form.last_name)?;
        if form.password != form.confirm_password {
            return Err(BankError::Validation("Passwords do not match".to_string()));
        }

        self.transition(|s| s.begin_authentication());
        let request = RegistrationRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
        };

        match self.client.post("/users/register/", &request).await {
            Ok(response) => self.accept_auth_response(&response.body),
            Err(err) => {
                self.transition(|s| s.reject());
                Err(Self::login_outcome(err))
            }
        }
    }

    /// Update the authenticated user's profile. Validation failures return
    /// before any request is dispatched; on success the server's body
    /// replaces the cached snapshot wholesale.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> BankResult<UserProfile> {
        let current = self.cached_profile().ok_or(BankError::Unauthorized)?;

        self.validator.require("First name", &update.first_name)?;
        self.validator.require("Last name", &update.last_name)?;
        self.validator
            .validate_password_change(&update.new_password, &update.confirm_password)?;

        let request = ProfileUpdateRequest {
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            new_password: if update.new_password.is_empty() {
                None
            } else {
                Some(update.new_password.clone())
            },
        };

        let path = format!("/users/{}/update/", current.email);
        match self.client.put(&path, &request).await {
            Ok(response) => {
                let profile: UserProfile = response.json()?;
                self.credentials.set_profile(&profile)?;
                self.transition(|s| s.complete(profile.clone()));
                log::info!("Profile updated for user {}", profile.user_id);
                Ok(profile)
            }
            Err(BankError::Unauthorized) => {
                self.note_unauthorized()?;
                Err(BankError::Unauthorized)
            }
            Err(err) => Err(err),
        }
    }

    /// Call-site signal for a 401-class response: the token is no longer
    /// honored, so drop it and fall back to anonymous. The profile snapshot
    /// stays behind as stale display data.
    pub fn note_unauthorized(&self) -> BankResult<()> {
        log::warn!("Server rejected the stored token; ending session");
        self.credentials.clear_token()?;
        self.transition(|s| s.reject());
        Ok(())
    }

    fn cached_profile(&self) -> Option<UserProfile> {
        match &*self.state.read() {
            SessionState::Authenticated { profile } => profile.clone(),
            _ => None,
        }
    }

    /// Handle a 2xx body from either auth endpoint. A body without a token,
    /// or one that does not decode, is a credential failure and leaves the
    /// store untouched.
    fn accept_auth_response(&self, body: &str) -> BankResult<UserProfile> {
        let parsed: Result<AuthResponse, _> = serde_json::from_str(body);
        let auth = match parsed {
            Ok(auth) => auth,
            Err(err) => {
                log::warn!("Unreadable auth response: {}", err);
                self.transition(|s| s.reject());
                return Err(BankError::Credentials);
            }
        };

        let Some(token) = auth.token.clone().filter(|t| !t.is_empty()) else {
            self.transition(|s| s.reject());
            return Err(BankError::Credentials);
        };

        // Token first, then the snapshot; the two writes are independent and
        // a crash in between leaves only a stale display cache.
        self.credentials.set_token(&token)?;
        let profile = UserProfile::from(auth);
        self.credentials.set_profile(&profile)?;
        self.transition(|s| s.complete(profile.clone()));
        log::info!("Authenticated as user {}", profile.user_id);
        Ok(profile)
    }

    /// The server does not distinguish wrong email from wrong password, and
    /// neither do we: any rejection becomes one credential failure. Only
    /// connectivity problems keep their own outcome.
    fn login_outcome(err: BankError) -> BankError {
        match err {
            BankError::Network(_) => err,
            _ => BankError::Credentials,
        }
    }

    fn transition<F>(&self, f: F)
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let mut guard = self.state.write();
        let next = f(&guard);
        *guard = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: 9,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Nowak".to_string(),
            date_joined: None,
            date_updated: None,
        }
    }

    #[test]
    fn transitions_produce_new_snapshots() {
        let anonymous = SessionState::Anonymous;
        let pending = anonymous.begin_authentication();
        assert_eq!(anonymous, SessionState::Anonymous);
        assert_eq!(pending, SessionState::Authenticating);

        let authed = pending.complete(profile());
        assert!(authed.is_authenticated());
        assert_eq!(pending, SessionState::Authenticating);

        assert_eq!(authed.reject(), SessionState::Anonymous);
    }

    #[test]
    fn login_outcome_collapses_rejections() {
        assert_eq!(
            SessionManager::login_outcome(BankError::Server {
                status: 400,
                message: "bad credentials".to_string(),
            }),
            BankError::Credentials
        );
        assert_eq!(
            SessionManager::login_outcome(BankError::Unauthorized),
            BankError::Credentials
        );
        assert!(matches!(
            SessionManager::login_outcome(BankError::Network("timeout".to_string())),
            BankError::Network(_)
        ));
    }
}
