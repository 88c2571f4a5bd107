use crate::social_client::api;
use crate::social_client::error::ClientError;
use crate::social_client::SocialClient;
use oauth2::AccessToken;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

// NB: the session is one watch cell. Snapshots, receivers and streams all read the same value,
// and only the methods below write it.

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// Token accepted by the server. `user` stays empty until `/auth/users/me` answers.
    Authenticated { user: Option<api::User> },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn current_user(&self) -> Option<&api::User> {
        match self {
            SessionState::Authenticated { user } => user.as_ref(),
            SessionState::Anonymous => None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    client: SocialClient,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(client: SocialClient) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self { client, state }
    }

    pub fn client(&self) -> &SocialClient {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_user(&self) -> Option<api::User> {
        self.state.borrow().current_user().cloned()
    }

    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state first, then every change after it.
    pub fn changes(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Whether a token is stored, regardless of whether it has been validated.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.client.tokens().load(), Ok(Some(_)))
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.client.tokens().load().ok().flatten()
    }

    /// Validates a previously stored token. An unusable token is cleared; nothing is reported to
    /// the caller either way.
    pub async fn initialize(&self) {
        match self.client.tokens().load() {
            Ok(Some(_)) => (),
            Ok(None) => return,
            Err(err) => {
                tracing::warn!("discarding unreadable token: {err}");
                self.discard_token();
                return;
            }
        }

        match self.client.me().await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "restored session");
                self.state
                    .send_replace(SessionState::Authenticated { user: Some(user) });
            }
            Err(err) => {
                tracing::info!("stored token rejected, signing out: {err}");
                self.discard_token();
                self.state.send_replace(SessionState::Anonymous);
            }
        }
    }

    pub async fn login(&self, credentials: &api::LoginDto) -> Result<api::AuthResponse, ClientError> {
        let response = self.client.login(credentials).await?;
        self.establish(&response).await?;
        Ok(response)
    }

    pub async fn signup(&self, signup: &api::SignupDto) -> Result<api::AuthResponse, ClientError> {
        let response = self.client.signup(signup).await?;
        self.establish(&response).await?;
        Ok(response)
    }

    /// Clears the token and drops back to anonymous. The state is reset even if the token file
    /// could not be removed.
    pub fn logout(&self) -> Result<(), ClientError> {
        let cleared = self.client.tokens().clear();
        self.state.send_replace(SessionState::Anonymous);
        cleared
    }

    async fn establish(&self, response: &api::AuthResponse) -> Result<(), ClientError> {
        self.client
            .tokens()
            .save(&AccessToken::new(response.token.clone()))?;
        self.state
            .send_replace(SessionState::Authenticated { user: None });

        // NB: the auth endpoints only hand back a token, so the user takes a second round-trip.
        match self.client.me().await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "signed in");
                self.state.send_modify(|state| {
                    if state.is_authenticated() {
                        *state = SessionState::Authenticated { user: Some(user) };
                    }
                });
            }
            Err(err) => tracing::warn!("failed to get user details: {err}"),
        }
        Ok(())
    }

    fn discard_token(&self) {
        if let Err(err) = self.client.tokens().clear() {
            tracing::warn!("could not clear token: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social_client::api::{LoginDto, SignupDto};
    use crate::social_client::mock::MockTransport;
    use crate::token_store::{MemoryTokenStore, TokenStore};
    use hyper::Method;
    use serde_json::json;
    use std::sync::Arc;
    use tokio_stream::StreamExt;

    fn alice() -> serde_json::Value {
        json!({"id": "u1", "email": "alice@example.com", "password": "hash", "username": "alice"})
    }

    fn session(transport: &Arc<MockTransport>, tokens: MemoryTokenStore) -> Session {
        let client =
            SocialClient::new("http://localhost:1111", transport.clone(), Arc::new(tokens)).unwrap();
        Session::new(client)
    }

    fn credentials() -> LoginDto {
        LoginDto {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/auth/users/login", 201, json!({"token": "jwt-1"}));
        transport.respond(Method::GET, "/api/auth/users/me", 200, alice());
        let session = session(&transport, MemoryTokenStore::new());

        let response = session.login(&credentials()).await.unwrap();

        assert_eq!(response.token, "jwt-1");
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().secret(), "jwt-1");
        assert_eq!(session.current_user().unwrap().username, "alice");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].bearer.as_deref(), Some("jwt-1"));
    }

    #[tokio::test]
    async fn test_login_survives_failed_user_fetch() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/auth/users/login", 201, json!({"token": "jwt-1"}));
        transport.respond(Method::GET, "/api/auth/users/me", 500, json!({"message": "boom"}));
        let session = session(&transport, MemoryTokenStore::new());

        session.login(&credentials()).await.unwrap();

        assert_eq!(session.state(), SessionState::Authenticated { user: None });
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_state_alone() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::POST,
            "/api/auth/users/login",
            401,
            json!({"statusCode": 401, "message": "Unauthorized"}),
        );
        let session = session(&transport, MemoryTokenStore::new());

        let err = session.login(&credentials()).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_signup_then_logout() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/auth/users/signup", 201, json!({"token": "jwt-2"}));
        transport.respond(Method::GET, "/api/auth/users/me", 200, alice());
        let session = session(&transport, MemoryTokenStore::new());

        let signup = SignupDto {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            username: Some("alice".to_string()),
        };
        session.signup(&signup).await.unwrap();
        assert!(session.is_authenticated());

        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert!(session.token().is_none());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_initialize_with_valid_token() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/api/auth/users/me", 200, alice());
        let session = session(&transport, MemoryTokenStore::with_token("jwt-0"));

        session.initialize().await;

        assert_eq!(session.current_user().unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_initialize_clears_rejected_token() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::GET, "/api/auth/users/me", 401, json!({"message": "Unauthorized"}));
        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let client =
            SocialClient::new("http://localhost:1111", transport.clone(), tokens.clone()).unwrap();
        let session = Session::new(client);

        session.initialize().await;

        assert!(!session.is_authenticated());
        assert!(tokens.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_initialize_without_token_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let session = session(&transport, MemoryTokenStore::new());

        session.initialize().await;

        assert!(transport.requests().is_empty());
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_transition() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/auth/users/login", 201, json!({"token": "jwt-1"}));
        transport.respond(Method::GET, "/api/auth/users/me", 200, alice());
        let session = session(&transport, MemoryTokenStore::new());
        let mut receiver = session.watch();
        let mut changes = session.changes();

        assert_eq!(changes.next().await, Some(SessionState::Anonymous));

        session.login(&credentials()).await.unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().current_user().unwrap().username, "alice");

        session.logout().unwrap();
        // the stream coalesces to the latest value
        assert_eq!(changes.next().await, Some(SessionState::Anonymous));
        assert!(!receiver.borrow_and_update().is_authenticated());
    }
}
