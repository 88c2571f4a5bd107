use crate::social_client::api;
use crate::social_client::error::ClientError;
use crate::social_client::{Auth, SocialClient};
use hyper::Method;

impl SocialClient {
    /// `POST /auth/users/login`. Only returns the token; see [crate::store::Session::login] for
    /// the stateful version.
    pub async fn login(&self, credentials: &api::LoginDto) -> Result<api::AuthResponse, ClientError> {
        self.send_json(Method::POST, &["auth", "users", "login"], credentials, Auth::None)
            .await
    }

    pub async fn signup(&self, signup: &api::SignupDto) -> Result<api::AuthResponse, ClientError> {
        self.send_json(Method::POST, &["auth", "users", "signup"], signup, Auth::None)
            .await
    }

    pub async fn me(&self) -> Result<api::User, ClientError> {
        self.get(&["auth", "users", "me"], &[], Auth::Required).await
    }

    pub async fn admin_login(
        &self,
        credentials: &api::LoginDto,
    ) -> Result<api::AuthResponse, ClientError> {
        self.send_json(Method::POST, &["auth", "admins", "login"], credentials, Auth::None)
            .await
    }

    pub async fn admin_me(&self) -> Result<api::User, ClientError> {
        self.get(&["auth", "admins", "me"], &[], Auth::Required).await
    }
}

#[cfg(test)]
mod tests {
    use crate::social_client::api::LoginDto;
    use crate::social_client::mock::MockTransport;
    use crate::social_client::SocialClient;
    use crate::token_store::MemoryTokenStore;
    use hyper::Method;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_admin_endpoints() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::POST, "/api/auth/admins/login", 201, json!({"token": "adm"}));
        transport.respond(
            Method::GET,
            "/api/auth/admins/me",
            200,
            json!({"id": "a1", "email": "root@x.io", "username": "root"}),
        );
        let client = SocialClient::new(
            "http://localhost:1111",
            transport.clone(),
            Arc::new(MemoryTokenStore::with_token("adm")),
        )
        .unwrap();

        let credentials = LoginDto {
            email: "root@x.io".to_string(),
            password: "secret1".to_string(),
        };
        assert_eq!(client.admin_login(&credentials).await.unwrap().token, "adm");
        assert_eq!(
            transport.last_json_body(),
            Some(json!({"email": "root@x.io", "password": "secret1"}))
        );

        assert_eq!(client.admin_me().await.unwrap().username, "root");
        assert_eq!(transport.requests()[1].bearer.as_deref(), Some("adm"));
    }
}
