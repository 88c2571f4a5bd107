pub mod api;
pub mod auth;
pub mod comments;
pub mod error;
#[cfg(test)]
pub mod mock;
pub mod query;
pub mod transport;
pub mod tweets;
pub mod users;

use crate::social_client::error::{ApiError, ClientError};
use crate::social_client::query::{relations_pair, Collection, ListParams};
use crate::social_client::transport::{ApiRequest, HyperTransport, Transport};
use crate::token_store::TokenStore;
use hyper::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Whether an endpoint gets the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    /// Attach the stored token if there is one, otherwise send the request anonymously.
    IfPresent,
    /// Fail with [ClientError::MissingToken] before sending anything if no token is stored.
    Required,
}

#[derive(Debug, Clone)]
pub struct SocialClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    base_url: Url,
}

impl SocialClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self {
            transport,
            tokens,
            base_url,
        })
    }

    pub fn with_hyper(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        Self::new(base_url, Arc::new(HyperTransport::new()), tokens)
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// `<base>/api/<segments...>?<query>`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(String, String)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("api")
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn bearer(&self, auth: Auth) -> Result<Option<String>, ClientError> {
        let token = match auth {
            Auth::None => return Ok(None),
            Auth::IfPresent | Auth::Required => self.tokens.load()?,
        };
        match (token, auth) {
            (Some(token), _) => Ok(Some(token.secret().clone())),
            (None, Auth::Required) => Err(ClientError::MissingToken),
            (None, _) => Ok(None),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<Vec<u8>>,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let request = ApiRequest {
            method,
            url: self.endpoint(segments, query)?,
            bearer: self.bearer(auth)?,
            body,
        };
        let method = request.method.clone();
        let url = request.url.clone();

        let resp = self.transport.send(request).await?;

        if !resp.status.is_success() {
            let api_error = ApiError::from_response(resp.status, &resp.body);
            tracing::warn!(%method, %url, status = api_error.status_code, "request failed: {}", api_error.message);
            return Err(api_error.into());
        }

        Ok(serde_json::from_slice(&resp.body)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(String, String)],
        auth: Auth,
    ) -> Result<T, ClientError> {
        self.request(Method::GET, segments, query, None, auth).await
    }

    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        auth: Auth,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_vec(body)?;
        self.request(method, segments, &[], Some(body), auth).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        auth: Auth,
    ) -> Result<T, ClientError> {
        self.request(Method::DELETE, segments, &[], None, auth).await
    }

    /// `GET /collections/<name>` with the given list parameters.
    pub async fn list<C: Collection>(
        &self,
        params: &ListParams<C>,
    ) -> Result<api::PaginatedResponse<C::Item>, ClientError> {
        self.get(&["collections", C::PATH], &params.to_query_pairs(), Auth::None)
            .await
    }

    /// `GET /collections/<name>/<id>`, optionally expanding relations.
    pub async fn fetch<C: Collection>(
        &self,
        id: &str,
        relations: &[C::Relation],
    ) -> Result<C::Item, ClientError> {
        let query: Vec<(String, String)> = relations_pair(relations).into_iter().collect();
        self.get(&["collections", C::PATH, id], &query, Auth::None)
            .await
    }

    pub async fn select_options<C: Collection>(
        &self,
    ) -> Result<Vec<api::SelectOption>, ClientError> {
        self.get(&["collections", C::PATH, "select-options"], &[], Auth::None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::query::{TweetRelation, Tweets};
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use serde_json::json;

    fn client(base: &str, transport: &Arc<MockTransport>, tokens: MemoryTokenStore) -> SocialClient {
        SocialClient::new(base, transport.clone(), Arc::new(tokens)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        let transport = Arc::new(MockTransport::new());
        let root = client("http://localhost:1111/", &transport, MemoryTokenStore::new());
        let url = root
            .endpoint(&["collections", "tweets", "a b"], &[("page".to_string(), "2".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:1111/api/collections/tweets/a%20b?page=2");

        let nested = client("https://example.com/social", &transport, MemoryTokenStore::new());
        let url = nested.endpoint(&["auth", "users", "me"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/social/api/auth/users/me");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let transport = Arc::new(MockTransport::new());
        let result = SocialClient::new("mailto:me@example.com", transport, Arc::new(MemoryTokenStore::new()));
        assert!(matches!(result, Err(ClientError::Url(_))));
    }

    #[tokio::test]
    async fn test_fetch_with_relations() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::GET,
            "/api/collections/tweets/t1",
            200,
            json!({"id": "t1", "content": "hi", "createdAt": "2024-05-01T10:00:00Z"}),
        );
        let client = client("http://localhost:1111", &transport, MemoryTokenStore::with_token("tok"));

        let tweet = client
            .fetch::<Tweets>("t1", &[TweetRelation::Author, TweetRelation::Comments])
            .await
            .unwrap();
        assert_eq!(tweet.content, "hi");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_value("relations").as_deref(), Some("author,comments"));
        // reads are anonymous
        assert_eq!(requests[0].bearer, None);
    }

    #[tokio::test]
    async fn test_error_status_is_passed_through() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::GET,
            "/api/collections/tweets/missing",
            404,
            json!({"statusCode": 404, "message": "Tweet not found", "error": "Not Found"}),
        );
        let client = client("http://localhost:1111", &transport, MemoryTokenStore::new());

        let err = client.fetch::<Tweets>("missing", &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "404: Tweet not found");
    }

    #[tokio::test]
    async fn test_required_auth_fails_without_sending() {
        let transport = Arc::new(MockTransport::new());
        let client = client("http://localhost:1111", &transport, MemoryTokenStore::new());

        let result: Result<api::User, _> = client.get(&["auth", "users", "me"], &[], Auth::Required).await;
        assert!(matches!(result, Err(ClientError::MissingToken)));
        assert!(transport.requests().is_empty());
    }
}
