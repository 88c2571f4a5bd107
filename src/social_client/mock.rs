use crate::social_client::error::ClientError;
use crate::social_client::transport::{ApiRequest, ApiResponse, Transport};
use async_trait::async_trait;
use hyper::{Method, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Scripted transport: responses are queued per (method, path) and served in order. Anything
/// unscripted gets a 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        let response = ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: serde_json::to_vec(&body).unwrap(),
        };
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_json_body(&self) -> Option<serde_json::Value> {
        let requests = self.requests.lock().unwrap();
        let body = requests.last()?.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let key = (request.method.clone(), request.url.path().to_string());
        self.requests.lock().unwrap().push(request);

        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        Ok(scripted.unwrap_or_else(|| ApiResponse {
            status: StatusCode::NOT_FOUND,
            body: br#"{"statusCode":404,"message":"Not Found"}"#.to_vec(),
        }))
    }
}
