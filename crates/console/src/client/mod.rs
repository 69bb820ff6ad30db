//! REST client for the fleet service.
//!
//! One [`ApiClient`] serves every screen. It attaches the session token and a
//! request ID to each call and maps HTTP failures onto [`ConsoleError`].

pub mod auth;
pub mod collection;

pub use collection::{RemoteCollection, Resource};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::ConsoleError;
use crate::session::Session;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Error body the service sends with failed requests.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: Option<String>,
}

/// HTTP client bound to one service and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ServiceConfig, session: Session) -> Result<Self, ConsoleError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        (builder, request_id)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Response, ConsoleError> {
        let (mut builder, request_id) = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let start = std::time::Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                "Request failed"
            );
            ConsoleError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::status_error(path, response).await)
        }
    }

    async fn status_error(path: &str, response: Response) -> ConsoleError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ServiceErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConsoleError::Unauthorized(message),
            StatusCode::NOT_FOUND => ConsoleError::NotFound {
                resource: path.to_string(),
                message,
            },
            _ => ConsoleError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ConsoleError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ConsoleError::Decode(format!("{}: {}", path, e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::decode(path, response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(path, response).await
    }

    /// Sends a write and discards whatever the service answers with.
    pub async fn write<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ConsoleError>
    where
        B: Serialize + Sync,
    {
        self.send(method, path, body).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, session: Session) -> ApiClient {
        let config = ServiceConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client("http://localhost:4321/", Session::anonymous());
        assert_eq!(client.base_url(), "http://localhost:4321");
    }

    #[test]
    fn test_request_carries_request_id_and_token() {
        let client = client("http://localhost:4321", Session::with_token("abc"));
        let (builder, request_id) = client.request(Method::GET, "/api/chats");
        let request = builder.build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:4321/api/chats");
        assert_eq!(
            request.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
            request_id
        );
        assert_eq!(
            request.headers().get("authorization").unwrap().to_str().unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_anonymous_request_has_no_token() {
        let client = client("http://localhost:4321", Session::anonymous());
        let (builder, _) = client.request(Method::GET, "/api/terminales");
        let request = builder.build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
