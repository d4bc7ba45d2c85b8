//! HTTP client for network-based API calls
//!
//! The back-end keeps the session in a cookie, so every request goes through
//! one shared cookie jar that the session store can export and restore.

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::{ClientConfig, ClientError, ClientResult};

/// Error body shapes the back-end uses
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    mensaje: Option<String>,
}

/// HTTP verbs used by the API layer
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
}

/// Network HTTP client with a cookie session
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.backend_url)
            .map_err(|e| ClientError::Config(format!("invalid backend URL: {e}")))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// `Cookie` header value the jar would send to the back-end
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Load a `name=value; name2=value2` header back into the jar
    pub fn restore_session_cookie(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_message(&text);
            tracing::debug!(status = status.as_u16(), path = %url, %message, "Request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(message)
                }
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        // Some endpoints answer 200/204 with no body
        let body = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(body).map_err(|e| {
            ClientError::InvalidResponse(format!("{url}: {e}"))
        })
    }
}

/// Pick the human message out of an error body, falling back to the raw text
fn extract_message(text: &str) -> String {
    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|b| b.message.or(b.error).or(b.mensaje))
        .unwrap_or_else(|| text.trim().to_string())
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(response).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.delete(self.url(path)).send().await?;
        self.handle_response(response).await
    }
}
