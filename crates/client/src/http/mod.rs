//! HTTP collaborator for the tutorhub REST API.
//!
//! Every outbound request carries `Authorization: Bearer <token>` when the
//! shared session holds a token. A 401 response invalidates the session
//! before surfacing as [`Error::Unauthorized`]; the navigation guard owns
//! the resulting redirect-to-login decision.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use tutorhub_protocol::ApiErrorBody;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::Session;

/// Cheaply cloneable API client bound to one session context.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The underlying HTTP client, for requests outside the API origin
    /// (these carry no bearer token).
    pub fn raw(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = match self.inner.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(
                target = "tutorhub.http",
                "request rejected with 401; invalidating session"
            );
            self.inner.session.invalidate();
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            debug!(
                target = "tutorhub.http",
                status = status.as_u16(),
                message = %message,
                "api error response"
            );
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.inner.http.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(self.inner.http.post(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// POST with a body where the response payload does not matter.
    pub async fn post_ignore_body<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.execute(self.inner.http.post(self.url(path)).json(body))
            .await?;
        Ok(())
    }

    /// Bodyless POST, for action endpoints like starting a test attempt.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.inner.http.post(self.url(path))).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(self.inner.http.put(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }
}
