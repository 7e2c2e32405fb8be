pub mod endpoints;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RosterConfig;
use crate::error::{RosterError, Result};

/// Status codes accepted for a create request.
pub const CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];

/// Status codes accepted for a replace or remove request.
pub const UPDATED: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

/// HTTP client wrapper for the roster REST API.
#[derive(Debug, Clone)]
pub struct RosterHttpClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RosterHttpClient {
    pub fn new(config: &RosterConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Attach a bearer token to every subsequent request.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
        debug!("auth token set");
    }

    pub fn clear_auth_token(&mut self) {
        self.auth_token = None;
        debug!("auth token cleared");
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self
            .client
            .request(method, &url)
            .header("content-type", "application/json");
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and check the response status.
    ///
    /// With `accepted` empty, any 2xx status passes.
    async fn send(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<Response> {
        debug!(%method, path, "API request");
        let resp = req.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "API request failed");
            RosterError::Request(e)
        })?;

        let status = resp.status();
        let ok = if accepted.is_empty() {
            status.is_success()
        } else {
            accepted.contains(&status)
        };
        if !ok {
            let body = resp.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "API response error");
            return Err(RosterError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        debug!(%method, path, status = status.as_u16(), "API response");
        Ok(resp)
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path);
        let resp = self.send(Method::GET, path, req, &[]).await?;
        resp.json::<T>().await.map_err(RosterError::Request)
    }

    /// POST a JSON body, accepting only the given statuses.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<()> {
        let req = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, req, accepted).await?;
        Ok(())
    }

    /// PUT a JSON body, accepting only the given statuses.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> Result<()> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, req, accepted).await?;
        Ok(())
    }

    /// DELETE a resource, accepting only the given statuses.
    pub async fn delete(&self, path: &str, accepted: &[StatusCode]) -> Result<()> {
        let req = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, req, accepted).await?;
        Ok(())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Prefer the `message` field of a JSON error body, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}
