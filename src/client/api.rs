//! Client view of the auth endpoints

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::auth::{Identity, LoginOutcome};
use crate::constants::MSG_FAILED_TO_AUTHENTICATE;
use crate::error::{AthenaeumError, Result};
use crate::handlers::auth::ApiResponse;
use crate::handlers::rejection::ErrorBody;

/// Calls the session store makes against the server.
///
/// Rejections come back as `AthenaeumError::Unauthorized` carrying the
/// server's message; an unreachable server as `Unavailable`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, identifier: &str, secret: &str) -> Result<LoginOutcome>;
    async fn verify(&self, token: Option<String>) -> Result<Identity>;
    async fn logout(&self, token: String) -> Result<()>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    secret: &'a str,
}

/// `AuthApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AthenaeumError::Unavailable(format!("Unable to reach server: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(rejection_error(response).await)
    }
}

async fn rejection_error(response: reqwest::Response) -> AthenaeumError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    if status == StatusCode::UNAUTHORIZED {
        AthenaeumError::Unauthorized(message)
    } else if status.is_client_error() {
        AthenaeumError::BadRequest(message)
    } else {
        AthenaeumError::Unavailable(message)
    }
}

fn malformed_response(e: reqwest::Error) -> AthenaeumError {
    AthenaeumError::Unavailable(format!("Malformed server response: {}", e))
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, identifier: &str, secret: &str) -> Result<LoginOutcome> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody { identifier, secret });
        self.send(request)
            .await?
            .json::<LoginOutcome>()
            .await
            .map_err(malformed_response)
    }

    async fn verify(&self, token: Option<String>) -> Result<Identity> {
        let mut request = self.client.get(self.url("/auth/verify"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let body = self
            .send(request)
            .await?
            .json::<ApiResponse<Identity>>()
            .await
            .map_err(malformed_response)?;

        if body.code != StatusCode::OK.as_u16() {
            return Err(AthenaeumError::Unauthorized(MSG_FAILED_TO_AUTHENTICATE.to_string()));
        }
        Ok(body.data)
    }

    async fn logout(&self, token: String) -> Result<()> {
        let request = self.client.post(self.url("/auth/logout")).bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}
