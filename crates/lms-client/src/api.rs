//! Client side of the portal's HTTP surface.

use async_trait::async_trait;
use lms_models::{
    ApiResponse, LoginRequest, ParentLoginData, ParentLoginRequest, StaffLoginData,
};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// The calls the session store makes against the Token Issuer and any
/// bearer-protected route.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login_as_staff(&self, request: &LoginRequest) -> Result<StaffLoginData, ClientError>;

    async fn login_as_parent(
        &self,
        request: &ParentLoginRequest,
    ) -> Result<ParentLoginData, ClientError>;

    /// `GET {path}` with `Authorization: Bearer {token}`, returning the
    /// envelope's `data`.
    async fn get_authorized(
        &self,
        path: &str,
        token: &str,
    ) -> Result<serde_json::Value, ClientError>;
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    api_base: String,
}

impl HttpAuthApi {
    /// `base_url` is the server origin, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            api_base: format!("{}/api/v1", base_url.as_ref().trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn unwrap_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
            return Ok(envelope.data);
        }

        let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        tracing::debug!(status = status.as_u16(), %message, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login_as_staff(&self, request: &LoginRequest) -> Result<StaffLoginData, ClientError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(request)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    async fn login_as_parent(
        &self,
        request: &ParentLoginRequest,
    ) -> Result<ParentLoginData, ClientError> {
        let response = self
            .client
            .post(self.url("/parentLogin"))
            .json(request)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    async fn get_authorized(
        &self,
        path: &str,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }
}
