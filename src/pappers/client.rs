use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the external company-registry API
///
/// The trait is the seam between the lookup pipeline and the wire: tests
/// substitute an implementation that records calls and injects failures.
/// Responses are opaque JSON; the relay forwards them without validating
/// their shape.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetch the primary company record for a registration number
    async fn fetch_company(&self, siren: &str) -> Result<Value, RegistryError>;

    /// Search companies linked to a director by first name
    async fn search_by_director(&self, first_name: &str) -> Result<Value, RegistryError>;
}

/// Pappers-backed implementation of [`RegistryClient`]
pub struct PappersClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl PappersClient {
    pub fn new(http: reqwest::Client, base_url: String, api_token: String) -> Self {
        Self {
            http,
            base_url,
            api_token,
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, RegistryError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!("Registry request: GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("api_token", self.api_token.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RegistryClient for PappersClient {
    async fn fetch_company(&self, siren: &str) -> Result<Value, RegistryError> {
        self.get_json("entreprise", &[("siren", siren)]).await
    }

    async fn search_by_director(&self, first_name: &str) -> Result<Value, RegistryError> {
        self.get_json("recherche", &[("prenom_dirigeant", first_name)])
            .await
    }
}
