// ABOUTME: HTTP client for the marketing-platform REST API.
// ABOUTME: Resolves the API key per call so a missing key fails that call only.

use serde_json::json;

use super::types::*;
use crate::error::ApiError;

/// Environment variable holding the platform API key.
pub const API_KEY_ENV: &str = "HERALD_API_KEY";

/// Client for the marketing-platform API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client against the given base URL. The API key is read
    /// from [`API_KEY_ENV`] at call time unless overridden.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("herald/0.3.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            http,
        }
    }

    /// Use an explicit API key instead of the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn key(&self) -> Result<String, ApiError> {
        if let Some(k) = &self.api_key {
            return Ok(k.clone());
        }
        std::env::var(API_KEY_ENV).map_err(|_| ApiError::MissingApiKey(API_KEY_ENV))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    /// Look up a profile by email. `Ok(None)` when nothing matches.
    pub async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, ApiError> {
        let filter = format!("equals(email,\"{}\")", email);
        let url = format!(
            "{}?filter={}",
            self.url("/profiles"),
            urlencoding::encode(&filter)
        );
        let response = self.http.get(&url).bearer_auth(self.key()?).send().await?;
        let envelope: Envelope<Vec<Profile>> = Self::check(response).await?.json().await?;
        Ok(envelope.data.into_iter().next())
    }

    /// Resolve a profile by email, failing with [`ApiError::NotFound`]
    /// when nothing matches. For executors that must resolve an internal
    /// id before mutating.
    pub async fn require_profile(&self, email: &str) -> Result<Profile, ApiError> {
        self.profile_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile with email '{}'", email)))
    }

    /// Create a new profile.
    pub async fn create_profile(&self, attrs: &ProfileAttributes) -> Result<Profile, ApiError> {
        let response = self
            .http
            .post(self.url("/profiles"))
            .bearer_auth(self.key()?)
            .json(&json!({ "data": attrs }))
            .send()
            .await?;
        let envelope: Envelope<Profile> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// Patch an existing profile by internal id.
    pub async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/profiles/{}", id)))
            .bearer_auth(self.key()?)
            .json(&json!({ "data": update }))
            .send()
            .await?;
        let envelope: Envelope<Profile> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// All subscriber lists.
    pub async fn lists(&self) -> Result<Vec<List>, ApiError> {
        let response = self
            .http
            .get(self.url("/lists"))
            .bearer_auth(self.key()?)
            .send()
            .await?;
        let envelope: Envelope<Vec<List>> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// Create a new subscriber list.
    pub async fn create_list(&self, name: &str) -> Result<List, ApiError> {
        let response = self
            .http
            .post(self.url("/lists"))
            .bearer_auth(self.key()?)
            .json(&json!({ "data": { "name": name } }))
            .send()
            .await?;
        let envelope: Envelope<List> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// Add a profile to a list by internal ids.
    pub async fn subscribe(&self, list_id: &str, profile_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/lists/{}/members", list_id)))
            .bearer_auth(self.key()?)
            .json(&json!({ "data": { "profile_id": profile_id } }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// All campaigns.
    pub async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        let response = self
            .http
            .get(self.url("/campaigns"))
            .bearer_auth(self.key()?)
            .send()
            .await?;
        let envelope: Envelope<Vec<Campaign>> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// Trigger a campaign send; returns the updated campaign.
    pub async fn send_campaign(&self, id: &str) -> Result<Campaign, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/campaigns/{}/send", id)))
            .bearer_auth(self.key()?)
            .send()
            .await?;
        let envelope: Envelope<Campaign> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }

    /// Delivery metrics for a campaign.
    pub async fn campaign_metrics(&self, id: &str) -> Result<CampaignMetrics, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/campaigns/{}/metrics", id)))
            .bearer_auth(self.key()?)
            .send()
            .await?;
        let envelope: Envelope<CampaignMetrics> = Self::check(response).await?.json().await?;
        Ok(envelope.data)
    }
}
