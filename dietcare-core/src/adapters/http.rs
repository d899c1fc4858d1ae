//! DietCare HTTP client
//!
//! Handles communication with the recipe backend (`/recipes`, `/profiles`,
//! `/interactions`, `/recommendations`) and the identity backend
//! (`/auth/google`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{wire, Interaction, InteractionKind, Profile, Recipe, User};
use crate::ports::{IdentityProvider, RecipeApi};

/// Timeout for recipe backend requests
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Ceiling for identity-provider sign-in
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(8);

// =============================================================================
// API Response Models
// =============================================================================

/// `GET /recommendations` body
#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    recommendations: Vec<Recipe>,
}

/// `POST /profiles` body: either `{ user_id, profile }` or the stored profile
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredProfile {
    Wrapped {
        #[serde(default, deserialize_with = "wire::optional_id")]
        user_id: Option<String>,
        profile: Profile,
    },
    Bare(Profile),
}

impl StoredProfile {
    /// Resolve to a full profile; fields the backend left out keep the submitted values
    fn resolve(self, submitted: &Profile) -> Profile {
        let mut stored = match self {
            StoredProfile::Wrapped { user_id, mut profile } => {
                if profile.user_id.is_none() {
                    profile.user_id = user_id;
                }
                profile
            }
            StoredProfile::Bare(profile) => profile,
        };

        let sent = submitted.clone();
        stored.id = stored.id.or(sent.id);
        stored.user_id = stored.user_id.or(sent.user_id);
        stored.age = stored.age.or(sent.age);
        stored.diet = stored.diet.or(sent.diet);
        stored.calorie_target = stored.calorie_target.or(sent.calorie_target);
        stored.budget = stored.budget.or(sent.budget);
        if stored.conditions.is_empty() {
            stored.conditions = sent.conditions;
        }
        if stored.allergies.is_empty() {
            stored.allergies = sent.allergies;
        }
        stored
    }
}

/// `POST /auth/google` body
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    user: Option<User>,
}

// =============================================================================
// Shared request plumbing
// =============================================================================

/// Map request errors to user-friendly messages
fn map_request_error(error: reqwest::Error, base_url: &str, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Network(format!(
            "Connection timed out after {} seconds",
            timeout.as_secs()
        ))
    } else if error.is_connect() {
        Error::Network(format!("Unable to connect to {}", base_url))
    } else {
        Error::Network(format!("Request failed: {}", error))
    }
}

/// Turn a non-2xx response into `Error::Http` with the body text
async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::http(status.as_u16(), body))
}

/// Read a JSON body; an empty or malformed body is `Error::Json`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response
        .text()
        .await
        .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;
    Ok(serde_json::from_str(&text)?)
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))
}

fn parse_base(base_url: &str) -> Result<(Url, String)> {
    let trimmed = base_url.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed)
        .map_err(|e| Error::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "Base URL must use http or https: {}",
            base_url
        )));
    }
    Ok((parsed, trimmed))
}

// =============================================================================
// Recipe backend client
// =============================================================================

/// Recipe backend HTTP client
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base: Url,
    base_url: String,
}

impl HttpApiClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let (base, base_url) = parse_base(base_url)?;
        Ok(Self {
            client: build_client(API_TIMEOUT)?,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/seg1/seg2`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::config(format!("Cannot extend base URL {}", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(e, &self.base_url, API_TIMEOUT))?;
        check_response_status(response).await
    }
}

#[async_trait]
impl RecipeApi for HttpApiClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        let url = self.url(&["recipes", id])?;
        let response = self.send(self.client.get(url)).await.map_err(|e| match e {
            Error::Http { status: 404, .. } => Error::not_found(format!("Recipe {}", id)),
            other => other,
        })?;
        read_json(response).await
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let url = self.url(&["recipes"])?;
        let response = self.send(self.client.get(url)).await?;
        read_json(response).await
    }

    async fn get_recommendations(&self, user_id: &str) -> Result<Vec<Recipe>> {
        let url = self.url(&["recommendations"])?;
        let request = self.client.get(url).query(&[("user_id", user_id)]);
        let response = self.send(request).await?;
        let body: RecommendationsResponse = read_json(response).await?;
        Ok(body.recommendations)
    }

    async fn find_profiles(&self, user_id: &str) -> Result<Vec<Profile>> {
        let url = self.url(&["profiles"])?;
        let request = self.client.get(url).query(&[("user_id", user_id)]);
        let response = self.send(request).await?;
        read_json(response).await
    }

    async fn create_profile(&self, profile: &Profile) -> Result<Profile> {
        let url = self.url(&["profiles"])?;
        let response = self.send(self.client.post(url).json(profile)).await?;
        let stored: StoredProfile = read_json(response).await?;
        Ok(stored.resolve(profile))
    }

    async fn update_profile(&self, id: &str, profile: &Profile) -> Result<Profile> {
        let url = self.url(&["profiles", id])?;
        let response = self.send(self.client.put(url).json(profile)).await?;
        let stored: StoredProfile = read_json(response).await?;
        Ok(stored.resolve(profile))
    }

    async fn log_interaction(&self, interaction: &Interaction) -> Result<Interaction> {
        let url = self.url(&["interactions"])?;
        let response = self.send(self.client.post(url).json(interaction)).await?;
        // The body is informational; an unparseable echo still counts as recorded
        let recorded = read_json::<Interaction>(response)
            .await
            .unwrap_or_else(|_| interaction.clone());
        Ok(recorded)
    }

    async fn list_interactions(
        &self,
        user_id: &str,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<Interaction>> {
        let url = self.url(&["interactions"])?;
        let mut request = self.client.get(url).query(&[("user_id", user_id)]);
        if let Some(kind) = kind {
            request = request.query(&[("type", kind.as_str())]);
        }
        let response = self.send(request).await?;
        let body: serde_json::Value = read_json(response).await?;
        Ok(Interaction::decode_list(body)?)
    }
}

// =============================================================================
// Identity backend client
// =============================================================================

/// Google sign-in via the identity backend
#[derive(Debug, Clone)]
pub struct GoogleIdentityClient {
    client: Client,
    base_url: String,
}

impl GoogleIdentityClient {
    pub fn new(auth_base: &str) -> Result<Self> {
        let (_, base_url) = parse_base(auth_base)?;
        Ok(Self {
            client: build_client(IDENTITY_TIMEOUT)?,
            base_url,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn verify_google_token(&self, id_token: &str) -> Result<Option<User>> {
        let url = format!("{}/auth/google", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "id_token": id_token }))
            .send()
            .await
            .map_err(|e| map_request_error(e, &self.base_url, IDENTITY_TIMEOUT))?;
        let response = check_response_status(response).await?;
        let body: AuthResponse = read_json(response).await?;
        Ok(body.user)
    }

    fn fallback_login_url(&self) -> String {
        format!("{}/auth/google/login", self.base_url)
    }
}
