//! Auth provider client
//!
//! Validates bearer tokens against the hosted auth provider and resolves the
//! caller's identity. The user's role (`user_type`) is read exclusively from
//! `app_metadata`, which only the provider's admin surface can write; client
//! editable metadata is never consulted.

use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::warn;

/// Identity resolved from a validated bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    /// Server-issued role claim ("buyer", "seller", "validator", ...)
    pub user_type: Option<String>,
}

#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header / no bearer token on the request
    MissingToken,
    /// The provider rejected the token
    InvalidToken,
    /// The provider could not be reached or answered malformed
    Provider(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authorization header required"),
            AuthError::InvalidToken => write!(f, "Unauthorized - Invalid token"),
            AuthError::Provider(msg) => write!(f, "Auth provider error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Pull the bearer token out of the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.to_string())
        }
        _ => Err(AuthError::MissingToken),
    }
}

/// Response shape of the provider's user endpoint
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    app_metadata: serde_json::Value,
}

#[derive(Clone)]
pub struct AuthService {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AuthService {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("AUTH_API_URL").expect("AUTH_API_URL must be set");
        let service_key = std::env::var("SERVICE_API_KEY").expect("SERVICE_API_KEY must be set");
        Self::new(base_url, service_key)
    }

    /// Resolve the user behind `access_token`, or fail with `InvalidToken`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AuthError::InvalidToken);
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), "auth provider returned unexpected status");
            return Err(AuthError::Provider(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let user_type = user
            .app_metadata
            .get("user_type")
            .and_then(|v| v.as_str())
            .map(String::from);

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            user_type,
        })
    }
}
