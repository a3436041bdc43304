//! GitHub App authentication: App JWT and installation tokens.
//!
//! Flow per webhook delivery:
//!   1. sign an RS256 JWT with `iss = app_id`, valid for ten minutes
//!   2. `POST /app/installations/{id}/access_tokens` with that JWT
//!   3. use the returned token as `Authorization: token …` for REST calls
//!
//! Tokens are not cached; every delivery mints a fresh one.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    errors::{GitHubError, GitHubProviderError, GitHubResult},
    types::InstallationToken,
};

/// Lifetime of an App JWT; GitHub rejects anything above ten minutes.
pub const JWT_TTL_SECS: i64 = 10 * 60;

/// GitHub App identity.
#[derive(Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub private_key_pem: String,
}

impl AppCredentials {
    /// Accepts PEMs pasted into a single env line with literal `\n`.
    pub fn new(app_id: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        let pem: String = private_key_pem.into();
        Self {
            app_id: app_id.into(),
            private_key_pem: pem.replace("\\n", "\n"),
        }
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

/// Registered claims of an App JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl AppClaims {
    pub fn at(now: i64, app_id: &str) -> Self {
        Self {
            iat: now,
            exp: now + JWT_TTL_SECS,
            iss: app_id.to_string(),
        }
    }
}

/// Exchanges App credentials for installation tokens.
#[derive(Clone)]
pub struct GitHubAppAuth {
    http: Client,
    base_api: String,
    app_id: String,
    key: EncodingKey,
}

impl GitHubAppAuth {
    /// Parses the private key once.
    ///
    /// # Errors
    /// [`GitHubError::Auth`] if the app id is empty or the PEM is not an RSA key.
    pub fn new(http: Client, base_api: String, credentials: &AppCredentials) -> GitHubResult<Self> {
        if credentials.app_id.trim().is_empty() {
            return Err(GitHubError::Auth("APP_ID must not be empty".into()));
        }
        let key = EncodingKey::from_rsa_pem(credentials.private_key_pem.as_bytes())
            .map_err(|e| GitHubError::Auth(format!("invalid private key: {e}")))?;

        debug!("Creating GitHubAppAuth with base_api={}", base_api);
        Ok(Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            app_id: credentials.app_id.clone(),
            key,
        })
    }

    /// Signs an App JWT issued at `now` (unix seconds).
    pub fn mint_jwt(&self, now: i64) -> GitHubResult<String> {
        let claims = AppClaims::at(now, &self.app_id);
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }

    /// Creates an installation access token.
    ///
    /// # Errors
    /// - [`GitHubError::Auth`] if the JWT cannot be signed
    /// - [`GitHubError::Provider`] for non-2xx answers and transport failures
    /// - [`GitHubError::Decode`] if the response has no `token`
    pub async fn installation_token(&self, installation_id: u64) -> GitHubResult<String> {
        let jwt = self.mint_jwt(Utc::now().timestamp())?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.base_api, installation_id
        );
        debug!("GitHub installation_token: {}", url);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&jwt)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GitHubProviderError::from_status(status.as_u16()).into());
        }

        let body: InstallationToken = resp.json().await?;
        info!(installation_id, "installation token obtained");
        Ok(body.token)
    }
}

impl fmt::Debug for GitHubAppAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubAppAuth")
            .field("base_api", &self.base_api)
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}
