use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::challenge::BearerChallenge;
use super::TokenProvider;
use crate::errors::{Error, Result};
use crate::routing::is_action;

/// Account used to authenticate against a registry's token endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Option<String> {
        self.token
            .filter(|t| !t.is_empty())
            .or(self.access_token.filter(|t| !t.is_empty()))
    }
}

/// Pull scope for a canonical `/v2/<namespace>/<repo>/<action>/...` path, e.g.
/// `repository:library/nginx:pull`.
pub fn pull_scope(path: &str) -> Option<String> {
    let path = path.split('?').next().unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        ["", "v2", namespace, repo, action, ..] if is_action(action) => {
            Some(format!("repository:{namespace}/{repo}:pull"))
        }
        _ => None,
    }
}

/// Fetches bearer tokens from the realm named in a registry's challenge. Anonymous unless
/// credentials are configured for the backend host.
#[derive(Clone)]
pub struct RegistryTokenProvider {
    client: reqwest::Client,
    credentials: Arc<HashMap<String, Credentials>>,
}

impl RegistryTokenProvider {
    /// `credentials` is keyed by backend base URL, e.g. `https://ghcr.io`.
    pub fn new(client: reqwest::Client, credentials: HashMap<String, Credentials>) -> Self {
        Self {
            client,
            credentials: Arc::new(credentials),
        }
    }
}

#[async_trait]
impl TokenProvider for RegistryTokenProvider {
    async fn token(
        &self,
        host: &str,
        challenge: &BearerChallenge,
        scope: Option<&str>,
    ) -> Result<String> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(service) = challenge.service.as_deref() {
            query.push(("service", service));
        }
        if let Some(scope) = scope {
            query.push(("scope", scope));
        }

        let mut request = self.client.get(&challenge.realm).query(&query);
        let credentials = self.credentials.get(host);
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        tracing::debug!(
            host,
            realm = %challenge.realm,
            ?scope,
            authenticated = credentials.is_some(),
            "requesting upstream token"
        );
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(Error::TokenRequestFailed {
                realm: challenge.realm.clone(),
                status,
                reason,
            });
        }

        let body: TokenResponse = response.json().await?;
        body.into_token()
            .ok_or_else(|| Error::MissingToken(challenge.realm.clone()))
    }
}
