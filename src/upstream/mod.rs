//! # Upstream Registries
//!
//! The boundary between request routing and the registries requests are routed to. Routing only
//! ever sees the traits defined here: a [`BackendFactory`] hands out one [`Backend`] per request,
//! addressed at the selected registry host, and each backend leans on a [`TokenProvider`] to
//! answer the registry's authentication challenge.
//!
//! [`RegistryBackendFactory`] is the reqwest-based implementation used by the `regproxy`
//! binary.
use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, Response};
use hyper::Body;

mod challenge;
mod client;
mod token;

pub use challenge::BearerChallenge;
pub use client::RegistryBackend;
pub use token::{pull_scope, Credentials, RegistryTokenProvider};

use crate::errors::Result;

/// Produces bearer tokens for upstream registries.
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Obtain a token for `host` satisfying `challenge`. `scope` is the resource scope being
    /// requested, if one is known.
    async fn token(
        &self,
        host: &str,
        challenge: &BearerChallenge,
        scope: Option<&str>,
    ) -> Result<String>;
}

/// Issues requests against a single upstream registry and hands back its response unmodified.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send `method path_and_query` with `headers` to the upstream, answering any auth challenge
    /// along the way. Upstream error statuses are returned as responses, not errors.
    async fn proxy(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
    ) -> Result<Response<Body>>;
}

/// Provides [`Backend`] instances addressed at a given registry host.
pub trait BackendFactory: Clone + Send + Sync + 'static {
    type Backend: Backend;

    fn backend(&self, host: &'static str) -> Self::Backend;
}

/// Hands out [`RegistryBackend`]s sharing one HTTP client and token provider.
#[derive(Clone)]
pub struct RegistryBackendFactory {
    client: reqwest::Client,
    token_provider: RegistryTokenProvider,
}

impl RegistryBackendFactory {
    /// `credentials` is keyed by backend base URL.
    pub fn new(credentials: HashMap<String, Credentials>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let token_provider = RegistryTokenProvider::new(client.clone(), credentials);
        Ok(Self {
            client,
            token_provider,
        })
    }
}

impl BackendFactory for RegistryBackendFactory {
    type Backend = RegistryBackend<RegistryTokenProvider>;

    fn backend(&self, host: &'static str) -> Self::Backend {
        RegistryBackend::new(host, self.client.clone(), self.token_provider.clone())
    }
}
