use async_trait::async_trait;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, Response, StatusCode};
use hyper::Body;

use super::challenge::BearerChallenge;
use super::token::pull_scope;
use super::{Backend, TokenProvider};
use crate::errors::Result;

/// Headers that describe a single connection and must not be copied onto another one.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::CONNECTION
        || *name == header::TRANSFER_ENCODING
        || *name == header::UPGRADE
        || *name == header::TE
        || *name == header::TRAILER
        || *name == header::PROXY_AUTHENTICATE
        || *name == header::PROXY_AUTHORIZATION
        || name.as_str() == "keep-alive"
        || name.as_str() == "proxy-connection"
}

/// [`Backend`] speaking to one registry over HTTPS.
///
/// An unauthenticated request is tried first. If the registry answers `401` with a Bearer
/// challenge, a token is fetched through the [`TokenProvider`] and the request is retried once;
/// whatever the registry says the second time goes back to the caller.
pub struct RegistryBackend<T: TokenProvider> {
    host: &'static str,
    client: reqwest::Client,
    token_provider: T,
}

impl<T: TokenProvider> RegistryBackend<T> {
    pub fn new(host: &'static str, client: reqwest::Client, token_provider: T) -> Self {
        Self {
            host,
            client,
            token_provider,
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .send()
            .await?)
    }
}

#[async_trait]
impl<T: TokenProvider> Backend for RegistryBackend<T> {
    async fn proxy(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
    ) -> Result<Response<Body>> {
        let url = format!("{}{}", self.host, path_and_query);
        tracing::debug!(%method, %url, "forwarding to upstream");

        let response = self.send(&method, &url, headers.clone()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return into_http_response(response);
        }

        let challenge = match BearerChallenge::from_headers(response.headers()) {
            Some(c) => c,
            None => return into_http_response(response),
        };

        let scope = challenge.scope.clone().or_else(|| pull_scope(path_and_query));
        let token = self
            .token_provider
            .token(self.host, &challenge, scope.as_deref())
            .await?;

        let mut headers = headers;
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        let response = self.send(&method, &url, headers).await?;
        tracing::debug!(status = %response.status(), %url, "upstream answered after auth");

        into_http_response(response)
    }
}

/// Re-frame an upstream response for the inbound connection, streaming its body.
fn into_http_response(response: reqwest::Response) -> Result<Response<Body>> {
    let mut builder = Response::builder().status(response.status());
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in response.headers() {
            if !is_hop_by_hop(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    Ok(builder.body(Body::wrap_stream(response.bytes_stream()))?)
}
