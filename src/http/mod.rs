//! # Proxy HTTP Surface
//!
//! [`RegistryProxy`] turns a [`BackendFactory`] into an [`axum::Router`] that accepts any
//! Registry API v2 path, optionally prefixed with a registry identifier, and forwards it to the
//! registry that identifier names:
//!
//! ```text
//! docker pull proxy.example.com/gcr.io/ml-pipeline/frontend:2.0.0-alpha.7
//! docker pull proxy.example.com/quay.io/jetstack/cert-manager-webhook:v1.10.1
//! docker pull proxy.example.com/docker.io/kubeflownotebookswg/tensorboards-web-app:v1.7.0
//! docker pull proxy.example.com/kubeflownotebookswg/jupyter-tensorflow-cuda-full:v1.7.0
//! ```
//!
//! Each request is handled on its own: resolve the route, keep the safe headers, and hand the
//! rest to the backend. The upstream response goes back to the client as is.
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::{self, TraceLayer};

pub(crate) mod headers;

pub use headers::{copy_proxy_headers, is_proxy_header};

use crate::errors::Result;
use crate::routing::Route;
use crate::upstream::{Backend, BackendFactory};

/// Routes registry requests to upstream backends obtained from a [`BackendFactory`].
#[derive(Clone)]
pub struct RegistryProxy<F: BackendFactory> {
    factory: F,
}

impl<F: BackendFactory> RegistryProxy<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Return an [`axum::Router`] that proxies every path it receives.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(proxy_request::<F>)
            .with_state(self.clone())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().include_headers(false))
                    .on_response(trace::DefaultOnResponse::new())
                    .on_request(trace::DefaultOnRequest::new()),
            )
    }

    /// Route a single request and return the upstream's response.
    pub async fn proxy(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Result<Response> {
        let route = Route::resolve(uri.path());
        tracing::debug!(
            org_name = ?route.org_name,
            host = route.host,
            path = %route.path,
            "routing registry request"
        );

        let path_and_query = match uri.query() {
            Some(query) => format!("{}?{}", route.path, query),
            None => route.path,
        };

        let backend = self.factory.backend(route.host);
        let response = backend
            .proxy(method, &path_and_query, copy_proxy_headers(headers))
            .await?;

        Ok(response.into_response())
    }
}

async fn proxy_request<F: BackendFactory>(
    State(proxy): State<RegistryProxy<F>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response> {
    proxy.proxy(method, &uri, &headers).await
}
