//! # Routing
//!
//! Decides, from the request path alone, which upstream registry a request belongs to and what
//! path that upstream expects. Every function here is total: paths that fit none of the known
//! shapes fall through to the default backend with the path left untouched, and the upstream
//! registry is left to reject them.
//!
//! ```text
//! /v2/quay.io/jetstack/cert-manager-webhook/manifests/v1.10.1
//!     org:  quay.io
//!     host: https://quay.io
//!     path: /v2/jetstack/cert-manager-webhook/manifests/v1.10.1
//! ```
mod backends;
mod org;
mod rewrite;

pub use backends::{backend_for, is_known_registry, DEFAULT_BACKEND_HOST, REGISTRY_BACKENDS};
pub use org::org_name_from_path;
pub use rewrite::{is_action, rewrite_path, Action, RewriteCase, LIBRARY_NAMESPACE};

/// Routing decision for a single inbound path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Registry identifier found in the path, lower-cased.
    pub org_name: Option<String>,
    /// Base URL of the upstream registry.
    pub host: &'static str,
    /// Path to request from `host`.
    pub path: String,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        let org_name = org_name_from_path(path);
        let rewritten = rewrite_path(org_name.as_deref(), path);
        let host = backend_for(org_name.as_deref());

        Route {
            org_name,
            host,
            path: rewritten,
        }
    }
}
