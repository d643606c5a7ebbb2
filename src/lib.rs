//! # regproxy
//!
//! A reverse proxy that lets one hostname front several container image registries. Clients
//! speak the Registry HTTP API v2 to the proxy and put the upstream registry in the image name,
//! e.g. `proxy.example.com/gcr.io/ml-pipeline/frontend`; the proxy rewrites the path into the
//! shape that registry expects, answers its token challenge, and streams the response back.
//! Images without a registry prefix go to Docker Hub, with the implicit `library` namespace
//! filled in for single-name images.
mod config;
pub use config::Config;

mod errors;
pub use errors::{Error, Result};

pub mod http;
pub mod routing;
pub mod upstream;

pub use self::http::RegistryProxy;
pub use upstream::{Credentials, RegistryBackendFactory};
