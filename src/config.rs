use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::routing::{backend_for, is_known_registry};
use crate::upstream::Credentials;

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 13030))
}

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Token endpoint credentials, keyed by registry identifier (`docker.io`, `ghcr.io`, ...).
    #[serde(default)]
    pub credentials: HashMap<String, Credentials>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            credentials: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut s = String::new();
        file.read_to_string(&mut s)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Credentials re-keyed by the backend base URL each registry identifier routes to.
    pub fn credentials_by_host(&self) -> HashMap<String, Credentials> {
        self.credentials
            .iter()
            .filter_map(|(org_name, credentials)| {
                let org_name = org_name.to_lowercase();
                if !is_known_registry(&org_name) {
                    tracing::warn!("ignoring credentials for unknown registry '{}'", org_name);
                    return None;
                }
                Some((
                    backend_for(Some(&org_name)).to_string(),
                    credentials.clone(),
                ))
            })
            .collect()
    }
}
