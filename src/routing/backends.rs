/// Upstream used when a request carries no registry identifier, or an unknown one.
pub const DEFAULT_BACKEND_HOST: &str = "https://registry-1.docker.io";

/// Registry identifiers this proxy knows how to reach, and the base URL of each.
pub const REGISTRY_BACKENDS: &[(&str, &str)] = &[
    ("gcr.io", "https://gcr.io"),
    ("k8s.gcr.io", "https://k8s.gcr.io"),
    ("quay.io", "https://quay.io"),
    ("docker.io", "https://registry-1.docker.io"),
    ("ghcr.io", "https://ghcr.io"),
    ("nvcr.io", "https://nvcr.io"),
];

fn lookup(org_name: &str) -> Option<&'static str> {
    REGISTRY_BACKENDS
        .iter()
        .find(|(name, _)| *name == org_name)
        .map(|(_, host)| *host)
}

/// Select the upstream base URL for a (possibly absent) registry identifier.
pub fn backend_for(org_name: Option<&str>) -> &'static str {
    org_name.and_then(lookup).unwrap_or(DEFAULT_BACKEND_HOST)
}

/// Whether the identifier names one of the registries in [`REGISTRY_BACKENDS`].
pub fn is_known_registry(org_name: &str) -> bool {
    lookup(org_name).is_some()
}
