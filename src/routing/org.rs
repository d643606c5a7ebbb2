/// Extract the registry identifier embedded in a request path, if any.
///
/// Only the exact shape `/v2/<org>/<namespace>/<repo>/<action>/<reference>` carries an
/// identifier. The check is structural: the identifier is not validated against the known
/// registries, so an unknown prefix still comes back here and later falls through to the default
/// backend.
pub fn org_name_from_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        ["", "v2", org, _, _, _, _] => Some(org.to_lowercase()),
        _ => None,
    }
}
