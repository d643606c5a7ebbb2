use std::fmt;
use std::str::FromStr;

/// Namespace Docker Hub uses for official images when none is given.
pub const LIBRARY_NAMESPACE: &str = "library";

/// Registry API operation named by the segment following the repository name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Manifests,
    Blobs,
    Tags,
    Referrers,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Manifests => "manifests",
            Action::Blobs => "blobs",
            Action::Tags => "tags",
            Action::Referrers => "referrers",
        }
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "manifests" => Ok(Action::Manifests),
            "blobs" => Ok(Action::Blobs),
            "tags" => Ok(Action::Tags),
            "referrers" => Ok(Action::Referrers),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_action(segment: &str) -> bool {
    segment.parse::<Action>().is_ok()
}

/// Shape of an inbound registry path, decided before any segment is moved.
///
/// Segment counts include the empty segment in front of the leading slash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteCase {
    /// `/v2/<repo>/<action>/<reference>` with no identifier: gains the `library` namespace.
    ImplicitLibrary,
    /// `/v2/docker.io/<repo>/<action>/<reference>`: the identifier slot becomes `library`.
    DockerHubImplicitLibrary,
    /// `/v2/<namespace>/<repo>/<action>/<reference>` with no identifier: already canonical.
    Canonical,
    /// `/v2/<org>/<namespace>/<repo>/<action>/<reference>`: the identifier is dropped.
    OrgPrefixed,
    /// Nothing recognizable; forwarded as is and left for the upstream to judge.
    Unmatched,
}

impl RewriteCase {
    pub fn classify(org_name: Option<&str>, segments: &[&str]) -> Self {
        match (org_name, segments.len()) {
            (None, 5) if is_action(segments[3]) => RewriteCase::ImplicitLibrary,
            (None, 6) if is_action(segments[4]) => RewriteCase::Canonical,
            (Some("docker.io"), 6) if is_action(segments[4]) => {
                RewriteCase::DockerHubImplicitLibrary
            }
            (Some(_), 7) => RewriteCase::OrgPrefixed,
            _ => RewriteCase::Unmatched,
        }
    }
}

/// Rebuild `path` into the `/v2/<namespace>/<repo>/<action>/<reference>` shape the upstream
/// expects.
pub fn rewrite_path(org_name: Option<&str>, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let case = RewriteCase::classify(org_name, &segments);
    tracing::trace!(?org_name, path, ?case, "classified registry path");

    let rewritten = match case {
        RewriteCase::ImplicitLibrary => vec![
            segments[0],
            segments[1],
            LIBRARY_NAMESPACE,
            segments[2],
            segments[3],
            segments[4],
        ],
        // segments[2] is dropped without being compared to the identifier.
        RewriteCase::DockerHubImplicitLibrary => vec![
            segments[0],
            segments[1],
            LIBRARY_NAMESPACE,
            segments[3],
            segments[4],
            segments[5],
        ],
        RewriteCase::OrgPrefixed => vec![
            segments[0],
            segments[1],
            segments[3],
            segments[4],
            segments[5],
            segments[6],
        ],
        RewriteCase::Canonical | RewriteCase::Unmatched => segments,
    };

    rewritten.join("/")
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::manifests("manifests", Some(Action::Manifests))]
    #[case::blobs("blobs", Some(Action::Blobs))]
    #[case::tags("tags", Some(Action::Tags))]
    #[case::referrers("referrers", Some(Action::Referrers))]
    #[case::uppercase("Manifests", None)]
    #[case::repository("nginx", None)]
    #[case::empty("", None)]
    fn parses_action(#[case] segment: &str, #[case] expected: Option<Action>) {
        assert_eq!(segment.parse::<Action>().ok(), expected);
        if let Some(action) = expected {
            assert_eq!(action.to_string(), segment);
        }
    }

    #[rstest]
    #[case::implicit_library(None, "/v2/repo/manifests/latest", RewriteCase::ImplicitLibrary)]
    #[case::implicit_library_not_action(None, "/v2/repo/latest/manifests", RewriteCase::Unmatched)]
    #[case::canonical(None, "/v2/library/repo/manifests/latest", RewriteCase::Canonical)]
    #[case::canonical_not_action(None, "/v2/library/repo/latest/x", RewriteCase::Unmatched)]
    #[case::docker_hub(
        Some("docker.io"),
        "/v2/docker.io/repo/manifests/latest",
        RewriteCase::DockerHubImplicitLibrary
    )]
    #[case::docker_hub_not_action(
        Some("docker.io"),
        "/v2/docker.io/repo/latest/x",
        RewriteCase::Unmatched
    )]
    #[case::other_org_six_segments(
        Some("gcr.io"),
        "/v2/gcr.io/repo/manifests/latest",
        RewriteCase::Unmatched
    )]
    #[case::docker_hub_with_namespace(
        Some("docker.io"),
        "/v2/docker.io/library/repo/blobs/sha256:abc",
        RewriteCase::OrgPrefixed
    )]
    #[case::org_prefixed(
        Some("gcr.io"),
        "/v2/gcr.io/project/repo/manifests/latest",
        RewriteCase::OrgPrefixed
    )]
    #[case::api_root(None, "/v2/", RewriteCase::Unmatched)]
    #[case::catalog(None, "/v2/_catalog", RewriteCase::Unmatched)]
    #[case::deep_repository(None, "/v2/a/b/c/manifests/latest", RewriteCase::Unmatched)]
    fn classifies_path(
        #[case] org_name: Option<&str>,
        #[case] path: &str,
        #[case] expected: RewriteCase,
    ) {
        let segments: Vec<&str> = path.split('/').collect();
        assert_eq!(RewriteCase::classify(org_name, &segments), expected);
    }

    #[rstest]
    #[case::implicit_library(
        None,
        "/v2/repo/manifests/latest",
        "/v2/library/repo/manifests/latest"
    )]
    #[case::implicit_library_blobs(
        None,
        "/v2/busybox/blobs/sha256:abc",
        "/v2/library/busybox/blobs/sha256:abc"
    )]
    #[case::canonical(
        None,
        "/v2/library/repo/manifests/latest",
        "/v2/library/repo/manifests/latest"
    )]
    #[case::canonical_other_namespace(
        None,
        "/v2/kubeflownotebookswg/tensorboards-web-app/manifests/v1.7.0",
        "/v2/kubeflownotebookswg/tensorboards-web-app/manifests/v1.7.0"
    )]
    #[case::docker_hub(
        Some("docker.io"),
        "/v2/docker.io/repo/manifests/latest",
        "/v2/library/repo/manifests/latest"
    )]
    #[case::docker_hub_short_name(
        Some("docker.io"),
        "/v2/docker.io/somejunk/manifests/tag",
        "/v2/library/somejunk/manifests/tag"
    )]
    #[case::docker_hub_with_namespace(
        Some("docker.io"),
        "/v2/docker.io/kubeflownotebookswg/tensorboards-web-app/manifests/v1.7.0",
        "/v2/kubeflownotebookswg/tensorboards-web-app/manifests/v1.7.0"
    )]
    #[case::gcr(
        Some("gcr.io"),
        "/v2/gcr.io/project/repo/manifests/latest",
        "/v2/project/repo/manifests/latest"
    )]
    #[case::quay(
        Some("quay.io"),
        "/v2/quay.io/jetstack/cert-manager-webhook/manifests/v1.10.1",
        "/v2/jetstack/cert-manager-webhook/manifests/v1.10.1"
    )]
    #[case::unknown_org(
        Some("example.com"),
        "/v2/example.com/ns/repo/tags/list",
        "/v2/ns/repo/tags/list"
    )]
    #[case::api_root(None, "/v2/", "/v2/")]
    #[case::unmatched(None, "/v2/a/b/c/manifests/latest", "/v2/a/b/c/manifests/latest")]
    #[case::empty(None, "", "")]
    fn rewrites_path(#[case] org_name: Option<&str>, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(rewrite_path(org_name, path), expected);
    }

    #[rstest]
    #[case("/v2/repo/manifests/latest")]
    #[case("/v2/library/repo/blobs/sha256:abc")]
    #[case("/v2/jetstack/cert-manager-webhook/tags/list")]
    fn canonical_paths_are_fixed_points(#[case] path: &str) {
        let once = rewrite_path(None, path);
        assert_eq!(rewrite_path(None, &once), once);
    }
}
