use axum::http::header::{self, HeaderMap, HeaderName};

/// Inbound headers that are safe to pass on to an upstream registry.
pub fn is_proxy_header(name: &HeaderName) -> bool {
    // HeaderName is always stored lower-cased, so this comparison ignores the client's casing.
    *name == header::ACCEPT || *name == header::USER_AGENT || *name == header::ACCEPT_ENCODING
}

/// Copy the allow-listed subset of `input` into a fresh map. Everything else is dropped.
pub fn copy_proxy_headers(input: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in input.iter() {
        if is_proxy_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;
    use rstest::*;

    use super::*;

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn keeps_only_allow_listed_headers() {
        let input = header_map(&[("Accept", "a"), ("X-Custom", "b"), ("User-Agent", "c")]);
        let output = copy_proxy_headers(&input);

        assert_eq!(output.len(), 2);
        assert_eq!(output.get("accept").unwrap(), "a");
        assert_eq!(output.get("user-agent").unwrap(), "c");
        assert!(output.get("x-custom").is_none());
    }

    #[test]
    fn keeps_repeated_values() {
        let input = header_map(&[
            ("accept", "application/vnd.oci.image.index.v1+json"),
            ("accept", "application/vnd.docker.distribution.manifest.v2+json"),
            ("ACCEPT-ENCODING", "gzip"),
        ]);
        let output = copy_proxy_headers(&input);

        let accepts: Vec<_> = output.get_all(header::ACCEPT).iter().collect();
        assert_eq!(accepts.len(), 2);
        assert_eq!(output.get(header::ACCEPT_ENCODING).unwrap(), "gzip");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(copy_proxy_headers(&HeaderMap::new()).is_empty());
    }

    #[rstest]
    #[case::accept("accept", true)]
    #[case::user_agent("User-Agent", true)]
    #[case::accept_encoding("Accept-Encoding", true)]
    #[case::authorization("authorization", false)]
    #[case::host("host", false)]
    #[case::cookie("cookie", false)]
    #[case::content_type("content-type", false)]
    fn allow_list(#[case] name: &str, #[case] expected: bool) {
        let name = HeaderName::from_bytes(name.as_bytes()).unwrap();
        assert_eq!(is_proxy_header(&name), expected);
    }
}
