use axum::http::header::{self, HeaderMap, HeaderValue};
use http_auth::{parser::ChallengeParser, ChallengeRef};

/// Parameters of a `WWW-Authenticate: Bearer ...` challenge returned by a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerChallenge {
    /// Token endpoint to request credentials from.
    pub realm: String,
    pub service: Option<String>,
    pub scope: Option<String>,
}

impl BearerChallenge {
    /// Find the first Bearer challenge in a header value, which may list several challenges.
    pub fn parse(value: &str) -> Option<Self> {
        ChallengeParser::new(value)
            .filter_map(|parser_res| {
                parser_res
                    .ok()
                    .and_then(|challenge_ref| BearerChallenge::try_from(&challenge_ref).ok())
            })
            .next()
    }

    /// First Bearer challenge across every `WWW-Authenticate` header of a response.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::WWW_AUTHENTICATE)
            .iter()
            .find_map(|value| BearerChallenge::try_from(value).ok())
    }
}

impl TryFrom<&HeaderValue> for BearerChallenge {
    type Error = String;

    fn try_from(value: &HeaderValue) -> std::result::Result<Self, Self::Error> {
        let value = value
            .to_str()
            .map_err(|e| format!("cannot convert header value to string: {:?}", e))?;
        Self::parse(value).ok_or_else(|| String::from("cannot find Bearer challenge"))
    }
}

impl TryFrom<&ChallengeRef<'_>> for BearerChallenge {
    type Error = String;

    fn try_from(value: &ChallengeRef<'_>) -> std::result::Result<Self, Self::Error> {
        if !value.scheme.eq_ignore_ascii_case("Bearer") {
            return Err(format!("unsupported challenge scheme {:?}", value.scheme));
        }

        let mut realm = None;
        let mut service = None;
        let mut scope = None;
        for (k, v) in &value.params {
            if k.eq_ignore_ascii_case("realm") {
                realm = Some(v.to_unescaped());
            } else if k.eq_ignore_ascii_case("service") {
                service = Some(v.to_unescaped());
            } else if k.eq_ignore_ascii_case("scope") {
                scope = Some(v.to_unescaped());
            }
        }

        let realm = realm
            .filter(|r| !r.is_empty())
            .ok_or("missing required parameter realm")?;

        Ok(BearerChallenge {
            realm,
            service,
            scope,
        })
    }
}
