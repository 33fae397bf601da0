use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::trace;

use crate::error::{ConfigError, Error};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Executes one GraphQL query and hands back its `data` member.
pub trait Transport {
    fn execute(&mut self, query: &str, variables: Value) -> Result<Value, Error>;
}

/// `Authorization` value for `token`.
pub fn bearer_header(token: &str) -> Result<HeaderValue, ConfigError> {
    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ConfigError::InvalidToken)?;
    bearer.set_sensitive(true);
    Ok(bearer)
}

/// Appends `segments` to the path of `base`, each percent-encoded as a single segment.
///
/// `base` must be an http(s) URL; `Config::from_cli` only lets those through.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Builds the blocking HTTP client shared by the REST lookup and GraphQL calls.
///
/// Every request carries the bearer token and a user agent; GitHub refuses
/// requests without one.
pub fn http_client(token: &str, timeout: Duration) -> Result<Client, Error> {
    let bearer = bearer_header(token)?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Http(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

pub struct GraphQlClient {
    http: Client,
    endpoint: Url,
}

impl GraphQlClient {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

impl Transport for GraphQlClient {
    fn execute(&mut self, query: &str, variables: Value) -> Result<Value, Error> {
        trace!(%variables, "graphql request");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .map_err(|e| Error::Query(e.to_string()))?;

        let status = res.status();
        let body = res.text().map_err(|e| Error::Query(e.to_string()))?;
        data_from_response(status, &body)
    }
}

fn data_from_response(status: StatusCode, body: &str) -> Result<Value, Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth);
    }
    if !status.is_success() {
        return Err(Error::Query(format!("graphql: server returned {status}: {body}")));
    }
    decode_envelope(body)
}

/// Unwraps `{"data": ..., "errors": [...]}`; any error entry fails the query.
fn decode_envelope(body: &str) -> Result<Value, Error> {
    let envelope: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| Error::Query(format!("decoding response: {e}")))?;

    if !envelope.errors.is_empty() {
        let msgs: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(Error::Query(format!("graphql: {}", msgs.join("; "))));
    }
    match envelope.data {
        Some(Value::Null) | None => Err(Error::Query("graphql: response carried no data".into())),
        Some(data) => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_returns_data() {
        let data = decode_envelope(r#"{"data": {"user": null}}"#).unwrap();
        assert_eq!(data, json!({"user": null}));
    }

    #[test]
    fn envelope_errors_fail_the_query() {
        let err = decode_envelope(
            r#"{"data": null, "errors": [{"message": "Something went wrong"}, {"message": "again"}]}"#,
        )
        .unwrap_err();
        match err {
            Error::Query(msg) => assert_eq!(msg, "graphql: Something went wrong; again"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn envelope_without_data_is_an_error() {
        assert!(matches!(decode_envelope("{}"), Err(Error::Query(_))));
        assert!(matches!(decode_envelope("not json"), Err(Error::Query(_))));
    }

    #[test]
    fn unauthorized_is_auth_error() {
        let err = data_from_response(StatusCode::UNAUTHORIZED, r#"{"message": "Bad credentials"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Auth));
    }

    #[test]
    fn server_error_fails_the_query() {
        let err = data_from_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        match err {
            Error::Query(msg) => assert!(msg.contains("502"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ok_status_decodes_the_envelope() {
        let data = data_from_response(StatusCode::OK, r#"{"data": {"repository": null}}"#).unwrap();
        assert_eq!(data, json!({"repository": null}));

        let err = data_from_response(StatusCode::OK, r#"{"errors": [{"message": "nope"}]}"#);
        assert!(matches!(err, Err(Error::Query(_))));
    }

    #[test]
    fn client_builds_with_plain_token() {
        assert!(http_client("ghp_abc123", Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn token_with_newline_is_a_config_error() {
        let err = http_client("bad\ntoken", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidToken)));
        assert_eq!(bearer_header("bad\ntoken").unwrap_err(), ConfigError::InvalidToken);
    }

    #[test]
    fn endpoint_joins_onto_base_path() {
        let base = Url::parse("https://api.github.com").unwrap();
        assert_eq!(endpoint(&base, &["graphql"]).as_str(), "https://api.github.com/graphql");

        let ghe = Url::parse("https://ghe.example/api/").unwrap();
        assert_eq!(endpoint(&ghe, &["graphql"]).as_str(), "https://ghe.example/api/graphql");
    }

    #[test]
    fn endpoint_keeps_a_slashy_handle_in_one_segment() {
        let base = Url::parse("https://api.github.com").unwrap();
        let url = endpoint(&base, &["users", "ada/../../orgs/acme"]);
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], "users");
        assert!(segments[1].starts_with("ada%2F"), "{url}");
        assert!(url.path().starts_with("/users/"));
    }
}
