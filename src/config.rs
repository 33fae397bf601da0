use std::time::{Duration, Instant};

use reqwest::Url;

use crate::cli::Cli;
use crate::domain::aggregate::EmitPolicy;
use crate::error::ConfigError;
use crate::github::client::{bearer_header, endpoint};

/// Everything one run needs, validated up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub handle: String,
    pub token: String,
    pub policy: EmitPolicy,
    pub json: bool,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub deadline: Option<Duration>,
    pub api_url: Url,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let handle = non_empty(cli.user).ok_or(ConfigError::MissingHandle)?;
        let token = non_empty(cli.token).ok_or(ConfigError::MissingToken)?;
        bearer_header(&token)?;
        let api_url = parse_api_url(&cli.api_url)?;

        Ok(Self {
            handle,
            token,
            policy: EmitPolicy {
                show_all: cli.all,
                include_source: cli.source,
            },
            json: cli.json,
            page_delay: Duration::from_millis(cli.delay_ms),
            request_timeout: Duration::from_secs(cli.timeout),
            deadline: cli.deadline.map(Duration::from_secs),
            api_url,
        })
    }

    pub fn graphql_url(&self) -> Url {
        endpoint(&self.api_url, &["graphql"])
    }

    pub fn deadline_from(&self, start: Instant) -> Option<Instant> {
        self.deadline.map(|d| start + d)
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("expected an http(s) URL".into()));
    }
    Ok(url)
}
