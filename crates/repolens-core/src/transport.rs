//! The single HTTP call primitive shared by every provider adapter.
//!
//! One GET per operation: no retries, no backoff, no timeout beyond the
//! HTTP client's defaults. Adapters apply their host-to-neutral mappers to
//! whatever comes back.

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));

/// Options applied to every call made through one [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Auth token included on every request unless overridden per call.
    /// Absent token means anonymous calls, subject to host rate limits.
    pub token: Option<String>,
    /// Default query parameters merged into every request.
    pub qp: Vec<(String, String)>,
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Token for this request only; takes precedence over the global token.
    pub token: Option<String>,
    /// Query parameters, serialized onto the URL.
    pub qp: Vec<(String, String)>,
    /// Extra headers merged into the request.
    pub headers: Vec<(String, String)>,
    /// Prelude for the error message should the call fail.
    pub err_text: Option<String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_qp(mut self, qp: Vec<(String, String)>) -> Self {
        self.qp = qp;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_err_text(mut self, err_text: impl Into<String>) -> Self {
        self.err_text = Some(err_text.into());
        self
    }
}

/// HTTP transport bound to one client and one set of global options.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    /// Whether any token (global or default) is configured.
    pub fn has_token(&self) -> bool {
        self.config.token.is_some()
    }

    /// GET `url` and decode the JSON body into `T`. List responses are a
    /// matter of the target type (`T = Vec<...>`).
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<T> {
        let (final_url, body) = self.send(url, options).await?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: final_url,
            source,
        })
    }

    /// GET `url` and return the raw body text.
    pub async fn get_text(&self, url: &str, options: &FetchOptions) -> Result<String> {
        let (_, body) = self.send(url, options).await?;
        Ok(body)
    }

    async fn send(&self, url: &str, options: &FetchOptions) -> Result<(String, String)> {
        let token = options.token.as_deref().or(self.config.token.as_deref());

        let mut request = self.client.get(url);
        let qp: Vec<(&str, &str)> = self
            .config
            .qp
            .iter()
            .chain(options.qp.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if !qp.is_empty() {
            request = request.query(&qp);
        }
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        debug!("GET {} -> {}", final_url, status.as_u16());

        if status.is_success() {
            let body = response.text().await?;
            return Ok((final_url, body));
        }

        let mut message = options
            .err_text
            .clone()
            .unwrap_or_else(|| "problems making API call".to_string());
        if status == StatusCode::FORBIDDEN {
            message.push('\n');
            message.push_str(&rate_limit_hint(token));
        }

        Err(Error::Transport {
            status: status.as_u16(),
            url: final_url,
            message,
        })
    }
}

/// States whether a token was in play so a 403 can be read as anonymous
/// versus authenticated rate limiting.
fn rate_limit_hint(token: Option<&str>) -> String {
    match token {
        Some(token) => {
            let tail: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!(
                "the 403 occurred despite an access token being supplied (ending in {tail})"
            )
        }
        None => "no access token was supplied to the provider; anonymous rate limits apply"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_names_token_tail_when_present() {
        let hint = rate_limit_hint(Some("ghp_0123456789abcd"));
        assert!(hint.contains("ending in abcd"));
    }

    #[test]
    fn hint_flags_anonymous_calls() {
        let hint = rate_limit_hint(None);
        assert!(hint.contains("no access token"));
    }

    #[test]
    fn fetch_options_accumulate() {
        let options = FetchOptions::new()
            .with_qp(vec![("page".into(), "2".into())])
            .with_header("Accept", "application/vnd.github+json")
            .with_err_text("problems listing commits");
        assert_eq!(options.qp.len(), 1);
        assert_eq!(options.headers[0].0, "Accept");
        assert_eq!(options.err_text.as_deref(), Some("problems listing commits"));
    }
}
