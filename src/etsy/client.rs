// Etsy Open API v3 client — authenticated JSON GETs over HTTPS.
//
// Every request carries the app's API key in the `x-api-key` header, goes
// through the shared request throttle, and is retried on transient failures.
// Non-success statuses are mapped onto FetchError kinds here so the rest of
// the crate never looks at raw status codes.

use std::time::Duration;

use anyhow::Context;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::FetchError;
use super::rate_limit::{with_retry, RequestThrottle, RetryPolicy};
use crate::output::truncate_chars;

/// Default Etsy Open API v3 endpoint.
pub const DEFAULT_API_URL: &str = "https://openapi.etsy.com/v3/application";

/// Per-request timeout. Listing pages with long descriptions can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Etsy Open API.
///
/// Cheap to share by reference across concurrent shop analyses: the
/// underlying reqwest client pools connections and the throttle is shared.
pub struct EtsyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    throttle: RequestThrottle,
    retry: RetryPolicy,
}

impl EtsyClient {
    /// Create a client for the given base URL and API key.
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shopwords/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            throttle: RequestThrottle::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy (e.g. shorter backoff against a local server).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL for an API path such as `shops/123/listings/active`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON resource on behalf of `shop`, retrying transient failures.
    ///
    /// `shop` is only used to label a 404 as `ShopNotFound`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        shop: &str,
    ) -> Result<T, FetchError> {
        with_retry(&self.throttle, &self.retry, || {
            self.get_json_once(path, params, shop)
        })
        .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        shop: &str,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);

        debug!(path = path, shop = shop, "Etsy GET request");

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(error_for_status(status, shop, &body, retry_after));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::malformed(format!("{path}: {e}")))
    }
}

/// Map a reqwest transport failure onto a FetchError.
fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_decode() {
        FetchError::malformed(err)
    } else {
        FetchError::network(err)
    }
}

/// Map a non-success HTTP status onto a FetchError.
pub fn error_for_status(
    status: StatusCode,
    shop: &str,
    body: &str,
    retry_after: Option<Duration>,
) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::ShopNotFound {
            shop: shop.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth {
            status: status.as_u16(),
            message: error_message(body),
        },
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        s if s.is_server_error() => FetchError::Network {
            message: format!("server returned {s}: {}", error_message(body)),
        },
        s => FetchError::MalformedResponse {
            message: format!("unexpected status {s}: {}", error_message(body)),
        },
    }
}

/// Etsy error bodies look like `{"error": "..."}`; fall back to raw text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => truncate_chars(body.trim(), 200),
    }
}

/// Parse a Retry-After header given in whole seconds.
///
/// The HTTP-date form is not used by Etsy and is ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
