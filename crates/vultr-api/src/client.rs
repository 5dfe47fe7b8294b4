use crate::errors::{ApiError, HttpError, Result};
use log::{debug, error, trace};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use url::Url;
use vultr_core::DecodeError;

/// Official endpoint of the v1 API
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com/v1/";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "VULTR_API_KEY";

/// Request parameters: query pairs for GET, form fields for POST
pub type Params = Vec<(&'static str, String)>;

/// Trait for providing configuration to the API client
/// This allows the CLI to supply its config without circular dependencies
pub trait ApiConfig {
    type Error;

    /// Get the API key for authentication
    fn get_api_key(&self) -> std::result::Result<String, Self::Error>;

    /// Get the base URL for the API (optional, defaults to the official API)
    fn get_base_url(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// HTTP client for the Vultr API
#[derive(Debug, Clone)]
pub struct VultrApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl VultrApiClient {
    /// Create a new API client
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        debug!("Creating VultrApiClient");
        debug!("  API Key: {}", mask_key(&api_key));
        debug!("  Base URL: {}", base_url);

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
        })
    }

    /// Create API client from the `VULTR_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        debug!("Creating VultrApiClient from environment variable");
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            error!("{} environment variable not set", API_KEY_ENV);
            ApiError::Config(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        Self::new(api_key, None)
    }

    /// Create API client from any configuration implementing ApiConfig
    pub fn from_config<C>(config: &C) -> std::result::Result<Self, C::Error>
    where
        C: ApiConfig,
        C::Error: From<ApiError>,
    {
        debug!("Creating VultrApiClient from config");
        let api_key = config.get_api_key()?;
        let base_url = config.get_base_url()?;

        if let Some(ref url) = base_url {
            debug!("Got custom base URL from config: {}", url);
        } else {
            debug!("Using default base URL");
        }

        Ok(Self::new(api_key, base_url)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `endpoint` with `params` as its query string
    pub fn endpoint_url(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        }

        Ok(url)
    }

    /// Make a GET request
    pub(crate) async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response> {
        let url = self.endpoint_url(endpoint, params)?;

        debug!("HTTP GET request to: {}", url);
        trace!("  API-Key: {}", mask_key(&self.api_key));

        let response = self
            .client
            .get(url)
            .header("API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("GET request failed: {:?}", e);
                HttpError::Request(e)
            })?;

        debug!("Response status: {}", response.status());

        self.handle_response(response).await
    }

    /// Make a POST request with a form-encoded body
    pub(crate) async fn post(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response> {
        let url = self.endpoint_url(endpoint, &[])?;

        debug!("HTTP POST request to: {}", url);
        trace!("  API-Key: {}", mask_key(&self.api_key));
        for (key, value) in params {
            // user data can be large and may hold secrets
            if *key == "userdata" {
                trace!("  form {} = <{} bytes>", key, value.len());
            } else {
                trace!("  form {} = {}", key, value);
            }
        }

        let response = self
            .client
            .post(url)
            .header("API-Key", &self.api_key)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                error!("POST request failed: {:?}", e);
                HttpError::Request(e)
            })?;

        debug!("Response status: {}", response.status());

        self.handle_response(response).await
    }

    /// GET and parse the body as JSON
    pub(crate) async fn get_value(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let response = self.get(endpoint, params).await?;
        read_json(response).await
    }

    /// POST and parse the body as JSON
    pub(crate) async fn post_value(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let response = self.post(endpoint, params).await?;
        read_json(response).await
    }

    /// Handle HTTP response and convert errors
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            debug!("Request successful with status: {}", status);
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        error!("Request failed with status: {}", status);
        debug!("Error response body: {}", error_text);

        Err(ApiError::Http(status_error(status, error_text)))
    }
}

async fn read_json(response: Response) -> Result<Value> {
    let bytes = response.bytes().await.map_err(HttpError::Request)?;
    trace!("Response body: {} bytes", bytes.len());
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(DecodeError::from(e)))
}

/// Map a non-success status to its error
pub fn status_error(status: StatusCode, message: String) -> HttpError {
    match status {
        StatusCode::UNAUTHORIZED => HttpError::AuthenticationFailed,
        StatusCode::FORBIDDEN => HttpError::InvalidApiKey,
        StatusCode::TOO_MANY_REQUESTS => HttpError::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE => HttpError::ServiceUnavailable,
        StatusCode::REQUEST_TIMEOUT => HttpError::Timeout,
        _ => HttpError::HttpError {
            status: status.as_u16(),
            message,
        },
    }
}

/// First and last four characters of a key, for logging
pub fn mask_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticConfig {
        key: Option<&'static str>,
        base_url: Option<&'static str>,
    }

    impl ApiConfig for StaticConfig {
        type Error = ApiError;

        fn get_api_key(&self) -> std::result::Result<String, Self::Error> {
            self.key
                .map(str::to_string)
                .ok_or_else(|| ApiError::Config("no key".to_string()))
        }

        fn get_base_url(&self) -> std::result::Result<Option<String>, Self::Error> {
            Ok(self.base_url.map(str::to_string))
        }
    }

    #[test]
    fn test_endpoint_url() {
        let client = VultrApiClient::new("key".to_string(), None).unwrap();

        let url = client.endpoint_url("server/list", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.vultr.com/v1/server/list");

        let url = client
            .endpoint_url("/server/list", &[("SUBID", "576965".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.vultr.com/v1/server/list?SUBID=576965");

        let url = client
            .endpoint_url("server/list", &[("tag", "web & db".to_string())])
            .unwrap();
        assert_eq!(url.query(), Some("tag=web+%26+db"));
    }

    #[test]
    fn test_custom_base_url() {
        let client =
            VultrApiClient::new("key".to_string(), Some("http://localhost:8080/v1".to_string()))
                .unwrap();
        let url = client.endpoint_url("server/start", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/server/start");

        assert!(matches!(
            VultrApiClient::new("key".to_string(), Some("not a url".to_string())),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = StaticConfig {
            key: Some("ABCDEFGHIJKL"),
            base_url: Some("http://127.0.0.1:9/v1/"),
        };
        let client = VultrApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9/v1/");

        let missing = StaticConfig {
            key: None,
            base_url: None,
        };
        assert!(VultrApiClient::from_config(&missing).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            HttpError::AuthenticationFailed
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            HttpError::InvalidApiKey
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            HttpError::RateLimited
        ));
        match status_error(StatusCode::PRECONDITION_FAILED, "Invalid server".to_string()) {
            HttpError::HttpError { status, message } => {
                assert_eq!(status, 412);
                assert_eq!(message, "Invalid server");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("EXAMPLEKEY1234567890"), "EXAM...7890");
        assert_eq!(mask_key("short"), "****");
    }
}
