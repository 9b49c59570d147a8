use {
    crate::{
        api::{
            error::{SentryError, SentryResult},
            response::{ApiResponse, ResponseMeta},
        },
        project_keys::ProjectKeysService,
    },
    once_cell::sync::Lazy,
    reqwest::{
        header::{self, HeaderValue},
        IntoUrl, Method, RequestBuilder,
    },
    serde::{de::DeserializeOwned, Deserialize},
    std::time::Duration,
    url::Url,
};

static DEFAULT_BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://sentry.io/api/").expect("Invalid default base URL"));
const INVALID_TOKEN_ERROR: &str = "invalid auth token";
const INVALID_BASE_URL_ERROR: &str = "base URL cannot have path segments";
const INVALID_PATH_SEGMENT_ERROR: &str = "path segment must not be empty, `.` or `..`";
const USER_AGENT: &str = concat!("sentry-project-keys-rs/", env!("CARGO_PKG_VERSION"));

/// Connection settings of the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// How long an unused pooled connection stays open. `None` keeps idle
    /// connections until the server closes them.
    pub pool_idle_timeout: Option<Duration>,

    /// Upper bound of idle connections kept per host.
    pub pool_max_idle: usize,

    /// Deadline for connecting and for reading a whole response. `None`
    /// waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        // Same as a plain `reqwest::Client`.
        Self {
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle: usize::MAX,
            timeout: None,
        }
    }
}

/// Authenticated client for the Sentry web API.
///
/// Holds no per-call state. Resource services such as
/// [`ProjectKeysService`] are cheap views on top of it.
#[derive(Debug, Clone)]
pub struct SentryHttpClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl SentryHttpClient {
    /// Creates a client for `https://sentry.io/api/`.
    pub fn new(auth_token: &str) -> SentryResult<Self> {
        Self::with_config(None::<&str>, auth_token, Default::default())
    }

    /// Creates a client for a custom (e.g. self-hosted) API root such as
    /// `https://sentry.example.com/api/`.
    pub fn with_config(
        base_url: Option<impl IntoUrl>,
        auth_token: &str,
        config: HttpClientConfig,
    ) -> SentryResult<Self> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {auth_token}"))
            .map_err(|_| SentryError::Config(INVALID_TOKEN_ERROR))?;

        // Make sure we're not leaking auth token in debug output.
        auth_value.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth_value);

        let mut http_client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle);

        if let Some(timeout) = config.timeout {
            http_client = http_client.connect_timeout(timeout).timeout(timeout);
        }

        let base_url = match base_url {
            Some(url) => url.into_url().map_err(SentryError::BaseUrlIntoUrl)?,
            None => DEFAULT_BASE_URL.clone(),
        };

        if base_url.cannot_be_a_base() {
            return Err(SentryError::Config(INVALID_BASE_URL_ERROR));
        }

        Ok(Self {
            base_url,
            http_client: http_client.build().map_err(SentryError::BuildClient)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn project_keys(&self) -> ProjectKeysService {
        ProjectKeysService::new(self.clone())
    }

    /// Resolves `segments` against the base URL. Every segment is
    /// percent-encoded and the result always ends with `/`. Empty, `.` and
    /// `..` segments are rejected since they would address another resource.
    pub(crate) fn endpoint<I>(&self, segments: I) -> SentryResult<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        build_endpoint_url(&self.base_url, segments)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "sending sentry api request");
        self.http_client.request(method, url)
    }

    /// Sends the request and decodes a JSON body from a 2xx response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> SentryResult<ApiResponse<T>> {
        let resp = send(req).await?;
        let meta = ResponseMeta::from_response(&resp);
        let body = resp.bytes().await.map_err(SentryError::Transport)?;
        let data = serde_json::from_slice(&body).map_err(SentryError::ResponseJsonParse)?;

        Ok(ApiResponse { data, meta })
    }

    /// Sends the request and discards the body of a 2xx response.
    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> SentryResult<ResponseMeta> {
        let resp = send(req).await?;
        Ok(ResponseMeta::from_response(&resp))
    }
}

fn build_endpoint_url<I>(base_url: &Url, segments: I) -> SentryResult<Url>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let segments: Vec<I::Item> = segments.into_iter().collect();
    if segments
        .iter()
        .any(|segment| matches!(segment.as_ref(), "" | "." | ".."))
    {
        return Err(SentryError::Config(INVALID_PATH_SEGMENT_ERROR));
    }

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| SentryError::Config(INVALID_BASE_URL_ERROR))?
        .pop_if_empty()
        .extend(segments)
        .push("");
    Ok(url)
}

async fn send(req: RequestBuilder) -> SentryResult<reqwest::Response> {
    let resp = req.send().await.map_err(SentryError::Transport)?;
    let status = resp.status();
    tracing::debug!(%status, url = %resp.url(), "received sentry api response");

    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.map_err(SentryError::Transport)?;
    let detail = parse_error_detail(&body);
    tracing::warn!(%status, %detail, "sentry api request failed");

    Err(SentryError::Api { status, detail })
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Sentry reports failures as `{"detail": "..."}`. Anything else is returned
/// verbatim.
fn parse_error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|err| err.detail)
        .unwrap_or_else(|_| body.to_owned())
}

#[cfg(test)]
mod test {
    use {
        super::*,
        reqwest::StatusCode,
        wiremock::{
            matchers::{header, method, path},
            Mock, MockServer, ResponseTemplate,
        },
    };

    #[test]
    fn test_default_base_url() {
        let client = SentryHttpClient::new("token").unwrap();
        let url = client.endpoint(["0", "projects"]).unwrap();
        assert_eq!(url.as_str(), "https://sentry.io/api/0/projects/");
    }

    #[test]
    fn test_build_endpoint_url() {
        let base_url = Url::parse("http://example.com/api/").unwrap();

        let url = build_endpoint_url(&base_url, ["0", "projects", "org", "proj", "keys"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/0/projects/org/proj/keys/");
    }

    #[test]
    fn test_build_endpoint_url_without_trailing_slash() {
        let base_url = Url::parse("http://example.com/api").unwrap();
        let url = build_endpoint_url(&base_url, ["0", "projects"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/0/projects/");

        let base_url = Url::parse("http://example.com").unwrap();
        let url = build_endpoint_url(&base_url, ["0", "projects"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/0/projects/");
    }

    #[test]
    fn test_build_endpoint_url_encodes_segments() {
        let base_url = Url::parse("http://example.com/api/").unwrap();

        let url = build_endpoint_url(&base_url, ["0", "projects", "my org", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/0/projects/my%20org/a%2Fb/");
    }

    #[test]
    fn test_build_endpoint_url_rejects_dot_segments() {
        let base_url = Url::parse("http://example.com/api/").unwrap();

        for segment in ["", ".", ".."] {
            let result = build_endpoint_url(&base_url, ["0", "projects", segment, "proj", "keys"]);
            assert!(matches!(
                result,
                Err(SentryError::Config(INVALID_PATH_SEGMENT_ERROR))
            ));
        }

        // Only whole dot segments are special.
        let url = build_endpoint_url(&base_url, ["0", "projects", "...", ".org", "%2E%2E"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/0/projects/.../.org/%252E%252E/");
    }

    #[test]
    fn invalid_auth_token() {
        let result = SentryHttpClient::new("bad\ntoken");
        assert!(matches!(
            result,
            Err(SentryError::Config(INVALID_TOKEN_ERROR))
        ));
    }

    #[test]
    fn invalid_base_url() {
        let result = SentryHttpClient::with_config(
            Some("mailto:someone@example.com"),
            "token",
            Default::default(),
        );
        assert!(matches!(result, Err(SentryError::BaseUrlIntoUrl(_))));
    }

    #[test]
    fn test_parse_error_detail() {
        assert_eq!(
            parse_error_detail(r#"{"detail": "You do not have permission to perform this action."}"#),
            "You do not have permission to perform this action."
        );
        assert_eq!(parse_error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(parse_error_detail(""), "");
    }

    #[tokio::test]
    async fn sends_auth_and_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/0/ping/"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SentryHttpClient::with_config(
            Some(format!("{}/api/", mock_server.uri())),
            "secret-token",
            Default::default(),
        )
        .unwrap();

        let url = client.endpoint(["0", "ping"]).unwrap();
        let response: ApiResponse<Vec<String>> = client
            .send_json(client.request(Method::GET, url))
            .await
            .unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.meta.status, StatusCode::OK);
    }

    #[test]
    fn auth_token_is_not_leaked_in_debug_output() {
        let client = SentryHttpClient::new("super-secret-token").unwrap();
        assert!(!format!("{client:?}").contains("super-secret-token"));
    }

    #[tokio::test]
    async fn unreachable_host() {
        let client = SentryHttpClient::with_config(
            Some("http://127.0.0.1:1/api/"),
            "token",
            Default::default(),
        )
        .unwrap();

        let url = client.endpoint(["0", "ping"]).unwrap();
        let result = client.send_empty(client.request(Method::GET, url)).await;
        assert!(matches!(result, Err(SentryError::Transport(_))));
    }
}
