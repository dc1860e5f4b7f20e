use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use nodry_config::ClientConfig;
use nodry_config::constants::{DEFAULT_MAX_ATTACHMENT_MB, DEFAULT_TIMEOUT_SECS};
use nodry_model::{AccessToken, Credentials, RefreshRequest, TokenPair};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{
    ClientError, ClientResult, RefreshFailure, extract_error_message,
    status_message,
};
use crate::request::{Auth, Payload, RequestOptions};
use crate::session::{FileSessionStore, Session, SessionStore};
use crate::single_flight::SingleFlight;

pub(crate) const LOGIN_ENDPOINT: &str = "/token/";
pub(crate) const REFRESH_ENDPOINT: &str = "/token/refresh/";

type RefreshOutcome = Result<String, RefreshFailure>;

/// Construction knobs that do not come from the base URL itself
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub max_attachment_bytes: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_MB * 1024 * 1024,
        }
    }
}

impl From<&ClientConfig> for ClientOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
            accept_invalid_certs: config.api.accept_invalid_certs,
            max_attachment_bytes: config.max_attachment_bytes(),
        }
    }
}

/// API client with bearer-token authentication and transparent refresh
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
    session: Arc<RwLock<Session>>,
    store: Arc<dyn SessionStore>,
    refresh_flight: Arc<SingleFlight<RefreshOutcome>>,
    max_attachment_bytes: u64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .session
                    .try_read()
                    .map(|s| s.is_authenticated())
                    .unwrap_or(false),
            )
            .field("store", &self.store)
            .finish()
    }
}

impl ApiClient {
    /// Create a client with default options, restoring any persisted session.
    pub async fn new(
        base_url: &str,
        store: Arc<dyn SessionStore>,
    ) -> ClientResult<Self> {
        Self::with_options(base_url, store, ClientOptions::default()).await
    }

    pub async fn with_options(
        base_url: &str,
        store: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> ClientResult<Self> {
        let base_url = nodry_config::normalize_base_url(base_url)
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let http = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| {
                ClientError::Config(format!("failed to create HTTP client: {e}"))
            })?;

        let session = store.load().await?;
        info!(
            "[ApiClient] Creating API client for {} (session restored: {})",
            base_url,
            session.is_authenticated()
        );

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            session: Arc::new(RwLock::new(session)),
            store,
            refresh_flight: Arc::new(SingleFlight::new()),
            max_attachment_bytes: options.max_attachment_bytes,
        })
    }

    /// Build a client from loaded configuration, persisting the session to
    /// the configured file.
    pub async fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let store = Arc::new(FileSessionStore::new(config.session_path()));
        Self::with_options(config.base_url(), store, config.into()).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_attachment_bytes(&self) -> u64 {
        self.max_attachment_bytes
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Current access token, if any
    pub async fn access_token(&self) -> Option<String> {
        self.session.read().await.access_token().map(str::to_owned)
    }

    /// Exchange credentials for a token pair and persist it.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<TokenPair> {
        let credentials = Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let options = RequestOptions::post(&credentials)?.anonymous();
        let pair: TokenPair = self
            .request(LOGIN_ENDPOINT, options)
            .await
            .map_err(|err| match err {
                ClientError::Http { message, .. } => {
                    ClientError::Authentication(message)
                }
                other => other,
            })?;

        let snapshot = {
            let mut session = self.session.write().await;
            *session = Session::new(&pair.access, &pair.refresh);
            session.clone()
        };
        self.store.save(&snapshot).await?;
        info!("[ApiClient] Logged in as {}", credentials.username);
        Ok(pair)
    }

    /// Drop both tokens from memory and from the store.
    pub async fn logout(&self) -> ClientResult<()> {
        self.session.write().await.clear();
        self.store.clear().await?;
        info!("[ApiClient] Session cleared");
        Ok(())
    }

    /// Refresh the access token explicitly. Shares any refresh already in
    /// flight.
    pub async fn refresh_access_token(&self) -> ClientResult<()> {
        let current = self.access_token().await;
        match self.shared_refresh(current).await {
            Ok(_) => Ok(()),
            Err(failure) => Err(self.refresh_failed(failure).await),
        }
    }

    /// Send a request and decode its JSON body.
    ///
    /// An empty body (204 No Content) decodes as JSON `null`, so `()` and
    /// `Option<_>` targets accept it.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let response = self.send(endpoint, &options).await?;
        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Send a request and return the raw response body.
    pub async fn request_bytes(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<Vec<u8>> {
        let response = self.send(endpoint, &options).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Send a request whose body, if any, is ignored.
    pub async fn request_empty(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<()> {
        self.send(endpoint, &options).await?;
        Ok(())
    }

    async fn send(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> ClientResult<Response> {
        let sent_token = match options.auth {
            Auth::Session => self.access_token().await,
            Auth::Anonymous => None,
        };

        let response =
            self.dispatch(endpoint, options, sent_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED
            || options.auth == Auth::Anonymous
            || !is_refreshable(endpoint)
        {
            return Self::check(response).await;
        }

        info!("[ApiClient] Unauthorized for {}, refreshing token", endpoint);
        let token = match self.shared_refresh(sent_token).await {
            Ok(token) => token,
            Err(failure) => return Err(self.refresh_failed(failure).await),
        };

        let retry = self.dispatch(endpoint, options, Some(&token)).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(
                "[ApiClient] Still unauthorized after refresh for {}",
                endpoint
            );
            self.clear_session().await;
            return Err(ClientError::SessionExpired);
        }
        Self::check(retry).await
    }

    async fn dispatch(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> ClientResult<Response> {
        let url = self.build_url(endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !options.payload.is_multipart() {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self
            .http
            .request(options.method.clone(), &url)
            .headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match &options.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart(parts) => {
                builder.multipart(Payload::to_form(parts)?)
            }
        };

        debug!("[ApiClient] {} {}", options.method, url);
        Ok(builder.send().await?)
    }

    async fn check(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn error_from_response(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let message = match response.bytes().await {
            Ok(body) => serde_json::from_slice(&body)
                .ok()
                .and_then(|value| extract_error_message(&value)),
            Err(_) => None,
        }
        .unwrap_or_else(|| status_message(status));
        warn!("[ApiClient] {} failed ({}): {}", url, status, message);
        ClientError::Http { status, message }
    }

    /// Join the refresh in flight or start one. `stale` is the access token
    /// the backend rejected.
    async fn shared_refresh(&self, stale: Option<String>) -> RefreshOutcome {
        let client = self.clone();
        self.refresh_flight
            .run(move || async move { client.perform_token_refresh(stale).await })
            .await
    }

    async fn perform_token_refresh(
        &self,
        stale: Option<String>,
    ) -> RefreshOutcome {
        let refresh = {
            let session = self.session.read().await;
            // Rotated by a refresh that settled after the rejected request
            // was sent.
            if let Some(current) = session.access_token()
                && stale.as_deref() != Some(current)
            {
                debug!("[ApiClient] Token already rotated, reusing it");
                return Ok(current.to_owned());
            }
            session
                .refresh_token()
                .map(str::to_owned)
                .ok_or(RefreshFailure::MissingRefreshToken)?
        };

        let response = self
            .http
            .post(self.build_url(REFRESH_ENDPOINT))
            .json(&RefreshRequest { refresh })
            .send()
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshFailure::Rejected {
                status: status.as_u16(),
            });
        }

        let AccessToken { access } = response
            .json()
            .await
            .map_err(|e| RefreshFailure::Decode(e.to_string()))?;

        let snapshot = {
            let mut session = self.session.write().await;
            session.set_access_token(&access);
            session.clone()
        };
        if let Err(e) = self.store.save(&snapshot).await {
            warn!("[ApiClient] Refreshed token not persisted: {}", e);
        }
        info!("[ApiClient] Access token refreshed");
        Ok(access)
    }

    async fn refresh_failed(&self, failure: RefreshFailure) -> ClientError {
        warn!("[ApiClient] Token refresh failed: {}", failure);
        if failure.requires_login() {
            self.clear_session().await;
            ClientError::SessionExpired
        } else {
            ClientError::Refresh(failure)
        }
    }

    async fn clear_session(&self) {
        self.session.write().await.clear();
        if let Err(e) = self.store.clear().await {
            warn!("[ApiClient] Failed to clear persisted session: {}", e);
        }
    }
}

fn is_refreshable(endpoint: &str) -> bool {
    let path = endpoint.split('?').next().unwrap_or(endpoint);
    path != LOGIN_ENDPOINT && path != REFRESH_ENDPOINT
}
