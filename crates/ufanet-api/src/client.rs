// Ufanet API HTTP client
//
// Wraps `reqwest::Client` with the token lifecycle: password login,
// refresh-token exchange, and a bearer-authenticated request helper with
// one-shot recovery on 401/403. Endpoint surfaces (intercoms, cctv) are
// implemented as inherent methods in separate files to keep this module
// focused on transport and token mechanics.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::token::{Credentials, TokenSink, TokenState, TokenUpdate, jwt_expiry};
use crate::transport::TransportConfig;

/// Wire shape of `POST api/v1/auth/auth_by_contract/`.
#[derive(serde::Deserialize)]
struct LoginResponse {
    token: TokenGrant,
}

/// The nested token object of a login response. `exp` is the refresh
/// token's expiry as unix seconds; access-token expiry lives inside the
/// JWT itself.
#[derive(serde::Deserialize)]
struct TokenGrant {
    access: String,
    refresh: String,
    exp: Option<i64>,
}

/// Wire shape of `POST api/v1/auth/refresh/`. Refresh-token rotation is
/// optional -- absent fields keep the current values.
#[derive(serde::Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: Option<String>,
    exp: Option<i64>,
}

/// HTTP client for the Ufanet intercom/CCTV API.
///
/// Produces a valid bearer token on demand ([`Self::ensure_valid_access_token`]),
/// recovers from a rejected token exactly once per call (refresh first,
/// then password login), and reports every token change through the
/// optional token sink. Built for sequential use: callers serialize
/// operations on one instance.
pub struct UfanetClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    /// In-memory token material. A std lock suffices because operations
    /// run to completion one at a time; the guard is never held across
    /// an await point.
    token: RwLock<TokenState>,
    on_token_update: Option<TokenSink>,
}

impl UfanetClient {
    /// Create a client from credentials and transport settings.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        let token = TokenState {
            access: None,
            access_expires_at: None,
            refresh: credentials.refresh_token.clone(),
            refresh_expires_at: credentials.refresh_expires_at,
        };
        Self {
            http,
            base_url,
            credentials,
            token: RwLock::new(token),
            on_token_update: None,
        }
    }

    /// Install the host persistence callback. It runs synchronously with
    /// the new token material after every successful login or refresh;
    /// an error from the callback fails the triggering call.
    #[must_use]
    pub fn with_token_sink(mut self, sink: TokenSink) -> Self {
        self.on_token_update = Some(sink);
        self
    }

    /// The contract number this client authenticates as.
    pub fn contract(&self) -> &str {
        &self.credentials.contract
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for calls that authenticate outside
    /// the bearer header, e.g. camera snapshots).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Drop the current access token so the next call re-authenticates.
    pub fn invalidate_access_token(&self) {
        let mut state = self.token.write().expect("token lock poisoned");
        state.access = None;
        state.access_expires_at = None;
    }

    // ── Token lifecycle ──────────────────────────────────────────────

    /// Return a usable bearer token, logging in or refreshing first if
    /// necessary. Refresh is always preferred over a full password login
    /// when a refresh token is present and not known-expired; a refresh
    /// token already past its recorded expiry is skipped outright.
    pub async fn ensure_valid_access_token(&self) -> Result<String, Error> {
        let now = Utc::now();
        let try_refresh = {
            let state = self.token.read().expect("token lock poisoned");
            if state.access_usable(now) {
                if let Some(access) = &state.access {
                    return Ok(access.clone());
                }
            }
            state.refresh_usable(now)
        };

        if try_refresh {
            match self.refresh_access_token().await {
                Ok(access) => return Ok(access),
                Err(err) if err.is_auth_expired() => {
                    debug!("refresh token rejected, falling back to password login");
                }
                // Transport and server errors surface immediately.
                Err(err) => return Err(err),
            }
        }

        if self.credentials.password.is_some() {
            return self.login().await;
        }

        Err(Error::RefreshTokenExpired)
    }

    /// Full password login: obtains a fresh access/refresh pair.
    async fn login(&self) -> Result<String, Error> {
        let Some(password) = &self.credentials.password else {
            return Err(Error::RefreshTokenExpired);
        };

        let url = self.base_url.join("api/v1/auth/auth_by_contract/")?;
        debug!("logging in at {}", url);

        let body = json!({
            "contract": self.credentials.contract,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if is_credential_rejection(status) {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::InvalidCredentials { message });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: LoginResponse = parse_json(&body)?;
        let grant = parsed.token;

        debug!("login successful");
        self.store_tokens(grant.access, Some(grant.refresh), grant.exp)
    }

    /// Exchange the refresh token for a new access token (and possibly a
    /// rotated refresh token).
    async fn refresh_access_token(&self) -> Result<String, Error> {
        let refresh = {
            let state = self.token.read().expect("token lock poisoned");
            state.refresh.clone().ok_or(Error::RefreshTokenExpired)?
        };

        let url = self.base_url.join("api/v1/auth/refresh/")?;
        debug!("refreshing access token at {}", url);

        let resp = self
            .http
            .post(url)
            .json(&json!({ "token": refresh }))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if is_credential_rejection(status) {
            return Err(Error::RefreshTokenExpired);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: RefreshResponse = parse_json(&body)?;

        trace!("access token refreshed");
        self.store_tokens(parsed.access, parsed.refresh, parsed.exp)
    }

    /// Record a new token pair and notify the host sink.
    ///
    /// `refresh`/`refresh_exp_secs` of `None` keep the current values
    /// (the refresh endpoint may skip rotation). The sink runs before
    /// this returns, so the host observes every change in order.
    fn store_tokens(
        &self,
        access: String,
        refresh: Option<String>,
        refresh_exp_secs: Option<i64>,
    ) -> Result<String, Error> {
        let update = {
            let mut state = self.token.write().expect("token lock poisoned");
            state.access_expires_at = jwt_expiry(&access);
            state.access = Some(access.clone());
            if let Some(refresh) = refresh {
                state.refresh = Some(refresh);
            }
            if let Some(secs) = refresh_exp_secs {
                state.refresh_expires_at = DateTime::from_timestamp(secs, 0);
            }
            TokenUpdate {
                access_token: access.clone(),
                refresh_token: state.refresh.clone().unwrap_or_default(),
                refresh_expires_at: state.refresh_expires_at,
            }
        };

        if let Some(sink) = &self.on_token_update {
            sink(&update).map_err(Error::TokenSink)?;
        }
        Ok(access)
    }

    // ── Authenticated requests ───────────────────────────────────────

    /// GET with bearer auth and one-shot 401/403 recovery.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.authenticated_request(Method::GET, path, None).await
    }

    /// Issue one authenticated call. On 401/403 the access token is
    /// dropped, the refresh/relogin flow runs once more, and the call is
    /// retried exactly once; a second rejection surfaces as
    /// [`Error::TokenRejected`].
    pub async fn authenticated_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        let access = self.ensure_valid_access_token().await?;

        let resp = self.send(method.clone(), url.clone(), body, &access).await?;
        if !is_token_rejection(resp.status()) {
            return parse_response(resp).await;
        }

        debug!(
            "access token rejected (HTTP {}), re-authenticating once",
            resp.status()
        );
        self.invalidate_access_token();
        let access = self.ensure_valid_access_token().await?;

        let retry = self.send(method, url, body, &access).await?;
        if is_token_rejection(retry.status()) {
            return Err(Error::TokenRejected);
        }
        parse_response(retry).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
        access: &str,
    ) -> Result<reqwest::Response, Error> {
        trace!("{} {}", method, url);
        let mut builder = self.http.request(method, url).bearer_auth(access);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.map_err(Error::Transport)
    }
}

/// 401 and 403 are treated uniformly as "token rejected".
fn is_token_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Auth endpoints additionally reject bad material with 400.
fn is_credential_rejection(status: StatusCode) -> bool {
    is_token_rejection(status) || status == StatusCode::BAD_REQUEST
}

/// Map a non-auth response to its JSON payload or an [`Error::Api`].
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    let body = resp.text().await.map_err(Error::Transport)?;
    parse_json(&body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        // Truncate by characters, not bytes: vendor error pages carry
        // Cyrillic text and a byte slice could split a code point.
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}
