// Broker REST client
//
// Wraps `reqwest::Client` with URL construction, session-token injection
// and status mapping. Endpoint groups (ports, filters, cluster) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Header carrying the session token on every authenticated request.
pub(crate) const AUTH_HEADER: &str = "Authentication";
/// Response header in which the login endpoint returns the token.
pub(crate) const TOKEN_HEADER: &str = "x-auth-token";

/// Raw HTTP client for the packet broker's REST API.
///
/// One instance corresponds to one device session: [`login`](Self::login)
/// stores the session token, [`logout`](Self::logout) releases it.
pub struct BrokerClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl BrokerClient {
    /// Create a client for the device at `base_url` from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── Token management ─────────────────────────────────────────────

    pub(crate) fn set_token(&self, token: Option<String>) {
        trace!(present = token.is_some(), "storing session token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_deref() {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Build `{base}/api/{collection}/{key}`, percent-encoding the key.
    pub(crate) fn resource_url(&self, collection: &str, key: &str) -> Result<Url, Error> {
        let mut url = self.api_url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(key);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.apply_token(self.http.get(url)).send().await?;
        let body = self.check_status(resp).await?;
        decode(&body)
    }

    /// Send a PUT request with a JSON body, ignoring any response payload.
    pub(crate) async fn put(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self.apply_token(self.http.put(url).json(body)).send().await?;
        self.check_status(resp).await?;
        Ok(())
    }

    /// Send a POST request with a JSON body and return the (possibly empty)
    /// response payload as a JSON value.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<serde_json::Value, Error> {
        debug!("POST {}", url);
        let resp = self.apply_token(self.http.post(url).json(body)).send().await?;
        let body = self.check_status(resp).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        decode(&body)
    }

    /// Send a DELETE request.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.apply_token(self.http.delete(url)).send().await?;
        self.check_status(resp).await?;
        Ok(())
    }

    /// Map non-success statuses onto the error taxonomy and return the body.
    ///
    /// 401 on a regular request is the auth-expired signal the session
    /// gateway reacts to.
    async fn check_status(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let path = resp.url().path().to_owned();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Forbidden {
                message: preview(&body).to_owned(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { path });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        Ok(resp.text().await?)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
