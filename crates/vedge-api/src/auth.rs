// Token authentication
//
// `GET /api/auth` with basic credentials opens a session and returns the
// token in the `x-auth-token` header. The token then rides on every request
// until `GET /api/auth/logout` releases it.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{BrokerClient, TOKEN_HEADER};
use crate::error::Error;

impl BrokerClient {
    /// Authenticate with username/password and store the session token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("auth")?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .get(url)
            .basic_auth(username, Some(password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Only a credential rejection is worth another login attempt.
            return Err(match status.as_u16() {
                401 | 403 => Error::Authentication {
                    message: format!("login failed (HTTP {status}): {body}"),
                },
                code => Error::Api {
                    status: code,
                    message: format!("login failed: {body}"),
                },
            });
        }

        let token = resp
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| Error::Authentication {
                message: "login response carried no session token".into(),
            })?;

        self.set_token(Some(token));
        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// The token is dropped locally even when the device rejects the
    /// request, so a failed logout never leaves a stale token behind.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Ok(());
        }

        let url = self.api_url("auth/logout")?;
        debug!("logging out at {}", url);
        let result = self.get::<serde_json::Value>(url).await.map(|_| ());
        self.set_token(None);

        match result {
            // An empty or non-JSON logout body is still a successful logout.
            Ok(()) | Err(Error::Deserialization { .. }) => {
                debug!("logout complete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
