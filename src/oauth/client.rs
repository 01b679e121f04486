use tracing::{debug, instrument};

use crate::{
    client::Credentials,
    error::{Error, Result},
    http,
    oauth::{AccessToken, TokenResponse},
};

/// Fetches access tokens from an OAuth2 token endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: http::Client,
}

impl Client {
    /// The HTTP client's base URL is the token endpoint itself.
    pub(crate) fn new(http_client: http::Client) -> Self {
        Self { http_client }
    }

    /// Exchange the refresh token in `credentials` for a fresh access token.
    ///
    /// # Errors
    /// [`Error::Auth`] with the response body if the endpoint rejects the
    /// grant. Also if it cannot be reached, or if the reply is not JSON or has
    /// no `access_token`.
    #[instrument(skip(self, credentials))]
    pub async fn fetch_access_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let fields = vec![
            ("client_id", credentials.client_id().to_string()),
            ("client_secret", credentials.client_secret().to_string()),
            ("refresh_token", credentials.refresh_token().to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let res = self
            .http_client
            .post_form("", fields)
            .await
            .map_err(|e| Error::Auth(e.to_string()))?
            .check_error()
            .await
            .map_err(|e| Error::Auth(e.body))?;

        let token: TokenResponse = res.json().await.map_err(|e| Error::Auth(e.to_string()))?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(expires_in = ?token.expires_in, "fetched access token");
                Ok(AccessToken::new(access_token))
            }
            _ => Err(Error::Auth(
                "token response did not contain an access_token".to_string(),
            )),
        }
    }
}
