//! The top-level client for the directory API.
use std::{env, fmt};

use tracing::instrument;

use crate::{
    error::{Error, Result},
    filter::UsernamePattern,
    http,
    oauth::{self, AccessToken},
    users::{self, DeleteOutcome, User},
};

/// The OAuth2 token endpoint used when none is configured.
pub static TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The directory API base URL used when none is configured.
pub static DIRECTORY_URL: &str = "https://admin.googleapis.com";

/// The OAuth2 client and the refresh token issued to it.
///
/// Built once at startup and handed to the [`Client`]. The secret and the
/// refresh token are redacted from the `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl Credentials {
    pub fn new<I, S, R>(client_id: I, client_secret: S, refresh_token: R) -> Self
    where
        I: Into<String>,
        S: Into<String>,
        R: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// The client is the entrypoint of the whole crate.
///
/// You can create it using [`Client::builder`] or [`Client::new`]. Cloning is
/// cheap, the HTTP connection pools are shared.
///
/// # Examples
/// ```
/// use directory_purge::{Client, Error};
///
/// fn main() -> Result<(), Error> {
///     // Set all available options. Unset options fall back to environment
///     // variables.
///     let client = Client::builder()
///         .with_client_id("1234.apps.googleusercontent.com")
///         .with_client_secret("secret")
///         .with_refresh_token("1//refresh")
///         .build()?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    credentials: Credentials,
    oauth: oauth::Client,
    users: users::Client,
}

impl Client {
    /// Creates a new client from the `GOOGLE_*` environment variables. If you
    /// want to configure it, use [`Client::builder`].
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client using a builder.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Token endpoint operations.
    pub fn oauth(&self) -> &oauth::Client {
        &self.oauth
    }

    /// Directory user operations.
    pub fn users(&self) -> &users::Client {
        &self.users
    }

    /// Fetch a fresh access token. Tokens are not cached, every call hits the
    /// token endpoint.
    ///
    /// # Errors
    /// [`Error::Auth`] if the exchange fails.
    pub async fn access_token(&self) -> Result<AccessToken> {
        self.oauth.fetch_access_token(&self.credentials).await
    }

    /// List every user of the pattern's domain and keep the ones whose
    /// username matches it.
    ///
    /// # Errors
    /// [`Error::Auth`] or [`Error::List`] if an upstream call fails. No
    /// partial result is returned.
    #[instrument(skip(self))]
    pub async fn list_by_username_pattern(&self, pattern: &UsernamePattern) -> Result<Vec<User>> {
        let token = self.access_token().await?;
        let users = self.users.list_all(&token, Some(pattern.domain())).await?;
        Ok(pattern.filter(users))
    }

    /// Delete a single user.
    ///
    /// # Errors
    /// Only if no access token could be obtained. A rejected delete is
    /// reported as [`DeleteOutcome::Failed`].
    #[instrument(skip(self))]
    pub async fn delete_user(&self, email: &str) -> Result<DeleteOutcome> {
        let token = self.access_token().await?;
        Ok(self.users.delete(&token, email).await)
    }
}

/// This builder is used to create a new client.
pub struct Builder {
    env_fallback: bool,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
    token_url: Option<String>,
    directory_url: Option<String>,
}

impl Builder {
    /// Create a new builder.
    fn new() -> Self {
        Self {
            env_fallback: true,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: None,
            directory_url: None,
        }
    }

    /// Don't fall back to environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    /// Set the OAuth2 client ID. If this is not set, it will be read from the
    /// environment variable `GOOGLE_CLIENT_ID`.
    pub fn with_client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth2 client secret. If this is not set, it will be read from
    /// the environment variable `GOOGLE_CLIENT_SECRET`.
    pub fn with_client_secret<S: Into<String>>(mut self, client_secret: S) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the refresh token. If this is not set, it will be read from the
    /// environment variable `GOOGLE_REFRESH_TOKEN`.
    pub fn with_refresh_token<S: Into<String>>(mut self, refresh_token: S) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set all three credentials at once.
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        let Credentials {
            client_id,
            client_secret,
            refresh_token,
        } = credentials;
        self.with_client_id(client_id)
            .with_client_secret(client_secret)
            .with_refresh_token(refresh_token)
    }

    /// Override the token endpoint (`GOOGLE_TOKEN_URL`). Mostly useful for
    /// testing.
    #[doc(hidden)]
    pub fn with_token_url<S: Into<String>>(mut self, url: S) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Override the directory API base URL (`GOOGLE_DIRECTORY_URL`). Mostly
    /// useful for testing.
    #[doc(hidden)]
    pub fn with_directory_url<S: Into<String>>(mut self, url: S) -> Self {
        self.directory_url = Some(url.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let env_fallback = self.env_fallback;
        let setting = |value: Option<String>, var: &str| {
            let mut value = value.unwrap_or_default();
            if value.is_empty() && env_fallback {
                value = env::var(var).unwrap_or_default();
            }
            value
        };

        let client_id = setting(self.client_id, "GOOGLE_CLIENT_ID");
        if client_id.is_empty() {
            return Err(Error::MissingClientId);
        }
        let client_secret = setting(self.client_secret, "GOOGLE_CLIENT_SECRET");
        if client_secret.is_empty() {
            return Err(Error::MissingClientSecret);
        }
        let refresh_token = setting(self.refresh_token, "GOOGLE_REFRESH_TOKEN");
        if refresh_token.is_empty() {
            return Err(Error::MissingRefreshToken);
        }

        let mut token_url = setting(self.token_url, "GOOGLE_TOKEN_URL");
        if token_url.is_empty() {
            token_url = TOKEN_URL.to_string();
        }
        let mut directory_url = setting(self.directory_url, "GOOGLE_DIRECTORY_URL");
        if directory_url.is_empty() {
            directory_url = DIRECTORY_URL.to_string();
        }
        if !directory_url.ends_with('/') {
            directory_url.push('/');
        }

        Ok(Client {
            credentials: Credentials::new(client_id, client_secret, refresh_token),
            oauth: oauth::Client::new(http::Client::new(token_url)?),
            users: users::Client::new(http::Client::new(directory_url)?),
        })
    }
}
