//! Exchange a refresh token for a short-lived access token.
//!
//! The top-level [`Client`](crate::Client) calls this for every operation, so
//! you rarely need it directly.
//!
//! # Examples
//! ```no_run
//! use directory_purge::{Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::builder()
//!         .with_client_id("1234.apps.googleusercontent.com")
//!         .with_client_secret("secret")
//!         .with_refresh_token("1//refresh")
//!         .build()?;
//!
//!     let token = client.access_token().await?;
//!     dbg!(token);
//!
//!     Ok(())
//! }
//! ```
mod client;
mod model;

pub use client::Client;
pub use model::AccessToken;
pub(crate) use model::TokenResponse;
