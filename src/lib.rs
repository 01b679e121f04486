//! Find and remove directory accounts whose usernames follow a fixed pattern.
//!
//! If you're just getting started, take a look at the [`Client`].
//! It exchanges the refresh token, lists and deletes users. The
//! [`server`] module wraps it in a small HTTP control surface and
//! [`purge`] drives a sequential bulk delete.
//!
//! # Examples
//! ```no_run
//! use directory_purge::{filter::UsernamePattern, Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     // Reads GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN.
//!     let client = Client::new()?;
//!
//!     let pattern = UsernamePattern::new("chatgpt.nyc.mn", 8)?;
//!     let users = client.list_by_username_pattern(&pattern).await?;
//!
//!     for user in users {
//!         if let Some(email) = user.primary_email {
//!             let outcome = client.delete_user(&email).await?;
//!             dbg!(outcome);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
pub mod client;
pub mod error;
pub mod filter;
mod http;
pub mod oauth;
pub mod purge;
mod serde;
pub mod server;
pub mod users;

pub use client::{Client, Credentials};
pub use error::Error;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

#[cfg(all(feature = "default-tls", feature = "native-tls"))]
compile_error!("Feature \"default-tls\" and \"native-tls\" cannot be enabled at the same time");

#[cfg(all(feature = "native-tls", feature = "rustls-tls"))]
compile_error!("Feature \"native-tls\" and \"rustls-tls\" cannot be enabled at the same time");

#[cfg(all(feature = "rustls-tls", feature = "default-tls"))]
compile_error!("Feature \"rustls-tls\" and \"default-tls\" cannot be enabled at the same time");
