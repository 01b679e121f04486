//! List and delete directory users.
//!
//! You're probably looking for the [`Client`].
//!
//! # Examples
//! ```no_run
//! use directory_purge::{Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new()?;
//!     let token = client.access_token().await?;
//!
//!     let users = client.users().list_all(&token, Some("example.org")).await?;
//!     println!("{} users", users.len());
//!
//!     let outcome = client.users().delete(&token, "someone@example.org").await;
//!     assert!(outcome.is_deleted());
//!
//!     Ok(())
//! }
//! ```
mod client;
mod model;

pub use client::Client;
pub use model::{DeleteOutcome, User};
pub(crate) use model::{ListParams, UsersPage};
