//! Delete every user matching a pattern, one at a time.
//!
//! This is the server-side counterpart of the control page's "delete all"
//! button: the candidates are listed once, then deleted sequentially while a
//! callback observes progress.
//!
//! # Examples
//! ```no_run
//! use directory_purge::{filter::UsernamePattern, purge::Purge, Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new()?;
//!     let pattern = UsernamePattern::new("chatgpt.nyc.mn", 8)?;
//!
//!     let summary = Purge::new(&client, &pattern)
//!         .run(|progress| println!("{} / {}", progress.done, progress.total))
//!         .await?;
//!     println!("deleted {}, failed {}", summary.deleted, summary.failed.len());
//!
//!     Ok(())
//! }
//! ```
use futures::{pin_mut, StreamExt};
use tracing::{info, instrument};

use crate::{
    error::Result,
    filter::UsernamePattern,
    users::{DeleteOutcome, User},
    Client,
};

/// Reported after every delete.
#[derive(Debug)]
pub struct Progress<'a> {
    /// Deletes attempted so far, including this one.
    pub done: usize,
    pub total: usize,
    pub outcome: &'a DeleteOutcome,
}

/// The tally of a finished purge.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub attempted: usize,
    pub deleted: usize,
    pub failed: Vec<DeleteOutcome>,
}

impl Summary {
    fn record(&mut self, outcome: DeleteOutcome) {
        self.attempted += 1;
        if outcome.is_deleted() {
            self.deleted += 1;
        } else {
            self.failed.push(outcome);
        }
    }
}

/// Lists the users matching a pattern and deletes them.
pub struct Purge<'a> {
    client: &'a Client,
    pattern: &'a UsernamePattern,
}

impl<'a> Purge<'a> {
    pub fn new(client: &'a Client, pattern: &'a UsernamePattern) -> Self {
        Self { client, pattern }
    }

    /// The users that [`Purge::run`] would delete.
    pub async fn candidates(&self) -> Result<Vec<User>> {
        self.client.list_by_username_pattern(self.pattern).await
    }

    /// List the candidates and delete them in order. A failed delete is
    /// recorded and the next one is attempted.
    ///
    /// # Errors
    /// If the token exchange or the listing fails. Nothing is deleted then.
    #[instrument(skip(self, on_progress), fields(domain = self.pattern.domain()))]
    pub async fn run<F>(&self, mut on_progress: F) -> Result<Summary>
    where
        F: FnMut(&Progress<'_>),
    {
        let emails: Vec<String> = self
            .candidates()
            .await?
            .into_iter()
            .filter_map(|user| user.primary_email)
            .collect();
        let mut summary = Summary {
            total: emails.len(),
            ..Summary::default()
        };
        if emails.is_empty() {
            return Ok(summary);
        }

        // A single token covers the whole run.
        let token = self.client.access_token().await?;
        let outcomes = self.client.users().delete_each(&token, emails);
        pin_mut!(outcomes);
        while let Some(outcome) = outcomes.next().await {
            on_progress(&Progress {
                done: summary.attempted + 1,
                total: summary.total,
                outcome: &outcome,
            });
            summary.record(outcome);
        }

        info!(
            total = summary.total,
            deleted = summary.deleted,
            failed = summary.failed.len(),
            "purge finished"
        );
        Ok(summary)
    }
}
