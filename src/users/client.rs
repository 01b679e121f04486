use futures::{stream, Stream, StreamExt};
use tracing::{debug, instrument, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    error::{Error, Result},
    http,
    oauth::AccessToken,
    users::{DeleteOutcome, ListParams, User, UsersPage},
};

const USERS_PATH: &str = "/admin/directory/v1/users";

/// Everything but ASCII letters, digits and `-_.!~*'()` is escaped in a user
/// key, so a space becomes `%20` and `@` becomes `%40`.
const USER_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn user_key(email: &str) -> String {
    utf8_percent_encode(email, USER_KEY).to_string()
}

/// Provides methods to work with directory users.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: http::Client,
}

impl Client {
    pub(crate) fn new(http_client: http::Client) -> Self {
        Self { http_client }
    }

    /// List all users of `domain`, or of the whole customer account if no
    /// domain is given, following page tokens until the last page.
    ///
    /// # Errors
    /// [`Error::List`] as soon as one page fails, carrying the response body
    /// of a rejected page or the transport or decode error. Users of earlier
    /// pages are dropped.
    #[instrument(skip(self, token))]
    pub async fn list_all(&self, token: &AccessToken, domain: Option<&str>) -> Result<Vec<User>> {
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let params = ListParams::new(domain, page_token.as_deref());
            let page: UsersPage = self
                .http_client
                .get_with_query(USERS_PATH, &params, token)
                .await
                .map_err(|e| Error::List(e.to_string()))?
                .check_error()
                .await
                .map_err(|e| Error::List(e.body))?
                .json()
                .await
                .map_err(|e| Error::List(e.to_string()))?;

            debug!(
                users = page.users.len(),
                has_next = page.next_page_token.is_some(),
                "fetched user page"
            );
            users.extend(page.users);

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(users)
    }

    /// Delete the user identified by `email`.
    ///
    /// Failures are returned as [`DeleteOutcome::Failed`] so callers working
    /// through many users can carry on.
    #[instrument(skip(self, token))]
    pub async fn delete(&self, token: &AccessToken, email: &str) -> DeleteOutcome {
        let res = match self
            .http_client
            .delete(format!("{USERS_PATH}/{}", user_key(email)), token)
            .await
        {
            Ok(res) => res,
            Err(e) => {
                warn!(error = %e, "delete request failed");
                return DeleteOutcome::Failed {
                    email: email.to_string(),
                    status: None,
                    body: e.to_string(),
                };
            }
        };

        match res.check_error().await {
            Ok(_) => DeleteOutcome::Deleted {
                email: email.to_string(),
            },
            Err(e) => {
                warn!(status = e.status, body = %e.body, "delete rejected");
                DeleteOutcome::Failed {
                    email: email.to_string(),
                    status: Some(e.status),
                    body: e.body,
                }
            }
        }
    }

    /// Delete the given users one after another.
    ///
    /// The stream is lazy: a delete is only sent when the previous outcome has
    /// been consumed, and dropping the stream stops the remaining ones.
    pub fn delete_each<'a, I>(
        &'a self,
        token: &'a AccessToken,
        emails: I,
    ) -> impl Stream<Item = DeleteOutcome> + 'a
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'a,
    {
        stream::iter(emails).then(move |email| async move { self.delete(token, &email).await })
    }
}
