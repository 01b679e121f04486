//! Select users by domain and username shape.

use regex::Regex;

use crate::{
    error::{Error, Result},
    users::User,
};

/// The domain whose users are inspected when nothing else is configured.
pub static DEFAULT_DOMAIN: &str = "chatgpt.nyc.mn";

/// The username length matched when nothing else is configured.
pub const DEFAULT_USERNAME_LENGTH: usize = 8;

/// Matches addresses `local@domain` where `domain` equals the configured one
/// exactly and `local` is exactly `length` ASCII letters or digits.
#[derive(Debug, Clone)]
pub struct UsernamePattern {
    domain: String,
    length: usize,
    regex: Regex,
}

impl UsernamePattern {
    /// # Errors
    /// [`Error::InvalidUsernameLength`] if `length` is zero.
    pub fn new<D: Into<String>>(domain: D, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidUsernameLength(length));
        }
        let regex = Regex::new(&format!("^[A-Za-z0-9]{{{length}}}$"))?;
        Ok(Self {
            domain: domain.into(),
            length,
            regex,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether `email` belongs to the domain and has a matching username.
    pub fn matches(&self, email: &str) -> bool {
        // Everything after the first `@` is the domain, so a second `@`
        // can never compare equal to it.
        match email.split_once('@') {
            Some((local, domain)) => domain == self.domain && self.regex.is_match(local),
            None => false,
        }
    }

    /// Whether the user's primary email matches. Users without one never do.
    pub fn matches_user(&self, user: &User) -> bool {
        user.primary_email
            .as_deref()
            .map_or(false, |email| self.matches(email))
    }

    /// Keep the matching users, in their original order.
    pub fn filter<I>(&self, users: I) -> Vec<User>
    where
        I: IntoIterator<Item = User>,
    {
        users
            .into_iter()
            .filter(|user| self.matches_user(user))
            .collect()
    }
}

/// Keep the users of `domain` whose username is `username_length`
/// alphanumeric characters.
///
/// # Errors
/// [`Error::InvalidUsernameLength`] if `username_length` is zero.
pub fn filter_by_pattern<I>(users: I, domain: &str, username_length: usize) -> Result<Vec<User>>
where
    I: IntoIterator<Item = User>,
{
    Ok(UsernamePattern::new(domain, username_length)?.filter(users))
}
