use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serde::{deserialize_non_empty, deserialize_null_default};

/// A directory user.
///
/// Only the primary email is interpreted, every other field is kept as
/// received and serialized back unchanged.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The address that identifies the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    /// All other fields of the directory record.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One page of the user listing.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsersPage {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub users: Vec<User>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub next_page_token: Option<String>,
}

/// Query parameters of the user listing.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<&'a str>,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

impl<'a> ListParams<'a> {
    /// The alias for the account that owns the credentials.
    const MY_CUSTOMER: &'static str = "my_customer";
    const MAX_RESULTS: u32 = 500;

    /// Without a domain, the listing covers the whole customer account.
    pub fn new(domain: Option<&'a str>, page_token: Option<&'a str>) -> Self {
        Self {
            domain,
            customer: domain.is_none().then_some(Self::MY_CUSTOMER),
            max_results: Self::MAX_RESULTS,
            page_token,
        }
    }
}

/// The result of deleting a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted {
        email: String,
    },
    /// `status` is `None` when the request never got a response.
    Failed {
        email: String,
        status: Option<u16>,
        body: String,
    },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }

    pub fn email(&self) -> &str {
        match self {
            DeleteOutcome::Deleted { email } | DeleteOutcome::Failed { email, .. } => email,
        }
    }
}
