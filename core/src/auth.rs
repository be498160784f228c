//! Basic-auth credentials.
//!
//! # Design
//! Callers hand credentials over in whatever sequence form they have — a
//! `(user, pass)` pair, a `Vec` from a config file, or a single-use
//! iterator from a secret resolver. All forms normalize to an owned
//! two-field pair at construction time, so nothing downstream re-iterates
//! a source that may only yield its elements once.

use base64ct::{Base64, Encoding};

use crate::error::DatasetError;

/// A `(username, password)` pair for HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build credentials from any ordered sequence of exactly two elements.
    ///
    /// The sequence is consumed once. Fewer or more than two elements is a
    /// configuration error.
    pub fn from_sequence<I>(sequence: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut iter = sequence.into_iter();
        let username = iter
            .next()
            .ok_or_else(|| DatasetError::InvalidConfig(arity_message(0)))?;
        let password = iter
            .next()
            .ok_or_else(|| DatasetError::InvalidConfig(arity_message(1)))?;
        if iter.next().is_some() {
            return Err(DatasetError::InvalidConfig(
                "credential sequence has more than two elements".to_string(),
            ));
        }
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The value for an `Authorization` header.
    pub fn basic_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", Base64::encode_string(raw.as_bytes()))
    }
}

impl<U: Into<String>, P: Into<String>> From<(U, P)> for Credentials {
    fn from((username, password): (U, P)) -> Self {
        Self::new(username, password)
    }
}

impl TryFrom<Vec<String>> for Credentials {
    type Error = DatasetError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_sequence(value)
    }
}

fn arity_message(got: usize) -> String {
    format!("credential sequence must have exactly two elements, got {got}")
}
