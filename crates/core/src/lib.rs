//! Shared primitives for all Rust crates in Rolekeeper.

#![forbid(unsafe_code)]

/// Platform identifiers shared across crates.
pub mod ids;
/// Acting member primitives shared across services.
pub mod member;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ids::{ChannelId, CommunityId, MemberId, RoleGroupId, RoleId};
pub use member::MemberIdentity;

/// Result type used across Rolekeeper crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Actor is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A collaborator could not be reached or did not answer in time.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A collaborator refused a requested mutation.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_deserialization_is_validated() {
        let parsed = serde_json::from_str::<NonEmptyString>("\"  \"");
        assert!(parsed.is_err());

        let parsed = serde_json::from_str::<NonEmptyString>("\"Read the rules\"");
        assert_eq!(
            parsed.map(String::from).unwrap_or_default(),
            "Read the rules"
        );
    }

    #[test]
    fn errors_render_their_category() {
        let error = AppError::Unavailable("directory store timed out".to_owned());
        assert_eq!(error.to_string(), "unavailable: directory store timed out");
    }
}
