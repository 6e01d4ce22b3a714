use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

macro_rules! platform_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier from a platform value.
            pub fn new(value: impl Into<String>) -> AppResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(AppError::Validation(format!(
                        "{} must not be empty",
                        $label
                    )));
                }

                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = AppError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                formatter.write_str(self.0.as_str())
            }
        }
    };
}

platform_identifier!(
    /// Identifier of a community (guild) on the chat platform.
    CommunityId,
    "community id"
);
platform_identifier!(
    /// Identifier of a community member.
    MemberId,
    "member id"
);
platform_identifier!(
    /// Identifier of a grantable role.
    RoleId,
    "role id"
);
platform_identifier!(
    /// Identifier of a text channel.
    ChannelId,
    "channel id"
);

impl MemberId {
    /// Returns the chat mention markup for this member.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl RoleId {
    /// Returns the chat mention markup for this role.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.0)
    }
}

impl ChannelId {
    /// Returns the chat mention markup for this channel.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.0)
    }
}

/// Directory-assigned identifier of a role group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleGroupId(i64);

impl RoleGroupId {
    /// Creates a role group identifier from its stored value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the stored value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl Display for RoleGroupId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
