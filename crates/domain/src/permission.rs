use std::str::FromStr;

use rolekeeper_core::AppError;
use serde::{Deserialize, Serialize};

/// Privilege tiers gating command execution, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Nobody may run the command.
    None,
    /// Everybody may run the command.
    All,
    /// Community moderators.
    Mod,
    /// The community owner.
    GuildOwner,
    /// The bot superuser.
    Master,
}

impl PermissionLevel {
    /// Returns a stable storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::All => "all",
            Self::Mod => "mod",
            Self::GuildOwner => "guild_owner",
            Self::Master => "master",
        }
    }

    /// Returns all known levels in ascending order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionLevel] = &[
            PermissionLevel::None,
            PermissionLevel::All,
            PermissionLevel::Mod,
            PermissionLevel::GuildOwner,
            PermissionLevel::Master,
        ];

        ALL
    }

    /// Returns whether a held level satisfies a required level.
    ///
    /// `All` is satisfied by anything and `None` by nothing; every other
    /// requirement compares by rank.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        match required {
            Self::All => true,
            Self::None => false,
            _ => self >= required,
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            "mod" => Ok(Self::Mod),
            "guild_owner" => Ok(Self::GuildOwner),
            "master" => Ok(Self::Master),
            _ => Err(AppError::Validation(format!(
                "unknown permission level '{value}'"
            ))),
        }
    }
}
