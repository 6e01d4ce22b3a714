use rolekeeper_core::RoleId;
use serde::{Deserialize, Serialize};

use crate::RoleGroup;

/// Identifies a rule variant in outcomes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRuleKind {
    /// Reputation threshold gate.
    Points,
    /// Explicit confirmation gate.
    Confirmation,
    /// Mutual exclusion within a group.
    Exclusive,
    /// Irrevocability within a group.
    NoRemove,
}

impl RoleRuleKind {
    /// Returns a stable value for logs and transport.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Confirmation => "confirmation",
            Self::Exclusive => "exclusive",
            Self::NoRemove => "no_remove",
        }
    }
}

/// A policy applicable to one role, parameterized at composition time.
///
/// Eligibility gates (`Points`, `Confirmation`) are always composed ahead of
/// consequence rules (`Exclusive`, `NoRemove`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleRule {
    /// Grants require the member's rank to reach the threshold.
    Points {
        /// Minimum rank, inclusive.
        threshold: i64,
    },
    /// Grants require an explicit confirmation from the member.
    Confirmation {
        /// Command prefix used in the instructions shown to the member.
        command_prefix: String,
    },
    /// Granting removes every other held role of the set.
    Exclusive {
        /// All roles of the group, including the target.
        related_roles: Vec<RoleId>,
    },
    /// Revoking a role of the group is never allowed.
    NoRemove {
        /// Group whose roles are irrevocable.
        group: RoleGroup,
    },
}

impl RoleRule {
    /// Returns the variant kind.
    #[must_use]
    pub fn kind(&self) -> RoleRuleKind {
        match self {
            Self::Points { .. } => RoleRuleKind::Points,
            Self::Confirmation { .. } => RoleRuleKind::Confirmation,
            Self::Exclusive { .. } => RoleRuleKind::Exclusive,
            Self::NoRemove { .. } => RoleRuleKind::NoRemove,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RoleRule, RoleRuleKind};

    #[test]
    fn rules_serialize_with_kind_tag() {
        let rule = RoleRule::Points { threshold: 250 };
        assert_eq!(rule.kind(), RoleRuleKind::Points);

        let value = serde_json::to_value(&rule).unwrap_or_default();
        assert_eq!(value, json!({"kind": "points", "threshold": 250}));
    }
}
