use std::str::FromStr;

use rolekeeper_core::{AppError, AppResult, CommunityId, NonEmptyString, RoleGroupId};
use serde::{Deserialize, Serialize};

/// Maximum number of characters in a role group name.
pub const ROLE_GROUP_NAME_MAX_LENGTH: usize = 500;

/// Name of the group roles are filed under when none was chosen.
pub const UNCATEGORIZED_GROUP: &str = "Uncategorized";

/// Constraint discipline applied to the roles of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// No constraint.
    #[default]
    Any,
    /// Granting one role removes the other roles of the group.
    Exclusive,
    /// Exclusive, and roles of the group can never be removed once granted.
    ExclusiveNoRemove,
    /// Recognized and stored but not enforced by any rule.
    NoMultiples,
}

impl GroupType {
    /// Returns the stable storage value for this type.
    #[must_use]
    pub fn storage_value(&self) -> i16 {
        match self {
            Self::Any => 1,
            Self::Exclusive => 2,
            Self::ExclusiveNoRemove => 3,
            Self::NoMultiples => 4,
        }
    }

    /// Parses a stored value into a group type.
    pub fn from_storage_value(value: i16) -> AppResult<Self> {
        match value {
            1 => Ok(Self::Any),
            2 => Ok(Self::Exclusive),
            3 => Ok(Self::ExclusiveNoRemove),
            4 => Ok(Self::NoMultiples),
            _ => Err(AppError::Validation(format!(
                "unknown role group type value '{value}'"
            ))),
        }
    }

    /// Returns the label shown to moderators, including the short code.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Any => "Any (ANY)",
            Self::Exclusive => "Exclusive (EXC)",
            Self::ExclusiveNoRemove => "Exclusive No Remove (ENR)",
            Self::NoMultiples => "No Multiples (NOM)",
        }
    }

    /// Returns whether granting a role of this group removes its siblings.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Exclusive | Self::ExclusiveNoRemove)
    }

    /// Returns whether roles of this group can never be revoked.
    #[must_use]
    pub fn blocks_removal(&self) -> bool {
        matches!(self, Self::ExclusiveNoRemove)
    }
}

impl FromStr for GroupType {
    type Err = AppError;

    /// Classifies a free-form moderator label, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "ANY" => Ok(Self::Any),
            "EXCLUSIVE" | "EXC" => Ok(Self::Exclusive),
            "EXCLUSIVE NO REMOVE" | "ENR" => Ok(Self::ExclusiveNoRemove),
            "NO MULTIPLES" | "NOM" => Ok(Self::NoMultiples),
            _ => Err(AppError::Validation(format!(
                "unknown role group type '{value}'"
            ))),
        }
    }
}

/// A named set of roles sharing one constraint type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGroup {
    id: RoleGroupId,
    community_id: CommunityId,
    name: NonEmptyString,
    group_type: GroupType,
}

impl RoleGroup {
    /// Creates a validated role group.
    pub fn new(
        id: RoleGroupId,
        community_id: CommunityId,
        name: impl Into<String>,
        group_type: GroupType,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        if name.as_str().chars().count() > ROLE_GROUP_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role group name must be at most {ROLE_GROUP_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self {
            id,
            community_id,
            name,
            group_type,
        })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> RoleGroupId {
        self.id
    }

    /// Returns the owning community.
    #[must_use]
    pub fn community_id(&self) -> &CommunityId {
        &self.community_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the constraint type.
    #[must_use]
    pub fn group_type(&self) -> GroupType {
        self.group_type
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rolekeeper_core::{CommunityId, RoleGroupId};

    use super::{GroupType, ROLE_GROUP_NAME_MAX_LENGTH, RoleGroup};

    #[test]
    fn labels_are_classified_case_insensitively() {
        let cases = [
            ("any", GroupType::Any),
            ("Exclusive", GroupType::Exclusive),
            ("exc", GroupType::Exclusive),
            ("exclusive no remove", GroupType::ExclusiveNoRemove),
            ("ENR", GroupType::ExclusiveNoRemove),
            ("No Multiples", GroupType::NoMultiples),
            ("nom", GroupType::NoMultiples),
        ];

        for (label, expected) in cases {
            assert_eq!(GroupType::from_str(label).ok(), Some(expected), "{label}");
        }
    }

    #[test]
    fn unknown_label_is_not_defaulted() {
        assert!(GroupType::from_str("exclusive-ish").is_err());
        assert!(GroupType::from_str("").is_err());
    }

    #[test]
    fn storage_values_are_strict() {
        assert_eq!(
            GroupType::from_storage_value(GroupType::ExclusiveNoRemove.storage_value()).ok(),
            Some(GroupType::ExclusiveNoRemove)
        );
        assert!(GroupType::from_storage_value(0).is_err());
        assert!(GroupType::from_storage_value(-1).is_err());
    }

    #[test]
    fn only_exclusive_types_are_exclusive() {
        assert!(!GroupType::Any.is_exclusive());
        assert!(GroupType::Exclusive.is_exclusive());
        assert!(GroupType::ExclusiveNoRemove.is_exclusive());
        assert!(!GroupType::NoMultiples.is_exclusive());
        assert!(GroupType::ExclusiveNoRemove.blocks_removal());
        assert!(!GroupType::Exclusive.blocks_removal());
    }

    #[test]
    fn group_name_length_is_bounded() {
        let community_id = CommunityId::new("1").unwrap_or_else(|_| unreachable!());
        let at_limit = "a".repeat(ROLE_GROUP_NAME_MAX_LENGTH);
        let over_limit = "a".repeat(ROLE_GROUP_NAME_MAX_LENGTH + 1);

        assert!(
            RoleGroup::new(
                RoleGroupId::new(1),
                community_id.clone(),
                at_limit,
                GroupType::Any
            )
            .is_ok()
        );
        assert!(
            RoleGroup::new(RoleGroupId::new(2), community_id, over_limit, GroupType::Any).is_err()
        );
    }
}
