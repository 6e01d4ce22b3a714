use rolekeeper_core::{AppResult, CommunityId, NonEmptyString, RoleGroupId, RoleId};
use serde::{Deserialize, Serialize};

use crate::PermissionLevel;

/// A grantable attribute known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    community_id: CommunityId,
    name: NonEmptyString,
    group_ids: Vec<RoleGroupId>,
    confirmation_message: Option<NonEmptyString>,
    permission: PermissionLevel,
}

impl Role {
    /// Creates a role with no groups, no confirmation text and `All` permission.
    pub fn new(
        id: RoleId,
        community_id: CommunityId,
        name: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            community_id,
            name: NonEmptyString::new(name)?,
            group_ids: Vec::new(),
            confirmation_message: None,
            permission: PermissionLevel::All,
        })
    }

    /// Sets the groups the role belongs to, in directory order.
    #[must_use]
    pub fn with_groups(mut self, group_ids: Vec<RoleGroupId>) -> Self {
        self.group_ids = group_ids;
        self
    }

    /// Sets the text members must acknowledge before receiving the role.
    pub fn with_confirmation_message(mut self, message: impl Into<String>) -> AppResult<Self> {
        self.confirmation_message = Some(NonEmptyString::new(message)?);
        Ok(self)
    }

    /// Sets the permission level held by members with this role.
    #[must_use]
    pub fn with_permission(mut self, permission: PermissionLevel) -> Self {
        self.permission = permission;
        self
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> &RoleId {
        &self.id
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

    /// Returns the groups the role belongs to, in directory order.
    #[must_use]
    pub fn group_ids(&self) -> &[RoleGroupId] {
        self.group_ids.as_slice()
    }

    /// Returns the confirmation text, if the role requires one.
    #[must_use]
    pub fn confirmation_message(&self) -> Option<&NonEmptyString> {
        self.confirmation_message.as_ref()
    }

    /// Returns the permission level held by members with this role.
    #[must_use]
    pub fn permission(&self) -> PermissionLevel {
        self.permission
    }
}

#[cfg(test)]
mod tests {
    use rolekeeper_core::{CommunityId, RoleGroupId, RoleId};

    use super::Role;
    use crate::PermissionLevel;

    #[test]
    fn role_defaults_to_open_permission_without_groups() {
        let role = Role::new(
            RoleId::new("10").unwrap_or_else(|_| unreachable!()),
            CommunityId::new("1").unwrap_or_else(|_| unreachable!()),
            "Veteran",
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(role.permission(), PermissionLevel::All);
        assert!(role.group_ids().is_empty());
        assert!(role.confirmation_message().is_none());
    }

    #[test]
    fn blank_confirmation_message_is_rejected() {
        let role = Role::new(
            RoleId::new("10").unwrap_or_else(|_| unreachable!()),
            CommunityId::new("1").unwrap_or_else(|_| unreachable!()),
            "NSFW",
        )
        .unwrap_or_else(|_| unreachable!())
        .with_groups(vec![RoleGroupId::new(3)]);

        assert!(role.clone().with_confirmation_message("  ").is_err());
        assert!(role.with_confirmation_message("You must be 18+").is_ok());
    }
}
