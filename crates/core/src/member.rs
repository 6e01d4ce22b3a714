use serde::{Deserialize, Serialize};

use crate::{CommunityId, MemberId, RoleId};

/// Member information captured from the chat event that triggered a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIdentity {
    member_id: MemberId,
    display_name: String,
    community_id: CommunityId,
    role_ids: Vec<RoleId>,
}

impl MemberIdentity {
    /// Creates a member identity from platform data.
    #[must_use]
    pub fn new(
        member_id: MemberId,
        display_name: impl Into<String>,
        community_id: CommunityId,
        role_ids: Vec<RoleId>,
    ) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            community_id,
            role_ids,
        }
    }

    /// Replaces the roles the member holds.
    #[must_use]
    pub fn with_role_ids(mut self, role_ids: Vec<RoleId>) -> Self {
        self.role_ids = role_ids;
        self
    }

    /// Returns the stable platform identifier of the member.
    #[must_use]
    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Returns the display name for the member.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the community the member acted in.
    #[must_use]
    pub fn community_id(&self) -> &CommunityId {
        &self.community_id
    }

    /// Returns the roles the member held when last observed.
    #[must_use]
    pub fn role_ids(&self) -> &[RoleId] {
        self.role_ids.as_slice()
    }

    /// Returns whether the member held the role when last observed.
    #[must_use]
    pub fn holds_role(&self, role_id: &RoleId) -> bool {
        self.role_ids.contains(role_id)
    }
}
