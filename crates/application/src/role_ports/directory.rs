use async_trait::async_trait;
use rolekeeper_core::{AppResult, CommunityId, MemberId, RoleGroupId, RoleId};
use rolekeeper_domain::{CommunityConfig, PermissionLevel, Role, RoleGroup, UserServerRank};

/// Read-only port over persisted roles, groups, configuration and ranks.
///
/// Lookups return `Ok(None)` when the row is absent and `Err` when the store
/// itself failed.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Finds one role of a community.
    async fn find_role(
        &self,
        community_id: &CommunityId,
        role_id: &RoleId,
    ) -> AppResult<Option<Role>>;

    /// Finds one role group.
    async fn find_role_group(&self, group_id: RoleGroupId) -> AppResult<Option<RoleGroup>>;

    /// Lists every role that belongs to the group.
    async fn list_related_roles(&self, group_id: RoleGroupId) -> AppResult<Vec<RoleId>>;

    /// Resolves the configured permission levels of the given roles.
    ///
    /// Roles without a directory entry are skipped.
    async fn resolve_permissions(
        &self,
        community_id: &CommunityId,
        role_ids: &[RoleId],
    ) -> AppResult<Vec<PermissionLevel>>;

    /// Finds the configuration of a community.
    async fn find_community_config(
        &self,
        community_id: &CommunityId,
    ) -> AppResult<Option<CommunityConfig>>;

    /// Finds the rank of a member within a community.
    async fn find_user_rank(
        &self,
        member_id: &MemberId,
        community_id: &CommunityId,
    ) -> AppResult<Option<UserServerRank>>;
}
