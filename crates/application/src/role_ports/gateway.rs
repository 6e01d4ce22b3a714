use async_trait::async_trait;
use rolekeeper_core::{AppResult, ChannelId, CommunityId, MemberId, RoleId};

/// Port for the member state and mutations the chat platform provides to the engine.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Gives a role to a member.
    async fn grant_role(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()>;

    /// Takes a role away from a member.
    async fn revoke_role(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()>;

    /// Returns the roles a member holds right now.
    async fn current_roles(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> AppResult<Vec<RoleId>>;

    /// Posts a message to a channel.
    async fn send_message(&self, channel_id: &ChannelId, text: &str) -> AppResult<()>;
}
