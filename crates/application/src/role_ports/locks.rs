use async_trait::async_trait;
use rolekeeper_core::{AppResult, CommunityId, MemberId};
use tokio::sync::OwnedMutexGuard;

/// Coordination port serializing role mutations of one member.
///
/// Two concurrent actions for the same member must not interleave their
/// gateway calls; the guard is held for the whole evaluation.
#[async_trait]
pub trait MemberLockCoordinator: Send + Sync {
    /// Waits for and acquires the lock scoped to one member of one community.
    async fn acquire_member_lock(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> AppResult<OwnedMutexGuard<()>>;
}
