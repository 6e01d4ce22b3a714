//! Process-local member lock coordinator.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rolekeeper_application::MemberLockCoordinator;
use rolekeeper_core::{AppResult, CommunityId, MemberId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// In-memory implementation of member lock coordination for one process.
#[derive(Debug, Default)]
pub struct InMemoryMemberLockCoordinator {
    locks: Mutex<HashMap<(CommunityId, MemberId), Arc<Mutex<()>>>>,
}

impl InMemoryMemberLockCoordinator {
    /// Creates a coordinator with no locks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberLockCoordinator for InMemoryMemberLockCoordinator {
    async fn acquire_member_lock(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> AppResult<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries referenced only by the map are neither held nor awaited.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry((community_id.clone(), member_id.clone()))
                .or_default()
                .clone()
        };

        let guard = lock.lock_owned().await;
        debug!(community_id = %community_id, member_id = %member_id, "acquired member lock");
        Ok(guard)
    }
}
