use rolekeeper_core::{CommunityId, MemberId};
use serde::{Deserialize, Serialize};

/// Reputation accumulated by one member within one community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserServerRank {
    member_id: MemberId,
    community_id: CommunityId,
    rank: i64,
}

impl UserServerRank {
    /// Creates a rank snapshot.
    #[must_use]
    pub fn new(member_id: MemberId, community_id: CommunityId, rank: i64) -> Self {
        Self {
            member_id,
            community_id,
            rank,
        }
    }

    /// Returns the ranked member.
    #[must_use]
    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Returns the community the rank was earned in.
    #[must_use]
    pub fn community_id(&self) -> &CommunityId {
        &self.community_id
    }

    /// Returns the accumulated score.
    #[must_use]
    pub fn rank(&self) -> i64 {
        self.rank
    }

    /// Returns whether the score reaches the threshold, inclusive.
    #[must_use]
    pub fn meets(&self, threshold: i64) -> bool {
        self.rank >= threshold
    }
}
