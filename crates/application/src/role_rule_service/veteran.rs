use rolekeeper_core::MemberId;
use rolekeeper_domain::CommunityConfig;

use super::RoleRuleService;

impl RoleRuleService {
    /// Returns the congratulation text for a member whose rank just crossed
    /// the community's veteran threshold.
    ///
    /// Nothing is returned unless the veteran pairing is fully configured and
    /// `previous_rank < threshold <= current_rank`.
    #[must_use]
    pub fn veteran_notice(
        &self,
        config: &CommunityConfig,
        previous_rank: i64,
        current_rank: i64,
        member_id: &MemberId,
    ) -> Option<String> {
        let threshold = config.veteran_threshold()?;
        if previous_rank >= threshold.rank || current_rank < threshold.rank {
            return None;
        }

        Some(format!(
            "Congrats {} you can become a server veteran! Type `{} role veteran` In this channel.",
            member_id.mention(),
            self.command_prefix
        ))
    }
}
