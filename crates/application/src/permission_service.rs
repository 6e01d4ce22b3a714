use std::sync::Arc;
use std::time::Duration;

use rolekeeper_core::{AppError, AppResult, MemberId, RoleId};
use rolekeeper_domain::{Community, PermissionLevel};
use tracing::{debug, warn};

use crate::CallTimeout;
use crate::role_ports::DirectoryStore;

/// Decides whether a member may invoke an operation gated by a permission level.
#[derive(Clone)]
pub struct PermissionChecker {
    superuser_id: MemberId,
    directory: Arc<dyn DirectoryStore>,
    call_timeout: CallTimeout,
}

impl PermissionChecker {
    /// Creates a checker with the injected superuser identity.
    #[must_use]
    pub fn new(superuser_id: MemberId, directory: Arc<dyn DirectoryStore>) -> Self {
        Self {
            superuser_id,
            directory,
            call_timeout: CallTimeout::unbounded(),
        }
    }

    /// Bounds every directory lookup made by the checker.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = CallTimeout::after(timeout);
        self
    }

    /// Returns whether the actor satisfies the required level in the community.
    ///
    /// Evaluation short-circuits in this order: open access, superuser,
    /// community owner (up to `GuildOwner`), explicit deny, then the levels
    /// configured on the actor's roles. A failed role lookup counts as no
    /// elevated permission.
    pub async fn decide(
        &self,
        actor_id: &MemberId,
        actor_role_ids: &[RoleId],
        community: &Community,
        required: PermissionLevel,
    ) -> bool {
        if required == PermissionLevel::All {
            return true;
        }
        if self.is_superuser(actor_id) {
            return true;
        }
        if Self::is_community_owner(community, actor_id)
            && required <= PermissionLevel::GuildOwner
        {
            return true;
        }
        if required == PermissionLevel::None {
            return false;
        }
        if actor_role_ids.is_empty() {
            return false;
        }

        let resolved = self
            .call_timeout
            .run(
                "permission resolution",
                self.directory.resolve_permissions(community.id(), actor_role_ids),
            )
            .await;

        match resolved {
            Ok(levels) => {
                let granted = levels.iter().any(|level| level.satisfies(required));
                debug!(
                    actor_id = %actor_id,
                    community_id = %community.id(),
                    required = required.as_str(),
                    granted,
                    "resolved role permissions"
                );
                granted
            }
            Err(error) => {
                warn!(
                    actor_id = %actor_id,
                    community_id = %community.id(),
                    required = required.as_str(),
                    error = %error,
                    "permission resolution failed, treating actor as unprivileged"
                );
                false
            }
        }
    }

    /// Ensures the actor satisfies the required level.
    pub async fn require(
        &self,
        actor_id: &MemberId,
        actor_role_ids: &[RoleId],
        community: &Community,
        required: PermissionLevel,
    ) -> AppResult<()> {
        if self
            .decide(actor_id, actor_role_ids, community, required)
            .await
        {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "member '{actor_id}' lacks permission level '{}' in community '{}'",
            required.as_str(),
            community.id()
        )))
    }

    /// Returns whether the actor may run commands open to everyone.
    pub async fn has_all_permission(
        &self,
        actor_id: &MemberId,
        actor_role_ids: &[RoleId],
        community: &Community,
    ) -> bool {
        self.decide(actor_id, actor_role_ids, community, PermissionLevel::All)
            .await
    }

    /// Returns whether the actor may run moderator commands.
    pub async fn has_mod_permission(
        &self,
        actor_id: &MemberId,
        actor_role_ids: &[RoleId],
        community: &Community,
    ) -> bool {
        self.decide(actor_id, actor_role_ids, community, PermissionLevel::Mod)
            .await
    }

    /// Returns whether the member is the configured superuser.
    #[must_use]
    pub fn is_superuser(&self, member_id: &MemberId) -> bool {
        &self.superuser_id == member_id
    }

    /// Returns whether the member is the designated owner of the community.
    #[must_use]
    pub fn is_community_owner(community: &Community, member_id: &MemberId) -> bool {
        community.is_owned_by(member_id)
    }
}

#[cfg(test)]
mod tests;
