use rolekeeper_core::{AppError, AppResult, RoleId};
use rolekeeper_domain::{ConfirmationSignal, RoleAction, RoleGroup, RoleRule, RoleRuleKind};
use tracing::{debug, warn};

use super::{RoleRuleService, RuleMessage};

/// Result of one rule precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RuleVerdict {
    Pass,
    Reject(String),
}

/// Side effects accumulated while applying the rules of one action.
#[derive(Debug, Default)]
pub(super) struct RuleApplication {
    pub(super) failures: Vec<RuleMessage>,
    pub(super) role_change_attempted: bool,
    pub(super) role_change_performed: bool,
}

impl RuleApplication {
    fn record_failure(&mut self, rule: RoleRuleKind, message: String) {
        self.failures.push(RuleMessage::from_rule(rule, message));
    }
}

impl RoleRuleService {
    pub(super) async fn check_rule(
        &self,
        rule: &RoleRule,
        action: &RoleAction,
    ) -> AppResult<RuleVerdict> {
        match rule {
            RoleRule::Points { threshold } => self.check_points(*threshold, action).await,
            RoleRule::Confirmation { command_prefix } => {
                Ok(check_confirmation(command_prefix, action))
            }
            RoleRule::Exclusive { .. } => Ok(RuleVerdict::Pass),
            RoleRule::NoRemove { group } => Ok(check_no_remove(group, action)),
        }
    }

    /// Runs the side effect of one rule; failures are recorded, never returned.
    pub(super) async fn apply_rule(
        &self,
        rule: &RoleRule,
        action: &RoleAction,
        application: &mut RuleApplication,
    ) {
        match rule {
            RoleRule::Points { .. } | RoleRule::NoRemove { .. } => {}
            RoleRule::Confirmation { .. } => self.apply_confirmation(action, application).await,
            RoleRule::Exclusive { related_roles } => {
                self.apply_exclusive(related_roles, action, application)
                    .await;
            }
        }
    }

    async fn check_points(&self, threshold: i64, action: &RoleAction) -> AppResult<RuleVerdict> {
        if !action.is_grant() {
            return Ok(RuleVerdict::Pass);
        }

        let member_id = action.member().member_id();
        let community_id = action.community().id();
        let rank = self
            .call_timeout
            .run(
                "member rank lookup",
                self.directory.find_user_rank(member_id, community_id),
            )
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "member '{member_id}' has no rank in community '{community_id}'"
                ))
            })?;

        if rank.meets(threshold) {
            return Ok(RuleVerdict::Pass);
        }

        Ok(RuleVerdict::Reject(format!(
            "Sorry {}, you need {threshold} points to get the {} role. You currently have {}.",
            member_id.mention(),
            action.role().name().as_str(),
            rank.rank()
        )))
    }

    async fn apply_confirmation(&self, action: &RoleAction, application: &mut RuleApplication) {
        if !action.is_grant() {
            return;
        }
        let Some(confirmation_message) = action.role().confirmation_message() else {
            return;
        };

        let text = format!(
            "{} {}",
            action.member().member_id().mention(),
            confirmation_message.as_str()
        );
        let sent = self
            .call_timeout
            .run(
                "confirmation message",
                self.gateway.send_message(action.channel_id(), text.as_str()),
            )
            .await;

        if let Err(error) = sent {
            warn!(
                action_id = %action.action_id(),
                channel_id = %action.channel_id(),
                error = %error,
                "failed to send confirmation message"
            );
            application.record_failure(
                RoleRuleKind::Confirmation,
                format!(
                    "Failed to send the confirmation message for the {} role: {error}",
                    action.role().name().as_str()
                ),
            );
        }
    }

    async fn apply_exclusive(
        &self,
        related_roles: &[RoleId],
        action: &RoleAction,
        application: &mut RuleApplication,
    ) {
        if !action.is_grant() {
            return;
        }

        let community_id = action.community().id();
        let member = action.member();
        let target_role_id = action.role().id();

        let conflicting_roles = related_roles
            .iter()
            .filter(|role_id| *role_id != target_role_id && member.holds_role(role_id));
        for role_id in conflicting_roles {
            let removed = self
                .call_timeout
                .run(
                    "conflicting role revoke",
                    self.gateway.revoke_role(community_id, member.member_id(), role_id),
                )
                .await;

            match removed {
                Ok(()) => debug!(
                    action_id = %action.action_id(),
                    role_id = %role_id,
                    "removed conflicting exclusive role"
                ),
                Err(error) => {
                    warn!(
                        action_id = %action.action_id(),
                        role_id = %role_id,
                        error = %error,
                        "failed to remove conflicting exclusive role"
                    );
                    application.record_failure(
                        RoleRuleKind::Exclusive,
                        format!("Failed to remove the conflicting role {role_id}: {error}"),
                    );
                }
            }
        }

        if application.role_change_attempted {
            return;
        }

        application.role_change_attempted = true;
        let granted = self
            .call_timeout
            .run(
                "exclusive role grant",
                self.gateway
                    .grant_role(community_id, member.member_id(), target_role_id),
            )
            .await;

        match granted {
            Ok(()) => application.role_change_performed = true,
            Err(error) => {
                warn!(
                    action_id = %action.action_id(),
                    role_id = %target_role_id,
                    error = %error,
                    "failed to grant exclusive role"
                );
                application.record_failure(
                    RoleRuleKind::Exclusive,
                    format!(
                        "Failed to grant the {} role: {error}",
                        action.role().name().as_str()
                    ),
                );
            }
        }
    }
}

/// Trusts the confirmation detected by the command layer; revokes never need one.
fn check_confirmation(command_prefix: &str, action: &RoleAction) -> RuleVerdict {
    if !action.is_grant() || action.confirmation() == ConfirmationSignal::Observed {
        return RuleVerdict::Pass;
    }

    let role_name = action.role().name().as_str();
    RuleVerdict::Reject(format!(
        "The {role_name} role requires confirmation. Type `{command_prefix} role {role_name} confirm` to receive it."
    ))
}

fn check_no_remove(group: &RoleGroup, action: &RoleAction) -> RuleVerdict {
    if action.is_grant() || !action.role().group_ids().contains(&group.id()) {
        return RuleVerdict::Pass;
    }

    RuleVerdict::Reject(format!(
        "Sorry, the {} role can't be removed once you have it. Roles in the {} group are permanent.",
        action.role().name().as_str(),
        group.name().as_str()
    ))
}
