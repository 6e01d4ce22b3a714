use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rolekeeper_core::{AppError, AppResult, CommunityId, RoleId};
use rolekeeper_domain::{CommunityConfig, Role, RoleAction, RoleActionKind, RoleRule};
use tracing::{debug, info, warn};

use crate::CallTimeout;
use crate::role_ports::{DirectoryStore, MemberLockCoordinator, MessagingGateway};

mod compose;
mod outcome;
mod rules;
mod veteran;

pub use outcome::{RoleActionOutcome, RoleActionState, RuleMessage};

use rules::{RuleApplication, RuleVerdict};

/// Role rule engine: composes the rules of a role and runs the
/// check-then-apply protocol for one role action.
///
/// The service keeps no state across invocations. Callers that may run two
/// actions for the same member concurrently must either configure member
/// locks or serialize those actions themselves.
#[derive(Clone)]
pub struct RoleRuleService {
    directory: Arc<dyn DirectoryStore>,
    gateway: Arc<dyn MessagingGateway>,
    member_locks: Option<Arc<dyn MemberLockCoordinator>>,
    command_prefix: String,
    call_timeout: CallTimeout,
}

impl RoleRuleService {
    /// Creates a role rule service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        gateway: Arc<dyn MessagingGateway>,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            gateway,
            member_locks: None,
            command_prefix: command_prefix.into(),
            call_timeout: CallTimeout::unbounded(),
        }
    }

    /// Serializes [`RoleRuleService::execute`] per member through the coordinator.
    #[must_use]
    pub fn with_member_locks(mut self, member_locks: Arc<dyn MemberLockCoordinator>) -> Self {
        self.member_locks = Some(member_locks);
        self
    }

    /// Bounds every directory and gateway call made by the service.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = CallTimeout::after(timeout);
        self
    }

    /// Returns the command prefix used in member-facing instructions.
    #[must_use]
    pub fn command_prefix(&self) -> &str {
        self.command_prefix.as_str()
    }

    /// Resolves a role of a community from the directory.
    pub async fn find_role(
        &self,
        community_id: &CommunityId,
        role_id: &RoleId,
    ) -> AppResult<Role> {
        self.call_timeout
            .run("role lookup", self.directory.find_role(community_id, role_id))
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "role '{role_id}' does not exist in community '{community_id}'"
                ))
            })
    }

    /// Resolves the configuration of a community from the directory.
    pub async fn find_community_config(
        &self,
        community_id: &CommunityId,
    ) -> AppResult<CommunityConfig> {
        self.call_timeout
            .run(
                "community configuration lookup",
                self.directory.find_community_config(community_id),
            )
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("community '{community_id}' has no configuration"))
            })
    }

    /// Evaluates one role action without performing the underlying role change
    /// unless a rule does so itself.
    ///
    /// The member's roles are taken from the action as given. Lookup failures
    /// abort with an error. Policy rejections and gateway failures are
    /// reported in the outcome.
    pub async fn evaluate(&self, action: &RoleAction) -> AppResult<RoleActionOutcome> {
        let config = self.find_community_config(action.community().id()).await?;
        let rules = self
            .rules_for(&config, action.role(), self.command_prefix.as_str())
            .await?;
        let rule_kinds = rules.iter().map(RoleRule::kind).collect::<Vec<_>>();

        debug!(
            action_id = %action.action_id(),
            role_id = %action.role().id(),
            kind = action.kind().as_str(),
            rules = ?rule_kinds,
            state = RoleActionState::Composed.as_str(),
            "composed role rules"
        );

        if rules.is_empty() {
            return Ok(RoleActionOutcome::new(
                action,
                RoleActionState::Applied,
                rule_kinds,
                Vec::new(),
            ));
        }

        debug!(
            action_id = %action.action_id(),
            state = RoleActionState::Checking.as_str(),
            "checking role rules"
        );
        for rule in &rules {
            if let RuleVerdict::Reject(message) = self.check_rule(rule, action).await? {
                info!(
                    action_id = %action.action_id(),
                    member_id = %action.member().member_id(),
                    role_id = %action.role().id(),
                    rule = rule.kind().as_str(),
                    state = RoleActionState::Blocked.as_str(),
                    "role action blocked"
                );
                return Ok(RoleActionOutcome::new(
                    action,
                    RoleActionState::Blocked,
                    rule_kinds,
                    vec![RuleMessage::from_rule(rule.kind(), message)],
                ));
            }
        }

        debug!(
            action_id = %action.action_id(),
            state = RoleActionState::Applying.as_str(),
            "applying role rules"
        );
        let mut application = RuleApplication::default();
        for rule in &rules {
            self.apply_rule(rule, action, &mut application).await;
        }

        let state = if application.failures.is_empty() {
            RoleActionState::Applied
        } else {
            warn!(
                action_id = %action.action_id(),
                member_id = %action.member().member_id(),
                role_id = %action.role().id(),
                failures = application.failures.len(),
                state = RoleActionState::Failed.as_str(),
                "role action partially failed"
            );
            RoleActionState::Failed
        };

        let mut outcome = RoleActionOutcome::new(action, state, rule_kinds, application.failures);
        outcome.role_change_attempted = application.role_change_attempted;
        outcome.role_change_performed = application.role_change_performed;
        Ok(outcome)
    }

    /// Evaluates one role action and performs the underlying grant or revoke
    /// when the rules allowed it and none of them attempted it already.
    ///
    /// The member's current roles are read from the gateway once the member
    /// lock is held, so rules never act on the roles captured with the event.
    pub async fn execute(&self, action: &RoleAction) -> AppResult<RoleActionOutcome> {
        let _member_guard = match &self.member_locks {
            Some(member_locks) => Some(
                member_locks
                    .acquire_member_lock(action.community().id(), action.member().member_id())
                    .await?,
            ),
            None => None,
        };

        let action = &self.with_current_roles(action).await?;
        let mut outcome = self.evaluate(action).await?;
        if outcome.state == RoleActionState::Blocked || outcome.role_change_attempted {
            return Ok(outcome);
        }

        outcome.role_change_attempted = true;
        let community_id = action.community().id();
        let member_id = action.member().member_id();
        let role_id = action.role().id();
        let change = match action.kind() {
            RoleActionKind::Grant => {
                self.call_timeout
                    .run(
                        "role grant",
                        self.gateway.grant_role(community_id, member_id, role_id),
                    )
                    .await
            }
            RoleActionKind::Revoke => {
                self.call_timeout
                    .run(
                        "role revoke",
                        self.gateway.revoke_role(community_id, member_id, role_id),
                    )
                    .await
            }
        };

        match change {
            Ok(()) => outcome.role_change_performed = true,
            Err(error) => {
                warn!(
                    action_id = %action.action_id(),
                    member_id = %member_id,
                    role_id = %role_id,
                    error = %error,
                    "role change rejected by gateway"
                );
                outcome.messages.push(RuleMessage::from_role_change(format!(
                    "Failed to {} the {} role: {error}",
                    action.kind().as_str(),
                    action.role().name().as_str()
                )));
                outcome.state = RoleActionState::Failed;
            }
        }
        outcome.completed_at = Utc::now();

        Ok(outcome)
    }

    async fn with_current_roles(&self, action: &RoleAction) -> AppResult<RoleAction> {
        let role_ids = self
            .call_timeout
            .run(
                "member roles lookup",
                self.gateway
                    .current_roles(action.community().id(), action.member().member_id()),
            )
            .await?;

        Ok(action.clone().with_member_roles(role_ids))
    }
}
