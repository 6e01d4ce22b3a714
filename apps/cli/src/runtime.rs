use std::sync::Arc;

use rolekeeper_application::{
    ConfigurationService, ConfigurationSummary, DirectoryStore, MessagingGateway,
    PermissionChecker, RoleActionOutcome, RoleRuleService,
};
use rolekeeper_core::{
    AppError, AppResult, ChannelId, CommunityId, MemberId, MemberIdentity, RoleId,
};
use rolekeeper_domain::{
    Community, ConfirmationSignal, PermissionLevel, RoleAction, RoleActionInput, RoleActionKind,
};
use rolekeeper_infrastructure::{
    ConsoleMessagingGateway, InMemoryDirectoryStore, InMemoryMemberLockCoordinator, PostedMessage,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cli_config::CliConfig;
use crate::command::{self, CliCommand};

#[derive(Debug, Serialize)]
struct RoleCommandReport {
    outcome: RoleActionOutcome,
    member_roles: Vec<RoleId>,
    posted_messages: Vec<PostedMessage>,
}

#[derive(Debug, Serialize)]
struct PermissionReport {
    community_id: CommunityId,
    member_id: MemberId,
    required: PermissionLevel,
    allowed: bool,
}

#[derive(Debug, Serialize)]
struct RankReport {
    community_id: CommunityId,
    member_id: MemberId,
    previous_rank: i64,
    current_rank: i64,
    veteran_notice: Option<String>,
}

/// Wires the adapters and runs one command against them.
pub struct CliRuntime {
    config: CliConfig,
    directory: Arc<InMemoryDirectoryStore>,
    member_locks: Arc<InMemoryMemberLockCoordinator>,
}

impl CliRuntime {
    pub fn new(config: CliConfig, directory: Arc<InMemoryDirectoryStore>) -> Self {
        Self {
            config,
            directory,
            member_locks: Arc::new(InMemoryMemberLockCoordinator::new()),
        }
    }

    pub async fn run(&self, command: CliCommand) -> AppResult<Value> {
        match command {
            CliCommand::Role {
                change,
                community_id,
                member_id,
                role,
                confirm,
            } => to_json(
                &self
                    .change_role(
                        change.into(),
                        &community_id,
                        &member_id,
                        role.as_str(),
                        command::confirmation(confirm),
                    )
                    .await?,
            ),
            CliCommand::Permission {
                community_id,
                member_id,
                required,
            } => to_json(
                &self
                    .check_permission(community_id, member_id, required.into())
                    .await?,
            ),
            CliCommand::Rank {
                community_id,
                member_id,
                rank,
            } => to_json(&self.update_rank(community_id, member_id, rank).await?),
            CliCommand::Summary { community_id } => to_json(&self.summarize(&community_id).await?),
        }
    }

    async fn change_role(
        &self,
        kind: RoleActionKind,
        community_id: &CommunityId,
        member_id: &MemberId,
        role_reference: &str,
        confirmation: ConfirmationSignal,
    ) -> AppResult<RoleCommandReport> {
        let community = self.find_community(community_id).await?;
        let member = self.member_or_newcomer(community_id, member_id).await;
        self.permission_checker()
            .require(
                member.member_id(),
                member.role_ids(),
                &community,
                PermissionLevel::All,
            )
            .await?;

        let role = self
            .directory
            .find_role_by_reference(community_id, role_reference)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "role '{role_reference}' does not exist in community '{community_id}'"
                ))
            })?;

        let gateway = Arc::new(ConsoleMessagingGateway::new().with_member(&member));
        let service = RoleRuleService::new(
            self.directory.clone(),
            gateway.clone(),
            self.config.command_prefix.clone(),
        )
        .with_member_locks(self.member_locks.clone())
        .with_call_timeout(self.config.call_timeout);

        let config = service.find_community_config(community_id).await?;
        // Without a bot channel, messages go to the default channel, which
        // shares the community identifier.
        let channel_id = match config.bot_channel {
            Some(channel_id) => channel_id,
            None => ChannelId::new(community_id.as_str())?,
        };

        let action = RoleAction::new(RoleActionInput {
            role,
            member,
            community,
            channel_id,
            message_id: None,
            kind,
            confirmation,
        });
        let outcome = service.execute(&action).await?;
        info!(
            action_id = %outcome.action_id,
            state = outcome.state.as_str(),
            "role command finished"
        );

        Ok(RoleCommandReport {
            outcome,
            member_roles: gateway.current_roles(community_id, member_id).await?,
            posted_messages: gateway.posted_messages().await,
        })
    }

    async fn check_permission(
        &self,
        community_id: CommunityId,
        member_id: MemberId,
        required: PermissionLevel,
    ) -> AppResult<PermissionReport> {
        let community = self.find_community(&community_id).await?;
        let member = self.member_or_newcomer(&community_id, &member_id).await;
        let allowed = self
            .permission_checker()
            .decide(&member_id, member.role_ids(), &community, required)
            .await;

        Ok(PermissionReport {
            community_id,
            member_id,
            required,
            allowed,
        })
    }

    async fn update_rank(
        &self,
        community_id: CommunityId,
        member_id: MemberId,
        current_rank: i64,
    ) -> AppResult<RankReport> {
        let member = self.member_or_newcomer(&community_id, &member_id).await;
        let previous_rank = self
            .directory
            .find_user_rank(&member_id, &community_id)
            .await?
            .map_or(0, |rank| rank.rank());

        let service = RoleRuleService::new(
            self.directory.clone(),
            Arc::new(ConsoleMessagingGateway::new()),
            self.config.command_prefix.clone(),
        );
        let config = service.find_community_config(&community_id).await?;
        let veteran_notice =
            service.veteran_notice(&config, previous_rank, current_rank, &member_id);
        self.directory.save_member(member, Some(current_rank)).await;

        Ok(RankReport {
            community_id,
            member_id,
            previous_rank,
            current_rank,
            veteran_notice,
        })
    }

    async fn summarize(&self, community_id: &CommunityId) -> AppResult<ConfigurationSummary> {
        ConfigurationService::new(self.directory.clone())
            .with_call_timeout(self.config.call_timeout)
            .summarize(community_id)
            .await
    }

    fn permission_checker(&self) -> PermissionChecker {
        PermissionChecker::new(self.config.superuser_id.clone(), self.directory.clone())
            .with_call_timeout(self.config.call_timeout)
    }

    async fn find_community(&self, community_id: &CommunityId) -> AppResult<Community> {
        self.directory
            .find_community(community_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("community '{community_id}' is unknown")))
    }

    async fn member_or_newcomer(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> MemberIdentity {
        match self.directory.find_member(community_id, member_id).await {
            Some(member) => member,
            None => MemberIdentity::new(
                member_id.clone(),
                member_id.as_str(),
                community_id.clone(),
                Vec::new(),
            ),
        }
    }
}

fn to_json(report: &impl Serialize) -> AppResult<Value> {
    serde_json::to_value(report)
        .map_err(|error| AppError::Internal(format!("failed to serialize report: {error}")))
}
