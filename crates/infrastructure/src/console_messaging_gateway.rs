//! Console messaging gateway for development. Logs platform calls to tracing
//! output and keeps role membership in memory.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use rolekeeper_application::MessagingGateway;
use rolekeeper_core::{AppResult, ChannelId, CommunityId, MemberId, MemberIdentity, RoleId};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

/// Message posted through the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedMessage {
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Message text.
    pub text: String,
}

/// Development gateway that logs role changes and messages to the console.
#[derive(Debug, Default)]
pub struct ConsoleMessagingGateway {
    member_roles: RwLock<HashMap<(CommunityId, MemberId), BTreeSet<RoleId>>>,
    posted_messages: RwLock<Vec<PostedMessage>>,
}

impl ConsoleMessagingGateway {
    /// Creates a gateway with no known members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the roles a member currently holds.
    #[must_use]
    pub fn with_member(mut self, member: &MemberIdentity) -> Self {
        self.member_roles.get_mut().insert(
            (member.community_id().clone(), member.member_id().clone()),
            member.role_ids().iter().cloned().collect(),
        );
        self
    }

    /// Returns every message posted so far.
    pub async fn posted_messages(&self) -> Vec<PostedMessage> {
        self.posted_messages.read().await.clone()
    }
}

#[async_trait]
impl MessagingGateway for ConsoleMessagingGateway {
    async fn grant_role(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()> {
        info!(
            community_id = %community_id,
            member_id = %member_id,
            role_id = %role_id,
            "granted role"
        );
        self.member_roles
            .write()
            .await
            .entry((community_id.clone(), member_id.clone()))
            .or_default()
            .insert(role_id.clone());

        Ok(())
    }

    async fn revoke_role(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()> {
        info!(
            community_id = %community_id,
            member_id = %member_id,
            role_id = %role_id,
            "revoked role"
        );
        if let Some(roles) = self
            .member_roles
            .write()
            .await
            .get_mut(&(community_id.clone(), member_id.clone()))
        {
            roles.remove(role_id);
        }

        Ok(())
    }

    async fn current_roles(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> AppResult<Vec<RoleId>> {
        Ok(self
            .member_roles
            .read()
            .await
            .get(&(community_id.clone(), member_id.clone()))
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn send_message(&self, channel_id: &ChannelId, text: &str) -> AppResult<()> {
        info!(
            channel_id = %channel_id,
            "--- MESSAGE (console) ---\n{}\n--- END MESSAGE ---",
            text
        );
        self.posted_messages.write().await.push(PostedMessage {
            channel_id: channel_id.clone(),
            text: text.to_owned(),
        });

        Ok(())
    }
}
