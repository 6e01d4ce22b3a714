use rolekeeper_core::{ChannelId, MemberIdentity, RoleId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Community, Role};

/// Direction of a role change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleActionKind {
    /// Give the role to the member.
    Grant,
    /// Take the role away from the member.
    Revoke,
}

impl RoleActionKind {
    /// Returns a stable value for logs and transport.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
        }
    }
}

/// Whether the caller observed the member's explicit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationSignal {
    /// No confirmation accompanied the request.
    #[default]
    Missing,
    /// The member confirmed, as detected by the command layer.
    Observed,
}

/// Inputs for creating a [`RoleAction`].
#[derive(Debug, Clone)]
pub struct RoleActionInput {
    /// Role to grant or revoke.
    pub role: Role,
    /// Member requesting the change, who is also its subject.
    pub member: MemberIdentity,
    /// Community the change happens in.
    pub community: Community,
    /// Channel the request arrived in.
    pub channel_id: ChannelId,
    /// Message that carried the request, when there was one.
    pub message_id: Option<String>,
    /// Direction of the change.
    pub kind: RoleActionKind,
    /// Confirmation detected upstream.
    pub confirmation: ConfirmationSignal,
}

/// One in-flight grant or revoke intent.
#[derive(Debug, Clone)]
pub struct RoleAction {
    action_id: Uuid,
    role: Role,
    member: MemberIdentity,
    community: Community,
    channel_id: ChannelId,
    message_id: Option<String>,
    kind: RoleActionKind,
    confirmation: ConfirmationSignal,
}

impl RoleAction {
    /// Creates a role action with a fresh correlation identifier.
    #[must_use]
    pub fn new(input: RoleActionInput) -> Self {
        Self {
            action_id: Uuid::new_v4(),
            role: input.role,
            member: input.member,
            community: input.community,
            channel_id: input.channel_id,
            message_id: input.message_id,
            kind: input.kind,
            confirmation: input.confirmation,
        }
    }

    /// Replaces the member's roles with a fresher view, keeping the action id.
    #[must_use]
    pub fn with_member_roles(mut self, role_ids: Vec<RoleId>) -> Self {
        self.member = self.member.with_role_ids(role_ids);
        self
    }

    /// Returns the correlation identifier used in logs.
    #[must_use]
    pub fn action_id(&self) -> Uuid {
        self.action_id
    }

    /// Returns the target role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Returns the acting member.
    #[must_use]
    pub fn member(&self) -> &MemberIdentity {
        &self.member
    }

    /// Returns the community.
    #[must_use]
    pub fn community(&self) -> &Community {
        &self.community
    }

    /// Returns the originating channel.
    #[must_use]
    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Returns the originating message, if any.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Returns the direction of the change.
    #[must_use]
    pub fn kind(&self) -> RoleActionKind {
        self.kind
    }

    /// Returns the upstream confirmation signal.
    #[must_use]
    pub fn confirmation(&self) -> ConfirmationSignal {
        self.confirmation
    }

    /// Returns whether the action grants the role.
    #[must_use]
    pub fn is_grant(&self) -> bool {
        self.kind == RoleActionKind::Grant
    }
}
