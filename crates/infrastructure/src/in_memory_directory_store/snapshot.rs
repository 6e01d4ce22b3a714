use rolekeeper_core::{
    AppError, AppResult, ChannelId, CommunityId, MemberId, MemberIdentity, RoleGroupId, RoleId,
};
use rolekeeper_domain::{Community, CommunityConfig, GroupType, PermissionLevel, Role, RoleGroup};
use serde::Deserialize;

/// Serialized directory contents used to seed [`super::InMemoryDirectoryStore`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySnapshot {
    /// Communities with their settings.
    #[serde(default)]
    pub communities: Vec<CommunityRecord>,
    /// Role groups of every community.
    #[serde(default)]
    pub groups: Vec<RoleGroupRecord>,
    /// Roles of every community.
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    /// Known members with their held roles and rank.
    #[serde(default)]
    pub members: Vec<MemberRecord>,
}

impl DirectorySnapshot {
    /// Parses a snapshot from its JSON form.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|error| {
            AppError::Validation(format!("invalid directory snapshot: {error}"))
        })
    }
}

/// Stored community and its configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityRecord {
    /// Community identifier.
    pub id: CommunityId,
    /// Member owning the community.
    pub owner_id: MemberId,
    /// Greeting sent to new members.
    #[serde(default)]
    pub welcome_message: Option<String>,
    /// Channel the greeting is posted in.
    #[serde(default)]
    pub welcome_channel: Option<ChannelId>,
    /// Rules new members must agree to.
    #[serde(default)]
    pub rule_agreement: Option<String>,
    /// Rank unlocking the veteran role.
    #[serde(default)]
    pub veteran_rank: Option<i64>,
    /// Role unlocked by the veteran rank.
    #[serde(default)]
    pub veteran_role: Option<RoleId>,
    /// Channel bot announcements go to.
    #[serde(default)]
    pub bot_channel: Option<ChannelId>,
    /// Role given on join.
    #[serde(default)]
    pub starter_role: Option<RoleId>,
    /// Role given on rule agreement.
    #[serde(default)]
    pub base_role: Option<RoleId>,
    /// Whether the bot is active in the community.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl CommunityRecord {
    pub(super) fn into_parts(self) -> (Community, CommunityConfig) {
        let community = Community::new(self.id.clone(), self.owner_id);
        let mut config = CommunityConfig::new(self.id);
        config.welcome_message = self.welcome_message;
        config.welcome_channel = self.welcome_channel;
        config.rule_agreement = self.rule_agreement;
        config.veteran_rank = self.veteran_rank;
        config.veteran_role = self.veteran_role;
        config.bot_channel = self.bot_channel;
        config.starter_role = self.starter_role;
        config.base_role = self.base_role;
        config.enabled = self.enabled;

        (community, config)
    }
}

/// Stored role group.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleGroupRecord {
    /// Group identifier.
    pub id: RoleGroupId,
    /// Owning community.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Constraint discipline.
    #[serde(default, rename = "type")]
    pub group_type: GroupType,
}

impl RoleGroupRecord {
    pub(super) fn into_group(self) -> AppResult<RoleGroup> {
        RoleGroup::new(self.id, self.community_id, self.name, self.group_type)
    }
}

/// Stored role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    /// Platform role identifier.
    pub id: RoleId,
    /// Owning community.
    pub community_id: CommunityId,
    /// Display name members use in commands.
    pub name: String,
    /// Groups the role belongs to, in order.
    #[serde(default)]
    pub groups: Vec<RoleGroupId>,
    /// Text posted when the role is granted; its presence requires confirmation.
    #[serde(default)]
    pub confirmation_message: Option<String>,
    /// Command privilege carried by the role.
    #[serde(default = "permission_by_default")]
    pub permission: PermissionLevel,
}

fn permission_by_default() -> PermissionLevel {
    PermissionLevel::All
}

impl RoleRecord {
    pub(super) fn into_role(self) -> AppResult<Role> {
        let role = Role::new(self.id, self.community_id, self.name)?
            .with_groups(self.groups)
            .with_permission(self.permission);

        match self.confirmation_message {
            Some(message) => role.with_confirmation_message(message),
            None => Ok(role),
        }
    }
}

/// Stored member of one community.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRecord {
    /// Platform member identifier.
    pub id: MemberId,
    /// Community the member belongs to.
    pub community_id: CommunityId,
    /// Display name.
    pub display_name: String,
    /// Roles currently held.
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// Accumulated points, when ranked.
    #[serde(default)]
    pub rank: Option<i64>,
}

impl MemberRecord {
    pub(super) fn into_identity(self) -> (MemberIdentity, Option<i64>) {
        (
            MemberIdentity::new(self.id, self.display_name, self.community_id, self.roles),
            self.rank,
        )
    }
}
