use rolekeeper_core::{ChannelId, CommunityId, MemberId, RoleId};
use serde::{Deserialize, Serialize};

const SUMMARY_PREVIEW_LENGTH: usize = 25;

/// Platform snapshot of a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    id: CommunityId,
    owner_id: MemberId,
}

impl Community {
    /// Creates a community snapshot.
    #[must_use]
    pub fn new(id: CommunityId, owner_id: MemberId) -> Self {
        Self { id, owner_id }
    }

    /// Returns the community identifier.
    #[must_use]
    pub fn id(&self) -> &CommunityId {
        &self.id
    }

    /// Returns the designated owner.
    #[must_use]
    pub fn owner_id(&self) -> &MemberId {
        &self.owner_id
    }

    /// Returns whether the member is the designated owner.
    #[must_use]
    pub fn is_owned_by(&self, member_id: &MemberId) -> bool {
        &self.owner_id == member_id
    }
}

/// Active veteran pairing: the role unlocked once a member reaches the rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeteranThreshold {
    /// Role unlocked by the threshold.
    pub role_id: RoleId,
    /// Minimum rank required.
    pub rank: i64,
}

/// Inconsistency found in a community configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigDiagnostic {
    /// A welcome channel is set without a welcome message.
    WelcomeChannelWithoutMessage,
    /// A rule agreement is set without a base role to grant.
    RuleAgreementWithoutBaseRole,
    /// A veteran rank is set without a veteran role.
    VeteranRankWithoutRole,
    /// A veteran role is set without a veteran rank.
    VeteranRoleWithoutRank,
}

impl ConfigDiagnostic {
    /// Returns the human-readable description.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::WelcomeChannelWithoutMessage => "welcome channel but no message!",
            Self::RuleAgreementWithoutBaseRole => "Rule agreement found but no base role set",
            Self::VeteranRankWithoutRole => "veteran rank provided but no role provided!",
            Self::VeteranRoleWithoutRank => "veteran role provided but no rank provided!",
        }
    }
}

/// Per-community settings served by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Community the settings belong to.
    pub community_id: CommunityId,
    /// Message sent to new members.
    #[serde(default)]
    pub welcome_message: Option<String>,
    /// Channel the welcome message is posted in; direct message when unset.
    #[serde(default)]
    pub welcome_channel: Option<ChannelId>,
    /// Text members agree to before receiving the base role.
    #[serde(default)]
    pub rule_agreement: Option<String>,
    /// Rank required for the veteran role.
    #[serde(default)]
    pub veteran_rank: Option<i64>,
    /// Role unlocked by the veteran rank.
    #[serde(default)]
    pub veteran_role: Option<RoleId>,
    /// Channel reserved for bot commands.
    #[serde(default)]
    pub bot_channel: Option<ChannelId>,
    /// Role given to members on join.
    #[serde(default)]
    pub starter_role: Option<RoleId>,
    /// Role given once the rule agreement is accepted.
    #[serde(default)]
    pub base_role: Option<RoleId>,
    /// Whether the bot is active in the community.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl CommunityConfig {
    /// Creates an enabled configuration with nothing else set.
    #[must_use]
    pub fn new(community_id: CommunityId) -> Self {
        Self {
            community_id,
            welcome_message: None,
            welcome_channel: None,
            rule_agreement: None,
            veteran_rank: None,
            veteran_role: None,
            bot_channel: None,
            starter_role: None,
            base_role: None,
            enabled: true,
        }
    }

    /// Returns the veteran pairing when both halves are configured.
    #[must_use]
    pub fn veteran_threshold(&self) -> Option<VeteranThreshold> {
        match (&self.veteran_role, self.veteran_rank) {
            (Some(role_id), Some(rank)) => Some(VeteranThreshold {
                role_id: role_id.clone(),
                rank,
            }),
            _ => None,
        }
    }

    /// Lists every inconsistency in the configuration.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ConfigDiagnostic> {
        let mut diagnostics = Vec::new();
        if self.welcome_channel.is_some() && self.welcome_message.is_none() {
            diagnostics.push(ConfigDiagnostic::WelcomeChannelWithoutMessage);
        }
        if self.rule_agreement.is_some() && self.base_role.is_none() {
            diagnostics.push(ConfigDiagnostic::RuleAgreementWithoutBaseRole);
        }
        if self.veteran_rank.is_some() && self.veteran_role.is_none() {
            diagnostics.push(ConfigDiagnostic::VeteranRankWithoutRole);
        }
        if self.veteran_role.is_some() && self.veteran_rank.is_none() {
            diagnostics.push(ConfigDiagnostic::VeteranRoleWithoutRank);
        }

        diagnostics
    }

    /// Renders a one-line description of the configured fields with
    /// misconfigurations flagged inline.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = String::from("Server: ");

        if let Some(message) = &self.welcome_message {
            push_field(&mut summary, "WelcomeMessage", &preview(message));
        }
        match &self.welcome_channel {
            Some(channel) => {
                if self.welcome_message.is_none() {
                    push_misconfig(&mut summary, ConfigDiagnostic::WelcomeChannelWithoutMessage);
                }
                push_field(&mut summary, "WelcomeChannel", channel.as_str());
            }
            None if self.welcome_message.is_some() => {
                push_field(&mut summary, "WelcomeChannel", "Sent via DM");
            }
            None => {}
        }
        if let Some(agreement) = &self.rule_agreement {
            push_field(&mut summary, "RuleAgreement", &preview(agreement));
            if self.base_role.is_none() {
                push_misconfig(&mut summary, ConfigDiagnostic::RuleAgreementWithoutBaseRole);
            }
        }
        if let Some(channel) = &self.bot_channel {
            push_field(&mut summary, "BotChannel", channel.as_str());
        }
        if let Some(role) = &self.starter_role {
            push_field(&mut summary, "StarterRole", role.as_str());
        }
        if let Some(role) = &self.base_role {
            push_field(&mut summary, "BaseRole", role.as_str());
        }
        if self.enabled {
            push_field(&mut summary, "Enabled", "true");
        }
        if let Some(rank) = self.veteran_rank {
            push_field(&mut summary, "VeteranRank", &rank.to_string());
            if self.veteran_role.is_none() {
                push_misconfig(&mut summary, ConfigDiagnostic::VeteranRankWithoutRole);
            }
        }
        if let Some(role) = &self.veteran_role {
            push_field(&mut summary, "VeteranRole", role.as_str());
            if self.veteran_rank.is_none() {
                push_misconfig(&mut summary, ConfigDiagnostic::VeteranRoleWithoutRank);
            }
        }

        summary
    }
}

fn preview(value: &str) -> String {
    if value.chars().count() > SUMMARY_PREVIEW_LENGTH {
        let truncated: String = value.chars().take(SUMMARY_PREVIEW_LENGTH).collect();
        format!("{truncated}...")
    } else {
        value.to_owned()
    }
}

fn push_field(summary: &mut String, name: &str, value: &str) {
    summary.push_str(&format!("{{{name}: `{value}`}}"));
}

fn push_misconfig(summary: &mut String, diagnostic: ConfigDiagnostic) {
    push_field(summary, "!!! MISCONFIG !!!", diagnostic.message());
}
