//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod community;
mod permission;
mod rank;
mod role;
mod role_action;
mod role_group;
mod role_rule;

pub use community::{Community, CommunityConfig, ConfigDiagnostic, VeteranThreshold};
pub use permission::PermissionLevel;
pub use rank::UserServerRank;
pub use role::Role;
pub use role_action::{ConfirmationSignal, RoleAction, RoleActionInput, RoleActionKind};
pub use role_group::{GroupType, ROLE_GROUP_NAME_MAX_LENGTH, RoleGroup, UNCATEGORIZED_GROUP};
pub use role_rule::{RoleRule, RoleRuleKind};
