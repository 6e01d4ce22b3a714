//! Application services and ports.

#![forbid(unsafe_code)]

mod call_timeout;
mod configuration_service;
mod permission_service;
mod role_ports;
mod role_rule_service;

#[cfg(test)]
mod fakes;

pub use call_timeout::CallTimeout;
pub use configuration_service::{ConfigurationService, ConfigurationSummary};
pub use permission_service::PermissionChecker;
pub use role_ports::{DirectoryStore, MemberLockCoordinator, MessagingGateway};
pub use role_rule_service::{RoleActionOutcome, RoleActionState, RoleRuleService, RuleMessage};
