use chrono::{DateTime, Utc};
use rolekeeper_domain::{RoleAction, RoleActionKind, RoleRuleKind};
use serde::Serialize;
use uuid::Uuid;

/// Protocol states of one role action evaluation.
///
/// `Composed -> Checking -> (Blocked | Applying) -> (Applied | Failed)`.
/// Outcomes only ever carry one of the three final states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleActionState {
    /// Applicable rules were composed.
    Composed,
    /// Rule preconditions are being checked.
    Checking,
    /// A rule precondition rejected the action.
    Blocked,
    /// Rule side effects are being applied.
    Applying,
    /// Every side effect succeeded.
    Applied,
    /// At least one side effect failed; the others were still attempted.
    Failed,
}

impl RoleActionState {
    /// Returns a stable value for logs and transport.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Composed => "composed",
            Self::Checking => "checking",
            Self::Blocked => "blocked",
            Self::Applying => "applying",
            Self::Applied => "applied",
            Self::Failed => "failed",
        }
    }
}

/// Member-facing message attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMessage {
    /// Rule that produced the message; `None` for the underlying role change.
    pub rule: Option<RoleRuleKind>,
    /// Message text.
    pub message: String,
}

impl RuleMessage {
    pub(crate) fn from_rule(rule: RoleRuleKind, message: impl Into<String>) -> Self {
        Self {
            rule: Some(rule),
            message: message.into(),
        }
    }

    pub(crate) fn from_role_change(message: impl Into<String>) -> Self {
        Self {
            rule: None,
            message: message.into(),
        }
    }
}

/// Final result of one role action.
#[derive(Debug, Clone, Serialize)]
pub struct RoleActionOutcome {
    /// Correlation identifier of the action.
    pub action_id: Uuid,
    /// Direction of the action.
    pub kind: RoleActionKind,
    /// Final state: `Blocked`, `Applied` or `Failed`.
    pub state: RoleActionState,
    /// Rules composed for the role, in evaluation order.
    pub rules: Vec<RoleRuleKind>,
    /// The rejection message when blocked, otherwise every apply failure.
    pub messages: Vec<RuleMessage>,
    /// Whether a gateway call for the target role was made, successful or not.
    pub role_change_attempted: bool,
    /// Whether the target role was granted or revoked.
    pub role_change_performed: bool,
    /// When the evaluation finished.
    pub completed_at: DateTime<Utc>,
}

impl RoleActionOutcome {
    pub(crate) fn new(
        action: &RoleAction,
        state: RoleActionState,
        rules: Vec<RoleRuleKind>,
        messages: Vec<RuleMessage>,
    ) -> Self {
        Self {
            action_id: action.action_id(),
            kind: action.kind(),
            state,
            rules,
            messages,
            role_change_attempted: false,
            role_change_performed: false,
            completed_at: Utc::now(),
        }
    }

    /// Returns whether the action went through without any failure.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.state == RoleActionState::Applied
    }
}
