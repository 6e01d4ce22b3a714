use std::collections::HashMap;

use rolekeeper_core::{AppError, AppResult, RoleGroupId, RoleId};
use rolekeeper_domain::{CommunityConfig, Role, RoleGroup, RoleRule};
use tracing::warn;

use super::RoleRuleService;

impl RoleRuleService {
    /// Builds the ordered rules that govern changes of one role.
    ///
    /// Order: `Points` (veteran role with a configured threshold),
    /// `Confirmation` (role has confirmation text), then per group in the
    /// role's group order `Exclusive` and, for groups that also block
    /// removal, `NoRemove`. A failed group lookup aborts the composition.
    pub async fn rules_for(
        &self,
        config: &CommunityConfig,
        role: &Role,
        command_prefix: &str,
    ) -> AppResult<Vec<RoleRule>> {
        let mut rules = Vec::new();

        if let Some(threshold) = config.veteran_threshold()
            && &threshold.role_id == role.id()
        {
            rules.push(RoleRule::Points {
                threshold: threshold.rank,
            });
        }

        if role.confirmation_message().is_some() {
            rules.push(RoleRule::Confirmation {
                command_prefix: command_prefix.to_owned(),
            });
        }

        let mut related_roles_by_group: HashMap<RoleGroupId, Vec<RoleId>> = HashMap::new();
        for group_id in role.group_ids() {
            let group = self.find_role_group(*group_id).await.inspect_err(|error| {
                warn!(
                    role_id = %role.id(),
                    group_id = %group_id,
                    error = %error,
                    "failed to resolve role group while composing rules"
                );
            })?;
            let group_type = group.group_type();

            if group_type.is_exclusive() {
                let related_roles = match related_roles_by_group.get(group_id) {
                    Some(related_roles) => related_roles.clone(),
                    None => {
                        let related_roles = self
                            .call_timeout
                            .run(
                                "related roles lookup",
                                self.directory.list_related_roles(*group_id),
                            )
                            .await
                            .inspect_err(|error| {
                                warn!(
                                    role_id = %role.id(),
                                    group_id = %group_id,
                                    error = %error,
                                    "failed to list related roles while composing rules"
                                );
                            })?;
                        related_roles_by_group.insert(*group_id, related_roles.clone());
                        related_roles
                    }
                };
                rules.push(RoleRule::Exclusive { related_roles });
            }

            if group_type.blocks_removal() {
                rules.push(RoleRule::NoRemove { group });
            }
        }

        Ok(rules)
    }

    async fn find_role_group(&self, group_id: RoleGroupId) -> AppResult<RoleGroup> {
        self.call_timeout
            .run("role group lookup", self.directory.find_role_group(group_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role group '{group_id}' does not exist")))
    }
}
