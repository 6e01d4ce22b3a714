use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use rolekeeper_core::{AppError, AppResult, ChannelId, CommunityId, MemberId, RoleGroupId, RoleId};
use rolekeeper_domain::{CommunityConfig, PermissionLevel, Role, RoleGroup, UserServerRank};
use tokio::sync::Mutex;

use crate::role_ports::{DirectoryStore, MessagingGateway};

pub(crate) fn community_id(value: &str) -> CommunityId {
    CommunityId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn member_id(value: &str) -> MemberId {
    MemberId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn role_id(value: &str) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn channel_id(value: &str) -> ChannelId {
    ChannelId::new(value).unwrap_or_else(|_| unreachable!())
}

#[derive(Default)]
pub(crate) struct FakeDirectoryStore {
    pub(crate) roles: HashMap<RoleId, Role>,
    pub(crate) groups: HashMap<RoleGroupId, RoleGroup>,
    pub(crate) configs: HashMap<CommunityId, CommunityConfig>,
    pub(crate) ranks: HashMap<MemberId, i64>,
    pub(crate) unreachable_groups: HashSet<RoleGroupId>,
    pub(crate) permissions_unreachable: bool,
    pub(crate) config_delay: Option<Duration>,
    pub(crate) related_roles_lookups: Mutex<usize>,
}

impl FakeDirectoryStore {
    pub(crate) fn insert_role(&mut self, role: Role) {
        self.roles.insert(role.id().clone(), role);
    }

    pub(crate) fn insert_group(&mut self, group: RoleGroup) {
        self.groups.insert(group.id(), group);
    }

    pub(crate) fn insert_config(&mut self, config: CommunityConfig) {
        self.configs.insert(config.community_id.clone(), config);
    }
}

#[async_trait]
impl DirectoryStore for FakeDirectoryStore {
    async fn find_role(
        &self,
        _community_id: &CommunityId,
        role_id: &RoleId,
    ) -> AppResult<Option<Role>> {
        Ok(self.roles.get(role_id).cloned())
    }

    async fn find_role_group(&self, group_id: RoleGroupId) -> AppResult<Option<RoleGroup>> {
        Ok(self.groups.get(&group_id).cloned())
    }

    async fn list_related_roles(&self, group_id: RoleGroupId) -> AppResult<Vec<RoleId>> {
        *self.related_roles_lookups.lock().await += 1;
        if self.unreachable_groups.contains(&group_id) {
            return Err(AppError::Unavailable(format!(
                "directory store unreachable while listing group '{group_id}'"
            )));
        }

        let mut related_roles = self
            .roles
            .values()
            .filter(|role| role.group_ids().contains(&group_id))
            .map(|role| role.id().clone())
            .collect::<Vec<_>>();
        related_roles.sort();
        Ok(related_roles)
    }

    async fn resolve_permissions(
        &self,
        _community_id: &CommunityId,
        role_ids: &[RoleId],
    ) -> AppResult<Vec<PermissionLevel>> {
        if self.permissions_unreachable {
            return Err(AppError::Unavailable(
                "directory store unreachable while resolving permissions".to_owned(),
            ));
        }

        Ok(role_ids
            .iter()
            .filter_map(|role_id| self.roles.get(role_id))
            .map(Role::permission)
            .collect())
    }

    async fn find_community_config(
        &self,
        community_id: &CommunityId,
    ) -> AppResult<Option<CommunityConfig>> {
        if let Some(delay) = self.config_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.configs.get(community_id).cloned())
    }

    async fn find_user_rank(
        &self,
        member_id: &MemberId,
        community_id: &CommunityId,
    ) -> AppResult<Option<UserServerRank>> {
        Ok(self.ranks.get(member_id).map(|rank| {
            UserServerRank::new(member_id.clone(), community_id.clone(), *rank)
        }))
    }
}

#[derive(Default)]
pub(crate) struct FakeGateway {
    pub(crate) member_roles: Mutex<HashMap<MemberId, BTreeSet<RoleId>>>,
    pub(crate) messages: Mutex<Vec<(ChannelId, String)>>,
    pub(crate) grant_attempts: Mutex<Vec<RoleId>>,
    pub(crate) roles_unreachable: bool,
    pub(crate) rejected_revokes: HashSet<RoleId>,
    pub(crate) rejected_grants: HashSet<RoleId>,
    pub(crate) rejects_messages: bool,
}

impl FakeGateway {
    pub(crate) fn holding(member_id: MemberId, role_ids: &[RoleId]) -> Self {
        Self {
            member_roles: Mutex::new(HashMap::from([(
                member_id,
                role_ids.iter().cloned().collect(),
            )])),
            ..Self::default()
        }
    }

    pub(crate) async fn roles_of(&self, member_id: &MemberId) -> BTreeSet<RoleId> {
        self.member_roles
            .lock()
            .await
            .get(member_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessagingGateway for FakeGateway {
    async fn grant_role(
        &self,
        _community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()> {
        self.grant_attempts.lock().await.push(role_id.clone());
        if self.rejected_grants.contains(role_id) {
            return Err(AppError::Rejected(format!("missing access to grant '{role_id}'")));
        }

        self.member_roles
            .lock()
            .await
            .entry(member_id.clone())
            .or_default()
            .insert(role_id.clone());
        Ok(())
    }

    async fn revoke_role(
        &self,
        _community_id: &CommunityId,
        member_id: &MemberId,
        role_id: &RoleId,
    ) -> AppResult<()> {
        if self.rejected_revokes.contains(role_id) {
            return Err(AppError::Rejected(format!("missing access to revoke '{role_id}'")));
        }

        if let Some(roles) = self.member_roles.lock().await.get_mut(member_id) {
            roles.remove(role_id);
        }
        Ok(())
    }

    async fn current_roles(
        &self,
        _community_id: &CommunityId,
        member_id: &MemberId,
    ) -> AppResult<Vec<RoleId>> {
        if self.roles_unreachable {
            return Err(AppError::Unavailable(
                "gateway unreachable while reading member roles".to_owned(),
            ));
        }

        Ok(self.roles_of(member_id).await.into_iter().collect())
    }

    async fn send_message(&self, channel_id: &ChannelId, text: &str) -> AppResult<()> {
        if self.rejects_messages {
            return Err(AppError::Rejected("cannot post in channel".to_owned()));
        }

        self.messages
            .lock()
            .await
            .push((channel_id.clone(), text.to_owned()));
        Ok(())
    }
}
