use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use rolekeeper_application::DirectoryStore;
use rolekeeper_core::{
    AppError, AppResult, CommunityId, MemberId, MemberIdentity, RoleGroupId, RoleId,
};
use rolekeeper_domain::{
    Community, CommunityConfig, PermissionLevel, Role, RoleGroup, UserServerRank,
};
use tokio::sync::RwLock;
use tracing::info;

mod snapshot;

pub use snapshot::{CommunityRecord, DirectorySnapshot, MemberRecord, RoleGroupRecord, RoleRecord};

/// In-memory directory store seeded from a [`DirectorySnapshot`].
#[derive(Debug, Default)]
pub struct InMemoryDirectoryStore {
    communities: RwLock<HashMap<CommunityId, Community>>,
    configs: RwLock<HashMap<CommunityId, CommunityConfig>>,
    groups: RwLock<HashMap<RoleGroupId, RoleGroup>>,
    roles: RwLock<HashMap<(CommunityId, RoleId), Role>>,
    members: RwLock<HashMap<(CommunityId, MemberId), MemberIdentity>>,
    ranks: RwLock<HashMap<(CommunityId, MemberId), i64>>,
}

impl InMemoryDirectoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and validates a JSON snapshot from disk.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read directory snapshot '{}': {error}",
                path.display()
            ))
        })?;

        let store = Self::from_snapshot(DirectorySnapshot::from_json(raw.as_str())?)?;
        info!(path = %path.display(), "loaded directory snapshot");
        Ok(store)
    }

    /// Builds a store from a snapshot, validating every record.
    ///
    /// Groups must belong to a known community and roles may only reference
    /// groups of their own community.
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> AppResult<Self> {
        let mut communities = HashMap::new();
        let mut configs = HashMap::new();
        for record in snapshot.communities {
            let (community, config) = record.into_parts();
            if communities.contains_key(community.id()) {
                return Err(AppError::Validation(format!(
                    "community '{}' is listed more than once",
                    community.id()
                )));
            }
            configs.insert(community.id().clone(), config);
            communities.insert(community.id().clone(), community);
        }

        let mut groups = HashMap::new();
        for record in snapshot.groups {
            let group = record.into_group()?;
            if !communities.contains_key(group.community_id()) {
                return Err(AppError::Validation(format!(
                    "role group '{}' references unknown community '{}'",
                    group.id(),
                    group.community_id()
                )));
            }
            if groups.insert(group.id(), group.clone()).is_some() {
                return Err(AppError::Validation(format!(
                    "role group '{}' is listed more than once",
                    group.id()
                )));
            }
        }

        let mut roles = HashMap::new();
        for record in snapshot.roles {
            let role = record.into_role()?;
            for group_id in role.group_ids() {
                let belongs = groups
                    .get(group_id)
                    .is_some_and(|group| group.community_id() == role.community_id());
                if !belongs {
                    return Err(AppError::Validation(format!(
                        "role '{}' references unknown role group '{group_id}'",
                        role.id()
                    )));
                }
            }
            roles.insert((role.community_id().clone(), role.id().clone()), role);
        }

        let mut members = HashMap::new();
        let mut ranks = HashMap::new();
        for record in snapshot.members {
            let (member, rank) = record.into_identity();
            let key = (member.community_id().clone(), member.member_id().clone());
            if let Some(rank) = rank {
                ranks.insert(key.clone(), rank);
            }
            members.insert(key, member);
        }

        Ok(Self {
            communities: RwLock::new(communities),
            configs: RwLock::new(configs),
            groups: RwLock::new(groups),
            roles: RwLock::new(roles),
            members: RwLock::new(members),
            ranks: RwLock::new(ranks),
        })
    }

    /// Stores a community together with its configuration.
    pub async fn save_community(&self, community: Community, config: CommunityConfig) {
        self.configs
            .write()
            .await
            .insert(community.id().clone(), config);
        self.communities
            .write()
            .await
            .insert(community.id().clone(), community);
    }

    /// Stores a role group, replacing any group with the same identifier.
    pub async fn save_role_group(&self, group: RoleGroup) {
        self.groups.write().await.insert(group.id(), group);
    }

    /// Stores a role, replacing any role with the same identifier.
    pub async fn save_role(&self, role: Role) {
        self.roles
            .write()
            .await
            .insert((role.community_id().clone(), role.id().clone()), role);
    }

    /// Stores a member and optionally its rank.
    pub async fn save_member(&self, member: MemberIdentity, rank: Option<i64>) {
        let key = (member.community_id().clone(), member.member_id().clone());
        match rank {
            Some(rank) => {
                self.ranks.write().await.insert(key.clone(), rank);
            }
            None => {
                self.ranks.write().await.remove(&key);
            }
        }
        self.members.write().await.insert(key, member);
    }

    /// Returns a community with its owner.
    pub async fn find_community(&self, community_id: &CommunityId) -> Option<Community> {
        self.communities.read().await.get(community_id).cloned()
    }

    /// Returns a known member of a community.
    pub async fn find_member(
        &self,
        community_id: &CommunityId,
        member_id: &MemberId,
    ) -> Option<MemberIdentity> {
        self.members
            .read()
            .await
            .get(&(community_id.clone(), member_id.clone()))
            .cloned()
    }

    /// Resolves a role by its identifier or, failing that, by its name
    /// ignoring case.
    pub async fn find_role_by_reference(
        &self,
        community_id: &CommunityId,
        reference: &str,
    ) -> Option<Role> {
        let roles = self.roles.read().await;
        let by_id = RoleId::new(reference)
            .ok()
            .and_then(|role_id| roles.get(&(community_id.clone(), role_id)));

        by_id
            .or_else(|| {
                roles.values().find(|role| {
                    role.community_id() == community_id
                        && role.name().as_str().eq_ignore_ascii_case(reference.trim())
                })
            })
            .cloned()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn find_role(
        &self,
        community_id: &CommunityId,
        role_id: &RoleId,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&(community_id.clone(), role_id.clone()))
            .cloned())
    }

    async fn find_role_group(&self, group_id: RoleGroupId) -> AppResult<Option<RoleGroup>> {
        Ok(self.groups.read().await.get(&group_id).cloned())
    }

    async fn list_related_roles(&self, group_id: RoleGroupId) -> AppResult<Vec<RoleId>> {
        let mut related_roles: Vec<RoleId> = self
            .roles
            .read()
            .await
            .values()
            .filter(|role| role.group_ids().contains(&group_id))
            .map(|role| role.id().clone())
            .collect();
        related_roles.sort();

        Ok(related_roles)
    }

    async fn resolve_permissions(
        &self,
        community_id: &CommunityId,
        role_ids: &[RoleId],
    ) -> AppResult<Vec<PermissionLevel>> {
        let roles = self.roles.read().await;

        Ok(role_ids
            .iter()
            .filter_map(|role_id| roles.get(&(community_id.clone(), role_id.clone())))
            .map(Role::permission)
            .collect())
    }

    async fn find_community_config(
        &self,
        community_id: &CommunityId,
    ) -> AppResult<Option<CommunityConfig>> {
        Ok(self.configs.read().await.get(community_id).cloned())
    }

    async fn find_user_rank(
        &self,
        member_id: &MemberId,
        community_id: &CommunityId,
    ) -> AppResult<Option<UserServerRank>> {
        Ok(self
            .ranks
            .read()
            .await
            .get(&(community_id.clone(), member_id.clone()))
            .map(|rank| UserServerRank::new(member_id.clone(), community_id.clone(), *rank)))
    }
}
