use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rolekeeper_core::{AppError, MemberId, RoleId};
use rolekeeper_domain::{Community, PermissionLevel, Role};

use crate::fakes::{FakeDirectoryStore, community_id, member_id, role_id};

use super::PermissionChecker;

const SUPERUSER: &str = "100";
const OWNER: &str = "200";
const MEMBER: &str = "300";

fn community() -> Community {
    Community::new(community_id("1"), member_id(OWNER))
}

fn role_with_level(id: &str, level: PermissionLevel) -> Role {
    Role::new(role_id(id), community_id("1"), format!("level-{}", level.as_str()))
        .unwrap_or_else(|_| unreachable!())
        .with_permission(level)
}

fn directory() -> FakeDirectoryStore {
    let mut directory = FakeDirectoryStore::default();
    directory.insert_role(role_with_level("10", PermissionLevel::All));
    directory.insert_role(role_with_level("11", PermissionLevel::Mod));
    directory.insert_role(role_with_level("12", PermissionLevel::GuildOwner));
    directory.insert_role(role_with_level("13", PermissionLevel::Master));
    directory
}

fn checker(directory: FakeDirectoryStore) -> PermissionChecker {
    PermissionChecker::new(member_id(SUPERUSER), Arc::new(directory))
}

#[tokio::test]
async fn all_is_open_to_everyone_even_without_directory() {
    let directory = FakeDirectoryStore {
        permissions_unreachable: true,
        ..FakeDirectoryStore::default()
    };
    let checker = checker(directory);

    assert!(
        checker
            .decide(&member_id(MEMBER), &[], &community(), PermissionLevel::All)
            .await
    );
    assert!(
        checker
            .has_all_permission(&member_id(MEMBER), &[], &community())
            .await
    );
}

#[tokio::test]
async fn superuser_overrides_every_level_including_none() {
    let checker = checker(FakeDirectoryStore::default());

    for level in PermissionLevel::all() {
        assert!(
            checker
                .decide(&member_id(SUPERUSER), &[], &community(), *level)
                .await,
            "{}",
            level.as_str()
        );
    }
}

#[tokio::test]
async fn owner_override_stops_at_guild_owner() {
    let checker = checker(FakeDirectoryStore::default());
    let owner = member_id(OWNER);

    assert!(
        checker
            .decide(&owner, &[], &community(), PermissionLevel::None)
            .await
    );
    assert!(
        checker
            .decide(&owner, &[], &community(), PermissionLevel::GuildOwner)
            .await
    );
    assert!(
        !checker
            .decide(&owner, &[], &community(), PermissionLevel::Master)
            .await
    );
}

#[tokio::test]
async fn none_denies_regular_members_whatever_their_roles() {
    let checker = checker(directory());
    let roles = [role_id("10"), role_id("11"), role_id("12"), role_id("13")];

    assert!(
        !checker
            .decide(&member_id(MEMBER), &roles, &community(), PermissionLevel::None)
            .await
    );
}

#[tokio::test]
async fn role_levels_are_compared_by_rank() {
    let checker = checker(directory());
    let member = member_id(MEMBER);
    let roles = [role_id("10"), role_id("11")];

    assert!(checker.has_mod_permission(&member, &roles, &community()).await);
    assert!(
        !checker
            .decide(&member, &roles, &community(), PermissionLevel::GuildOwner)
            .await
    );
    assert!(
        !checker
            .has_mod_permission(&member, &[role_id("999")], &community())
            .await
    );
}

#[tokio::test]
async fn unreachable_directory_degrades_to_denied() {
    let mut directory = directory();
    directory.permissions_unreachable = true;
    let checker = checker(directory);

    assert!(
        !checker
            .decide(
                &member_id(MEMBER),
                &[role_id("13")],
                &community(),
                PermissionLevel::Mod
            )
            .await
    );
}

#[tokio::test]
async fn require_reports_forbidden() {
    let checker = checker(directory());

    let result = checker
        .require(
            &member_id(MEMBER),
            &[role_id("10")],
            &community(),
            PermissionLevel::Mod,
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(checker.is_superuser(&member_id(SUPERUSER)));
    assert!(PermissionChecker::is_community_owner(
        &community(),
        &member_id(OWNER)
    ));
}

fn level() -> impl Strategy<Value = PermissionLevel> {
    prop::sample::select(PermissionLevel::all().to_vec())
}

fn actors() -> impl Strategy<Value = MemberId> {
    prop::sample::select(vec![SUPERUSER, OWNER, MEMBER]).prop_map(member_id)
}

fn held_roles() -> impl Strategy<Value = Vec<RoleId>> {
    prop::sample::subsequence(vec!["10", "11", "12", "13", "999"], 0..=5)
        .prop_map(|ids| ids.into_iter().map(role_id).collect())
}

fn decide_blocking(
    checker: &PermissionChecker,
    actor: &MemberId,
    roles: &[RoleId],
    required: PermissionLevel,
) -> Result<bool, TestCaseError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    Ok(runtime.block_on(checker.decide(actor, roles, &community(), required)))
}

proptest! {
    #[test]
    fn decisions_are_monotonic_in_the_required_level(
        actor in actors(),
        roles in held_roles(),
        required in level(),
        lower in level(),
    ) {
        prop_assume!(lower <= required && lower != PermissionLevel::None);
        let checker = checker(directory());

        if decide_blocking(&checker, &actor, &roles, required)? {
            prop_assert!(decide_blocking(&checker, &actor, &roles, lower)?);
        }
    }

    #[test]
    fn all_grants_and_none_denies_regular_members(roles in held_roles()) {
        let checker = checker(directory());
        let member = member_id(MEMBER);

        prop_assert!(decide_blocking(&checker, &member, &roles, PermissionLevel::All)?);
        prop_assert!(!decide_blocking(&checker, &member, &roles, PermissionLevel::None)?);
    }
}
