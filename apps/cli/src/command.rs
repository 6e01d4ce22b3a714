use clap::{Parser, Subcommand, ValueEnum};
use rolekeeper_core::{AppResult, CommunityId, MemberId};
use rolekeeper_domain::{ConfirmationSignal, PermissionLevel, RoleActionKind};

/// Runs role policy commands against a directory snapshot.
#[derive(Debug, Parser)]
#[command(
    name = "rolekeeper-cli",
    version,
    about = "Role policy engine for community chat bots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// One command line invocation.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Grants or revokes a role through the rule engine.
    Role {
        #[arg(value_enum)]
        change: RoleChange,
        #[arg(value_parser = community_id)]
        community_id: CommunityId,
        #[arg(value_parser = member_id)]
        member_id: MemberId,
        /// Role identifier or case-insensitive name.
        role: String,
        /// Trailing `confirm` acknowledging the role's confirmation message.
        #[arg(value_enum)]
        confirm: Option<Confirm>,
    },
    /// Reports whether a member passes a permission level.
    Permission {
        #[arg(value_parser = community_id)]
        community_id: CommunityId,
        #[arg(value_parser = member_id)]
        member_id: MemberId,
        #[arg(value_enum)]
        required: RequiredLevel,
    },
    /// Records a member's new rank and reports the veteran notice.
    Rank {
        #[arg(value_parser = community_id)]
        community_id: CommunityId,
        #[arg(value_parser = member_id)]
        member_id: MemberId,
        #[arg(allow_negative_numbers = true)]
        rank: i64,
    },
    /// Prints the community configuration summary.
    Summary {
        #[arg(value_parser = community_id)]
        community_id: CommunityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleChange {
    Grant,
    Revoke,
}

impl From<RoleChange> for RoleActionKind {
    fn from(change: RoleChange) -> Self {
        match change {
            RoleChange::Grant => Self::Grant,
            RoleChange::Revoke => Self::Revoke,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Confirm {
    Confirm,
}

/// Maps the optional trailing word onto the engine's confirmation signal.
pub fn confirmation(confirm: Option<Confirm>) -> ConfirmationSignal {
    match confirm {
        Some(Confirm::Confirm) => ConfirmationSignal::Observed,
        None => ConfirmationSignal::Missing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequiredLevel {
    None,
    All,
    Mod,
    #[value(name = "guild_owner")]
    GuildOwner,
    Master,
}

impl From<RequiredLevel> for PermissionLevel {
    fn from(level: RequiredLevel) -> Self {
        match level {
            RequiredLevel::None => Self::None,
            RequiredLevel::All => Self::All,
            RequiredLevel::Mod => Self::Mod,
            RequiredLevel::GuildOwner => Self::GuildOwner,
            RequiredLevel::Master => Self::Master,
        }
    }
}

fn community_id(value: &str) -> AppResult<CommunityId> {
    CommunityId::new(value)
}

fn member_id(value: &str) -> AppResult<MemberId> {
    MemberId::new(value)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;
    use rolekeeper_domain::{ConfirmationSignal, PermissionLevel};

    use super::{Cli, CliCommand, Confirm, RequiredLevel, RoleChange, confirmation};

    fn parse(line: &str) -> Result<CliCommand, clap::Error> {
        Cli::try_parse_from(std::iter::once("rolekeeper-cli").chain(line.split_whitespace()))
            .map(|cli| cli.command)
    }

    #[test]
    fn role_command_detects_trailing_confirmation() {
        let command = parse("role grant 1001 3001 Purple confirm");

        match command {
            Ok(CliCommand::Role {
                change,
                role,
                confirm,
                ..
            }) => {
                assert_eq!(change, RoleChange::Grant);
                assert_eq!(role, "Purple");
                assert_eq!(confirm, Some(Confirm::Confirm));
                assert_eq!(confirmation(confirm), ConfirmationSignal::Observed);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn role_command_without_confirmation_is_missing_it() {
        let command = parse("role revoke 1001 3001 Founder");

        assert!(matches!(
            command,
            Ok(CliCommand::Role {
                change: RoleChange::Revoke,
                confirm: None,
                ..
            })
        ));
        assert_eq!(confirmation(None), ConfirmationSignal::Missing);
    }

    #[test]
    fn permission_command_parses_the_level() {
        let command = parse("permission 1001 3002 guild_owner");

        match command {
            Ok(CliCommand::Permission { required, .. }) => {
                assert_eq!(required, RequiredLevel::GuildOwner);
                assert_eq!(PermissionLevel::from(required), PermissionLevel::GuildOwner);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rank_command_accepts_negative_points() {
        let command = parse("rank 1001 3001 -15");

        assert!(matches!(command, Ok(CliCommand::Rank { rank: -15, .. })));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        for line in [
            "role promote 1001 3001 Red",
            "role grant 1001 3001 Red please",
            "permission 1001 3002 admin",
            "rank 1001 3001 lots",
            "summary",
            "",
        ] {
            assert!(parse(line).is_err(), "{line}");
        }

        assert!(matches!(
            parse("permission 1001 3002 admin").map_err(|error| error.kind()),
            Err(ErrorKind::InvalidValue)
        ));
    }
}
