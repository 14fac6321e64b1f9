//! Sync result and cause vocabulary
//!
//! Closed enumerations describing why a sync ran ([`SyncCause`]) and what
//! happened ([`SyncResult`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Guild-level Discord permission a synchronizable may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    Administrator,
    ManageRoles,
    ManageNicknames,
}

impl Permission {
    /// Name as shown in the Discord client
    pub fn display_name(&self) -> &'static str {
        match self {
            Permission::Administrator => "Administrator",
            Permission::ManageRoles => "Manage Roles",
            Permission::ManageNicknames => "Manage Nicknames",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of synchronizing one configuration for one subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncResult {
    /// Game-side state was added
    AddGame,
    /// Game-side state was removed
    RemoveGame,
    /// Discord-side state was added
    AddDiscord,
    /// Discord-side state was removed
    RemoveDiscord,
    /// Both sides already agree
    AlreadyInSync,
    /// The configured direction forbids the correction that was needed
    WrongDirection,
    /// The subject has no linked counterpart
    NotLinked,
    /// The configured Discord role does not exist
    RoleDoesntExist,
    /// The role is above the bot in the role hierarchy
    RoleCannotInteract,
    /// The Discord user is not a member of the guild
    NotAGuildMember,
    /// The bot lacks a guild-level permission
    MissingPermission(Permission),
    /// No game permission backend is available
    NoPermissionProvider,
    /// Unexpected failure, details were logged separately
    Failed,
}

impl SyncResult {
    /// Whether this result is a failure
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            SyncResult::AddGame
                | SyncResult::RemoveGame
                | SyncResult::AddDiscord
                | SyncResult::RemoveDiscord
                | SyncResult::AlreadyInSync
                | SyncResult::WrongDirection
                | SyncResult::NotLinked
        )
    }

    /// Whether a mutation actually happened on either side
    pub fn is_update(&self) -> bool {
        matches!(
            self,
            SyncResult::AddGame
                | SyncResult::RemoveGame
                | SyncResult::AddDiscord
                | SyncResult::RemoveDiscord
        )
    }

    /// Render this result using the synchronizable's side terms
    ///
    /// `game_term` and `discord_term` name the synchronized thing on each
    /// side, e.g. `"group"` and `"role"`.
    pub fn format(&self, game_term: &str, discord_term: &str) -> String {
        match self {
            SyncResult::AddGame => format!("Add {game_term}"),
            SyncResult::RemoveGame => format!("Remove {game_term}"),
            SyncResult::AddDiscord => format!("Add {discord_term}"),
            SyncResult::RemoveDiscord => format!("Remove {discord_term}"),
            SyncResult::AlreadyInSync => "Already in sync".to_string(),
            SyncResult::WrongDirection => "Wrong direction".to_string(),
            SyncResult::NotLinked => "Accounts not linked".to_string(),
            SyncResult::RoleDoesntExist => "Role doesn't exist".to_string(),
            SyncResult::RoleCannotInteract => "Bot doesn't have a role above the synced role (cannot interact)".to_string(),
            SyncResult::NotAGuildMember => "User is not part of the server the role is in".to_string(),
            SyncResult::MissingPermission(permission) => {
                format!("Bot does not have the \"{permission}\" permission")
            }
            SyncResult::NoPermissionProvider => "No permission provider available".to_string(),
            SyncResult::Failed => "Failed".to_string(),
        }
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("game", "Discord"))
    }
}

/// Why a sync was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncCause {
    /// Requested through the command surface
    Command,
    /// Periodic resync timer
    Timer,
    /// A player connected to the game server
    PlayerJoin,
    /// A user joined the Discord guild
    DiscordMemberJoin,
    /// A player linked their Discord account
    AccountLinked,
    /// Game-side state changed
    GameChange,
    /// Discord-side state changed
    DiscordChange,
}

impl fmt::Display for SyncCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyncCause::Command => "command",
            SyncCause::Timer => "timed synchronization",
            SyncCause::PlayerJoin => "player joined",
            SyncCause::DiscordMemberJoin => "user joined Discord server",
            SyncCause::AccountLinked => "accounts linked",
            SyncCause::GameChange => "game change",
            SyncCause::DiscordChange => "Discord change",
        };
        f.write_str(text)
    }
}
