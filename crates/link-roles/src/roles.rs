//! Discord role membership helpers
//!
//! Every precondition failure is a typed [`Error::SyncFail`] carrying its
//! [`SyncResult`]. Nothing here retries; the next timer tick or event does.

use link_core::{Error, Permission, Result, SyncResult};

use crate::discord::{DiscordApi, DiscordRole};

/// Whether `user_id` currently holds `role_id`
///
/// # Errors
///
/// Fails with [`SyncResult::RoleDoesntExist`] when the role is unknown and
/// with [`SyncResult::NotAGuildMember`] when the user is not in the role's
/// guild.
pub async fn has_role(discord: &dyn DiscordApi, user_id: u64, role_id: u64) -> Result<bool> {
    let role = discord
        .role_by_id(role_id)
        .await?
        .ok_or(Error::fail(SyncResult::RoleDoesntExist))?;
    let member = discord
        .guild_member(role.guild_id, user_id)
        .await?
        .ok_or(Error::fail(SyncResult::NotAGuildMember))?;
    Ok(member.has_role(role_id))
}

/// Check that the bot may add or remove `role_id`
///
/// Returns the role on success.
pub async fn check_role_change_preconditions(discord: &dyn DiscordApi, role_id: u64) -> Result<DiscordRole> {
    let role = discord
        .role_by_id(role_id)
        .await?
        .ok_or(Error::fail(SyncResult::RoleDoesntExist))?;
    let bot = discord
        .self_member(role.guild_id)
        .await?
        .ok_or_else(|| Error::discord(format!("bot is not a member of guild {}", role.guild_id)))?;

    if !bot.can_interact(&role) {
        return Err(Error::fail(SyncResult::RoleCannotInteract));
    }
    if !bot.has_permission(Permission::ManageRoles) {
        return Err(Error::fail(SyncResult::MissingPermission(Permission::ManageRoles)));
    }
    Ok(role)
}

/// Give (`add`) or take away `role_id` from `user_id`
///
/// Preconditions are checked first; on failure Discord is never called.
pub async fn do_role_change(discord: &dyn DiscordApi, user_id: u64, role_id: u64, add: bool) -> Result<SyncResult> {
    let role = check_role_change_preconditions(discord, role_id).await?;
    if add {
        discord.add_role(role.guild_id, user_id, role.id).await?;
        tracing::debug!(user_id, role = %role.name, "Added role");
        Ok(SyncResult::AddDiscord)
    } else {
        discord.remove_role(role.guild_id, user_id, role.id).await?;
        tracing::debug!(user_id, role = %role.name, "Removed role");
        Ok(SyncResult::RemoveDiscord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::{GuildMember, SelfMember};
    use crate::memory::{World, WorldState};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const GUILD: u64 = 1;
    const ROLE: u64 = 123;
    const USER: u64 = 42;

    fn world(permissions: Vec<Permission>, bot_position: u32) -> World {
        World::new(WorldState {
            roles: vec![DiscordRole {
                id: ROLE,
                guild_id: GUILD,
                name: "vip".to_string(),
                position: 3,
            }],
            members: vec![GuildMember {
                guild_id: GUILD,
                user_id: USER,
                roles: vec![],
                nickname: None,
            }],
            bots: vec![SelfMember {
                guild_id: GUILD,
                permissions,
                top_role_position: bot_position,
                owner: false,
            }],
            ..WorldState::default()
        })
    }

    #[tokio::test]
    async fn has_role_reports_unknown_role_and_member() {
        let world = world(vec![Permission::ManageRoles], 10);

        let missing_role = has_role(&world, USER, 999).await.unwrap_err();
        let missing_member = has_role(&world, 7, ROLE).await.unwrap_err();

        assert_eq!(missing_role.sync_result(), Some(SyncResult::RoleDoesntExist));
        assert_eq!(missing_member.sync_result(), Some(SyncResult::NotAGuildMember));
        assert!(!has_role(&world, USER, ROLE).await.unwrap());
    }

    #[rstest]
    #[case(vec![Permission::ManageRoles], 2, SyncResult::RoleCannotInteract)]
    #[case(vec![], 10, SyncResult::MissingPermission(Permission::ManageRoles))]
    #[case(vec![Permission::ManageNicknames], 10, SyncResult::MissingPermission(Permission::ManageRoles))]
    #[tokio::test]
    async fn failed_preconditions_never_touch_the_member(
        #[case] permissions: Vec<Permission>,
        #[case] bot_position: u32,
        #[case] expected: SyncResult,
    ) {
        let world = world(permissions, bot_position);

        let error = do_role_change(&world, USER, ROLE, true).await.unwrap_err();

        assert_eq!(error.sync_result(), Some(expected));
        assert_eq!(world.discord_writes(), 0);
        assert!(!has_role(&world, USER, ROLE).await.unwrap());
    }

    #[tokio::test]
    async fn role_change_adds_and_removes() {
        let world = world(vec![Permission::Administrator], 10);

        assert_eq!(do_role_change(&world, USER, ROLE, true).await.unwrap(), SyncResult::AddDiscord);
        assert!(has_role(&world, USER, ROLE).await.unwrap());

        assert_eq!(do_role_change(&world, USER, ROLE, false).await.unwrap(), SyncResult::RemoveDiscord);
        assert!(!has_role(&world, USER, ROLE).await.unwrap());
        assert_eq!(world.discord_writes(), 2);
    }
}
