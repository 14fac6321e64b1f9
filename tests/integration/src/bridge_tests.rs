//! End-to-end scenarios: config -> engine -> role and nickname sync
//!
//! Each test loads a `linksync.toml` and a world snapshot from a temporary
//! directory, runs the engines the way the CLI does, and inspects the world.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use link_config::BridgeConfig;
use link_core::{Permission, Someone, SyncCause, SyncConfig, SyncEngine, SyncResult};
use link_roles::{GroupSyncModule, NicknameSyncModule, World};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

const PLAYER: &str = "6a1f0b1e-0000-4000-8000-000000000001";

fn player() -> Uuid {
    Uuid::parse_str(PLAYER).unwrap()
}

fn setup(config: &str) -> (TempDir, BridgeConfig, Arc<World>) {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("linksync.toml");
    fs::write(
        &config_path,
        format!(
            "[audit]\ndirectory = \"{}\"\n{config}",
            temp.path().join("logs").display()
        ),
    )
    .unwrap();

    let world_path = temp.path().join("world.json");
    let world = serde_json::json!({
        "roles": [
            {"id": 123, "guild-id": 1, "name": "VIP", "position": 1},
            {"id": 900, "guild-id": 1, "name": "Admin", "position": 50},
            {"id": 777, "guild-id": 1, "name": "Builder", "position": 1}
        ],
        "members": [{"guild-id": 1, "user-id": 42, "nickname": "Steve"}],
        "bots": [{"guild-id": 1, "permissions": ["manage-roles", "manage-nicknames"], "top-role-position": 10}],
        "groups": [{"player": PLAYER, "group": "vip-group"}],
        "links": [{"player": PLAYER, "user": 42}]
    });
    fs::write(&world_path, world.to_string()).unwrap();

    let config = BridgeConfig::load(&config_path).unwrap();
    let world = Arc::new(World::load(&world_path).unwrap());
    (temp, config, world)
}

fn group_engine(config: &BridgeConfig, world: &Arc<World>) -> SyncEngine<GroupSyncModule> {
    let engine = SyncEngine::new(
        GroupSyncModule::new(world.clone(), Some(world.clone())),
        world.clone(),
        config.audit_log(),
    );
    engine.reload(config.group_sync_configs());
    engine
}

fn audit_lines(dir: &Path, name: &str) -> Vec<String> {
    let path = dir
        .join("logs")
        .join(format!("{name}-{}.log", chrono::Local::now().format("%Y-%m-%d")));
    fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn role_sync_scenario() {
    let (temp, config, world) = setup(
        r#"
[[group-sync.pairs]]
group = "vip-group"
role = 123
direction = "bidirectional"
tie-breaker = "game"
"#,
    );
    let engine = group_engine(&config, &world);
    let pair = &config.group_sync_configs()[0];

    let first = engine.on_player_connected(player()).await;
    let second = engine.on_player_connected(player()).await;

    assert_eq!(first.result_for(pair), Some(SyncResult::AddDiscord));
    assert_eq!(second.result_for(pair), Some(SyncResult::AlreadyInSync));
    assert_eq!(world.snapshot().members[0].roles, vec![123]);

    let audit = audit_lines(temp.path(), "groupsync");
    assert_eq!(audit.len(), 1);
    assert!(audit[0].ends_with("Group sync for player 6a1f0b1e-0000-4000-8000-000000000001 (player joined): Add role: [vip-group:123]"));
}

#[tokio::test]
async fn mixed_results_are_grouped() {
    let (temp, config, world) = setup(
        r#"
[[group-sync.pairs]]
group = "vip-group"
role = 123

[[group-sync.pairs]]
group = "vip-group"
role = 900

[[group-sync.pairs]]
group = "ghost"
role = 555
tie-breaker = "discord"

[[group-sync.pairs]]
group = "vip-group"
role = 777
direction = "discord-to-game"
"#,
    );
    let engine = group_engine(&config, &world);

    let report = engine.resync_all(SyncCause::Command, Someone::user(42)).await;
    let lines: Vec<String> = report
        .lines("group", "role")
        .into_iter()
        .map(|line| line.text)
        .collect();

    assert_eq!(report.results().len(), 4);
    assert!(lines.contains(&"Add role: [vip-group:123]".to_string()), "{lines:?}");
    assert!(lines.iter().any(|line| line.starts_with("Bot doesn't have a role above the synced role")));
    assert!(lines.contains(&"Role doesn't exist: [ghost:555]".to_string()), "{lines:?}");
    assert!(lines.contains(&"Wrong direction: [vip-group:777]".to_string()), "{lines:?}");

    // Only the actual mutation is audited
    assert_eq!(audit_lines(temp.path(), "groupsync").len(), 1);
}

#[tokio::test]
async fn discord_role_event_with_one_way_pair_keeps_game_state() {
    let (_temp, config, world) = setup(
        r#"
[[group-sync.pairs]]
group = "vip-group"
role = 123
direction = "game-to-discord"
"#,
    );
    let engine = group_engine(&config, &world);

    let report = engine
        .discord_changed(SyncCause::DiscordChange, Someone::user(42), &123, Some(true))
        .await
        .unwrap();

    assert_eq!(
        report.result_for(&config.group_sync_configs()[0]),
        Some(SyncResult::WrongDirection)
    );
    assert_eq!(world.snapshot().groups.len(), 1);
    assert_eq!(world.game_writes(), 0);
}

#[tokio::test]
async fn missing_manage_roles_never_touches_members() {
    let (_temp, config, world) = setup("[[group-sync.pairs]]\ngroup = \"vip-group\"\nrole = 123\n");
    world.update(|state| state.bots[0].permissions = vec![Permission::ManageNicknames]);
    let engine = group_engine(&config, &world);

    let report = engine.on_account_linked(player(), 42).await;

    assert_eq!(
        report.result_for(&config.group_sync_configs()[0]),
        Some(SyncResult::MissingPermission(Permission::ManageRoles))
    );
    assert_eq!(world.discord_writes(), 0);
}

#[tokio::test]
async fn nickname_sync_from_config() {
    let (temp, config, world) = setup(
        r#"
[nickname-sync]
enabled = true
guild = 1
tie-breaker = "discord"
"#,
    );
    let nickname = config.nickname_sync_config().unwrap();
    let engine = SyncEngine::new(
        NicknameSyncModule::new(world.clone(), world.clone()),
        world.clone(),
        config.audit_log(),
    );
    engine.reload([nickname.clone()]);

    let reports = engine.resync_everyone(SyncCause::Command).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].result_for(&nickname), Some(SyncResult::AddGame));
    assert_eq!(world.snapshot().nicknames.get(&player()).map(String::as_str), Some("Steve"));
    assert_eq!(audit_lines(temp.path(), "nicknamesync").len(), 1);
    assert_eq!(nickname.describe(), "guild 1");
}

#[tokio::test]
async fn static_links_override_the_snapshot() {
    let other = "6a1f0b1e-0000-4000-8000-000000000002";
    let (_temp, config, world) = setup(&format!(
        "[[group-sync.pairs]]\ngroup = \"vip-group\"\nrole = 123\n\n[[links]]\nplayer = \"{other}\"\nuser = 42\n"
    ));
    let engine = SyncEngine::new(
        GroupSyncModule::new(world.clone(), Some(world.clone())),
        Arc::new(config.static_links()),
        None,
    );
    engine.reload(config.group_sync_configs());

    // The configured link points user 42 at a player without the group
    let report = engine.on_discord_member_joined(42).await;

    assert_eq!(
        report.result_for(&config.group_sync_configs()[0]),
        Some(SyncResult::AlreadyInSync)
    );
    let unlinked = engine.on_player_connected(player()).await;
    assert_eq!(unlinked.all_fail_reason(), Some(SyncResult::NotLinked));
}
