//! Registry generations and periodic timers across reloads

use std::sync::Arc;
use std::time::Duration;

use link_config::BridgeConfig;
use link_core::{SyncConfig, SyncEngine};
use link_roles::memory::{AccountLink, GroupGrant};
use link_roles::{DiscordRole, GroupSyncModule, GuildMember, SelfMember, World, WorldState};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn world() -> Arc<World> {
    let player = Uuid::from_u128(1);
    Arc::new(World::new(WorldState {
        roles: vec![DiscordRole {
            id: 123,
            guild_id: 1,
            name: "VIP".to_string(),
            position: 1,
        }],
        members: vec![GuildMember {
            guild_id: 1,
            user_id: 42,
            roles: vec![],
            nickname: None,
        }],
        bots: vec![SelfMember {
            guild_id: 1,
            permissions: vec![link_core::Permission::Administrator],
            top_role_position: 5,
            owner: false,
        }],
        groups: vec![GroupGrant {
            player,
            group: "vip".to_string(),
            context: None,
        }],
        links: vec![AccountLink { player, user: 42 }],
        ..WorldState::default()
    }))
}

fn engine(world: &Arc<World>) -> SyncEngine<GroupSyncModule> {
    SyncEngine::new(
        GroupSyncModule::new(world.clone(), Some(world.clone())),
        world.clone(),
        None,
    )
}

fn config(content: &str) -> BridgeConfig {
    let config: BridgeConfig = content.parse().unwrap();
    config.validate().unwrap();
    config
}

async fn settle_until(condition: impl Fn() -> bool) {
    for _ in 0..50 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn timer_resyncs_every_linked_account() {
    let world = world();
    let engine = engine(&world);
    let timed = config(
        "[[group-sync.pairs]]\ngroup = \"vip\"\nrole = 123\ntimer = { enabled = true, cycle-minutes = 2 }\n",
    );
    engine.reload(timed.group_sync_configs());
    assert_eq!(engine.active_timers(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(world.snapshot().members[0].roles.is_empty());

    tokio::time::sleep(Duration::from_secs(61)).await;
    settle_until(|| !world.snapshot().members[0].roles.is_empty()).await;
    assert_eq!(world.snapshot().members[0].roles, vec![123]);

    // Drift is corrected on the next tick
    world.update(|state| state.members[0].roles.clear());
    tokio::time::sleep(Duration::from_secs(120)).await;
    settle_until(|| !world.snapshot().members[0].roles.is_empty()).await;
    assert_eq!(world.snapshot().members[0].roles, vec![123]);
}

#[tokio::test(start_paused = true)]
async fn reload_cancels_previous_timers() {
    let world = world();
    let engine = engine(&world);
    engine.reload(
        config("[[group-sync.pairs]]\ngroup = \"vip\"\nrole = 123\ntimer = { enabled = true, cycle-minutes = 1 }\n")
            .group_sync_configs(),
    );
    engine.reload(config("[[group-sync.pairs]]\ngroup = \"vip\"\nrole = 123\n").group_sync_configs());
    assert_eq!(engine.active_timers(), 0);

    tokio::time::sleep(Duration::from_secs(300)).await;
    settle_until(|| false).await;

    assert!(world.snapshot().members[0].roles.is_empty());
    assert_eq!(world.discord_writes(), 0);
}

#[tokio::test]
async fn in_flight_snapshots_survive_reload() {
    let world = world();
    let engine = engine(&world);
    let first = engine.reload(config("[[group-sync.pairs]]\ngroup = \"vip\"\nrole = 123\n").group_sync_configs());
    let before = engine.registry().snapshot();

    let second = engine.reload(
        config("[[group-sync.pairs]]\ngroup = \"staff\"\nrole = 123\n\n[[group-sync.pairs]]\ngroup = \"\"\nrole = 5\n")
            .group_sync_configs(),
    );

    assert_eq!(second.generation, first.generation + 1);
    assert_eq!(second.skipped_unset, 1);
    assert_eq!(before.configs()[0].describe(), "vip:123");
    assert_eq!(engine.registry().snapshot().configs()[0].describe(), "staff:123");
    assert!(engine.registry().snapshot().configs_for_game(&"vip".to_string()).is_empty());
}

#[tokio::test]
async fn shutdown_stops_timers() {
    let world = world();
    let engine = engine(&world);
    engine.reload(
        config("[[group-sync.pairs]]\ngroup = \"vip\"\nrole = 123\ntimer = { enabled = true, cycle-minutes = 1 }\n")
            .group_sync_configs(),
    );
    assert_eq!(engine.active_timers(), 1);

    engine.shutdown();

    assert_eq!(engine.active_timers(), 0);
}
