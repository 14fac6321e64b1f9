//! Concrete synchronizables for linksync
//!
//! - [`GroupSyncModule`]: game permission group membership paired with a Discord role
//! - [`NicknameSyncModule`]: game display nickname paired with the guild member nickname
//!
//! Both talk to the outside world only through the collaborator traits in
//! [`discord`] and [`game`]. [`memory::World`] implements every collaborator
//! (and [`link_core::LinkProvider`]) over a JSON snapshot.

pub mod discord;
pub mod error;
pub mod game;
pub mod group_sync;
pub mod memory;
pub mod nickname_sync;
pub mod roles;

pub use discord::{DiscordApi, DiscordRole, GuildMember, SelfMember};
pub use error::{Error, Result};
pub use game::{GameNicknames, GamePermissions};
pub use group_sync::{GroupSyncConfig, GroupSyncModule};
pub use memory::{World, WorldState};
pub use nickname_sync::{NicknameSyncConfig, NicknameSyncModule};
