//! Synchronizable configuration
//!
//! Each configured sync (e.g. "group `vip` paired with role 123") is one
//! [`SyncConfig`] value. Instances are built by configuration loading and
//! handed to [`SyncRegistry::reload`](crate::SyncRegistry::reload).

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which way changes may flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// Only the Discord side is ever written
    GameToDiscord,
    /// Only the game side is ever written
    DiscordToGame,
    /// Either side may be written
    #[default]
    Bidirectional,
}

impl SyncDirection {
    /// Whether game state may be written to Discord
    pub fn allows_game_to_discord(&self) -> bool {
        !matches!(self, SyncDirection::DiscordToGame)
    }

    /// Whether Discord state may be written to the game
    pub fn allows_discord_to_game(&self) -> bool {
        !matches!(self, SyncDirection::GameToDiscord)
    }

    pub fn is_bidirectional(&self) -> bool {
        matches!(self, SyncDirection::Bidirectional)
    }
}

impl FromStr for SyncDirection {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "game-to-discord" => Ok(SyncDirection::GameToDiscord),
            "discord-to-game" => Ok(SyncDirection::DiscordToGame),
            "bidirectional" | "both" => Ok(SyncDirection::Bidirectional),
            _ => Err(Error::InvalidConfig {
                message: format!("unknown sync direction '{s}'"),
            }),
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::GameToDiscord => write!(f, "game-to-discord"),
            SyncDirection::DiscordToGame => write!(f, "discord-to-game"),
            SyncDirection::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// A side of the synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSide {
    #[default]
    Game,
    Discord,
}

impl FromStr for SyncSide {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "game" | "minecraft" => Ok(SyncSide::Game),
            "discord" => Ok(SyncSide::Discord),
            _ => Err(Error::InvalidConfig {
                message: format!("unknown sync side '{s}'"),
            }),
        }
    }
}

impl fmt::Display for SyncSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncSide::Game => write!(f, "game"),
            SyncSide::Discord => write!(f, "discord"),
        }
    }
}

/// Periodic resync timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cycle_minutes")]
    pub cycle_minutes: u64,
}

fn default_cycle_minutes() -> u64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cycle_minutes: default_cycle_minutes(),
        }
    }
}

impl TimerConfig {
    /// Timer period, or `None` when the timer is off
    pub fn period(&self) -> Option<Duration> {
        (self.enabled && self.cycle_minutes > 0)
            .then(|| Duration::from_secs(self.cycle_minutes.saturating_mul(60)))
    }
}

/// Settings shared by every synchronizable kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncSettings {
    #[serde(default)]
    pub direction: SyncDirection,
    #[serde(default)]
    pub tie_breaker: SyncSide,
    #[serde(default)]
    pub timer: TimerConfig,
}

impl SyncSettings {
    pub fn new(direction: SyncDirection, tie_breaker: SyncSide) -> Self {
        Self {
            direction,
            tie_breaker,
            timer: TimerConfig::default(),
        }
    }

    pub fn with_timer(mut self, cycle_minutes: u64) -> Self {
        self.timer = TimerConfig {
            enabled: true,
            cycle_minutes,
        };
        self
    }
}

/// One configured synchronizable
///
/// Immutable for the lifetime of a registry generation.
pub trait SyncConfig: fmt::Debug + Send + Sync + 'static {
    /// Identifier of the game-side object (e.g. a permission group name)
    type GameId: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;
    /// Identifier of the Discord-side object (e.g. a role id)
    type DiscordId: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn game_id(&self) -> Option<Self::GameId>;

    fn discord_id(&self) -> Option<Self::DiscordId>;

    fn settings(&self) -> &SyncSettings;

    /// Whether enough is configured for this entry to be used
    fn is_set(&self) -> bool;

    /// Whether `other` describes the same pairing
    fn is_same_as(&self, other: &Self) -> bool;

    /// Short description for logs and summaries
    fn describe(&self) -> String;

    fn direction(&self) -> SyncDirection {
        self.settings().direction
    }

    fn tie_breaker(&self) -> SyncSide {
        self.settings().tie_breaker
    }

    fn timer(&self) -> TimerConfig {
        self.settings().timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyncDirection::GameToDiscord, true, false)]
    #[case(SyncDirection::DiscordToGame, false, true)]
    #[case(SyncDirection::Bidirectional, true, true)]
    fn direction_permissions(
        #[case] direction: SyncDirection,
        #[case] to_discord: bool,
        #[case] to_game: bool,
    ) {
        assert_eq!(direction.allows_game_to_discord(), to_discord);
        assert_eq!(direction.allows_discord_to_game(), to_game);
    }

    #[rstest]
    #[case("game-to-discord", SyncDirection::GameToDiscord)]
    #[case("DISCORD_TO_GAME", SyncDirection::DiscordToGame)]
    #[case("both", SyncDirection::Bidirectional)]
    fn parses_directions(#[case] input: &str, #[case] expected: SyncDirection) {
        assert_eq!(input.parse::<SyncDirection>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<SyncDirection>().unwrap(), expected);
    }

    #[test]
    fn huge_timer_cycle_saturates() {
        let timer = TimerConfig {
            enabled: true,
            cycle_minutes: u64::MAX,
        };
        assert_eq!(timer.period(), Some(Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn rejects_unknown_side() {
        assert!("neither".parse::<SyncSide>().is_err());
    }

    #[test]
    fn timer_period() {
        assert_eq!(TimerConfig::default().period(), None);
        let settings = SyncSettings::default().with_timer(2);
        assert_eq!(settings.timer.period(), Some(Duration::from_secs(120)));

        let zero = TimerConfig {
            enabled: true,
            cycle_minutes: 0,
        };
        assert_eq!(zero.period(), None);
    }
}
