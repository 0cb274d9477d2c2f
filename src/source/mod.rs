//! Where live channels come from.
//!
//! A [`ChannelSource`] turns channel names (or a game) into [`Channels`]
//! with full metadata. A [`NameDiscovery`] only knows *who* is live and
//! relies on a `ChannelSource` for the details.
//!
//! - [`twitch::TwitchSource`]: Helix `streams` + `games`
//! - [`srl::SpeedrunSource`]: SpeedRunsLive team listing

pub mod srl;
pub mod twitch;

use async_trait::async_trait;

use crate::channel::{Channels, Query};
use crate::error::Result;

pub use srl::SpeedrunSource;
pub use twitch::TwitchSource;

/// Provider of channel records with metadata.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Short lowercase provider name (e.g., `"twitch"`).
    fn name(&self) -> &'static str;

    /// Live channels among `names`. Offline channels are simply absent.
    async fn get_channels(&self, names: &[String]) -> Result<Channels>;

    /// Every live channel playing `game`.
    async fn get_game_channels(&self, game: &str) -> Result<Channels>;

    async fn query(&self, query: &Query) -> Result<Channels> {
        match query {
            Query::Names(names) => self.get_channels(names).await,
            Query::Game(game) => self.get_game_channels(game).await,
        }
    }
}

/// Provider of the names of channels that are currently live.
#[async_trait]
pub trait NameDiscovery: Send + Sync {
    fn name(&self) -> &'static str;

    async fn live_names(&self) -> Result<Vec<String>>;
}
