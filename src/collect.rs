//! Runs every requested query concurrently and gathers titled sections.

use tracing::{debug, error, instrument};

use crate::channel::{Channels, Query};
use crate::error::Result;
use crate::source::{ChannelSource, NameDiscovery};

pub const FAV: &str = "FAV";
pub const SRL: &str = "SRL";
pub const CUSTOM: &str = "CUSTOM";
pub const GAME: &str = "GAME";

/// Which queries to run. `None` / `false` disables a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub favorites: Option<Vec<String>>,
    pub speedrun: bool,
    pub custom: Option<Vec<String>>,
    pub game: Option<String>,
}

/// Sorted result of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub channels: Channels,
}

impl Section {
    fn from_result(title: &'static str, result: Result<Channels>) -> Self {
        let channels = match result {
            Ok(channels) => {
                debug!(section = title, live = channels.len(), "query done");
                channels.sorted()
            }
            Err(e) => {
                error!(section = title, "{e}");
                Channels::new()
            }
        };
        Self { title, channels }
    }
}

/// Run the plan. Sections come back as FAV, SRL, CUSTOM, GAME regardless of
/// completion order; disabled or failed queries yield empty sections.
#[instrument(skip_all)]
pub async fn collect(
    source: &dyn ChannelSource,
    discovery: &dyn NameDiscovery,
    plan: &Plan,
) -> Vec<Section> {
    let (fav, srl, custom, game) = tokio::join!(
        run_names(source, plan.favorites.as_deref()),
        run_discovery(source, discovery, plan.speedrun),
        run_names(source, plan.custom.as_deref()),
        run_game(source, plan.game.as_deref()),
    );

    vec![
        Section::from_result(FAV, fav),
        Section::from_result(SRL, srl),
        Section::from_result(CUSTOM, custom),
        Section::from_result(GAME, game),
    ]
}

async fn run_names(source: &dyn ChannelSource, names: Option<&[String]>) -> Result<Channels> {
    match names {
        Some(names) => {
            debug!(provider = source.name(), names = names.len(), "looking up channels");
            source.query(&Query::Names(names.to_vec())).await
        }
        None => Ok(Channels::new()),
    }
}

async fn run_discovery(
    source: &dyn ChannelSource,
    discovery: &dyn NameDiscovery,
    enabled: bool,
) -> Result<Channels> {
    if !enabled {
        return Ok(Channels::new());
    }
    let names = discovery.live_names().await?;
    debug!(provider = discovery.name(), names = names.len(), "names discovered");
    source.get_channels(&names).await
}

async fn run_game(source: &dyn ChannelSource, game: Option<&str>) -> Result<Channels> {
    match game {
        Some(game) => {
            debug!(provider = source.name(), game, "looking up game");
            source.query(&Query::Game(game.to_string())).await
        }
        None => Ok(Channels::new()),
    }
}
