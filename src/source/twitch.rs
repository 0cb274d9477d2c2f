//! Twitch Helix channel source.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::channel::{Channel, Channels};
use crate::error::Result;
use crate::http_client::JsonGet;
use crate::paginate::{Paginator, MAX_PAGE_SIZE};
use crate::resolver::{GameEntry, GameResolver};
use crate::source::ChannelSource;

/// Helix caps repeated `user_login` parameters at 100 per request.
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

pub struct TwitchSource {
    http: Arc<dyn JsonGet>,
    resolver: Arc<GameResolver>,
    page_size: usize,
}

impl TwitchSource {
    pub fn new(http: Arc<dyn JsonGet>, resolver: Arc<GameResolver>) -> Self {
        Self {
            http,
            resolver,
            page_size: MAX_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn paginator(&self) -> Paginator<'_> {
        Paginator::new(self.http.as_ref(), self.page_size)
    }

    /// Walk `streams` for one filter, without game resolution.
    async fn streams(&self, params: &[(String, String)]) -> Result<Channels> {
        let entries: Vec<StreamEntry> = self.paginator().walk("streams", params).await.into_result()?;
        Ok(entries.into_iter().map(Channel::from).collect())
    }
}

#[async_trait]
impl ChannelSource for TwitchSource {
    fn name(&self) -> &'static str {
        "twitch"
    }

    #[instrument(skip_all, fields(names = names.len()))]
    async fn get_channels(&self, names: &[String]) -> Result<Channels> {
        let logins: Vec<&str> = names
            .iter()
            .map(|n| n.as_str().trim())
            .filter(|n| !n.is_empty())
            .collect();

        let mut channels = Channels::new();
        for chunk in logins.chunks(MAX_LOGINS_PER_REQUEST) {
            let params: Vec<(String, String)> = chunk
                .iter()
                .map(|login| ("user_login".to_string(), (*login).to_string()))
                .collect();
            channels.extend(self.streams(&params).await?);
        }
        debug!(live = channels.len(), "streams fetched");

        self.resolver.apply(&mut channels).await?;
        Ok(channels)
    }

    #[instrument(skip(self))]
    async fn get_game_channels(&self, game: &str) -> Result<Channels> {
        let params = [("name".to_string(), game.to_string())];
        let games: Vec<GameEntry> = self.paginator().walk("games", &params).await.into_result()?;
        let Some(found) = games.into_iter().next() else {
            debug!("no such game");
            return Ok(Channels::new());
        };
        self.resolver.remember(&found.id, &found.name).await;

        let mut channels = self
            .streams(&[("game_id".to_string(), found.id.clone())])
            .await?;
        self.resolver.apply(&mut channels).await?;
        Ok(channels)
    }
}

/// Subset of a Helix `streams` entry.
#[derive(Debug, Deserialize)]
struct StreamEntry {
    user_name: String,
    #[serde(default)]
    game_id: String,
    #[serde(default)]
    title: String,
    viewer_count: u64,
}

impl From<StreamEntry> for Channel {
    fn from(entry: StreamEntry) -> Self {
        Channel {
            streamer: entry.user_name,
            description: entry.title,
            game: entry.game_id,
            viewers: entry.viewer_count,
        }
    }
}
