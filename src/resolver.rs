//! Maps Helix game IDs to display names.
//!
//! Two tiers: an in-memory map shared by every query in the process, and an
//! optional [`GameNameStore`] on disk. The memory map sits behind an async
//! mutex that is held for the whole lookup, network included, so concurrent
//! queries asking for the same game cause a single request.
//!
//! A failed `games` request fails the whole batch, including IDs that were
//! already cached.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::cache::{CacheLookup, GameNameStore};
use crate::channel::Channels;
use crate::error::Result;
use crate::http_client::JsonGet;
use crate::paginate::{Paginator, MAX_PAGE_SIZE};

/// Helix accepts at most this many `id` parameters per `games` request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct GameEntry {
    pub id: String,
    pub name: String,
}

pub struct GameResolver {
    http: Arc<dyn JsonGet>,
    page_size: usize,
    names: Mutex<HashMap<String, String>>,
    store: Option<Box<dyn GameNameStore>>,
}

impl GameResolver {
    pub fn new(http: Arc<dyn JsonGet>) -> Self {
        Self {
            http,
            page_size: MAX_PAGE_SIZE,
            names: Mutex::new(HashMap::new()),
            store: None,
        }
    }

    /// Add a persistent tier consulted before the network.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn GameNameStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Names for `ids`. IDs unknown to the API are absent from the result.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn resolve_names(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        let mut names = self.names.lock().await;

        let mut missing: Vec<String> = ids
            .iter()
            .filter(|id| !id.is_empty() && !names.contains_key(id.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if let Some(store) = &self.store {
            let mut remaining = Vec::with_capacity(missing.len());
            for id in missing {
                match store.get(&id).await {
                    CacheLookup::Hit(name) => {
                        names.entry(id).or_insert(name);
                    }
                    CacheLookup::Miss | CacheLookup::Unavailable => remaining.push(id),
                }
            }
            missing = remaining;
        }

        if !missing.is_empty() {
            debug!(missing = missing.len(), "looking up games");
        }

        let paginator = Paginator::new(self.http.as_ref(), self.page_size);
        for chunk in missing.chunks(MAX_IDS_PER_REQUEST) {
            let params: Vec<(String, String)> =
                chunk.iter().map(|id| ("id".to_string(), id.clone())).collect();
            let games: Vec<GameEntry> = paginator.walk("games", &params).await.into_result()?;

            for game in games {
                if let Some(store) = &self.store {
                    store.put(&game.id, &game.name).await;
                }
                names.entry(game.id).or_insert(game.name);
            }
        }

        Ok(ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }

    /// Record a mapping learned elsewhere. Existing entries win.
    pub async fn remember(&self, id: &str, name: &str) {
        if id.is_empty() {
            return;
        }
        self.names
            .lock()
            .await
            .entry(id.to_string())
            .or_insert_with(|| name.to_string());
    }

    /// Replace each channel's game ID with its display name.
    ///
    /// IDs that cannot be resolved (including the empty ID of streams
    /// without a category) become an empty game name.
    pub async fn apply(&self, channels: &mut Channels) -> Result<()> {
        let ids: Vec<String> = channels.iter().map(|c| c.game.clone()).collect();
        let names = self.resolve_names(&ids).await?;
        for channel in channels.iter_mut() {
            channel.game = names.get(&channel.game).cloned().unwrap_or_default();
        }
        Ok(())
    }

    #[cfg(test)]
    async fn cached(&self) -> usize {
        self.names.lock().await.len()
    }
}
