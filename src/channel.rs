//! The normalized channel record and its sort order.
//!
//! Every source boils its API responses down to [`Channel`]s. Listings are
//! presented grouped by game, busiest streams first, so [`compare`] orders
//! by game name, then viewer count (descending), then streamer, then
//! description. String keys compare case-insensitively.

use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};

use serde::Serialize;

/// One live stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Display name of the broadcaster.
    pub streamer: String,
    /// Stream title as set by the broadcaster.
    pub description: String,
    /// Game display name. Holds the opaque game ID until resolved.
    pub game: String,
    pub viewers: u64,
}

/// What to ask a source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Explicit channel logins. Repeats are passed through untouched.
    Names(Vec<String>),
    /// Every live stream of one game, by display name.
    Game(String),
}

/// Compare two strings the way `to_lowercase` would, without allocating.
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Listing order: game asc, viewers desc, streamer asc, description asc.
pub fn compare(a: &Channel, b: &Channel) -> Ordering {
    cmp_ignore_case(&a.game, &b.game)
        .then_with(|| b.viewers.cmp(&a.viewers))
        .then_with(|| cmp_ignore_case(&a.streamer, &b.streamer))
        .then_with(|| cmp_ignore_case(&a.description, &b.description))
}

/// A batch of channels from one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Channels(Vec<Channel>);

impl Channels {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sort into listing order (see [`compare`]).
    pub fn sort(&mut self) {
        self.0.sort_by(compare);
    }

    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }
}

impl Deref for Channels {
    type Target = Vec<Channel>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Channels {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Channel>> for Channels {
    fn from(channels: Vec<Channel>) -> Self {
        Self(channels)
    }
}

impl FromIterator<Channel> for Channels {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Channels {
    type Item = Channel;
    type IntoIter = std::vec::IntoIter<Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Channels {
    type Item = &'a Channel;
    type IntoIter = std::slice::Iter<'a, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
