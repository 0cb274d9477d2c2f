//! `twitchbrowser` - Who is live right now?
//!
//! # Features
//!
//! - **Twitch Helix**: cursor pagination, batched `user_login` lookups, app tokens
//! - **Game names**: in-memory and on-disk cache, one lookup per game per process
//! - **SpeedRunsLive**: discover live speedrunners, then fetch them from Twitch
//! - **Output**: terminal listing, bare names, or an HTML page
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use twitchbrowser::{ChannelSource, GameResolver, HelixClient, TokenProvider, TwitchSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tokens = TokenProvider::new("client-id", "client-secret")?;
//!     let http = Arc::new(HelixClient::new(tokens)?);
//!     let resolver = Arc::new(GameResolver::new(http.clone()));
//!     let twitch = TwitchSource::new(http, resolver);
//!
//!     let live = twitch.get_channels(&["cosmowright".to_string()]).await?.sorted();
//!     for ch in &live {
//!         println!("{} ({}) {}", ch.streamer, ch.viewers, ch.game);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod channel;
pub mod collect;
pub mod config;
pub mod error;
pub mod http_client;
pub mod output;
pub mod paginate;
pub mod render;
pub mod resolver;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::TokenProvider;
pub use cache::{CacheLookup, DiskCache, GameNameStore};
pub use channel::{compare, Channel, Channels, Query};
pub use collect::{collect, Plan, Section};
pub use config::AppConfig;
pub use error::{ApiError, Result};
pub use http_client::{HelixClient, JsonGet};
pub use output::{closed_is_done, Sink};
pub use paginate::{PageWalk, Paginator};
pub use render::Format;
pub use resolver::GameResolver;
pub use source::{ChannelSource, NameDiscovery, SpeedrunSource, TwitchSource};

/// Version of twitchbrowser
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
