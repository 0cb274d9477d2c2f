//! `twitchbrowser` CLI - list live Twitch channels grouped by game

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use twitchbrowser::{
    closed_is_done, collect, AppConfig, DiskCache, Format, GameResolver, HelixClient, Plan, Sink,
    SpeedrunSource, TokenProvider, TwitchSource,
};

#[derive(Parser)]
#[command(name = "twitchbrowser")]
#[command(about = "List live Twitch channels grouped by game")]
#[command(version)]
struct Cli {
    /// Collect favorite channels from the config file
    #[arg(long)]
    fav: bool,

    /// Collect channels listed on SpeedRunsLive
    #[arg(long)]
    srl: bool,

    /// Show only the names of live channels
    #[arg(long, conflicts_with = "html")]
    names: bool,

    /// Write an HTML page to FILE instead of printing
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Collect every live channel playing this game
    #[arg(short, long, value_name = "NAME")]
    game: Option<String>,

    /// Config file (default: ~/.config/twitchbrowser/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Don't read or write the game name cache on disk
    #[arg(long)]
    no_cache: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Channel names to look up
    #[arg(value_name = "NAMES")]
    names_list: Vec<String>,
}

impl Cli {
    /// Favorites and SpeedRunsLive are the default when nothing else is asked for.
    fn plan(&self, config: &AppConfig) -> Plan {
        let nothing_requested =
            !self.fav && !self.srl && self.game.is_none() && self.names_list.is_empty();
        let fav = self.fav || nothing_requested;

        Plan {
            favorites: fav.then(|| config.favorites.clone()),
            speedrun: self.srl || nothing_requested,
            custom: (!self.names_list.is_empty()).then(|| self.names_list.clone()),
            game: self.game.clone(),
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(Level::WARN.into())
            .from_env_lossy()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = AppConfig::load(cli.config.as_deref())?;
    let (client_id, client_secret) = config.credentials()?;

    let tokens = TokenProvider::new(client_id, client_secret)?;
    let http = Arc::new(HelixClient::new(tokens)?);

    let mut resolver = GameResolver::new(http.clone()).with_page_size(config.page_size);
    match config.cache_dir() {
        Some(dir) if !cli.no_cache => {
            debug!(dir = %dir.display(), "using game cache");
            resolver = resolver.with_store(Box::new(DiskCache::open(dir)));
        }
        _ => debug!("game cache disabled"),
    }

    let twitch = TwitchSource::new(http, Arc::new(resolver)).with_page_size(config.page_size);
    let srl = SpeedrunSource::with_url(&config.srl_url)?;

    let mut sink = match &cli.html {
        Some(path) => Sink::file(path)?,
        None if cli.names => Sink::stdout(),
        None => Sink::paged(),
    };
    let format = if cli.html.is_some() {
        Format::Html
    } else if cli.names {
        Format::Names
    } else {
        Format::Text {
            emphasis: sink.is_terminal(),
        }
    };

    let plan = cli.plan(&config);
    let sections = collect(&twitch, &srl, &plan).await;

    closed_is_done(format.write_document(&mut sink, &sections)).context("failed to write listing")?;
    sink.finish()
}
