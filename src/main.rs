use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use creaturedex::capability::{
    FavoritesClient, FileStore, KeyValueFavorites, KeyValueStore, PokeApiSource,
};
use creaturedex::config::Config;
use creaturedex::logging::init_tracing;
use creaturedex::model::{Creature, CreatureId, FavoriteStatus};
use creaturedex::runtime::{EffectRunner, Store, StoreHandle};
use creaturedex::ui::list::ListState;

#[derive(Debug, Parser)]
#[command(name = "creaturedex", version, about = "Browse creatures and manage favorites")]
struct Cli {
    /// Path to the config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the number of creatures per page
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load pages and print the list with favorite marks
    Browse {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Print the details of one creature
    Show {
        id: CreatureId,
        /// Maximum number of pages to search
        #[arg(long, default_value_t = 10)]
        pages: usize,
    },
    /// Flip the favorite status of one creature
    Toggle {
        id: CreatureId,
        /// Maximum number of pages to search
        #[arg(long, default_value_t = 10)]
        pages: usize,
    },
    /// Print the stored favorite ids
    Favorites,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(page_size) = cli.page_size {
        config.paging.page_size = page_size;
    }
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    config.validate()?;

    let favorites_path = config.favorites.resolved_path();
    tracing::debug!(path = %favorites_path.display(), "Using favorites store");
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(favorites_path));
    let favorites = Arc::new(KeyValueFavorites::new(kv));

    if let Command::Favorites = cli.command {
        let mut ids: Vec<CreatureId> = favorites.fetch_favorite_ids().await.into_iter().collect();
        ids.sort_unstable();
        for id in &ids {
            println!("{id}");
        }
        println!("favorites: {}", ids.len());
        return Ok(());
    }

    let source = Arc::new(PokeApiSource::new(&config.api)?);
    let runner = EffectRunner::new(source, favorites);
    let initial = ListState::new(config.paging.page_size, config.paging.failure_policy);
    let handle = Store::spawn(initial, runner);
    let page_timeout = settle_timeout(&config);

    match cli.command {
        Command::Browse { pages } => {
            let state = load_pages(&handle, pages, None, page_timeout).await?;
            for creature in state.view() {
                print_row(creature);
            }
            println!("favorites: {}", state.favorite_count());
            if state.is_exhausted() {
                println!("(end of list)");
            }
        }
        Command::Show { id, pages } => {
            load_pages(&handle, pages, Some(id), page_timeout).await?;
            handle.select_creature(id).await?;
            let state = settle(&handle, page_timeout).await?;
            let Some(detail) = state.detail() else {
                bail!("Creature {id} not found in the first {pages} page(s)");
            };
            print_detail(&detail.creature);
        }
        Command::Toggle { id, pages } => {
            load_pages(&handle, pages, Some(id), page_timeout).await?;
            handle.select_creature(id).await?;
            handle.toggle_detail_favorite().await?;
            let state = settle(&handle, page_timeout).await?;
            let Some(detail) = state.detail() else {
                bail!("Creature {id} not found in the first {pages} page(s)");
            };
            let creature = &detail.creature;
            if creature.favorite.is_favorite() {
                println!("{} (#{}) is now a favorite", creature.name, creature.id);
            } else {
                println!("{} (#{}) is no longer a favorite", creature.name, creature.id);
            }
            println!("favorites: {}", state.favorite_count());
        }
        Command::Favorites => {}
    }

    Ok(())
}

/// Request pages until `pages` were loaded, the list is exhausted, or
/// `target` shows up in the view.
async fn load_pages(
    handle: &StoreHandle,
    pages: usize,
    target: Option<CreatureId>,
    timeout: Duration,
) -> anyhow::Result<ListState> {
    let mut state = handle.state();
    for _ in 0..pages {
        let found = target.is_some_and(|id| state.find(id).is_some());
        if found || state.is_exhausted() {
            break;
        }

        handle.request_next_page().await?;
        state = settle(handle, timeout).await?;
        if let Some(reason) = state.last_error() {
            bail!("Failed to load page at offset {}: {reason}", state.offset());
        }
    }
    Ok(state)
}

/// Upper bound for one page to settle.
///
/// A page is one listing request followed by detail lookups in waves of
/// `max_concurrent_details`, each request bounded by the request timeout.
fn settle_timeout(config: &Config) -> Duration {
    let detail_waves = config
        .paging
        .page_size
        .div_ceil(config.api.max_concurrent_details.max(1));
    let requests = u32::try_from(detail_waves + 1).unwrap_or(u32::MAX);
    config
        .api
        .timeout()
        .checked_mul(requests)
        .unwrap_or(Duration::MAX)
}

async fn settle(handle: &StoreHandle, timeout: Duration) -> anyhow::Result<ListState> {
    let state = tokio::time::timeout(timeout, handle.settled())
        .await
        .context("Timed out waiting for pending requests")??;
    Ok(state)
}

fn favorite_mark(status: FavoriteStatus) -> &'static str {
    match status {
        FavoriteStatus::Favorite => "*",
        FavoriteStatus::NotFavorite => " ",
        FavoriteStatus::Unknown => "?",
    }
}

fn print_row(creature: &Creature) {
    println!(
        "{} {:>5}  {}",
        favorite_mark(creature.favorite),
        creature.id,
        creature.name
    );
}

fn print_detail(creature: &Creature) {
    println!("{} {}", favorite_mark(creature.favorite), creature.name.to_uppercase());
    println!("  id:     {}", creature.id);
    println!("  weight: {}", creature.weight);
    println!("  height: {}", creature.height);
    if !creature.image_ref.is_empty() {
        println!("  image:  {}", creature.image_ref);
    }
}
