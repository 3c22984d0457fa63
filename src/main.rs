use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use smposts::cache::{CacheStore, SqliteStorage};
use smposts::config::{Config, Environment};
use smposts::connectivity::Connectivity;
use smposts::posts::cache::{
  clear_all_data, clear_cache_at_launch_if_needed, refresh_environment, request_clear_on_launch,
};
use smposts::posts::{make_client, PostRepository};
use smposts::{FeedState, PostFeed};

#[derive(Parser, Debug)]
#[command(name = "smposts")]
#[command(about = "A cache-first feed of posts, their authors and comments")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/smposts/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Data source to use, overriding config and SMPOSTS_ENV
  #[arg(short, long, value_enum)]
  env: Option<Environment>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load and print the feed
  List,
  /// Create a post
  Create {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
  },
  /// Delete the post at a feed position
  Delete { index: usize },
  /// Drop every cached collection now
  ClearCache,
  /// Drop every cached collection on the next launch
  ClearOnLaunch,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // Override environment if specified on command line
  let config = if let Some(environment) = args.env {
    Config {
      environment,
      ..config
    }
  } else {
    config
  };

  let _log_guard = init_logging()?;
  info!(environment = config.environment.as_str(), "Starting");

  let storage = match &config.cache.path {
    Some(path) => SqliteStorage::open_at(path)?,
    None => SqliteStorage::open()?,
  };
  let cache = CacheStore::new(storage);

  clear_cache_at_launch_if_needed(&cache);
  refresh_environment(&cache, config.environment);

  let connectivity = Connectivity::new();
  if config.environment == Environment::Real && config.connectivity.probe {
    connectivity.spawn_probe(config.api_probe_target()?, config.connectivity.interval());
  }

  let client = make_client(config.environment, &config, connectivity)?;
  let repository = PostRepository::new(client, cache.clone());

  match args.command {
    Command::List => {
      let feed = PostFeed::new(repository);
      feed.load_posts().await;
      print_feed(&feed)?;
    }
    Command::Create { title, content } => {
      let feed = PostFeed::new(repository);
      feed.load_posts().await;
      match feed.create_post(&title, &content).await {
        Ok(post) => println!("Created post #{}: {}", post.id, post.title),
        Err(e) => return Err(eyre!(e.create_failure_message())),
      }
    }
    Command::Delete { index } => {
      let feed = PostFeed::new(repository);
      feed.load_posts().await;
      let post = feed.posts().get(index).cloned();
      match feed.delete_post(index).await {
        Some(handle) => {
          // The process would otherwise exit before the request goes out
          handle.await?;
          if let Some(post) = post {
            println!("Deleted post #{}: {}", post.id, post.title);
          }
        }
        None => return Err(eyre!("No post at index {}", index)),
      }
    }
    Command::ClearCache => {
      clear_all_data(&cache);
      println!("Cache cleared");
    }
    Command::ClearOnLaunch => {
      request_clear_on_launch(&cache);
      println!("Cache will be cleared on next launch");
    }
  }

  Ok(())
}

fn print_feed(feed: &PostFeed) -> Result<()> {
  match feed.state() {
    FeedState::Error(message) => Err(eyre!(message)),
    FeedState::Empty => {
      println!("No posts");
      Ok(())
    }
    _ => {
      for (index, post) in feed.posts().iter().enumerate() {
        println!(
          "[{}] #{} {} ({}, {} comments)",
          index,
          post.id,
          post.title,
          post.author_email,
          post.comments.len()
        );
      }
      Ok(())
    }
  }
}

/// Log to a daily file under the data directory; stdout is for command output.
fn init_logging() -> Result<WorkerGuard> {
  let dir = log_dir()?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, "smposts.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env("SMPOSTS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

  Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
  dirs::data_dir()
    .map(|dir| dir.join("smposts").join("logs"))
    .ok_or_else(|| eyre!("Could not determine data directory"))
}
