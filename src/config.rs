use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Which resource source to use
  pub environment: Environment,
  pub api: ApiConfig,
  pub cache: CacheConfig,
  /// Directory holding posts.json, users.json and comments.json.
  /// The copies bundled into the binary are used when unset.
  pub fixtures_dir: Option<PathBuf>,
  pub connectivity: ConnectivityConfig,
}

/// Resource source selection
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  /// Bundled fixture data, no network
  #[default]
  Mock,
  /// The remote resource API
  Real,
}

impl Environment {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Mock => "mock",
      Self::Real => "real",
    }
  }

  fn parse(value: &str) -> Option<Self> {
    match value.trim().to_lowercase().as_str() {
      "mock" => Some(Self::Mock),
      "real" => Some(Self::Real),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  /// Author assigned to posts created from this client
  pub default_author_id: i64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_BASE_URL.to_string(),
      default_author_id: 1,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// SQLite file (default: $XDG_DATA_HOME/smposts/cache.db)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
  /// Probe the API host in the background
  pub probe: bool,
  pub interval_secs: u64,
}

impl Default for ConnectivityConfig {
  fn default() -> Self {
    Self {
      probe: true,
      interval_secs: 10,
    }
  }
}

impl ConnectivityConfig {
  pub fn interval(&self) -> Duration {
    Duration::from_secs(self.interval_secs.max(1))
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./smposts.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/smposts/config.yaml
  ///
  /// Without any file the defaults are used. `SMPOSTS_ENV` overrides the environment.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Some(environment) = Self::environment_override()? {
      config.environment = environment;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("smposts.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("smposts").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Get the environment override from `SMPOSTS_ENV`, if set.
  fn environment_override() -> Result<Option<Environment>> {
    match std::env::var("SMPOSTS_ENV") {
      Ok(value) => Environment::parse(&value)
        .map(Some)
        .ok_or_else(|| eyre!("Invalid SMPOSTS_ENV value '{}': expected mock or real", value)),
      Err(_) => Ok(None),
    }
  }

  /// `host:port` of the API, used by the connectivity probe.
  pub fn api_probe_target(&self) -> Result<String> {
    let url = url::Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid API base URL '{}': {}", self.api.base_url, e))?;
    let host = url
      .host_str()
      .ok_or_else(|| eyre!("API base URL '{}' has no host", self.api.base_url))?;
    let port = url
      .port_or_known_default()
      .ok_or_else(|| eyre!("API base URL '{}' has no port", self.api.base_url))?;

    Ok(format!("{}:{}", host, port))
  }
}
