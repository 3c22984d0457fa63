//! Network reachability as a live boolean signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How long a single probe connection may take before it counts as offline.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared reachability flag.
///
/// Starts optimistic (`true`) and flips only when a disconnection is observed.
/// Cloning is cheap; all clones see the same value.
#[derive(Debug, Clone)]
pub struct Connectivity {
  tx: Arc<watch::Sender<bool>>,
}

impl Connectivity {
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(true);
    Self { tx: Arc::new(tx) }
  }

  /// Latest known reachability. Never blocks.
  pub fn has_connectivity(&self) -> bool {
    *self.tx.borrow()
  }

  /// Publish a new reachability value. Receivers are only woken on change.
  pub fn set(&self, reachable: bool) {
    let changed = self.tx.send_if_modified(|current| {
      if *current == reachable {
        false
      } else {
        *current = reachable;
        true
      }
    });
    if changed {
      info!(reachable, "Connectivity changed");
    }
  }

  /// Receive reachability changes.
  pub fn subscribe(&self) -> watch::Receiver<bool> {
    self.tx.subscribe()
  }

  /// Periodically probe `target` (`host:port`) with a TCP connect and publish the result.
  pub fn spawn_probe(&self, target: String, interval: Duration) -> JoinHandle<()> {
    let connectivity = self.clone();
    tokio::spawn(async move {
      loop {
        let reachable = matches!(
          tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect(target.as_str())).await,
          Ok(Ok(_))
        );
        debug!(%target, reachable, "Connectivity probe");
        connectivity.set(reachable);
        tokio::time::sleep(interval).await;
      }
    })
  }
}

impl Default for Connectivity {
  fn default() -> Self {
    Self::new()
  }
}
