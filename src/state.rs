use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::MeterReading;
use crate::poller::{self, PollHandle};
use crate::routing::RouteTable;
use crate::session::{FileTokenStorage, SeededUserDirectory, SessionStore};
use crate::upstream::UpstreamClient;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState(Arc<Inner>);

pub struct Inner {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub sessions: SessionStore,
    pub routes: RouteTable,
    pub readings: RwLock<ReadingsCache>,
}

/// Latest `last_processed` snapshot, refreshed by the background poller.
/// A failed poll keeps the previous snapshot and records the error.
#[derive(Default)]
pub struct ReadingsCache {
    pub readings: Vec<MeterReading>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let upstream = UpstreamClient::new(
            config.upstream.base_url.clone(),
            Duration::from_secs(config.upstream.http_timeout_seconds),
        );
        let sessions = SessionStore::new(
            Arc::new(FileTokenStorage::new(config.session.token_path.clone())),
            Arc::new(SeededUserDirectory::default()),
            config.session.ttl_hours,
        );
        Self::with_parts(config, upstream, sessions)
    }

    /// Assemble state from pre-built parts. Tests use this to inject a
    /// wiremock upstream and in-memory session storage.
    pub fn with_parts(config: Config, upstream: UpstreamClient, sessions: SessionStore) -> Self {
        Self(Arc::new(Inner {
            config,
            upstream,
            sessions,
            routes: RouteTable::default(),
            readings: RwLock::new(ReadingsCache::default()),
        }))
    }

    /// Start the shared last-processed readings poller.
    pub fn spawn_readings_poller(&self) -> PollHandle {
        let period = Duration::from_secs(self.config.upstream.poll_period_seconds);
        let state = self.clone();
        info!(period_secs = period.as_secs(), "starting readings poller");

        poller::spawn(period, move || {
            let state = state.clone();
            async move {
                match state.upstream.last_processed().await {
                    Ok(readings) => {
                        let mut cache = state.readings.write();
                        cache.readings = readings;
                        cache.fetched_at = Some(Utc::now());
                        cache.last_error = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "readings poll failed, keeping previous snapshot");
                        state.readings.write().last_error = Some(e.to_string());
                    }
                }
            }
        })
    }
}

impl Deref for AppState {
    type Target = Inner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
