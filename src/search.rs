use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::debounce::{Debouncer, DEFAULT_DELAY};
use crate::error::UserError;
use crate::messages;
use crate::models::MovieSummary;
use crate::omdb::OmdbApi;

/// What happens to the current results while a newer search is loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultRetention {
    /// Keep showing the previous results until the new ones arrive.
    #[default]
    KeepPrevious,
    /// Clear results and error as soon as the request goes out.
    ClearOnLoad,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub retention: ResultRetention,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DELAY,
            retention: ResultRetention::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub error: Option<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

impl SearchState {
    pub fn phase(&self) -> SearchPhase {
        if self.is_loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Failure
        } else if !self.movies.is_empty() {
            SearchPhase::Success
        } else {
            SearchPhase::Idle
        }
    }

    /// A settled, non-blank query that produced nothing to show.
    pub fn is_empty_result(&self) -> bool {
        !self.is_loading
            && self.movies.is_empty()
            && self.error.is_none()
            && !self.query.trim().is_empty()
    }
}

/// Drives a debounced search box: every input change goes through
/// [`SearchController::set_query`], results are published on a watch channel.
///
/// Each input change takes a new generation; a search only starts, and its
/// response is only applied, while its generation is still the latest.
pub struct SearchController {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

struct Shared {
    api: Arc<dyn OmdbApi>,
    retention: ResultRetention,
    latest: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    pub fn new(api: Arc<dyn OmdbApi>, config: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            shared: Arc::new(Shared {
                api,
                retention: config.retention,
                latest: AtomicU64::new(0),
                state,
            }),
            debouncer: Debouncer::new(config.debounce),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();

        if query.trim().is_empty() {
            self.debouncer.cancel();
            self.shared.state.send_modify(|s| {
                self.shared.bump();
                s.query = query;
                s.movies.clear();
                s.error = None;
                s.is_loading = false;
            });
            debug!("Blank query, search state reset");
            return;
        }

        let mut token = 0;
        self.shared.state.send_modify(|s| {
            token = self.shared.bump();
            s.query = query.clone();
        });
        let shared = Arc::clone(&self.shared);
        self.debouncer
            .schedule(async move { shared.run_search(query, token).await });
    }

    /// Cancels a pending search and discards any response still in flight.
    pub fn shutdown(&self) {
        self.debouncer.cancel();
        self.shared.state.send_if_modified(|s| {
            self.shared.bump();
            std::mem::replace(&mut s.is_loading, false)
        });
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    /// Advances the freshness token. Only called while holding the state lock.
    fn bump(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// `token` is the generation taken when the query was typed. A reset,
    /// teardown or newer input since then turns this into a no-op.
    async fn run_search(self: Arc<Self>, query: String, token: u64) {
        let started = self.state.send_if_modified(|s| {
            if !self.is_current(token) {
                return false;
            }
            s.is_loading = true;
            if self.retention == ResultRetention::ClearOnLoad {
                s.movies.clear();
                s.error = None;
            }
            true
        });
        if !started {
            debug!(query = %query, token, "Search superseded before dispatch");
            return;
        }
        let _loading = LoadingGuard {
            shared: self.as_ref(),
            token,
        };
        debug!(query = %query, token, "Dispatching search");

        let outcome = self.api.search(&query).await;
        if let Err(err) = &outcome {
            warn!("Search for '{}' failed: {}", query, err);
        }

        let applied = self.state.send_if_modified(|s| {
            if !self.is_current(token) {
                return false;
            }
            match outcome {
                Ok(movies) => {
                    s.movies = movies;
                    s.error = None;
                }
                Err(err) => {
                    s.movies.clear();
                    s.error = Some(err.user_message(messages::NO_MOVIES_FOUND));
                }
            }
            s.is_loading = false;
            true
        });
        if !applied {
            debug!(query = %query, token, "Discarding stale search response");
        }
    }
}

/// Clears the loading flag if the request task ends without applying a result
/// (panic or abort), unless a newer search has taken over the flag.
struct LoadingGuard<'a> {
    shared: &'a Shared,
    token: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.shared.state.send_if_modified(|s| {
            if !self.shared.is_current(self.token) {
                return false;
            }
            std::mem::replace(&mut s.is_loading, false)
        });
    }
}

/// One-shot search without debouncing, for request/response front ends.
/// A blank query yields no results and makes no call.
pub async fn search_once(api: &dyn OmdbApi, query: &str) -> Result<Vec<MovieSummary>, UserError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }
    api.search(query).await.map_err(|err| {
        warn!("Search for '{}' failed: {}", query, err);
        err.into_user_error(messages::NO_MOVIES_FOUND)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> MovieSummary {
        MovieSummary {
            imdb_id: id.to_string(),
            title: id.to_string(),
            year: "2000".to_string(),
            poster: "N/A".to_string(),
        }
    }

    #[test]
    fn phase_follows_state() {
        let mut state = SearchState::default();
        assert_eq!(state.phase(), SearchPhase::Idle);
        assert!(!state.is_empty_result());

        state.query = "heat".to_string();
        state.is_loading = true;
        state.movies = vec![movie("tt1")];
        assert_eq!(state.phase(), SearchPhase::Loading);

        state.is_loading = false;
        assert_eq!(state.phase(), SearchPhase::Success);

        state.movies.clear();
        assert!(state.is_empty_result());
        state.error = Some("nope".to_string());
        assert_eq!(state.phase(), SearchPhase::Failure);
        assert!(!state.is_empty_result());
    }
}
