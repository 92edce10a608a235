//! Pagination and search state for one relationship list.
//!
//! The coordinator owns all mutable list state. Fetches run on spawned
//! background tasks; each task reports back through an MPSC channel, and
//! the owner applies completions in `pump` (non-blocking drain, for
//! frame-driven hosts) or `process_next` (await one completion). Nothing
//! off the owner ever touches `rows` or `search_rows` directly.
//!
//! Every page fetch is tagged with the list generation current when it was
//! dispatched; a refresh bumps the generation, so completions from
//! superseded fetches are discarded on arrival instead of reintroducing
//! cleared rows. Search completions carry their own generation, bumped on
//! every keystroke.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{RelationshipKind, UserProfile, UserSummary};

// ============================================================================
// Constants
// ============================================================================

/// Quiet period after the last keystroke before a search is dispatched.
const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Buffer size for the completion channel.
/// A coordinator has at most one page fetch and one search in flight;
/// 32 leaves ample headroom for completions straddling a refresh.
const CHANNEL_BUFFER_SIZE: usize = 32;

// ============================================================================
// Completion events
// ============================================================================

/// Completions sent from background fetch tasks back to the coordinator.
enum ListEvent {
    /// A relationship page arrived (list generation, page number, rows).
    PageLoaded(u64, u32, Vec<UserSummary>),
    /// A relationship page fetch failed (list generation, page number).
    PageFailed(u64, u32, ApiError),
    /// A debounced search completed (search generation, rows).
    SearchLoaded(u64, Vec<UserSummary>),
    /// A debounced search failed (search generation).
    SearchFailed(u64, ApiError),
}

// ============================================================================
// Coordinator
// ============================================================================

/// State machine for one followers/following view.
pub struct ListCoordinator {
    api: ApiClient,
    profile: UserProfile,
    kind: RelationshipKind,

    // Pagination state
    rows: Vec<UserSummary>,
    page: u32,
    is_loading_more: bool,
    can_load_more: bool,

    // Search state
    is_searching: bool,
    search_rows: Vec<UserSummary>,

    /// Bumped on every refresh; page completions tagged with an older
    /// value are stale and dropped.
    generation: u64,
    /// Bumped on every keystroke; search completions tagged with an older
    /// value are stale and dropped.
    search_generation: u64,
    debounce: Option<JoinHandle<()>>,
    debounce_window: Duration,

    // Completion channel
    rx: mpsc::Receiver<ListEvent>,
    tx: mpsc::Sender<ListEvent>,

    last_error: Option<String>,
}

impl ListCoordinator {
    /// Create a coordinator for one of `profile`'s relationship lists.
    ///
    /// The initial state is empty: call [`refresh`](Self::refresh) to issue
    /// the first page fetch.
    pub fn new(api: ApiClient, profile: UserProfile, kind: RelationshipKind) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            api,
            profile,
            kind,

            rows: Vec::new(),
            page: 1,
            is_loading_more: false,
            can_load_more: true,

            is_searching: false,
            search_rows: Vec::new(),

            generation: 0,
            search_generation: 0,
            debounce: None,
            debounce_window: Duration::from_millis(SEARCH_DEBOUNCE_MS),

            rx,
            tx,

            last_error: None,
        }
    }

    /// Override the debounce window (tests, unusual input devices).
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    // ===== Accessors =====

    /// The row set the host should render right now: search results while
    /// a search is active, the accumulated list otherwise.
    pub fn visible_rows(&self) -> &[UserSummary] {
        if self.is_searching {
            &self.search_rows
        } else {
            &self.rows
        }
    }

    pub fn rows(&self) -> &[UserSummary] {
        &self.rows
    }

    pub fn search_rows(&self) -> &[UserSummary] {
        &self.search_rows
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn can_load_more(&self) -> bool {
        self.can_load_more
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// Last failure message, if any. Hosts surface this only when there is
    /// nothing at all to display; list and search failures otherwise stay
    /// silent apart from loading stopping.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ===== Transitions =====

    /// Reset to page 1 and re-issue the first page fetch.
    ///
    /// Also the initial-load entry point. Usable at any time, including
    /// mid-load: bumping the generation makes any in-flight page fetch
    /// stale, so its late completion cannot reintroduce cleared rows.
    pub fn refresh(&mut self) {
        self.generation += 1;
        self.page = 1;
        self.rows.clear();
        self.can_load_more = true;
        self.is_loading_more = true;
        self.last_error = None;

        debug!(
            login = %self.profile.login,
            kind = %self.kind,
            generation = self.generation,
            "refreshing list"
        );
        self.spawn_page_fetch(self.page);
    }

    /// Fetch the next page, if the list is in a state to accept one.
    ///
    /// No-op while searching, while a page is already in flight, or once
    /// the list is exhausted (`can_load_more` false).
    pub fn load_more(&mut self) {
        if self.is_searching || self.is_loading_more || !self.can_load_more {
            return;
        }

        self.page += 1;
        self.is_loading_more = true;
        self.spawn_page_fetch(self.page);
    }

    /// Notify the coordinator that the row at `index` was rendered.
    /// Reaching the last accumulated row triggers a load-more.
    pub fn on_row_visible(&mut self, index: usize) {
        if !self.is_searching && index + 1 >= self.rows.len() {
            self.load_more();
        }
    }

    /// Feed one raw keystroke's worth of search input.
    ///
    /// Arms (or re-arms) the debounce timer; only the last value observed
    /// within the window actually dispatches a search. Empty post-trim
    /// input leaves search mode and clears prior results with no network
    /// call.
    pub fn on_search_input(&mut self, text: &str) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        self.search_generation += 1;

        let query = text.trim().to_string();
        if query.is_empty() {
            self.is_searching = false;
            self.search_rows.clear();
            return;
        }

        self.is_searching = true;

        let api = self.api.clone();
        let tx = self.tx.clone();
        let generation = self.search_generation;
        let window = self.debounce_window;

        self.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            debug!(query = %query, "debounce elapsed, dispatching search");

            let event = match api.search_users(&query).await {
                Ok(users) => ListEvent::SearchLoaded(generation, users),
                Err(e) => ListEvent::SearchFailed(generation, e),
            };
            Self::send_event(&tx, event).await;
        }));
    }

    // ===== Completion handling =====

    /// Drain and apply every completion that has already arrived.
    /// Non-blocking; returns how many events were applied. Frame-driven
    /// hosts call this once per tick.
    pub fn pump(&mut self) -> usize {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }

        let applied = events.len();
        for event in events {
            self.apply(event);
        }
        applied
    }

    /// Await the next completion and apply it.
    pub async fn process_next(&mut self) {
        if let Some(event) = self.rx.recv().await {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: ListEvent) {
        match event {
            ListEvent::PageLoaded(generation, page, users) => {
                if generation != self.generation {
                    debug!(generation, page, "discarding stale page completion");
                    return;
                }
                self.is_loading_more = false;

                let mut added = 0;
                for user in users {
                    if !self.rows.iter().any(|row| row.login == user.login) {
                        self.rows.push(user);
                        added += 1;
                    }
                }
                // A page contributing nothing new means the list is exhausted.
                self.can_load_more = added > 0;
                debug!(page, added, total = self.rows.len(), "page merged");
            }
            ListEvent::PageFailed(generation, page, error) => {
                if generation != self.generation {
                    debug!(generation, page, "discarding stale page failure");
                    return;
                }
                warn!(page, error = %error, "page fetch failed");
                self.is_loading_more = false;
                self.can_load_more = false;
                self.last_error = Some(error.to_string());
            }
            ListEvent::SearchLoaded(generation, users) => {
                if generation != self.search_generation {
                    debug!(generation, "discarding stale search completion");
                    return;
                }
                debug!(count = users.len(), "search results replaced");
                self.search_rows = users;
            }
            ListEvent::SearchFailed(generation, error) => {
                if generation != self.search_generation {
                    debug!(generation, "discarding stale search failure");
                    return;
                }
                warn!(error = %error, "search failed");
                self.search_rows.clear();
                self.last_error = Some(error.to_string());
            }
        }
    }

    fn spawn_page_fetch(&self, page: u32) {
        let api = self.api.clone();
        let profile = self.profile.clone();
        let kind = self.kind;
        let generation = self.generation;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match api.fetch_user_list(&profile, kind, page).await {
                Ok(users) => ListEvent::PageLoaded(generation, page, users),
                Err(e) => ListEvent::PageFailed(generation, page, e),
            };
            Self::send_event(&tx, event).await;
        });
    }

    /// A send only fails after the coordinator is gone; the completion is
    /// then simply unobserved.
    async fn send_event(tx: &mpsc::Sender<ListEvent>, event: ListEvent) {
        if tx.send(event).await.is_err() {
            debug!("coordinator dropped, ignoring completion");
        }
    }
}

impl Drop for ListCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
