//! Map state owner.
//!
//! A [`MapSession`] holds the two shop lists, the layer toggles and the
//! derived visible set. Each feed stamps its requests with an increasing
//! sequence number and a response is applied only when it is newer than the
//! last one applied for that feed, so overlapping refreshes settle on the
//! latest viewport regardless of arrival order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use latte_core::{Layer, LayerState, Shop};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::error::MapError;
use crate::feed::ShopFeedClient;
use crate::merge::visible_shops;
use crate::navigation::{navigate, Navigation};
use crate::storage::{load_layers, save_layers, LocalStore};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feed {
    User,
    Osm,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::User => write!(f, "user"),
            Feed::Osm => write!(f, "osm"),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user_shops: Vec<Shop>,
    osm_shops: Vec<Shop>,
    layers: LayerState,
    visible: Vec<Shop>,
    user_applied: u64,
    osm_applied: u64,
}

impl SessionState {
    fn recompute(&mut self) {
        self.visible = visible_shops(&self.user_shops, &self.osm_shops, &self.layers);
    }

    fn apply(&mut self, feed: Feed, seq: u64, result: Result<Vec<Shop>, MapError>) {
        let applied = match feed {
            Feed::User => &mut self.user_applied,
            Feed::Osm => &mut self.osm_applied,
        };
        if seq <= *applied {
            tracing::debug!(%feed, seq, applied = *applied, "discarding stale response");
            return;
        }

        match result {
            Ok(shops) => {
                *applied = seq;
                tracing::debug!(%feed, seq, count = shops.len(), "applied shop feed");
                match feed {
                    Feed::User => self.user_shops = shops,
                    Feed::Osm => self.osm_shops = shops,
                }
                self.recompute();
            }
            Err(e) => {
                tracing::warn!(%feed, seq, error = %e, "shop fetch failed; keeping previous list");
            }
        }
    }
}

pub struct MapSession {
    feed: ShopFeedClient,
    store: LocalStore,
    state: Mutex<SessionState>,
    persist: Mutex<()>,
    user_seq: AtomicU64,
    osm_seq: AtomicU64,
}

/// A refresh whose sequence numbers are already reserved.
///
/// Tickets are ordered by creation, not by when they are run, so a ticket
/// taken for a later viewport always supersedes an earlier one.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTicket {
    viewport: Viewport,
    user_seq: u64,
    osm_seq: Option<u64>,
}

impl RefreshTicket {
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

impl MapSession {
    /// Creates a session with layer toggles restored from `store`.
    #[must_use]
    pub fn new(feed: ShopFeedClient, store: LocalStore) -> Self {
        let layers = load_layers(&store);
        Self {
            feed,
            store,
            state: Mutex::new(SessionState {
                layers,
                ..SessionState::default()
            }),
            persist: Mutex::new(()),
            user_seq: AtomicU64::new(0),
            osm_seq: AtomicU64::new(0),
        }
    }

    /// Reserves sequence numbers for a refresh of `viewport`. No OSM sequence
    /// is taken when the viewport has no bounds.
    #[must_use]
    pub fn ticket(&self, viewport: &Viewport) -> RefreshTicket {
        RefreshTicket {
            viewport: *viewport,
            user_seq: self.user_seq.fetch_add(1, Ordering::SeqCst) + 1,
            osm_seq: viewport
                .bounds
                .map(|_| self.osm_seq.fetch_add(1, Ordering::SeqCst) + 1),
        }
    }

    /// Fetches both feeds for `viewport` concurrently and returns the visible
    /// set once both have been applied.
    ///
    /// The OSM feed is skipped when the viewport has no bounds. A failed
    /// fetch leaves that feed's previous list in place.
    pub async fn refresh(&self, viewport: &Viewport) -> Vec<Shop> {
        let ticket = self.ticket(viewport);
        self.run_ticket(ticket).await
    }

    /// Runs a refresh reserved earlier with [`MapSession::ticket`].
    pub async fn run_ticket(&self, ticket: RefreshTicket) -> Vec<Shop> {
        let viewport = ticket.viewport;
        let radius_km = viewport.radius_km();
        tracing::debug!(
            center = ?viewport.center,
            radius_km,
            user_seq = ticket.user_seq,
            "refreshing shops"
        );

        let user = async {
            let result = self.feed.nearby_shops(viewport.center, radius_km).await;
            self.state.lock().await.apply(Feed::User, ticket.user_seq, result);
        };
        let osm = async {
            if let (Some(seq), Some(bbox)) = (ticket.osm_seq, viewport.bbox()) {
                let result = self.feed.osm_shops(&bbox).await;
                self.state.lock().await.apply(Feed::Osm, seq, result);
            }
        };
        futures::join!(user, osm);

        self.visible().await
    }

    /// Flips `layer`, persists the new toggles and returns the visible set.
    ///
    /// A persistence failure is logged; the in-memory toggle still changes.
    pub async fn toggle_layer(&self, layer: Layer) -> Vec<Shop> {
        let (layers, visible, _persist) = {
            let mut state = self.state.lock().await;
            let enabled = state.layers.toggle(layer);
            tracing::info!(%layer, enabled, "layer toggled");
            state.recompute();
            // Writes are serialized in toggle order.
            let persist = self.persist.lock().await;
            (state.layers, state.visible.clone(), persist)
        };

        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || save_layers(&store, &layers)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to persist layer preferences"),
            Err(e) => tracing::error!(error = %e, "layer persistence task failed"),
        }
        visible
    }

    pub async fn layers(&self) -> LayerState {
        self.state.lock().await.layers
    }

    pub async fn visible(&self) -> Vec<Shop> {
        self.state.lock().await.visible.clone()
    }

    pub async fn user_shops(&self) -> Vec<Shop> {
        self.state.lock().await.user_shops.clone()
    }

    pub async fn osm_shops(&self) -> Vec<Shop> {
        self.state.lock().await.osm_shops.clone()
    }

    #[must_use]
    pub fn click(&self, shop: &Shop) -> Navigation {
        navigate(shop)
    }
}

/// Refreshes `session` for every settled viewport until the channel closes,
/// calling `on_update` with the visible set after each refresh.
///
/// Sequence numbers are reserved in arrival order before each refresh task is
/// spawned. Refreshes run as independent tasks and may overlap. Returns after
/// the last one has finished.
pub async fn run_session<F>(
    session: Arc<MapSession>,
    mut settled: mpsc::UnboundedReceiver<Viewport>,
    on_update: F,
) where
    F: Fn(&[Shop]) + Send + Sync + 'static,
{
    let on_update = Arc::new(on_update);
    let mut refreshes = JoinSet::new();

    while let Some(viewport) = settled.recv().await {
        let ticket = session.ticket(&viewport);
        let session = Arc::clone(&session);
        let on_update = Arc::clone(&on_update);
        refreshes.spawn(async move {
            let visible = session.run_ticket(ticket).await;
            on_update(&visible);
        });

        while let Some(done) = refreshes.try_join_next() {
            if let Err(e) = done {
                tracing::error!(error = %e, "refresh task failed");
            }
        }
    }

    while let Some(done) = refreshes.join_next().await {
        if let Err(e) = done {
            tracing::error!(error = %e, "refresh task failed");
        }
    }
}
