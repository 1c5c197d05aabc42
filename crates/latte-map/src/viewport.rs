//! Viewport events and their debouncing.
//!
//! The rendering surface reports a viewport on every pan or zoom end. The
//! very first report is forwarded at once so the initial load is not delayed;
//! after that, reports are coalesced and only the last one of a burst is
//! forwarded once the map has been quiet for the configured period.

use std::time::Duration;

use latte_core::{radius_for, BoundingBox, Bounds, LatLng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Visible map region. `bounds` is absent until the surface has reported a
/// rectangle at least once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub bounds: Option<Bounds>,
}

impl Viewport {
    #[must_use]
    pub fn from_bounds(bounds: Bounds) -> Self {
        Self {
            center: bounds.center(),
            bounds: Some(bounds),
        }
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        radius_for(self.bounds.as_ref())
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bounds.as_ref().map(Bounds::to_bbox)
    }
}

/// Handle to a running debounce task.
///
/// Dropping the handle, or calling [`ViewportDebouncer::shutdown`], stops the
/// task and discards any viewport still waiting for its quiet period.
pub struct ViewportDebouncer {
    events: mpsc::UnboundedSender<Viewport>,
    task: JoinHandle<()>,
}

impl ViewportDebouncer {
    /// Spawns the debounce task on the current tokio runtime. Settled
    /// viewports are delivered on the returned receiver.
    #[must_use]
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<Viewport>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce(quiet, events_rx, settled_tx));
        (Self { events, task }, settled_rx)
    }

    /// Reports a pan/zoom end. Returns `false` once the task has stopped.
    pub fn notify(&self, viewport: Viewport) -> bool {
        self.events.send(viewport).is_ok()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for ViewportDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce(
    quiet: Duration,
    mut events: mpsc::UnboundedReceiver<Viewport>,
    settled: mpsc::UnboundedSender<Viewport>,
) {
    let Some(first) = events.recv().await else {
        return;
    };
    tracing::debug!(center = ?first.center, "initial viewport");
    if settled.send(first).is_err() {
        return;
    }

    let mut pending: Option<Viewport> = None;
    let timer = tokio::time::sleep(quiet);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(viewport) = event else {
                    return;
                };
                pending = Some(viewport);
                timer.as_mut().reset(Instant::now() + quiet);
            }
            () = &mut timer, if pending.is_some() => {
                if let Some(viewport) = pending.take() {
                    tracing::debug!(center = ?viewport.center, "viewport settled");
                    if settled.send(viewport).is_err() {
                        return;
                    }
                }
            }
        }
    }
}
