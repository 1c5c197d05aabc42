//! Interactive map session driven by stdin.
//!
//! Each input line is either a viewport (`south,west,north,east`) or a layer
//! toggle (`toggle <layer>`). Viewports go through the debouncer exactly like
//! pan/zoom events from a map surface; every settled refresh prints a summary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use latte_core::{BoundingBox, Layer, MapConfig};
use latte_map::{run_session, LocalStore, MapSession, ShopFeedClient, Viewport, ViewportDebouncer};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;

/// Extra wait at end of input so a trailing viewport can settle.
const SETTLE_MARGIN: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
enum BrowseInput {
    Viewport(Viewport),
    Toggle(Layer),
    Blank,
}

fn parse_line(line: &str) -> anyhow::Result<BrowseInput> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(BrowseInput::Blank);
    }

    if let Some(layer) = line.strip_prefix("toggle ") {
        let layer = layer.parse::<Layer>()?;
        return Ok(BrowseInput::Toggle(layer));
    }

    let bbox = line
        .parse::<BoundingBox>()
        .with_context(|| format!("expected south,west,north,east or `toggle <layer>`, got {line:?}"))?;
    Ok(BrowseInput::Viewport(Viewport::from_bounds(bbox.to_bounds())))
}

pub async fn run(config: &MapConfig, feed: ShopFeedClient, store: LocalStore) -> anyhow::Result<()> {
    let quiet = Duration::from_millis(config.debounce_ms);
    let session = Arc::new(MapSession::new(feed, store));
    let (debouncer, settled) = ViewportDebouncer::spawn(quiet);

    let runner = tokio::spawn(run_session(Arc::clone(&session), settled, |visible| {
        println!("{}", output::summary(visible));
    }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(BrowseInput::Viewport(viewport)) => {
                if !debouncer.notify(viewport) {
                    tracing::warn!("viewport debouncer stopped");
                    break;
                }
            }
            Ok(BrowseInput::Toggle(layer)) => {
                let visible = session.toggle_layer(layer).await;
                println!("{}", output::summary(&visible));
            }
            Ok(BrowseInput::Blank) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring input line"),
        }
    }

    tokio::time::sleep(quiet + SETTLE_MARGIN).await;
    debouncer.shutdown();
    runner.await.context("map session task failed")?;
    Ok(())
}
