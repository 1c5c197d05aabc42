use latte_core::{LayerState, Shop, ShopSource};

/// Builds the set of pins to draw from both feeds and the layer toggles.
///
/// User shops are included (re-tagged as [`ShopSource::User`]) iff the
/// `userShops` layer is on. An OSM shop is included iff at least one of its
/// currencies has its layer on. Order is user shops first, then OSM shops,
/// each in input order. Nothing is deduplicated: a shop present in both feeds
/// is drawn twice.
#[must_use]
pub fn visible_shops(user: &[Shop], osm: &[Shop], layers: &LayerState) -> Vec<Shop> {
    let mut visible = Vec::with_capacity(user.len() + osm.len());

    if layers.user_shops {
        visible.extend(user.iter().cloned().map(|mut shop| {
            shop.source = ShopSource::User;
            shop
        }));
    }

    visible.extend(
        osm.iter()
            .filter(|shop| shop.crypto_accepted.iter().any(|c| layers.shows_currency(c)))
            .cloned(),
    );

    visible
}
