use latte_core::Shop;

/// Outcome of clicking a pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Open the persistent detail page at `path`.
    Detail { path: String },
    /// OSM shops have no backing record; their popup is the whole UI.
    None,
}

/// Dispatches a pin click.
#[must_use]
pub fn navigate(shop: &Shop) -> Navigation {
    match shop.detail_path() {
        Some(path) => Navigation::Detail { path },
        None => Navigation::None,
    }
}
