//! Plain-text rendering of shop lists.

use latte_core::Shop;
use latte_map::{navigate, Navigation};

pub fn format_shop(shop: &Shop) -> String {
    let currencies = shop
        .crypto_accepted
        .iter()
        .map(latte_core::Currency::code)
        .collect::<Vec<_>>()
        .join(",");
    let target = match navigate(shop) {
        Navigation::Detail { path } => path,
        Navigation::None => "-".to_owned(),
    };

    format!(
        "[{}] {} ({:.5}, {:.5}) {} {}",
        shop.source, shop.name, shop.latitude, shop.longitude, currencies, target
    )
}

/// One-line count of a visible set, split by provenance.
pub fn summary(shops: &[Shop]) -> String {
    let osm = shops.iter().filter(|s| s.is_osm()).count();
    format!(
        "visible: {} (user {}, osm {osm})",
        shops.len(),
        shops.len() - osm
    )
}

pub fn print_shops(shops: &[Shop]) {
    for shop in shops {
        println!("{}", format_shop(shop));
    }
}
