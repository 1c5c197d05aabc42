//! Conversion of Overpass elements into map shops.

use std::collections::HashMap;

use latte_core::{Currency, Shop, ShopSource};

use crate::types::OsmElement;

pub const NAME_PLACEHOLDER: &str = "Unnamed Shop";
pub const ADDRESS_PLACEHOLDER: &str = "Address not available";

const NAME_TAGS: [&str; 2] = ["name", "name:en"];
const ADDRESS_TAGS: [&str; 4] = [
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "addr:postcode",
];

/// Parses every element of an Overpass response, dropping the ones that do
/// not describe a crypto-accepting shop with a resolvable position.
#[must_use]
pub fn parse_elements(elements: &[OsmElement]) -> Vec<Shop> {
    let node_coords: HashMap<i64, (f64, f64)> = elements
        .iter()
        .filter(|e| e.element_type == "node")
        .filter_map(|e| Some((e.id, (e.lat?, e.lon?))))
        .collect();

    let shops: Vec<Shop> = elements
        .iter()
        .filter_map(|e| parse_element(e, &node_coords))
        .collect();

    tracing::debug!(
        elements = elements.len(),
        shops = shops.len(),
        "parsed Overpass elements"
    );
    shops
}

/// Parses one element into a shop.
///
/// Returns `None` when no `currency:*=yes` tag is present or when the
/// position cannot be resolved. A way is placed at its first member node, not
/// its centroid.
#[must_use]
pub fn parse_element(element: &OsmElement, node_coords: &HashMap<i64, (f64, f64)>) -> Option<Shop> {
    let crypto_accepted: Vec<Currency> = Currency::OSM_LAYERS
        .iter()
        .filter(|c| c.osm_tag().and_then(|tag| element.tag(tag)) == Some("yes"))
        .cloned()
        .collect();
    if crypto_accepted.is_empty() {
        return None;
    }

    let (latitude, longitude) = match element.element_type.as_str() {
        "node" => (element.lat?, element.lon?),
        "way" => *node_coords.get(element.nodes.first()?)?,
        _ => return None,
    };

    let name = NAME_TAGS
        .iter()
        .find_map(|key| element.tag(key))
        .unwrap_or(NAME_PLACEHOLDER)
        .to_owned();

    let address_parts: Vec<&str> = ADDRESS_TAGS
        .iter()
        .filter_map(|key| element.tag(key))
        .collect();
    let address = if address_parts.is_empty() {
        ADDRESS_PLACEHOLDER.to_owned()
    } else {
        address_parts.join(", ")
    };

    let shop_type = element
        .tag("shop")
        .or_else(|| element.tag("amenity"))
        .unwrap_or("unknown")
        .to_owned();

    Some(Shop {
        id: Shop::osm_id_for(&element.element_type, element.id),
        name,
        address,
        latitude,
        longitude,
        crypto_accepted,
        source: ShopSource::Osm,
        distance_km: None,
        osm_id: Some(element.id),
        osm_type: Some(element.element_type.clone()),
        shop_type: Some(shop_type),
        website: element.tag("website").map(str::to_owned),
        phone: element.tag("phone").map(str::to_owned),
        opening_hours: element.tag("opening_hours").map(str::to_owned),
    })
}
