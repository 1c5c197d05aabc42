use std::fmt::Write as _;

use latte_core::{BoundingBox, Currency};

/// Server-side Overpass timeout, seconds.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

/// Builds the Overpass QL union of every node and way tagged as accepting one
/// of the layer currencies inside `bbox`.
///
/// `out body` returns the tagged elements; the `>` recurse-down plus
/// `out skel qt` appends the bare member nodes of each way so way positions can
/// be resolved.
#[must_use]
pub fn build_overpass_query(bbox: &BoundingBox) -> String {
    let BoundingBox {
        south,
        west,
        north,
        east,
    } = *bbox;

    let mut query = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for tag in Currency::OSM_LAYERS.iter().filter_map(Currency::osm_tag) {
        for kind in ["node", "way"] {
            let _ = writeln!(
                query,
                "  {kind}[\"{tag}\"=\"yes\"]({south},{west},{north},{east});"
            );
        }
    }
    query.push_str(");\nout body;\n>;\nout skel qt;");
    query
}
