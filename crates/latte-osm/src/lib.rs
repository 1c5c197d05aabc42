//! OpenStreetMap lookup of crypto-accepting shops through the Overpass API.

pub mod client;
pub mod error;
pub mod parse;
pub mod query;
pub mod types;

pub use client::OverpassClient;
pub use error::OsmError;
pub use parse::{parse_element, parse_elements, ADDRESS_PLACEHOLDER, NAME_PLACEHOLDER};
pub use query::build_overpass_query;
pub use types::{OsmElement, OverpassResponse};
