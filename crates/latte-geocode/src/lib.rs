pub mod client;
pub mod error;
pub mod types;

pub use client::{GeocodeClient, GeocodeEndpoints, GeocodeKind};
pub use error::GeocodeError;
pub use types::{
    transform_business_results, transform_valueserp, BusinessResult, BusinessSearchResponse,
    Position, SuggestionItem, ValueSerpResponse,
};
