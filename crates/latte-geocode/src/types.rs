//! ValueSerp local-search payloads and their HERE-shaped replacement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueSerpResponse {
    #[serde(default)]
    pub local_results: Option<LocalResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalResults {
    #[serde(default)]
    pub places: Vec<ValueSerpPlace>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueSerpPlace {
    pub title: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gps_coordinates: Option<GpsCoordinates>,
    pub rating: Option<f64>,
    pub reviews: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub hours: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressLabel {
    pub label: String,
}

/// Extra business details ValueSerp provides that HERE does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceMetadata {
    pub rating: Option<f64>,
    pub reviews: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub hours: Option<serde_json::Value>,
}

/// Autosuggest item in the shape the submission form consumes from HERE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    pub title: Option<String>,
    pub address: AddressLabel,
    pub position: Option<Position>,
    pub result_type: String,
    pub locality_type: String,
    pub metadata: PlaceMetadata,
}

/// Maps ValueSerp local results onto HERE-style suggestion items.
///
/// Places without an address get a label assembled from title, city and
/// state.
#[must_use]
pub fn transform_valueserp(response: ValueSerpResponse) -> Vec<SuggestionItem> {
    let places = response
        .local_results
        .map(|r| r.places)
        .unwrap_or_default();

    places
        .into_iter()
        .map(|place| {
            let title = place.title.or(place.name);
            let label = place.address.unwrap_or_else(|| {
                format!(
                    "{}, {}, {}",
                    title.as_deref().unwrap_or_default(),
                    place.city.as_deref().unwrap_or_default(),
                    place.state.as_deref().unwrap_or_default()
                )
                .trim()
                .to_owned()
            });

            SuggestionItem {
                title,
                address: AddressLabel { label },
                position: place.gps_coordinates.map(|c| Position {
                    lat: c.latitude,
                    lng: c.longitude,
                }),
                result_type: "place".to_owned(),
                locality_type: "city".to_owned(),
                metadata: PlaceMetadata {
                    rating: place.rating,
                    reviews: place.reviews,
                    place_type: place.place_type,
                    phone: place.phone,
                    website: place.website,
                    hours: place.hours,
                },
            }
        })
        .collect()
}

/// `local_results` of a ValueSerp search, read as a flat list of businesses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub local_results: Option<Vec<BusinessPlace>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessPlace {
    pub title: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<serde_json::Value>,
    pub business_type: Option<String>,
}

/// Business-name suggestion returned by `GET /api/business-search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessResult {
    pub name: Option<String>,
    pub address: String,
    pub rating: Option<f64>,
    pub reviews: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
}

/// Flattens ValueSerp local results into name suggestions. A place without an
/// address gets `"{city}, {state}"`.
#[must_use]
pub fn transform_business_results(response: BusinessSearchResponse) -> Vec<BusinessResult> {
    response
        .local_results
        .unwrap_or_default()
        .into_iter()
        .map(|place| BusinessResult {
            name: place.title.or(place.name),
            address: place.address.unwrap_or_else(|| {
                format!(
                    "{}, {}",
                    place.city.as_deref().unwrap_or_default(),
                    place.state.as_deref().unwrap_or_default()
                )
                .trim()
                .to_owned()
            }),
            rating: place.rating,
            reviews: place.reviews,
            business_type: place.business_type,
        })
        .collect()
}
