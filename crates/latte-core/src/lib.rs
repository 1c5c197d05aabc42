pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod layers;
pub mod shop;

pub use app_config::{AppConfig, MapConfig};
pub use config::{load_app_config, load_map_config};
pub use error::{ConfigError, CoreError};
pub use geo::{
    distance_km, dynamic_radius_km, radius_for, BoundingBox, Bounds, LatLng, DEFAULT_RADIUS_KM,
    EARTH_RADIUS_KM, MAX_RADIUS_KM, MIN_RADIUS_KM,
};
pub use layers::{Layer, LayerState};
pub use shop::{Currency, Shop, ShopSource, OSM_ID_PREFIX};
