use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Id prefix carried by shops synthesized from OpenStreetMap elements.
pub const OSM_ID_PREFIX: &str = "osm-";

/// Payment currency code accepted by a shop.
///
/// Serialized as the bare code. Codes outside the known set are kept verbatim
/// in [`Currency::Other`] so community submissions round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Btc,
    Bch,
    Ltc,
    Xmr,
    Lightning,
    Eth,
    Usdc,
    Usdt,
    Doge,
    Other(String),
}

impl Currency {
    /// Currencies that have an OpenStreetMap `currency:*` tag and a map layer.
    pub const OSM_LAYERS: [Currency; 4] = [Currency::Btc, Currency::Bch, Currency::Ltc, Currency::Xmr];

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Currency::Btc => "BTC",
            Currency::Bch => "BCH",
            Currency::Ltc => "LTC",
            Currency::Xmr => "XMR",
            Currency::Lightning => "Lightning",
            Currency::Eth => "ETH",
            Currency::Usdc => "USDC",
            Currency::Usdt => "USDT",
            Currency::Doge => "DOGE",
            Currency::Other(code) => code,
        }
    }

    /// OSM tag key that marks acceptance of this currency, if one exists.
    ///
    /// Bitcoin is tagged with its ISO-style `XBT` code rather than `BTC`.
    #[must_use]
    pub fn osm_tag(&self) -> Option<&'static str> {
        match self {
            Currency::Btc => Some("currency:XBT"),
            Currency::Bch => Some("currency:BCH"),
            Currency::Ltc => Some("currency:LTC"),
            Currency::Xmr => Some("currency:XMR"),
            _ => None,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.as_str() {
            "BTC" => Currency::Btc,
            "BCH" => Currency::Bch,
            "LTC" => Currency::Ltc,
            "XMR" => Currency::Xmr,
            "Lightning" => Currency::Lightning,
            "ETH" => Currency::Eth,
            "USDC" => Currency::Usdc,
            "USDT" => Currency::Usdt,
            "DOGE" => Currency::Doge,
            _ => Currency::Other(code),
        }
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Currency::from(code.to_owned())
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Other(code) => code,
            known => known.code().to_owned(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopSource {
    /// Community-submitted and approved; backed by a persistent record.
    #[default]
    User,
    /// Transient view of an Overpass result; no backing record.
    Osm,
}

impl fmt::Display for ShopSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopSource::User => write!(f, "user"),
            ShopSource::Osm => write!(f, "osm"),
        }
    }
}

/// A shop pin, from either provenance.
///
/// User records come from the backend without a `source` field, which
/// defaults to [`ShopSource::User`]. The `osm_*`, `shop_type`, `website`,
/// `phone` and `opening_hours` fields are only populated for OSM shops and are
/// omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crypto_accepted: Vec<Currency>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ShopSource,
    /// Distance from the query center, reported by the nearby-shops lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(
        default,
        rename = "osmId",
        alias = "osm_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub osm_id: Option<i64>,
    #[serde(
        default,
        rename = "osmType",
        alias = "osm_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub osm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

/// Backend rows are passed through from the database, where nullable
/// columns arrive as `null` rather than missing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Shop {
    /// Builds the synthetic id for an OSM element, e.g. `osm-way-42`.
    #[must_use]
    pub fn osm_id_for(element_type: &str, element_id: i64) -> String {
        format!("{OSM_ID_PREFIX}{element_type}-{element_id}")
    }

    #[must_use]
    pub fn is_osm(&self) -> bool {
        self.source == ShopSource::Osm || self.id.starts_with(OSM_ID_PREFIX)
    }

    /// Path of the persistent detail page, or `None` for OSM shops.
    #[must_use]
    pub fn detail_path(&self) -> Option<String> {
        if self.is_osm() {
            None
        } else {
            Some(format!("/shops/{}", self.id))
        }
    }

    #[must_use]
    pub fn accepts(&self, currency: &Currency) -> bool {
        self.crypto_accepted.contains(currency)
    }
}
