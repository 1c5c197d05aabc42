use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Currency};

/// One user-toggleable map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Btc,
    Bch,
    Ltc,
    Xmr,
    UserShops,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::UserShops,
        Layer::Btc,
        Layer::Bch,
        Layer::Ltc,
        Layer::Xmr,
    ];

    /// Layer controlling OSM shops that accept `currency`, if any.
    #[must_use]
    pub fn for_currency(currency: &Currency) -> Option<Self> {
        match currency {
            Currency::Btc => Some(Layer::Btc),
            Currency::Bch => Some(Layer::Bch),
            Currency::Ltc => Some(Layer::Ltc),
            Currency::Xmr => Some(Layer::Xmr),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Layer::Btc => "Bitcoin",
            Layer::Bch => "Bitcoin Cash",
            Layer::Ltc => "Litecoin",
            Layer::Xmr => "Monero",
            Layer::UserShops => "User Shops",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Btc => write!(f, "BTC"),
            Layer::Bch => write!(f, "BCH"),
            Layer::Ltc => write!(f, "LTC"),
            Layer::Xmr => write!(f, "XMR"),
            Layer::UserShops => write!(f, "userShops"),
        }
    }
}

impl FromStr for Layer {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "btc" => Ok(Layer::Btc),
            "bch" => Ok(Layer::Bch),
            "ltc" => Ok(Layer::Ltc),
            "xmr" => Ok(Layer::Xmr),
            "user" | "usershops" | "user-shops" | "user_shops" => Ok(Layer::UserShops),
            _ => Err(CoreError::UnknownLayer(s.to_owned())),
        }
    }
}

/// Visibility flags for each map layer.
///
/// JSON keys match the persisted `mapLayers` value. Keys missing from a stored
/// value come back enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerState {
    #[serde(rename = "BTC")]
    pub btc: bool,
    #[serde(rename = "BCH")]
    pub bch: bool,
    #[serde(rename = "LTC")]
    pub ltc: bool,
    #[serde(rename = "XMR")]
    pub xmr: bool,
    #[serde(rename = "userShops")]
    pub user_shops: bool,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            btc: true,
            bch: true,
            ltc: true,
            xmr: true,
            user_shops: true,
        }
    }
}

impl LayerState {
    #[must_use]
    pub fn is_enabled(&self, layer: Layer) -> bool {
        match layer {
            Layer::Btc => self.btc,
            Layer::Bch => self.bch,
            Layer::Ltc => self.ltc,
            Layer::Xmr => self.xmr,
            Layer::UserShops => self.user_shops,
        }
    }

    pub fn set(&mut self, layer: Layer, enabled: bool) {
        let flag = match layer {
            Layer::Btc => &mut self.btc,
            Layer::Bch => &mut self.bch,
            Layer::Ltc => &mut self.ltc,
            Layer::Xmr => &mut self.xmr,
            Layer::UserShops => &mut self.user_shops,
        };
        *flag = enabled;
    }

    /// Flips `layer` and returns its new value.
    pub fn toggle(&mut self, layer: Layer) -> bool {
        let enabled = !self.is_enabled(layer);
        self.set(layer, enabled);
        enabled
    }

    /// Whether OSM shops accepting `currency` are shown. Currencies without a
    /// layer are never shown through this check.
    #[must_use]
    pub fn shows_currency(&self, currency: &Currency) -> bool {
        Layer::for_currency(currency).is_some_and(|layer| self.is_enabled(layer))
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        Layer::ALL.iter().filter(|l| self.is_enabled(**l)).count()
    }
}
