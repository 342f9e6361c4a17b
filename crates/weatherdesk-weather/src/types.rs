use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned city identifier. Stable across lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityKey(pub u64);

impl std::fmt::Display for CityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CityKey {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Value of the `units` query parameter. Readings are always metric, so
/// stored snapshots never need a unit of their own.
pub const UNITS: &str = "metric";

/// Suffix for every temperature shown to the user
pub const TEMPERATURE_SYMBOL: &str = "°C";

/// What to look up: a free-text city name or a known city id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    ByName(String),
    ById(CityKey),
}

impl LookupQuery {
    /// Label used in user-facing failure messages
    pub fn label(&self) -> String {
        match self {
            Self::ByName(name) => name.clone(),
            Self::ById(id) => id.to_string(),
        }
    }
}

/// Current conditions for one city, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub id: CityKey,
    pub name: String,
    pub country: String,
    pub temp: f64,
    pub description: String,
    pub humidity: u8,
    pub fetched_at: DateTime<Utc>,
}

/// Gateway failures. Callers fold all of these into one "lookup failed"
/// outcome; the variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No weather for '{label}' (cod {code})")]
    NotFound { label: String, code: String },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
