//! Weather lookups for WeatherDesk
//!
//! Current conditions by city name or provider city id, via the
//! OpenWeatherMap current-weather endpoint.

pub mod provider;
pub mod types;

pub use provider::{OpenWeatherProvider, ProviderOptions, WeatherGateway, DEFAULT_BASE_URL};
pub use types::*;
