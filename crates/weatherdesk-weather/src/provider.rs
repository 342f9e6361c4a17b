//! OpenWeatherMap current-weather client.
//!
//! The provider signals success through a `cod` field in the body rather
//! than (only) the HTTP status, so every response is decoded as JSON first
//! and `cod` is checked before the payload is trusted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::types::{CityKey, LookupError, LookupQuery, WeatherReport, UNITS};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const WEATHER_PATH: &str = "/data/2.5/weather";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "WeatherDesk/0.1.0";

/// Anything that can answer a single weather lookup.
///
/// Implementations must not cache or retry: every call is a fresh request.
pub trait WeatherGateway: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &LookupQuery,
    ) -> impl Future<Output = Result<WeatherReport, LookupError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    id: u64,
    name: String,
    #[serde(default)]
    sys: Option<SysBlock>,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    #[serde(default)]
    description: String,
}

impl CurrentWeatherResponse {
    fn into_report(self) -> WeatherReport {
        WeatherReport {
            id: CityKey(self.id),
            name: self.name,
            country: self.sys.and_then(|s| s.country).unwrap_or_default(),
            temp: self.main.temp,
            description: self
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_default(),
            humidity: self.main.humidity,
            fetched_at: Utc::now(),
        }
    }
}

/// `cod` arrives as `200` on success but as a string (`"404"`) on errors.
fn is_success_code(cod: Option<&Value>) -> bool {
    match cod {
        Some(Value::Number(n)) => n.as_u64() == Some(200),
        Some(Value::String(s)) => s.trim() == "200",
        _ => false,
    }
}

fn code_text(cod: Option<&Value>) -> String {
    match cod {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "missing".to_string(),
    }
}

impl OpenWeatherProvider {
    pub fn new(options: ProviderOptions) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: options.api_key,
        })
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<WeatherReport, LookupError> {
        self.request(&LookupQuery::ByName(name.to_string())).await
    }

    pub async fn fetch_by_id(&self, id: CityKey) -> Result<WeatherReport, LookupError> {
        self.request(&LookupQuery::ById(id)).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn request(&self, query: &LookupQuery) -> Result<WeatherReport, LookupError> {
        let mut params: Vec<(&str, String)> = match query {
            LookupQuery::ByName(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(LookupError::NotFound {
                        label: String::new(),
                        code: "empty".to_string(),
                    });
                }
                vec![("q", name.to_string())]
            }
            LookupQuery::ById(id) => vec![("id", id.to_string())],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", UNITS.to_string()));

        let url = format!("{}{}", self.base_url, WEATHER_PATH);
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let value: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(_) if !status.is_success() => {
                tracing::debug!("Lookup for {} returned status {}", query.label(), status);
                return Err(LookupError::NotFound {
                    label: query.label(),
                    code: status.as_u16().to_string(),
                });
            }
            Err(e) => return Err(LookupError::Malformed(e.to_string())),
        };

        let cod = value.get("cod");
        if !status.is_success() || !is_success_code(cod) {
            let code = if cod.is_some() {
                code_text(cod)
            } else {
                status.as_u16().to_string()
            };
            tracing::debug!("Lookup for {} rejected with cod {}", query.label(), code);
            return Err(LookupError::NotFound {
                label: query.label(),
                code,
            });
        }

        let raw: CurrentWeatherResponse =
            serde_json::from_value(value).map_err(|e| LookupError::Malformed(e.to_string()))?;
        let report = raw.into_report();
        tracing::debug!(id = %report.id, name = %report.name, "Lookup succeeded");
        Ok(report)
    }
}

impl WeatherGateway for OpenWeatherProvider {
    async fn fetch(&self, query: &LookupQuery) -> Result<WeatherReport, LookupError> {
        self.request(query).await
    }
}
