//! Recently viewed cities: a capped, most-recent-first list of weather
//! snapshots, written on every successful lookup.

use serde::{Deserialize, Serialize};
use weatherdesk_weather::{CityKey, WeatherReport};

use crate::store::{CollectionStore, StoreError};

/// Store key for the history list
pub const HISTORY_KEY: &str = "weatherAppPreviouslyViewed";

/// Maximum number of cities kept
pub const HISTORY_CAPACITY: usize = 5;

/// Weather as it was when the city was viewed. Not refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: CityKey,
    pub name: String,
    pub country: String,
    pub temp: f64,
    pub description: String,
    pub humidity: u8,
}

impl From<&WeatherReport> for HistoryRecord {
    fn from(report: &WeatherReport) -> Self {
        Self {
            id: report.id,
            name: report.name.clone(),
            country: report.country.clone(),
            temp: report.temp,
            description: report.description.clone(),
            humidity: report.humidity,
        }
    }
}

pub struct HistoryTracker {
    store: CollectionStore,
    items: Vec<HistoryRecord>,
}

impl HistoryTracker {
    pub fn load(store: CollectionStore) -> Self {
        let raw: Vec<HistoryRecord> = store.load(HISTORY_KEY);
        let mut items: Vec<HistoryRecord> = Vec::with_capacity(HISTORY_CAPACITY);
        for record in raw {
            if items.len() == HISTORY_CAPACITY {
                break;
            }
            if !items.iter().any(|r| r.id == record.id) {
                items.push(record);
            }
        }

        tracing::info!("Loaded {} recently viewed city(ies)", items.len());
        Self { store, items }
    }

    /// Move `snapshot`'s city to the front with fresh values, evicting the
    /// oldest entry beyond capacity.
    pub fn record(&mut self, snapshot: HistoryRecord) -> Result<(), StoreError> {
        let mut next = Vec::with_capacity(HISTORY_CAPACITY);
        let id = snapshot.id;
        next.push(snapshot);
        next.extend(self.items.iter().filter(|r| r.id != id).cloned());
        next.truncate(HISTORY_CAPACITY);

        self.store.save(HISTORY_KEY, &next)?;
        tracing::debug!(id = %id, len = next.len(), "Recorded view");
        self.items = next;
        Ok(())
    }

    pub fn list(&self) -> &[HistoryRecord] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&HistoryRecord> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
