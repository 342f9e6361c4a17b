//! Saved cities, most recently added first.

use serde::{Deserialize, Serialize};
use weatherdesk_weather::{CityKey, WeatherReport};

use crate::store::{CollectionStore, StoreError};

/// Store key for the favorites list
pub const FAVORITES_KEY: &str = "weatherAppFavorites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: CityKey,
    pub name: String,
    pub country: String,
}

impl From<&WeatherReport> for FavoriteRecord {
    fn from(report: &WeatherReport) -> Self {
        Self {
            id: report.id,
            name: report.name.clone(),
            country: report.country.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FavoriteError {
    #[error("City '{0}' is already saved.")]
    Duplicate(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sole writer of the favorites entry. The in-memory list always matches
/// what was last persisted.
pub struct FavoritesManager {
    store: CollectionStore,
    items: Vec<FavoriteRecord>,
}

impl FavoritesManager {
    /// Read the persisted list. Duplicate ids left by older data are dropped,
    /// keeping the first (most recent) occurrence.
    pub fn load(store: CollectionStore) -> Self {
        let mut items: Vec<FavoriteRecord> = store.load(FAVORITES_KEY);
        let before = items.len();
        let mut seen = std::collections::HashSet::new();
        items.retain(|f| seen.insert(f.id));
        if items.len() != before {
            tracing::warn!(
                "Dropped {} duplicate favorite(s) from stored data",
                before - items.len()
            );
        }

        tracing::info!("Loaded {} favorite(s)", items.len());
        Self { store, items }
    }

    /// Prepend `record` unless its city is already saved.
    pub fn add(&mut self, record: FavoriteRecord) -> Result<(), FavoriteError> {
        if self.contains(record.id) {
            return Err(FavoriteError::Duplicate(record.name));
        }

        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(record);
        next.extend(self.items.iter().cloned());

        self.store.save(FAVORITES_KEY, &next)?;
        tracing::info!(id = %next[0].id, name = %next[0].name, "Added favorite");
        self.items = next;
        Ok(())
    }

    /// Remove the city with `id`. Returns whether anything was removed;
    /// an absent id is not an error.
    pub fn remove(&mut self, id: CityKey) -> Result<bool, StoreError> {
        let next: Vec<FavoriteRecord> = self.items.iter().filter(|f| f.id != id).cloned().collect();
        let removed = next.len() != self.items.len();

        self.store.save(FAVORITES_KEY, &next)?;
        if removed {
            tracing::info!(id = %id, "Removed favorite");
        }
        self.items = next;
        Ok(removed)
    }

    pub fn list(&self) -> &[FavoriteRecord] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&FavoriteRecord> {
        self.items.get(index)
    }

    pub fn contains(&self, id: CityKey) -> bool {
        self.items.iter().any(|f| f.id == id)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}
