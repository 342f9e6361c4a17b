pub mod desk;
pub mod detail;
pub mod favorites;
pub mod history;
pub mod lookup_service;
pub mod store;

pub use desk::{Desk, DeskError, View};
pub use detail::{Activation, Completion, DetailController, LookupTicket, Selection};
pub use favorites::{FavoriteError, FavoriteRecord, FavoritesManager, FAVORITES_KEY};
pub use history::{HistoryRecord, HistoryTracker, HISTORY_CAPACITY, HISTORY_KEY};
pub use lookup_service::{request_lookup, LookupMessage};
pub use store::{CollectionStore, KeyValueBackend, MemoryBackend, SqliteBackend, StoreError};
