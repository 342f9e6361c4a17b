//! The `Desk` ties the favorites list, the history tracker and one detail
//! controller per view together. Front ends talk only to this type.

use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use weatherdesk_weather::{CityKey, LookupQuery, WeatherGateway};

use crate::detail::{Activation, Completion, DetailController};
use crate::favorites::{FavoriteError, FavoriteRecord, FavoritesManager};
use crate::history::{HistoryRecord, HistoryTracker};
use crate::lookup_service::{request_lookup, LookupMessage};
use crate::store::{CollectionStore, StoreError};

/// The list views that each keep their own expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Free-text search results
    Search,
    /// Saved cities
    Favorites,
    /// Recently viewed cities
    History,
}

impl View {
    pub const ALL: [View; 3] = [View::Search, View::Favorites, View::History];

    fn index(self) -> usize {
        match self {
            View::Search => 0,
            View::Favorites => 1,
            View::History => 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Favorite(#[from] FavoriteError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Nothing is displayed in the search view")]
    NothingToSave,
    #[error("No entry at index {index} in {view:?}")]
    NoSuchEntry { view: View, index: usize },
}

pub struct Desk<G: WeatherGateway> {
    gateway: Arc<G>,
    favorites: FavoritesManager,
    history: HistoryTracker,
    views: [DetailController; 3],
    tx: UnboundedSender<LookupMessage>,
}

impl<G: WeatherGateway> Desk<G> {
    /// Load both collections from `store`. Lookup results arrive on the
    /// returned receiver and must be passed to [`Desk::handle`].
    pub fn new(gateway: G, store: CollectionStore) -> (Self, UnboundedReceiver<LookupMessage>) {
        let (tx, rx) = unbounded_channel();
        let desk = Self {
            gateway: Arc::new(gateway),
            favorites: FavoritesManager::load(store.clone()),
            history: HistoryTracker::load(store),
            views: Default::default(),
            tx,
        };
        (desk, rx)
    }

    pub fn favorites(&self) -> &[FavoriteRecord] {
        self.favorites.list()
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.count()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.history.list()
    }

    pub fn controller(&self, view: View) -> &DetailController {
        &self.views[view.index()]
    }

    /// Activate `query` in `view`, dispatching a lookup when one is needed.
    pub fn activate(&mut self, view: View, query: LookupQuery) -> Activation {
        let activation = self.views[view.index()].activate(query);
        if let Activation::Fetch { ticket, query } = &activation {
            request_lookup(&self.tx, self.gateway.clone(), view, *ticket, query.clone());
        }
        activation
    }

    /// Look up a city by name in the search view.
    pub fn search(&mut self, name: &str) -> Activation {
        self.activate(View::Search, LookupQuery::ByName(name.trim().to_string()))
    }

    /// Toggle the saved city at `index` in the favorites view.
    pub fn open_favorite(&mut self, index: usize) -> Result<Activation, DeskError> {
        let id = self.favorite_at(index)?.id;
        Ok(self.activate(View::Favorites, LookupQuery::ById(id)))
    }

    /// Show the saved city at `index` in the search view, looked up by name.
    pub fn search_favorite(&mut self, index: usize) -> Result<Activation, DeskError> {
        let name = self.favorite_at(index)?.name.clone();
        Ok(self.activate(View::Search, LookupQuery::ByName(name)))
    }

    /// Toggle the recently viewed city at `index` in the history view.
    pub fn open_recent(&mut self, index: usize) -> Result<Activation, DeskError> {
        let id = self
            .history
            .get(index)
            .ok_or(DeskError::NoSuchEntry {
                view: View::History,
                index,
            })?
            .id;
        Ok(self.activate(View::History, LookupQuery::ById(id)))
    }

    /// Feed a finished lookup back into its view.
    pub fn handle(&mut self, message: LookupMessage) -> Completion {
        match message {
            LookupMessage::Done {
                view,
                ticket,
                result,
            } => self.views[view.index()].complete(ticket, result, &mut self.history),
        }
    }

    /// Save the city currently shown in the search view.
    pub fn save_current(&mut self) -> Result<FavoriteRecord, DeskError> {
        let record = self.views[View::Search.index()]
            .detail()
            .map(FavoriteRecord::from)
            .ok_or(DeskError::NothingToSave)?;
        self.favorites.add(record.clone())?;
        Ok(record)
    }

    /// Remove the saved city at `index`, collapsing it in the favorites view.
    pub fn remove_favorite(&mut self, index: usize) -> Result<FavoriteRecord, DeskError> {
        let record = self.favorite_at(index)?.clone();
        self.remove_favorite_by_id(record.id)?;
        Ok(record)
    }

    /// Remove the saved city with `id`. Absent ids are a no-op.
    pub fn remove_favorite_by_id(&mut self, id: CityKey) -> Result<bool, DeskError> {
        let removed = self.favorites.remove(id)?;
        // Only the favorites view lists favorites.
        if removed && self.views[View::Favorites.index()].forget(id) {
            tracing::debug!(id = %id, "Collapsed detail of removed favorite");
        }
        Ok(removed)
    }

    pub fn collapse(&mut self, view: View) {
        self.views[view.index()].collapse();
    }

    fn favorite_at(&self, index: usize) -> Result<&FavoriteRecord, DeskError> {
        self.favorites.get(index).ok_or(DeskError::NoSuchEntry {
            view: View::Favorites,
            index,
        })
    }
}
