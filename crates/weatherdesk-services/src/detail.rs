//! Detail selection state machine.
//!
//! One controller per list view. At most one city is expanded; activating
//! the expanded city collapses it, activating anything else starts a lookup
//! that replaces the expansion once it completes. Each lookup carries a
//! ticket and only the completion holding the current ticket is applied, so
//! a slow response for a city the user has moved away from is dropped.

use weatherdesk_weather::{CityKey, LookupError, LookupQuery, WeatherReport};

use crate::history::{HistoryRecord, HistoryTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Collapsed,
    Expanded(CityKey),
}

/// Identifies one issued lookup within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupTicket(u64);

/// What the caller must do after an activation.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Toggled off locally; nothing to fetch.
    Collapsed,
    /// Run `query` and hand the result back with `ticket`.
    Fetch {
        ticket: LookupTicket,
        query: LookupQuery,
    },
}

/// Outcome of feeding a lookup result back in.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied(WeatherReport),
    /// Lookup failed; the label names the city for the user.
    Failed(String),
    /// Result belonged to a lookup that is no longer wanted.
    Stale,
}

#[derive(Debug, Clone)]
struct PendingLookup {
    ticket: LookupTicket,
    query: LookupQuery,
}

#[derive(Debug, Default)]
pub struct DetailController {
    selection: Selection,
    detail: Option<WeatherReport>,
    pending: Option<PendingLookup>,
    issued: u64,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Report shown for the expanded city, if any.
    pub fn detail(&self) -> Option<&WeatherReport> {
        self.detail.as_ref()
    }

    /// Query of the lookup whose result is still awaited.
    pub fn pending(&self) -> Option<&LookupQuery> {
        self.pending.as_ref().map(|p| &p.query)
    }

    pub fn is_expanded(&self, id: CityKey) -> bool {
        self.selection == Selection::Expanded(id)
    }

    /// React to the user choosing `query`.
    ///
    /// By-id activations toggle: the expanded city, or the city already being
    /// fetched, collapses instead of fetching again. By-name activations
    /// always fetch.
    pub fn activate(&mut self, query: LookupQuery) -> Activation {
        if let LookupQuery::ById(id) = &query {
            let id = *id;
            let already_pending = matches!(
                &self.pending,
                Some(PendingLookup { query: LookupQuery::ById(p), .. }) if *p == id
            );
            if self.is_expanded(id) || already_pending {
                tracing::debug!(id = %id, "Toggling detail off");
                self.collapse();
                return Activation::Collapsed;
            }
        }

        self.selection = Selection::Collapsed;
        self.detail = None;
        self.issued += 1;
        let ticket = LookupTicket(self.issued);
        self.pending = Some(PendingLookup {
            ticket,
            query: query.clone(),
        });

        tracing::debug!(?ticket, label = %query.label(), "Lookup issued");
        Activation::Fetch { ticket, query }
    }

    /// Apply a lookup result. Successful, current results expand the city and
    /// are recorded in `history`; anything for an outdated ticket is ignored.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        result: Result<WeatherReport, LookupError>,
        history: &mut HistoryTracker,
    ) -> Completion {
        let pending = match self.pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                self.pending = other;
                tracing::debug!(?ticket, "Discarding stale lookup result");
                return Completion::Stale;
            }
        };

        match result {
            Ok(report) => {
                if let Err(e) = history.record(HistoryRecord::from(&report)) {
                    tracing::warn!("Failed to record {} in history: {}", report.name, e);
                }
                self.selection = Selection::Expanded(report.id);
                self.detail = Some(report.clone());
                Completion::Applied(report)
            }
            Err(e) => {
                let label = pending.query.label();
                tracing::warn!("Lookup for {} failed: {}", label, e);
                self.selection = Selection::Collapsed;
                self.detail = None;
                Completion::Failed(label)
            }
        }
    }

    /// Hide any detail and abandon any outstanding lookup.
    pub fn collapse(&mut self) {
        self.selection = Selection::Collapsed;
        self.detail = None;
        self.pending = None;
    }

    /// Collapse if `id` is expanded or being fetched by id. Returns whether
    /// anything changed.
    pub fn forget(&mut self, id: CityKey) -> bool {
        let pending_for_id = matches!(
            &self.pending,
            Some(PendingLookup { query: LookupQuery::ById(p), .. }) if *p == id
        );
        if self.is_expanded(id) || pending_for_id {
            self.collapse();
            return true;
        }
        false
    }
}
