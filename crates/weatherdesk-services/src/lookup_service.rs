//! Background weather lookups.
//! Fetches run as tokio tasks; results come back as `LookupMessage`s on an
//! mpsc channel so the caller's event loop stays responsive.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use weatherdesk_weather::{LookupError, LookupQuery, WeatherGateway, WeatherReport};

use crate::detail::LookupTicket;
use crate::desk::View;

/// Messages sent from lookup tasks back to the event loop
#[derive(Debug)]
pub enum LookupMessage {
    Done {
        view: View,
        ticket: LookupTicket,
        result: Result<WeatherReport, LookupError>,
    },
}

/// Start `query` in the background. Sends `Done` on `tx` when it finishes.
/// Without a tokio runtime the failure is reported on the channel instead.
pub fn request_lookup<G: WeatherGateway>(
    tx: &UnboundedSender<LookupMessage>,
    gateway: Arc<G>,
    view: View,
    ticket: LookupTicket,
    query: LookupQuery,
) {
    let tx = tx.clone();
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("No async runtime for lookup: {}", e);
            if tx
                .send(LookupMessage::Done {
                    view,
                    ticket,
                    result: Err(LookupError::Unavailable(e.to_string())),
                })
                .is_err()
            {
                tracing::debug!("Lookup failure dropped, receiver closed");
            }
            return;
        }
    };

    handle.spawn(async move {
        let result = gateway.fetch(&query).await;
        if tx
            .send(LookupMessage::Done {
                view,
                ticket,
                result,
            })
            .is_err()
        {
            tracing::debug!("Lookup finished after receiver closed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdesk_weather::CityKey;

    struct Unreachable;

    impl WeatherGateway for Unreachable {
        async fn fetch(&self, query: &LookupQuery) -> Result<WeatherReport, LookupError> {
            Err(LookupError::NotFound {
                label: query.label(),
                code: "404".into(),
            })
        }
    }

    #[test]
    fn test_no_runtime_reports_unavailable() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut controller = crate::detail::DetailController::new();
        let ticket = match controller.activate(LookupQuery::ById(CityKey(1))) {
            crate::detail::Activation::Fetch { ticket, .. } => ticket,
            crate::detail::Activation::Collapsed => panic!("expected fetch"),
        };

        request_lookup(&tx, Arc::new(Unreachable), View::Favorites, ticket, LookupQuery::ById(CityKey(1)));

        match rx.try_recv().unwrap() {
            LookupMessage::Done { result, .. } => {
                assert!(matches!(result, Err(LookupError::Unavailable(_))));
            }
        }
    }

    #[test]
    fn test_no_runtime_with_closed_receiver_does_not_panic() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let mut controller = crate::detail::DetailController::new();
        let ticket = match controller.activate(LookupQuery::ById(CityKey(2))) {
            crate::detail::Activation::Fetch { ticket, .. } => ticket,
            crate::detail::Activation::Collapsed => panic!("expected fetch"),
        };

        request_lookup(&tx, Arc::new(Unreachable), View::History, ticket, LookupQuery::ById(CityKey(2)));
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_spawned_lookup_reports_back() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut controller = crate::detail::DetailController::new();
        let query = LookupQuery::ByName("Atlantis".into());
        let ticket = match controller.activate(query.clone()) {
            crate::detail::Activation::Fetch { ticket, .. } => ticket,
            crate::detail::Activation::Collapsed => panic!("expected fetch"),
        };

        request_lookup(&tx, Arc::new(Unreachable), View::Search, ticket, query);

        let LookupMessage::Done { view, ticket: got, result } = rx.recv().await.unwrap();
        assert_eq!(view, View::Search);
        assert_eq!(got, ticket);
        assert!(result.unwrap_err().is_not_found());
    }
}
