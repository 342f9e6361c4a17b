//! End-to-end tests: Desk + OpenWeatherProvider against a wiremock server,
//! persisting to an on-disk sqlite store.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use weatherdesk_services::{
    Activation, CollectionStore, Completion, Desk, DeskError, FavoriteError, LookupMessage,
    Selection, View,
};
use weatherdesk_weather::{CityKey, OpenWeatherProvider, ProviderOptions};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn city_body(id: u64, name: &str, country: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "weather": [{ "description": "scattered clouds" }],
        "main": { "temp": temp, "humidity": 48 },
        "sys": { "country": country },
        "id": id,
        "name": name,
        "cod": 200
    })
}

async fn mount_city(server: &MockServer, id: u64, name: &str, country: &str) {
    let body = city_body(id, name, country, 17.5);
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_missing(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", name))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(server)
        .await;
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(ProviderOptions {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn settle(
    desk: &mut Desk<OpenWeatherProvider>,
    rx: &mut UnboundedReceiver<LookupMessage>,
) -> Completion {
    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("lookup timed out")
        .expect("channel closed");
    desk.handle(message)
}

#[tokio::test]
async fn test_search_save_and_reload_from_disk() {
    let server = MockServer::start().await;
    mount_city(&server, 2988507, "Paris", "FR").await;
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("weatherdesk.db");

    {
        let store = CollectionStore::sqlite(&db).unwrap();
        let (mut desk, mut rx) = Desk::new(provider_for(&server), store);

        desk.search("Paris");
        let done = settle(&mut desk, &mut rx).await;
        assert!(matches!(done, Completion::Applied(ref r) if r.country == "FR"));

        desk.save_current().unwrap();
        assert_eq!(desk.favorite_count(), 1);
    }

    let store = CollectionStore::sqlite(&db).unwrap();
    let (desk, _rx) = Desk::new(provider_for(&server), store);
    assert_eq!(desk.favorites()[0].id, CityKey(2988507));
    assert_eq!(desk.favorites()[0].name, "Paris");
    assert_eq!(desk.history().len(), 1);
    assert_eq!(desk.history()[0].temp, 17.5);
    assert_eq!(desk.controller(View::Search).selection(), Selection::Collapsed);
}

#[tokio::test]
async fn test_unknown_city_reports_label_and_keeps_history() {
    let server = MockServer::start().await;
    mount_city(&server, 3936456, "Lima", "PE").await;
    mount_missing(&server, "Atlantis").await;
    let (mut desk, mut rx) = Desk::new(provider_for(&server), CollectionStore::ephemeral());

    desk.search("Lima");
    settle(&mut desk, &mut rx).await;
    desk.search("Atlantis");
    let done = settle(&mut desk, &mut rx).await;

    assert_eq!(done, Completion::Failed("Atlantis".to_string()));
    assert!(desk.controller(View::Search).detail().is_none());
    assert!(matches!(desk.save_current(), Err(DeskError::NothingToSave)));
    assert_eq!(desk.history().len(), 1);
}

#[tokio::test]
async fn test_favorite_toggle_hits_provider_once() {
    let server = MockServer::start().await;
    mount_city(&server, 3143244, "Oslo", "NO").await;
    let (mut desk, mut rx) = Desk::new(provider_for(&server), CollectionStore::ephemeral());

    desk.search("Oslo");
    settle(&mut desk, &mut rx).await;
    desk.save_current().unwrap();

    assert!(matches!(desk.open_favorite(0).unwrap(), Activation::Fetch { .. }));
    settle(&mut desk, &mut rx).await;
    assert_eq!(desk.open_favorite(0).unwrap(), Activation::Collapsed);

    let by_id = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.query_pairs().any(|(k, _)| k == "id"))
        .count();
    assert_eq!(by_id, 1);
}

#[tokio::test]
async fn test_remove_collapses_favorites_view_and_allows_resave() {
    let server = MockServer::start().await;
    mount_city(&server, 2988507, "Paris", "FR").await;
    let (mut desk, mut rx) = Desk::new(provider_for(&server), CollectionStore::ephemeral());

    desk.search("Paris");
    settle(&mut desk, &mut rx).await;
    desk.save_current().unwrap();
    let err = desk.save_current().unwrap_err();
    assert!(matches!(err, DeskError::Favorite(FavoriteError::Duplicate(ref n)) if n == "Paris"));

    desk.open_favorite(0).unwrap();
    settle(&mut desk, &mut rx).await;
    assert!(desk.controller(View::Favorites).is_expanded(CityKey(2988507)));

    desk.remove_favorite(0).unwrap();
    assert!(desk.favorites().is_empty());
    assert_eq!(desk.controller(View::Favorites).selection(), Selection::Collapsed);
    assert!(desk.controller(View::Search).is_expanded(CityKey(2988507)));

    desk.save_current().unwrap();
    assert_eq!(desk.favorite_count(), 1);
}
