//! End-to-end tests: client -> gateway -> resolver -> [directory, weather].
//!
//! Both services run on ephemeral ports; the public APIs are wiremock servers.

use cep_core::{Config, TemperatureResponse};
use cep_server::{gateway, resolver};
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Relay {
    gateway_url: String,
    directory: MockServer,
    weather: MockServer,
}

async fn spawn(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start_relay() -> Relay {
    let directory = MockServer::start().await;
    let weather = MockServer::start().await;

    let mut config = Config::default();
    config.resolver.directory_url = directory.uri();
    config.resolver.weather_url = weather.uri();
    config.set_weather_api_key("TEST_KEY".into());

    let resolver_url = spawn(resolver::from_config(&config).unwrap()).await;
    config.gateway.resolver_url = resolver_url;
    let gateway_url = spawn(gateway::from_config(&config).unwrap()).await;

    Relay { gateway_url, directory, weather }
}

async fn post(relay: &Relay, body: serde_json::Value) -> (u16, String) {
    let res = reqwest::Client::new()
        .post(format!("{}/", relay.gateway_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

#[tokio::test]
async fn resolves_sao_paulo() {
    let relay = start_relay().await;

    Mock::given(method("GET"))
        .and(path("/ws/01001000/json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "localidade": "São Paulo", "erro": false })),
        )
        .expect(1)
        .mount(&relay.directory)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "Sao Paulo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "current": { "temp_c": 25.0 } })),
        )
        .expect(1)
        .mount(&relay.weather)
        .await;

    let (status, body) = post(&relay, json!({ "cep": "01001000" })).await;

    assert_eq!(status, 200);
    let resp: TemperatureResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(resp, TemperatureResponse::from_celsius("São Paulo", 25.0));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        json!({ "temp_c": 25.0, "temp_f": 77.0, "temp_k": 298.0, "city": "São Paulo" })
    );

    // The raw weather query must carry the folded, escaped name.
    let requests = relay.weather.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap().contains("q=Sao+Paulo"));
}

#[tokio::test]
async fn short_code_is_rejected_without_outbound_calls() {
    let relay = start_relay().await;

    let (status, body) = post(&relay, json!({ "cep": "1234" })).await;

    assert_eq!(status, 422);
    assert_eq!(body, "invalid zipcode");
    assert!(relay.directory.received_requests().await.unwrap().is_empty());
    assert!(relay.weather.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_code_is_not_found_end_to_end() {
    let relay = start_relay().await;

    Mock::given(method("GET"))
        .and(path("/ws/99999999/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "erro": true })))
        .expect(1)
        .mount(&relay.directory)
        .await;

    let (status, body) = post(&relay, json!({ "cep": "99999999" })).await;

    assert_eq!(status, 404);
    assert_eq!(body, "can not find zipcode");
    assert!(relay.weather.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn weather_outage_surfaces_as_server_error() {
    let relay = start_relay().await;

    Mock::given(method("GET"))
        .and(path("/ws/80010000/json/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "localidade": "Curitiba" })),
        )
        .mount(&relay.directory)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&relay.weather)
        .await;

    let (status, body) = post(&relay, json!({ "cep": "80010000" })).await;

    assert_eq!(status, 500);
    assert!(body.starts_with("error while searching for cep: "));
    assert!(body.contains("error while searching for temperature: "));
    assert!(body.contains("maintenance"));
}
