use fake_spectrum::{FakeSpectrum, GEOCODE_WADL_URL, RecordingObserver, SERVER_URL};
use spectral_core::client::{Arguments, CallError, Connection, ConnectionOptions, OperationResponse};
use spectral_core::http::{Method, StatusCode, header};
use spectral_core::server::Server;
use spectral_core::transport::{Credentials, codec};
use std::sync::Arc;

mod fake_spectrum;

const RESULTS_URL: &str = "http://spectrum:8080/rest/Geocode/results.json";

async fn connect(
    fake: &FakeSpectrum,
    options: ConnectionOptions,
    observer: Arc<RecordingObserver>,
) -> Connection<FakeSpectrum> {
    Server::new(SERVER_URL, Credentials::new("admin", "secret"), fake.clone())
        .with_observer(observer)
        .with_options(options)
        .connection_for(GEOCODE_WADL_URL)
        .await
        .expect("Failed to connect")
}

#[tokio::test]
async fn test_unusable_operations_are_skipped() {
    let observer = Arc::new(RecordingObserver::default());
    let connection = connect(
        &FakeSpectrum::with_geocode(),
        ConnectionOptions::default(),
        observer.clone(),
    )
    .await;

    let names: Vec<&str> = connection.operation_names().collect();
    assert_eq!(
        names,
        vec![
            "b_c_GET",
            "candidates_POST",
            "results_json_GET",
            "results_json_POST"
        ]
    );
    assert!(!connection.has_operation("legacy_PUT"));
    assert!(connection.catalog().operation("legacy_PUT").is_some());
    assert!(
        observer
            .events()
            .contains(&"skipped operation legacy_PUT".to_string())
    );
}

#[tokio::test]
async fn test_url_params_are_encoded_under_their_wire_name() {
    let fake = FakeSpectrum::with_geocode();
    let filter = "name = 'Main St' & rank > 2";
    let url = format!(
        "http://spectrum:8080/rest/Geocode/b/c?q.filter={}",
        codec::encode_query_value(filter)
    );
    let fake = fake.route(&url, "[]");
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    let response = connection
        .call("b_c_GET", &Arguments::new().arg("q_filter", filter))
        .await
        .unwrap();

    assert_eq!(response.body(), Some(b"[]".as_slice()));

    let request = fake.requests().pop().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, url);
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_request_headers() {
    let fake = FakeSpectrum::with_geocode().route(
        &format!("{RESULTS_URL}?Data.AddressLine1=1%20Main%20St"),
        "{}",
    );
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    connection
        .call(
            "results_json_GET",
            &Arguments::new().arg("Data_AddressLine1", "1 Main St"),
        )
        .await
        .unwrap();

    let request = fake.requests().pop().unwrap();
    assert_eq!(
        request.headers[header::AUTHORIZATION],
        "Basic YWRtaW46c2VjcmV0"
    );
    assert_eq!(request.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(request.headers[header::ACCEPT], "application/json");
}

#[tokio::test]
async fn test_unknown_arguments_are_dropped() {
    let fake =
        FakeSpectrum::with_geocode().route(&format!("{RESULTS_URL}?Option.Country=USA"), "{}");
    let observer = Arc::new(RecordingObserver::default());
    let connection = connect(&fake, ConnectionOptions::default(), observer.clone()).await;

    let args = Arguments::new()
        .arg("Bogus", "1")
        .arg("Option_Country", "USA");
    let operation = connection.operation("results_json_GET").unwrap();

    assert_eq!(operation.prepare(&args).dropped, vec!["Bogus"]);

    let response = operation.call(&args).await.unwrap();
    assert!(!response.is_error());
    assert_eq!(
        fake.requests().pop().unwrap().url,
        format!("{RESULTS_URL}?Option.Country=USA")
    );
    assert!(
        observer
            .events()
            .contains(&"invalid argument Bogus for results_json_GET".to_string())
    );
}

#[tokio::test]
async fn test_body_attributes_and_elements() {
    let fake = FakeSpectrum::with_geocode().route(RESULTS_URL, "<GeocodeResponse/>");
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    let args = Arguments::new()
        .arg("x", "1")
        .arg("AddressLine1", "2")
        .arg("id", "a&b");

    connection.call("results_json_POST", &args).await.unwrap();

    let request = fake.requests().pop().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, RESULTS_URL);
    assert_eq!(
        request.body.as_deref(),
        Some(
            r#"<?xml version="1.0" ?><GeocodeRequest x="1" id="a&amp;b"><AddressLine1>2</AddressLine1></GeocodeRequest>"#
        )
    );
    assert_eq!(request.headers[header::CONTENT_TYPE], "application/xml");
}

#[tokio::test]
async fn test_url_params_take_precedence_over_body_fields() {
    let url = "http://spectrum:8080/rest/Geocode/candidates?x=1&Option.Country=United%20States";
    let fake = FakeSpectrum::with_geocode().route(url, "<GeocodeResponse/>");
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    // `x` is both a URL parameter and a GeocodeRequest attribute.
    let args = Arguments::new()
        .arg("AddressLine1", "<")
        .arg("x", "1")
        .arg("Option_Country", "United States");

    connection.call("candidates_POST", &args).await.unwrap();

    let request = fake.requests().pop().unwrap();
    assert_eq!(request.url, url);
    assert_eq!(
        request.body.as_deref(),
        Some(
            r#"<?xml version="1.0" ?><GeocodeRequest><AddressLine1>&lt;</AddressLine1></GeocodeRequest>"#
        )
    );
}

#[tokio::test]
async fn test_no_body_without_body_arguments() {
    let fake = FakeSpectrum::with_geocode().route(RESULTS_URL, "<GeocodeResponse/>");
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    let prepared = connection
        .operation("results_json_POST")
        .unwrap()
        .prepare(&Arguments::new());

    assert!(prepared.body.is_none());
    assert!(prepared.dropped.is_empty());
}

#[tokio::test]
async fn test_transport_errors() {
    let fake = FakeSpectrum::with_geocode().route_status(
        RESULTS_URL,
        StatusCode::INTERNAL_SERVER_ERROR,
        "boom",
    );
    let connection = connect(
        &fake,
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    let result = connection
        .call("results_json_POST", &Arguments::new().arg("x", "1"))
        .await;

    assert!(matches!(result, Err(CallError::Transport(_))));
}

#[tokio::test]
async fn test_errors_as_values() {
    let fake = FakeSpectrum::with_geocode().route_status(
        RESULTS_URL,
        StatusCode::INTERNAL_SERVER_ERROR,
        "boom",
    );
    let options = ConnectionOptions {
        return_errors_as_values: true,
    };
    let connection = connect(&fake, options, Arc::new(RecordingObserver::default())).await;

    let response = connection
        .call("results_json_POST", &Arguments::new().arg("x", "1"))
        .await
        .unwrap();

    let OperationResponse::Error(message) = response else {
        panic!("Expected an error value, got {response:?}");
    };
    assert!(message.ends_with(" - ERROR!"));
    assert!(message.contains("500"));
}

#[tokio::test]
async fn test_unknown_operation() {
    let connection = connect(
        &FakeSpectrum::with_geocode(),
        ConnectionOptions::default(),
        Arc::new(RecordingObserver::default()),
    )
    .await;

    let result = connection.call("nope_GET", &Arguments::new()).await;

    assert!(matches!(
        result,
        Err(CallError::OperationNotFound(name)) if name == "nope_GET"
    ));
}
