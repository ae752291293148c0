use fake_spectrum::{
    BROKEN_WADL_URL, FakeSpectrum, GEOCODE_WADL_URL, RecordingObserver, SERVER_URL,
};
use spectral_core::client::{Arguments, ConnectionOptions};
use spectral_core::http::StatusCode;
use spectral_core::server::{Server, ServerError};
use spectral_core::transport::Credentials;
use std::sync::Arc;

mod fake_spectrum;

fn server(fake: &FakeSpectrum) -> Server<FakeSpectrum> {
    Server::new(
        "http://spectrum:8080",
        Credentials::new("admin", "admin"),
        fake.clone(),
    )
}

#[tokio::test]
async fn test_list_services() {
    let fake = FakeSpectrum::with_geocode();

    let services = server(&fake).list_services().await.unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services["Geocode"], GEOCODE_WADL_URL);
    assert_eq!(services["Broken"], BROKEN_WADL_URL);
    assert_eq!(fake.request_urls(), vec![format!("{SERVER_URL}rest")]);
}

#[tokio::test]
async fn test_service() {
    let connection = server(&FakeSpectrum::with_geocode())
        .service("Geocode")
        .await
        .unwrap();

    assert!(connection.has_operation("results_json_GET"));
}

#[tokio::test]
async fn test_unknown_service() {
    let result = server(&FakeSpectrum::with_geocode()).service("Route").await;

    assert!(matches!(
        result,
        Err(ServerError::ServiceNotFound(name)) if name == "Route"
    ));
}

#[tokio::test]
async fn test_services_skip_broken_descriptions() {
    let observer = Arc::new(RecordingObserver::default());
    let server = server(&FakeSpectrum::with_geocode()).with_observer(observer.clone());

    let services = server.services().await.unwrap();

    assert_eq!(services.keys().collect::<Vec<_>>(), vec!["Geocode"]);
    assert!(
        observer
            .events()
            .contains(&"skipped service Broken".to_string())
    );
}

#[tokio::test]
async fn test_call_service() {
    let fake = FakeSpectrum::with_geocode().route(
        "http://spectrum:8080/rest/Geocode/results.json?Data.AddressLine1=1%20Global%20View",
        r#"{"Output":[{"Latitude":"42.68","Longitude":"-73.82"}]}"#,
    );

    let output = server(&fake)
        .call_service(
            "Geocode",
            &Arguments::new().arg("Data_AddressLine1", "1 Global View"),
        )
        .await
        .unwrap();

    assert!(output.contains("42.68"));
}

#[tokio::test]
async fn test_call_service_errors_as_values() {
    let fake = FakeSpectrum::with_geocode().route_status(
        "http://spectrum:8080/rest/Geocode/results.json",
        StatusCode::SERVICE_UNAVAILABLE,
        "",
    );

    let result = server(&fake)
        .with_options(ConnectionOptions {
            return_errors_as_values: true,
        })
        .call_service("Geocode", &Arguments::new())
        .await;

    assert!(matches!(result, Err(ServerError::ServiceFailed { .. })));
}

#[tokio::test]
async fn test_get_and_feature_service_urls() {
    let fake = FakeSpectrum::new().route("http://spectrum:8080/rest/ping", "pong");
    let server = server(&fake);

    assert_eq!(server.get("rest/ping").await.unwrap(), b"pong");
    assert_eq!(
        server.feature_service().service_url(),
        "http://spectrum:8080/rest/Spatial/FeatureService"
    );
}

#[tokio::test]
async fn test_listing_requires_authentication() {
    let fake = FakeSpectrum::new().route_status(
        &format!("{SERVER_URL}rest"),
        StatusCode::UNAUTHORIZED,
        "",
    );

    let result = server(&fake).list_services().await;

    assert!(matches!(result, Err(ServerError::Transport(_))));
}
