#![allow(dead_code)]

use spectral_core::http::StatusCode;
use spectral_core::observer::{Event, Observer, Verbosity};
use spectral_core::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SERVER_URL: &str = "http://spectrum:8080/";
pub const GEOCODE_WADL_URL: &str = "http://spectrum:8080/rest/Geocode?_wadl";
pub const GEOCODE_XSD_URL: &str = "http://spectrum:8080/rest/Geocode?xsd=1";
pub const BROKEN_WADL_URL: &str = "http://spectrum:8080/rest/Broken?_wadl";

pub const LISTING: &str = r#"<html><head><title>Spectrum REST services</title></head><body>
<h1>Available RESTful services</h1>
<ul>
  <li><a href="http://spectrum:8080/rest/Geocode?_wadl">http://spectrum:8080/rest/Geocode?_wadl</a></li>
  <li><a href="http://spectrum:8080/rest/Broken?_wadl">http://spectrum:8080/rest/Broken?_wadl</a></li>
  <li><a href="http://spectrum:8080/help">Help</a></li>
</ul>
</body></html>"#;

pub const GEOCODE_WADL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<application xmlns="http://wadl.dev.java.net/2009/02" xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:spectrum:geocode">
  <grammars>
    <include href="Geocode?xsd=1"/>
  </grammars>
  <resources base="http://spectrum:8080/rest/Geocode/">
    <resource path="/results.json">
      <method name="GET">
        <request>
          <param name="Data.AddressLine1" style="query" type="xs:string"/>
          <param name="Option.Country" style="query"/>
        </request>
        <response>
          <representation mediaType="application/json"/>
        </response>
      </method>
      <method name="POST">
        <request>
          <representation mediaType="application/xml" element="tns:GeocodeRequest"/>
        </request>
        <response>
          <representation mediaType="application/xml" element="tns:GeocodeResponse"/>
        </response>
      </method>
    </resource>
    <resource path="/b">
      <resource path="/c">
        <method name="GET">
          <request>
            <param name="q.filter" style="query"/>
          </request>
        </method>
      </resource>
    </resource>
    <resource path="/candidates">
      <method name="POST">
        <request>
          <param name="Option.Country" style="query"/>
          <param name="x" style="query"/>
          <representation mediaType="application/xml" element="tns:GeocodeRequest"/>
        </request>
      </method>
    </resource>
    <resource path="/legacy">
      <method name="PUT">
        <request>
          <representation mediaType="application/xml" element="tns:Undeclared"/>
        </request>
      </method>
    </resource>
  </resources>
</application>"#;

pub const GEOCODE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:spectrum:geocode" targetNamespace="urn:spectrum:geocode">
  <xs:complexType name="Record">
    <xs:attribute name="id" type="xs:string"/>
  </xs:complexType>
  <xs:complexType name="Address">
    <xs:complexContent>
      <xs:extension base="tns:Record">
        <xs:attribute name="country" type="xs:string"/>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:complexType name="GeocodeRequest">
    <xs:complexContent>
      <xs:extension base="tns:Address">
        <xs:sequence>
          <xs:element name="AddressLine1" type="xs:string"/>
          <xs:element name="City" type="xs:string"/>
        </xs:sequence>
        <xs:attribute name="x" type="xs:string"/>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:complexType name="GeocodeResponse">
    <xs:sequence>
      <xs:element name="Latitude" type="xs:double"/>
      <xs:element name="Longitude" type="xs:double"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, (StatusCode, Vec<u8>)>,
    requests: Vec<HttpRequest>,
}

/// An in-process Spectrum server: canned responses by URL and a log of every request.
///
/// Unknown URLs answer `404 Not Found`.
#[derive(Debug, Clone, Default)]
pub struct FakeSpectrum {
    state: Arc<Mutex<State>>,
}

impl FakeSpectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server publishing the Geocode service (and a broken one) on its REST listing.
    pub fn with_geocode() -> Self {
        Self::new()
            .route(&format!("{SERVER_URL}rest"), LISTING)
            .route(GEOCODE_WADL_URL, GEOCODE_WADL)
            .route(GEOCODE_XSD_URL, GEOCODE_XSD)
            .route(BROKEN_WADL_URL, "<application><resources>")
    }

    pub fn route(self, url: &str, body: &str) -> Self {
        self.route_status(url, StatusCode::OK, body)
    }

    pub fn route_status(self, url: &str, status: StatusCode, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(url.to_string(), (status, body.as_bytes().to_vec()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl Transport for FakeSpectrum {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let (status, body) = state
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, b"Not Found".to_vec()));

        state.requests.push(request);
        Ok(HttpResponse { status, body })
    }
}

/// Keeps a one-line summary of every delivered event.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Observer for RecordingObserver {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Debug
    }

    fn on_event(&self, event: &Event<'_>) {
        let summary = match event {
            Event::InvalidArgument { operation, name, .. } => {
                format!("invalid argument {name} for {operation}")
            }
            Event::OperationSkipped { name, .. } => format!("skipped operation {name}"),
            Event::ServiceSkipped { name, .. } => format!("skipped service {name}"),
            Event::UnresolvedBase { type_name, base } => {
                format!("unresolved base {base} of {type_name}")
            }
            other => format!("{other:?}"),
        };
        self.events.lock().unwrap().push(summary);
    }
}
