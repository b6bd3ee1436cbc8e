//! HTTP behaviour of `JmaClient` against a mock JMA server.

use serde_json::{Value, json};
use tenki_jma::{Error, JmaClient, JmaConfig, ParseError, RequestError};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{method, path},
};

fn client(server: &MockServer) -> JmaClient {
  JmaClient::new(JmaConfig::with_base_url(&server.uri())).expect("client")
}

fn forecast_doc(area_code: &str, area_name: &str) -> Value {
  json!([{
    "publishingOffice": "気象庁",
    "reportDatetime": "2024-05-01T11:00:00+09:00",
    "timeSeries": [
      {
        "timeDefines": ["2024-05-01T11:00:00+09:00", "2024-05-02T00:00:00+09:00"],
        "areas": [{
          "area": { "name": area_name, "code": area_code },
          "weathers": ["晴れ", "くもり"]
        }]
      },
      {
        "timeDefines": ["2024-05-01T12:00:00+09:00", "2024-05-01T18:00:00+09:00"],
        "areas": [{ "area": { "name": area_name, "code": area_code }, "pops": ["0", "10"] }]
      }
    ]
  }])
}

fn area_doc() -> Value {
  json!({
    "centers": {
      "010100": { "name": "北海道地方", "officeName": "札幌管区気象台",
                  "children": ["014100", "014030"] }
    },
    "offices": {
      "014100": { "name": "釧路・根室地方", "parent": "010100" },
      "014030": { "name": "十勝地方", "parent": "010100" }
    },
    "class10s": {}
  })
}

async fn mount_forecast(server: &MockServer, code: &str) {
  Mock::given(method("GET"))
    .and(path(format!("/bosai/forecast/data/forecast/{code}.json")))
    .respond_with(ResponseTemplate::new(200).set_body_json(forecast_doc("014010", "釧路地方")))
    .expect(1)
    .mount(server)
    .await;
}

// ─── Forecast ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remapped_office_requests_containing_document() {
  let server = MockServer::start().await;
  mount_forecast(&server, "014100").await;

  let forecast = client(&server).fetch_forecast("014030").await.unwrap();
  assert_eq!(forecast.requested_office_code, "014030");
  assert_eq!(forecast.office_code, "014100");
  assert_eq!(forecast.per_area[0].days.len(), 2);
  assert_eq!(forecast.per_area[0].days[1].precipitation_probability, Some(10));
}

#[tokio::test]
async fn amami_requests_kagoshima_document() {
  let server = MockServer::start().await;
  mount_forecast(&server, "460100").await;

  let forecast = client(&server).fetch_forecast("460040").await.unwrap();
  assert_eq!(forecast.office_code, "460100");
}

#[tokio::test]
async fn other_offices_request_themselves() {
  let server = MockServer::start().await;
  mount_forecast(&server, "130000").await;

  let forecast = client(&server).fetch_forecast("130000").await.unwrap();
  assert_eq!(forecast.office_code, "130000");
  assert_eq!(forecast.requested_office_code, "130000");
}

#[tokio::test]
async fn configured_remap_entries_are_honoured() {
  let server = MockServer::start().await;
  mount_forecast(&server, "130000").await;

  let mut config = JmaConfig::with_base_url(&server.uri());
  config.remap.extend([("130010", "130000")]);
  let client = JmaClient::new(config).unwrap();

  let forecast = client.fetch_forecast("130010").await.unwrap();
  assert_eq!(forecast.office_code, "130000");
}

#[tokio::test]
async fn non_success_status_is_fetch_failed() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/forecast/data/forecast/999999.json"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let err = client(&server).fetch_forecast("999999").await.unwrap_err();
  match err {
    Error::FetchFailed {
      office_code,
      source: RequestError::Status { status, .. },
    } => {
      assert_eq!(office_code, "999999");
      assert_eq!(status.as_u16(), 404);
    }
    other => panic!("expected FetchFailed, got {other:?}"),
  }
}

#[tokio::test]
async fn unreachable_server_is_fetch_failed() {
  let client = JmaClient::new(JmaConfig::with_base_url("http://127.0.0.1:1")).unwrap();
  let err = client.fetch_forecast("130000").await.unwrap_err();
  assert!(matches!(
    err,
    Error::FetchFailed {
      source: RequestError::Transport { .. },
      ..
    }
  ));
}

#[tokio::test]
async fn wrong_shape_is_parse_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/forecast/data/forecast/130000.json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "an array" })))
    .mount(&server)
    .await;

  let err = client(&server).fetch_forecast("130000").await.unwrap_err();
  assert!(matches!(
    err,
    Error::Parse {
      source: ParseError::Json(_),
      ..
    }
  ));
}

#[tokio::test]
async fn empty_report_array_is_parse_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/forecast/data/forecast/130000.json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .mount(&server)
    .await;

  let err = client(&server).fetch_forecast("130000").await.unwrap_err();
  assert!(matches!(
    err,
    Error::Parse {
      source: ParseError::NoReports,
      ..
    }
  ));
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_is_loaded_once_and_cached() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/common/const/area.json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(area_doc()))
    .expect(1)
    .mount(&server)
    .await;

  let client = client(&server);
  let first = client.load_catalog().await.unwrap().clone();
  let second = client.load_catalog().await.unwrap();
  assert_eq!(&first, second);

  assert_eq!(first.centers.len(), 1);
  assert_eq!(first.centers[0].name, "北海道地方");
  let names: Vec<_> = first.centers[0]
    .offices(&first)
    .map(|o| o.name.as_str())
    .collect();
  assert_eq!(names, ["釧路・根室地方", "十勝地方"]);
}

#[tokio::test]
async fn catalog_failure_is_not_cached() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/common/const/area.json"))
    .respond_with(ResponseTemplate::new(503))
    .up_to_n_times(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/bosai/common/const/area.json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(area_doc()))
    .mount(&server)
    .await;

  let client = client(&server);
  let err = client.load_catalog().await.unwrap_err();
  assert!(matches!(
    err,
    Error::CatalogUnavailable(RequestError::Status { .. })
  ));

  let catalog = client.load_catalog().await.unwrap();
  assert_eq!(catalog.offices.len(), 2);
}

#[tokio::test]
async fn malformed_catalog_is_unavailable() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/bosai/common/const/area.json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "centers": [] })))
    .mount(&server)
    .await;

  let err = client(&server).load_catalog().await.unwrap_err();
  assert!(matches!(
    err,
    Error::CatalogUnavailable(RequestError::Decode { .. })
  ));
}
