//! Connector integration tests against a mock remote API.

mod common;

use common::{connector_for, EnvGuard, TOKEN};
use loopstudio_common::{AppConfig, StaticTokenProvider};
use loopstudio_connectors::{Connector, TableRef};
use loopstudio_error::ErrorContext;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE_PATH: &str = "/api/v1.0/workspaces/sales/tables/orders";
const DATA_PATH: &str = "/api/v1.0/workspaces/sales/tables/orders/data";

async fn mount_schema(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "columns": [
                {"name": "id", "tpe": "number"},
                {"name": "label", "tpe": "string"},
                {"name": "ts", "tpe": "date"}
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, offset: usize, limit: usize, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(query_param("offset", offset.to_string().as_str()))
        .and(query_param("limit", limit.to_string().as_str()))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": rows })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_row_end_to_end() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_page(
        &server,
        0,
        500,
        json!([{"0": "row-id", "1": 42.0, "2": "hello", "3": "2020-01-02T03:04:05Z"}]),
    )
    .await;
    mount_page(&server, 500, 500, json!([])).await;

    let connector = connector_for(&server);
    let response = connector
        .get_data(&TableRef::parse("sales/orders").unwrap(), &["1", "2", "3"])
        .await
        .unwrap();

    assert_eq!(response.rows.len(), 1);
    assert_eq!(
        response.rows[0].values,
        vec![json!(42.0), json!("hello"), json!("20200102030405")]
    );

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["schema"][0]["semantics"]["conceptType"], "METRIC");
    assert_eq!(body["schema"][2]["dataType"], "STRING");
    assert_eq!(body["rows"][0]["values"][1], "hello");
}

#[tokio::test]
async fn test_walks_all_pages() {
    let server = MockServer::start().await;
    mount_schema(&server).await;

    let full: Vec<_> = (0..500).map(|i| json!({"1": i})).collect();
    mount_page(&server, 0, 500, json!(full)).await;
    mount_page(&server, 500, 500, json!(full)).await;
    mount_page(&server, 1000, 500, json!([{"1": 1000}])).await;
    mount_page(&server, 1500, 500, json!([])).await;

    let response = connector_for(&server)
        .get_data(&TableRef::new("sales", "orders"), &["1"])
        .await
        .unwrap();

    assert_eq!(response.rows.len(), 1001);
    assert_eq!(response.rows[1000].values, vec![json!(1000)]);
}

#[tokio::test]
async fn test_failing_page_names_url() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_page(&server, 0, 500, json!([{"1": 1}])).await;

    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(query_param("offset", "500"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = connector_for(&server)
        .get_data(&TableRef::new("sales", "orders"), &["1"])
        .await
        .unwrap_err();

    assert!(err.is_user_facing());
    assert!(err.message.starts_with("Error querying \""));
    assert!(err.message.contains("offset=500&limit=500"));
    match err.context {
        Some(ErrorContext::RemoteFetch { status, .. }) => assert_eq!(status, Some(502)),
        other => panic!("Expected RemoteFetch context, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unsupported_column_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "columns": [{"name": "price", "tpe": {"CtMoney": {}}}]
        })))
        .mount(&server)
        .await;

    let err = connector_for(&server)
        .get_schema(&TableRef::new("sales", "orders"))
        .await
        .unwrap_err();

    assert_eq!(err.message, "Unexpected type for column 'price': CtMoney");
}

#[tokio::test]
async fn test_table_options_and_bootstrap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["sales"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/workspaces/sales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "sales",
            "tables": [{"name": "orders"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app_config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"clientId": "client-1", "apiScopes": ["api/read"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector_for(&server);
    let options = connector.table_options().await.unwrap();
    assert_eq!(options, vec![TableRef::new("sales", "orders")]);

    let app_config = connector.load_app_config().await.unwrap();
    assert_eq!(app_config.auth.client_id, "client-1");

    let requests = server.received_requests().await.unwrap();
    let bootstrap = requests
        .iter()
        .find(|r| r.url.path() == "/app_config.json")
        .unwrap();
    assert!(!bootstrap.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_page_size_from_environment() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_page(&server, 0, 2, json!([{"1": 1}, {"1": 2}])).await;
    mount_page(&server, 2, 2, json!([])).await;

    let api_url = format!("{}/api/v1.0", server.uri());
    let _env = EnvGuard::new(vec![
        ("LOOPSTUDIO_REMOTE__API_URL", api_url.as_str()),
        ("LOOPSTUDIO_PAGINATION__PAGE_SIZE", "2"),
    ]);

    let config = AppConfig::from_file(None).unwrap();
    let provider = Arc::new(StaticTokenProvider::new(TOKEN.to_string().into()));
    let connector = Connector::from_config(&config, provider).unwrap();

    let response = connector
        .get_data(&TableRef::new("sales", "orders"), &["1"])
        .await
        .unwrap();
    assert_eq!(response.rows.len(), 2);
}
