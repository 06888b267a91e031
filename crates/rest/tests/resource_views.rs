//! Resource view tests.
//!
//! Exercises the full request pipeline against an in-memory backend:
//! authentication, payload validation envelopes, ignored server-assigned
//! fields, conflict handling, backend failure opacity, and `Next-Page`
//! pagination URLs.
//!
//! Failure injection goes through the storage trait: fake backends
//! deterministically raise the desired failure kind instead of patching
//! anything at runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use cabinet_rest::schema::FieldType;
use cabinet_rest::{AppState, Resource, ResourceRegistry, Schema, ServerConfig};
use cabinet_storage::{
    BackendError, MemoryBackend, Page, PaginationToken, RecordStorage, Sorting, StorageResult,
    UnicityError,
};

fn minimal_record() -> Value {
    json!({"name": "Champignon"})
}

fn registry() -> ResourceRegistry {
    ResourceRegistry::new().register(
        Resource::new("mushrooms").schema(Schema::new().field("name", FieldType::String)),
    )
}

/// Creates a test server over the given backend, with a fresh state per
/// test.
fn create_server_with<S>(backend: Arc<S>) -> TestServer
where
    S: RecordStorage + Send + Sync + 'static,
{
    let state = AppState::new(backend, ServerConfig::default(), registry());
    let app = cabinet_rest::routing::create_routes(state);
    TestServer::new(app).expect("Failed to create test server")
}

fn create_test_server() -> TestServer {
    create_server_with(Arc::new(MemoryBackend::new()))
}

fn auth() -> HeaderValue {
    // "mat:1"
    HeaderValue::from_static("Basic bWF0OjE=")
}

/// Creates a record through the API and returns its payload.
async fn seed_record(server: &TestServer) -> Value {
    let response = server
        .post("/mushrooms")
        .add_header(header::AUTHORIZATION, auth())
        .json(&json!({"data": minimal_record()}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

// =============================================================================
// Authentication
// =============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn all_views_require_authentication() {
        let server = create_test_server();
        let body = json!({"data": minimal_record()});

        let response = server.get("/mushrooms").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.post("/mushrooms").json(&body).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.get("/mushrooms/abc").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.patch("/mushrooms/abc").json(&body).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.delete("/mushrooms/abc").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_credentials_have_errno_104() {
        let server = create_test_server();
        let body = server.get("/mushrooms").await.json::<Value>();
        assert_eq!(body["errno"], 104);
        assert_eq!(body["code"], 401);
    }

    #[tokio::test]
    async fn malformed_credentials_have_errno_105() {
        let server = create_test_server();
        let response = server
            .get("/mushrooms")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["errno"], 105);
    }

    #[tokio::test]
    async fn unauthenticated_create_performs_no_mutation() {
        let server = create_test_server();
        server
            .post("/mushrooms")
            .json(&json!({"data": minimal_record()}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .get("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .await;
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }

    #[tokio::test]
    async fn heartbeat_needs_no_credentials() {
        let server = create_test_server();
        let response = server.get("/__heartbeat__").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["storage"], true);
    }
}

// =============================================================================
// Invalid records
// =============================================================================

mod invalid_record {
    use super::*;

    fn invalid_body() -> Value {
        json!({"data": {"name": 42}})
    }

    #[tokio::test]
    async fn invalid_record_returns_json_formatted_error() {
        let server = create_test_server();
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&invalid_body())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "errno": 107,
                "message": "data.name in body: 42 is not a string",
                "code": 400,
                "error": "Invalid parameters",
                "details": [{
                    "description": "42 is not a string",
                    "location": "body",
                    "name": "data.name"
                }]
            })
        );
    }

    #[tokio::test]
    async fn empty_body_returns_400() {
        let server = create_test_server();
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::new())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "data is missing");
    }

    #[tokio::test]
    async fn modify_with_invalid_record_returns_400() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&invalid_body())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn replace_with_invalid_record_returns_400() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .put(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&invalid_body())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Ignored fields
// =============================================================================

mod ignored_fields {
    use super::*;

    #[tokio::test]
    async fn id_is_not_validated_and_overwritten() {
        let server = create_test_server();
        let mut record = minimal_record();
        record["id"] = json!(3.14);

        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": record}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let stored = &response.json::<Value>()["data"];
        assert_ne!(stored["id"], json!(3.14));
        assert!(stored["id"].is_string());
    }

    #[tokio::test]
    async fn last_modified_is_not_validated_and_overwritten() {
        let server = create_test_server();
        let mut record = minimal_record();
        record["last_modified"] = json!("abc");

        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": record}))
            .await;

        let stored = &response.json::<Value>()["data"];
        assert_ne!(stored["last_modified"], json!("abc"));
        assert!(stored["last_modified"].is_u64());
    }

    #[tokio::test]
    async fn modify_works_with_invalid_last_modified() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": {"last_modified": "abc"}}))
            .await;

        response.assert_status_ok();
        let stored = &response.json::<Value>()["data"];
        assert_ne!(stored["last_modified"], json!("abc"));
    }

    #[tokio::test]
    async fn replace_works_with_invalid_last_modified() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let mut replacement = minimal_record();
        replacement["last_modified"] = json!("abc");
        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .put(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": replacement}))
            .await;

        response.assert_status_ok();
        let stored = &response.json::<Value>()["data"];
        assert_ne!(stored["last_modified"], json!("abc"));
    }
}

// =============================================================================
// Invalid bodies
// =============================================================================

mod invalid_body {
    use super::*;

    const INVALID_BODY: &[u8] = b"{'foo>}";

    #[tokio::test]
    async fn invalid_body_returns_json_formatted_error() {
        let server = create_test_server();
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::from_static(INVALID_BODY))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();

        assert_eq!(body["errno"], 107);
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "Invalid parameters");
        let message = body["message"].as_str().unwrap();
        assert!(
            message.starts_with("body: Invalid JSON request body:"),
            "{message}"
        );

        // Parse error first, then the missing payload it implies.
        let details = body["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert!(
            details[0]["description"]
                .as_str()
                .unwrap()
                .starts_with("Invalid JSON request body:")
        );
        assert_eq!(details[0]["location"], "body");
        assert_eq!(details[0]["name"], Value::Null);
        assert_eq!(
            details[1],
            json!({
                "description": "data is missing",
                "location": "body",
                "name": "data"
            })
        );
    }

    #[tokio::test]
    async fn invalid_escape_sequence_returns_400() {
        // A truncated \u escape fails JSON string decoding rather than
        // structural parsing; it must get the same envelope treatment.
        let server = create_test_server();
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::from_static(br#"{"foo": "\u0d1"}"#))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["errno"], 107);
        assert!(
            body["details"][0]["description"]
                .as_str()
                .unwrap()
                .starts_with("Invalid JSON request body:")
        );
    }

    #[tokio::test]
    async fn modify_with_invalid_body_returns_400() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::from_static(INVALID_BODY))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn replace_with_invalid_body_returns_400() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .put(&url)
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::from_static(INVALID_BODY))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn modify_with_empty_body_returns_400() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .content_type("application/json")
            .bytes(Bytes::new())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let message = response.json::<Value>()["message"].as_str().unwrap().to_string();
        assert!(message.contains("Empty body"), "{message}");
    }
}

// =============================================================================
// Conflicts
// =============================================================================

/// A backend whose writes always hit a unicity conflict on the `city`
/// field, conflicting with record 42. Reads delegate to a real in-memory
/// backend so records can be seeded.
struct UnicityFailingBackend {
    inner: MemoryBackend,
}

impl UnicityFailingBackend {
    fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
        }
    }

    fn conflict() -> UnicityError {
        UnicityError::new("city", json!({"id": 42}))
    }
}

#[async_trait]
impl RecordStorage for UnicityFailingBackend {
    fn backend_name(&self) -> &'static str {
        "unicity-failing"
    }

    async fn create(
        &self,
        _collection: &str,
        _record: Value,
        _unique_fields: &[String],
    ) -> StorageResult<Value> {
        Err(Self::conflict().into())
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Value> {
        self.inner.get(collection, id).await
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _record: Value,
        _unique_fields: &[String],
    ) -> StorageResult<Value> {
        Err(Self::conflict().into())
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<Value> {
        self.inner.delete(collection, id).await
    }

    async fn delete_all(&self, collection: &str) -> StorageResult<Vec<Value>> {
        self.inner.delete_all(collection).await
    }

    async fn list(
        &self,
        collection: &str,
        sorting: &Sorting,
        token: Option<&PaginationToken>,
        limit: Option<usize>,
    ) -> StorageResult<Page> {
        self.inner.list(collection, sorting, token, limit).await
    }

    async fn count(&self, collection: &str) -> StorageResult<u64> {
        self.inner.count(collection).await
    }

    async fn collection_timestamp(&self, collection: &str) -> StorageResult<u64> {
        self.inner.collection_timestamp(collection).await
    }

    async fn heartbeat(&self) -> bool {
        true
    }
}

mod conflict_errors {
    use super::*;

    async fn conflict_server() -> (TestServer, Value) {
        let backend = Arc::new(UnicityFailingBackend::new());
        let record = backend
            .inner
            .create("mushrooms", minimal_record(), &[])
            .await
            .expect("Failed to seed record");
        (create_server_with(backend), record)
    }

    #[tokio::test]
    async fn post_returns_200_with_existing_record() {
        let (server, _record) = conflict_server().await;
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": minimal_record()}))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({"id": 42}));
    }

    #[tokio::test]
    async fn put_returns_409() {
        let (server, record) = conflict_server().await;
        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .put(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": minimal_record()}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn patch_returns_409() {
        let (server, record) = conflict_server().await;
        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": {"name": "Psylo"}}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn conflict_gives_detail_about_field_and_record() {
        let (server, record) = conflict_server().await;
        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .put(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": minimal_record()}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Conflict of field city on record 42");
        assert_eq!(body["details"]["field"], "city");
        assert_eq!(body["details"]["existing"], json!({"id": 42}));
    }
}

// =============================================================================
// Backend failures
// =============================================================================

/// A backend whose create always fails with an opaque backend error.
struct BrokenBackend;

#[async_trait]
impl RecordStorage for BrokenBackend {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn create(
        &self,
        _collection: &str,
        _record: Value,
        _unique_fields: &[String],
    ) -> StorageResult<Value> {
        Err(BackendError::new(std::io::Error::other("connection refused to 10.0.0.7:5432")).into())
    }

    async fn get(&self, _collection: &str, _id: &str) -> StorageResult<Value> {
        unimplemented!()
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _record: Value,
        _unique_fields: &[String],
    ) -> StorageResult<Value> {
        unimplemented!()
    }

    async fn delete(&self, _collection: &str, _id: &str) -> StorageResult<Value> {
        unimplemented!()
    }

    async fn delete_all(&self, _collection: &str) -> StorageResult<Vec<Value>> {
        unimplemented!()
    }

    async fn list(
        &self,
        _collection: &str,
        _sorting: &Sorting,
        _token: Option<&PaginationToken>,
        _limit: Option<usize>,
    ) -> StorageResult<Page> {
        unimplemented!()
    }

    async fn count(&self, _collection: &str) -> StorageResult<u64> {
        unimplemented!()
    }

    async fn collection_timestamp(&self, _collection: &str) -> StorageResult<u64> {
        unimplemented!()
    }

    async fn heartbeat(&self) -> bool {
        false
    }
}

mod storage_errors {
    use super::*;
    use tracing::Level;
    use tracing::subscriber::set_default;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    /// Counts ERROR-level events, to assert the backend cause is logged
    /// exactly once per failure.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn backend_errors_are_served_as_503() {
        let server = create_server_with(Arc::new(BrokenBackend));
        let response = server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": minimal_record()}))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<Value>();
        assert_eq!(body["errno"], 201);
        assert_eq!(body["code"], 503);
        // The original cause never reaches the client.
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn backend_error_original_cause_is_logged_once() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = Registry::default().with(ErrorCounter(Arc::clone(&errors)));
        let _guard = set_default(subscriber);

        let server = create_server_with(Arc::new(BrokenBackend));
        server
            .post("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": minimal_record()}))
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}

// =============================================================================
// Pagination Next-Page URLs
// =============================================================================

mod pagination_next_url {
    use super::*;
    use axum::http::HeaderName;

    async fn server_with_two_records() -> TestServer {
        let server = create_test_server();
        seed_record(&server).await;
        seed_record(&server).await;
        server
    }

    fn next_page(response: &axum_test::TestResponse) -> Option<String> {
        response
            .headers()
            .get("Next-Page")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn next_page_url_has_port_number_if_different_than_80() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1")
            .add_header(header::AUTHORIZATION, auth())
            .add_header(header::HOST, HeaderValue::from_static("localhost:8000"))
            .await;

        let url = next_page(&response).expect("truncated listing has a Next-Page header");
        assert!(url.contains(":8000"), "{url}");
    }

    #[tokio::test]
    async fn next_page_url_has_no_port_number_if_80() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1")
            .add_header(header::AUTHORIZATION, auth())
            .add_header(header::HOST, HeaderValue::from_static("localhost:80"))
            .await;

        let url = next_page(&response).unwrap();
        assert!(!url.contains(":80"), "{url}");
    }

    #[tokio::test]
    async fn next_page_url_honors_forwarded_scheme() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1")
            .add_header(header::AUTHORIZATION, auth())
            .add_header(header::HOST, HeaderValue::from_static("localhost"))
            .add_header(
                HeaderName::from_static("x-forwarded-proto"),
                HeaderValue::from_static("https"),
            )
            .await;

        let url = next_page(&response).unwrap();
        assert!(url.starts_with("https://"), "{url}");
    }

    #[tokio::test]
    async fn next_page_url_relies_on_host_header_information() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1")
            .add_header(header::AUTHORIZATION, auth())
            .add_header(
                header::HOST,
                HeaderValue::from_static("https://server.name:443"),
            )
            .await;

        let url = next_page(&response).unwrap();
        assert!(url.contains("https://server.name:443"), "{url}");
    }

    #[tokio::test]
    async fn complete_listing_has_no_next_page() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=5")
            .add_header(header::AUTHORIZATION, auth())
            .await;

        assert!(next_page(&response).is_none());
        assert_eq!(
            response.headers().get("Total-Records").unwrap(),
            &HeaderValue::from_static("2")
        );
    }

    #[tokio::test]
    async fn next_page_url_fetches_the_remaining_records() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1")
            .add_header(header::AUTHORIZATION, auth())
            .add_header(header::HOST, HeaderValue::from_static("localhost"))
            .await;

        let first_page = response.json::<Value>()["data"].clone();
        let url = next_page(&response).unwrap();
        let path_and_query = url.strip_prefix("http://localhost").unwrap().to_string();

        let response = server
            .get(&path_and_query)
            .add_header(header::AUTHORIZATION, auth())
            .await;
        response.assert_status_ok();
        let second_page = response.json::<Value>()["data"].clone();

        assert_eq!(first_page.as_array().unwrap().len(), 1);
        assert_eq!(second_page.as_array().unwrap().len(), 1);
        assert_ne!(first_page[0]["id"], second_page[0]["id"]);
        assert!(next_page(&response).is_none());
    }

    #[tokio::test]
    async fn zero_limit_is_a_querystring_error() {
        // A zero page size could never carry a continuation cursor, so
        // the listing would appear complete while records remain.
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=0")
            .add_header(header::AUTHORIZATION, auth())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["details"][0]["location"], "querystring");
        assert_eq!(body["details"][0]["name"], "_limit");
        assert_eq!(
            body["details"][0]["description"],
            "0 is not a positive integer"
        );
    }

    #[tokio::test]
    async fn invalid_token_is_a_querystring_error() {
        let server = server_with_two_records().await;
        let response = server
            .get("/mushrooms?_limit=1&_token=garbage!")
            .add_header(header::AUTHORIZATION, auth())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["details"][0]["location"], "querystring");
        assert_eq!(body["details"][0]["name"], "_token");
    }
}

// =============================================================================
// Plain CRUD round trips
// =============================================================================

mod crud {
    use super::*;

    #[tokio::test]
    async fn read_returns_the_created_record() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .get(&url)
            .add_header(header::AUTHORIZATION, auth())
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"], record);
    }

    #[tokio::test]
    async fn read_unknown_record_returns_404_envelope() {
        let server = create_test_server();
        let response = server
            .get("/mushrooms/unknown")
            .add_header(header::AUTHORIZATION, auth())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["errno"], 110);
    }

    #[tokio::test]
    async fn unknown_collection_returns_404() {
        let server = create_test_server();
        let response = server
            .get("/toads")
            .add_header(header::AUTHORIZATION, auth())
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn modify_merges_provided_fields() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .patch(&url)
            .add_header(header::AUTHORIZATION, auth())
            .json(&json!({"data": {"name": "Psylo"}}))
            .await;

        response.assert_status_ok();
        let modified = &response.json::<Value>()["data"];
        assert_eq!(modified["name"], "Psylo");
        assert_eq!(modified["id"], record["id"]);
    }

    #[tokio::test]
    async fn delete_returns_the_deleted_record() {
        let server = create_test_server();
        let record = seed_record(&server).await;

        let url = format!("/mushrooms/{}", record["id"].as_str().unwrap());
        let response = server
            .delete(&url)
            .add_header(header::AUTHORIZATION, auth())
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["id"], record["id"]);

        server
            .get(&url)
            .add_header(header::AUTHORIZATION, auth())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_collection_empties_it() {
        let server = create_test_server();
        seed_record(&server).await;
        seed_record(&server).await;

        let response = server
            .delete("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 2);

        let response = server
            .get("/mushrooms")
            .add_header(header::AUTHORIZATION, auth())
            .await;
        assert_eq!(response.json::<Value>()["data"], json!([]));
    }
}
