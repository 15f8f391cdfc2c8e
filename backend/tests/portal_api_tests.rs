//! Integration tests for the portal API calls.
//!
//! Each test starts a throwaway axum server on a random port that plays the
//! portal, records every request it sees and answers from a per-test closure.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::{Value, json};

use backend::{
    api::{
        compound_search::compound_search,
        filter_sets::{load_case_filter_set, load_origin_preset, save_filter_set},
        ingestion::get_submission,
        variant_sample_lists::add_to_variant_sample_list,
    },
    config::PortalConfig,
    portal_utils::portal_client::PortalClient,
};
use common::{
    api_error::ApiError,
    case::CaseSummary,
    filter_block::FilterBlock,
    filter_set::FilterSet,
    ingestion::IngestionSubmission,
    polling::{PollPolicy, poll_until},
    search_query::{CompoundFilterBlock, CompoundSearchRequest},
    variant_sample_list::{FilterBlocksUsed, VariantSampleSelection},
};

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: Method,
    path: String,
    body: Value,
}

type Responder = Arc<dyn Fn(&Method, &str) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct FakePortal {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

async fn handle(State(portal): State<FakePortal>, method: Method, uri: Uri, body: String) -> Response {
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    portal.requests.lock().unwrap().push(Recorded { method: method.clone(), path: path.clone(), body });
    let (status, reply) = (portal.responder)(&method, &path);
    (status, Json(reply)).into_response()
}

/// Start a fake portal and return a client pointed at it plus the request log.
async fn fake_portal(
    responder: impl Fn(&Method, &str) -> (StatusCode, Value) + Send + Sync + 'static,
) -> (PortalClient, Arc<Mutex<Vec<Recorded>>>) {
    let requests = Arc::new(Mutex::new(vec![]));
    let portal = FakePortal { requests: requests.clone(), responder: Arc::new(responder) };
    let app = Router::new().fallback(handle).with_state(portal);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = format!("http://{}", addr);
    let config = PortalConfig::from_lookup(|key| (key == "PORTAL_URL").then(|| base_url.clone())).unwrap();
    (PortalClient::new(&config).unwrap(), requests)
}

fn case() -> CaseSummary {
    CaseSummary {
        at_id: "/cases/GAPCA1/".to_string(),
        accession: "GAPCA1".to_string(),
        display_title: "Case One".to_string(),
        project: Some("/projects/cgap-core/".to_string()),
        ..Default::default()
    }
}

fn graph(item: Value) -> Value {
    json!({ "@graph": [item] })
}

fn selection(item: &str) -> VariantSampleSelection {
    VariantSampleSelection {
        variant_sample_item: item.to_string(),
        filter_blocks_used: FilterBlocksUsed::from_blocks(&[FilterBlock::new("Filter Block 1", "CALL_INFO=S1")], false),
        selected_by: None,
        date_selected: Utc::now(),
    }
}

#[tokio::test]
async fn new_filter_set_is_created_then_linked_to_case() {
    let (client, requests) = fake_portal(|method, path| match (method.as_str(), path) {
        ("POST", "/filter-sets/") => (
            StatusCode::CREATED,
            graph(json!({
                "@id": "/filter-sets/fs-1/",
                "uuid": "fs-1",
                "title": "FilterSet for GAPCA1",
                "filter_blocks": [{"name": "Filter Block 1", "query": "", "flags_applied": []}],
            })),
        ),
        ("PATCH", "/cases/GAPCA1/") => (StatusCode::OK, graph(json!({"@id": "/cases/GAPCA1/", "active_filterset": "/filter-sets/fs-1/"}))),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let filter_set = load_case_filter_set(&client, &case()).await.unwrap();
    assert!(!filter_set.is_saved());
    assert!(requests.lock().unwrap().is_empty());

    let saved = save_filter_set(&client, &case(), &filter_set).await.unwrap();
    assert_eq!(saved.filter_set.at_id.as_deref(), Some("/filter-sets/fs-1/"));
    assert_eq!(saved.link_error, None);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!((requests[0].method.clone(), requests[0].path.as_str()), (Method::POST, "/filter-sets/"));
    assert_eq!(requests[0].body["created_in_case_accession"], "GAPCA1");
    assert_eq!(requests[0].body["project"], "/projects/cgap-core/");
    assert_eq!((requests[1].method.clone(), requests[1].path.as_str()), (Method::PATCH, "/cases/GAPCA1/"));
    assert_eq!(requests[1].body, json!({"active_filterset": "/filter-sets/fs-1/"}));
}

#[tokio::test]
async fn saved_filter_set_is_patched_with_comparable_fields() {
    let (client, requests) = fake_portal(|method, path| match (method.as_str(), path) {
        ("PATCH", "/filter-sets/fs-1/") => (StatusCode::OK, graph(json!({"@id": "/filter-sets/fs-1/", "title": "Renamed"}))),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let mut filter_set = FilterSet::blank(Some("GAPCA1"));
    filter_set.at_id = Some("/filter-sets/fs-1/".to_string());
    filter_set.title = "Renamed".to_string();
    let case = CaseSummary { active_filterset: Some("/filter-sets/fs-1/".to_string()), ..case() };
    let saved = save_filter_set(&client, &case, &filter_set).await.unwrap();
    assert_eq!(saved.filter_set.title, "Renamed");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::PATCH);
    let mut keys: Vec<&String> = requests[0].body.as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(keys, ["filter_blocks", "flags", "title"]);
}

#[tokio::test]
async fn failed_case_link_keeps_created_filter_set_for_retry() {
    let link_attempts = Arc::new(AtomicUsize::new(0));
    let attempts = link_attempts.clone();
    let (client, requests) = fake_portal(move |method, path| match (method.as_str(), path) {
        ("POST", "/filter-sets/") => (StatusCode::CREATED, graph(json!({"@id": "/filter-sets/fs-1/", "uuid": "fs-1"}))),
        ("PATCH", "/filter-sets/fs-1/") => (StatusCode::OK, graph(json!({"@id": "/filter-sets/fs-1/", "uuid": "fs-1"}))),
        ("PATCH", "/cases/GAPCA1/") if attempts.fetch_add(1, Ordering::SeqCst) == 0 => {
            (StatusCode::SERVICE_UNAVAILABLE, json!({"detail": "try again later"}))
        }
        ("PATCH", "/cases/GAPCA1/") => (StatusCode::OK, graph(json!({"@id": "/cases/GAPCA1/"}))),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let mut filter_set = FilterSet::blank(Some("GAPCA1"));
    let first = save_filter_set(&client, &case(), &filter_set).await.unwrap();
    assert_eq!(first.filter_set.at_id.as_deref(), Some("/filter-sets/fs-1/"));
    assert!(matches!(first.link_error, Some(ApiError::Server { status: 503, .. })));

    filter_set.at_id = first.filter_set.at_id.clone();
    filter_set.uuid = first.filter_set.uuid.clone();
    let second = save_filter_set(&client, &case(), &filter_set).await.unwrap();
    assert_eq!(second.link_error, None);

    let requests = requests.lock().unwrap();
    let calls: Vec<(Method, &str)> = requests.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
    assert_eq!(calls, [
        (Method::POST, "/filter-sets/"),
        (Method::PATCH, "/cases/GAPCA1/"),
        (Method::PATCH, "/filter-sets/fs-1/"),
        (Method::PATCH, "/cases/GAPCA1/"),
    ]);
    assert_eq!(requests[3].body, json!({"active_filterset": "/filter-sets/fs-1/"}));
}

#[tokio::test]
async fn rejected_create_reports_validation_and_skips_case_patch() {
    let (client, requests) = fake_portal(|method, _path| match method.as_str() {
        "POST" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "status": "error",
                "title": "Unprocessable Entity",
                "errors": [{"location": "body", "name": ["filter_blocks", 0, "query"], "description": "not a string"}],
            }),
        ),
        _ => (StatusCode::OK, graph(json!({}))),
    })
    .await;

    let error = save_filter_set(&client, &case(), &FilterSet::blank(Some("GAPCA1"))).await.unwrap_err();
    let ApiError::Validation { details } = error else { panic!("expected validation error, got {:?}", error) };
    assert_eq!(details[0].name, "filter_blocks.0.query");
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn forbidden_patch_is_a_permission_error() {
    let (client, _requests) = fake_portal(|_, _| (StatusCode::FORBIDDEN, json!({"detail": "edit failed permission check"}))).await;

    let mut filter_set = FilterSet::blank(None);
    filter_set.at_id = Some("/filter-sets/fs-1/".to_string());
    let error = save_filter_set(&client, &case(), &filter_set).await.unwrap_err();
    assert!(error.is_permission());
}

#[tokio::test]
async fn origin_preset_is_loaded_for_derived_filter_set() {
    let (client, requests) = fake_portal(|method, path| match (method.as_str(), path) {
        ("GET", "/filter-sets/preset-1/") => (
            StatusCode::OK,
            json!({"@id": "/filter-sets/preset-1/", "title": "Rare variants", "filter_blocks": [{"name": "Rare", "query": "gnomad_af.to=0.01", "flags_applied": []}]}),
        ),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    assert_eq!(load_origin_preset(&client, &FilterSet::blank(None)).await.unwrap(), None);
    assert!(requests.lock().unwrap().is_empty());

    let mut derived = FilterSet::blank(Some("GAPCA1"));
    derived.derived_from_preset_filterset = Some("/filter-sets/preset-1/".to_string());
    let preset = load_origin_preset(&client, &derived).await.unwrap().unwrap();
    assert_eq!(preset.title, "Rare variants");

    derived.derived_from_preset_filterset = Some("/filter-sets/deleted/".to_string());
    assert_eq!(load_origin_preset(&client, &derived).await.unwrap(), None);
}

#[tokio::test]
async fn compound_search_posts_request_and_reads_rows() {
    let (client, requests) = fake_portal(|method, path| match (method.as_str(), path) {
        ("POST", "/compound_search") => (
            StatusCode::OK,
            json!({
                "@graph": [{"@id": "/variant-samples/vs-1/", "display_title": "chr1:100 A>G", "__matching_filter_block_names": ["Filter Block 1"]}],
                "total": 1,
            }),
        ),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let empty = compound_search(&client, &CompoundSearchRequest::default()).await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(requests.lock().unwrap().is_empty());

    let request = CompoundSearchRequest {
        filter_blocks: vec![CompoundFilterBlock { name: "Filter Block 1".into(), query: "CALL_INFO=S1".into(), flags_applied: vec![] }],
        ..Default::default()
    };
    let response = compound_search(&client, &request).await.unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.graph[0].matching_filter_block_names, vec!["Filter Block 1".to_string()]);
    assert_eq!(requests.lock().unwrap()[0].body["filter_blocks"][0]["query"], "CALL_INFO=S1");
}

#[tokio::test]
async fn compound_search_without_hits_is_empty() {
    let (client, _requests) = fake_portal(|_, _| (StatusCode::NOT_FOUND, json!({"total": 0}))).await;
    let request = CompoundSearchRequest { filter_blocks: vec![CompoundFilterBlock::default()], ..Default::default() };
    let response = compound_search(&client, &request).await.unwrap();
    assert!(response.graph.is_empty());
}

#[tokio::test]
async fn selections_are_appended_to_existing_list() {
    let existing = json!({
        "@id": "/variant-sample-lists/vsl-1/",
        "variant_samples": [{
            "variant_sample_item": "/variant-samples/vs-1/",
            "filter_blocks_used": {"filter_blocks": [], "intersect_selected_blocks": false},
            "date_selected": "2024-03-01T12:00:00Z",
        }],
    });
    let reply = existing.clone();
    let (client, requests) = fake_portal(move |method, path| match (method.as_str(), path) {
        ("GET", "/variant-sample-lists/vsl-1/") => (StatusCode::OK, reply.clone()),
        ("PATCH", "/variant-sample-lists/vsl-1/") => (StatusCode::OK, graph(reply.clone())),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let case = CaseSummary { variant_sample_list_id: Some("/variant-sample-lists/vsl-1/".to_string()), ..case() };
    add_to_variant_sample_list(&client, &case, vec![selection("/variant-samples/vs-1/"), selection("/variant-samples/vs-2/")])
        .await
        .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::PATCH);
    let items = requests[1].body["variant_samples"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], existing["variant_samples"][0]);
    assert_eq!(items[1]["variant_sample_item"], "/variant-samples/vs-2/");
}

#[tokio::test]
async fn first_selection_creates_list_and_links_case() {
    let (client, requests) = fake_portal(|method, path| match (method.as_str(), path) {
        ("POST", "/variant-sample-lists/") => (StatusCode::CREATED, graph(json!({"@id": "/variant-sample-lists/vsl-9/"}))),
        ("PATCH", "/cases/GAPCA1/") => (StatusCode::OK, graph(json!({"@id": "/cases/GAPCA1/"}))),
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await;

    let list = add_to_variant_sample_list(&client, &case(), vec![selection("/variant-samples/vs-1/")]).await.unwrap();
    assert_eq!(list.at_id.as_deref(), Some("/variant-sample-lists/vsl-9/"));

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].body["created_for_case"], "GAPCA1");
    assert_eq!(requests[1].body, json!({"variant_sample_list_id": "/variant-sample-lists/vsl-9/"}));
}

fn submission(state: &str) -> Value {
    json!({
        "@id": "/ingestion-submissions/sub-1/",
        "uuid": "sub-1",
        "processing_status": {"state": state, "outcome": if state == "done" { "success" } else { "unknown" }},
    })
}

async fn poll_submission(client: &PortalClient, policy: PollPolicy) -> Result<IngestionSubmission, ApiError> {
    poll_until(policy, || get_submission(client, "sub-1"), |s: &IngestionSubmission| s.is_terminal(), tokio::time::sleep).await
}

#[tokio::test]
async fn waits_until_submission_is_done() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let (client, requests) = fake_portal(move |_, _| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        match n {
            0 => (StatusCode::NOT_FOUND, json!({})),
            1 => (StatusCode::OK, submission("processing")),
            _ => (StatusCode::OK, submission("done")),
        }
    })
    .await;

    let policy = PollPolicy { interval: Duration::from_millis(10), max_attempts: 10 };
    let done = poll_submission(&client, policy).await.unwrap();
    assert!(done.succeeded());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(requests.lock().unwrap()[0].path.starts_with("/ingestion-submissions/sub-1/"));
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let (client, requests) = fake_portal(|_, _| (StatusCode::OK, submission("processing"))).await;

    let policy = PollPolicy { interval: Duration::from_millis(10), max_attempts: 3 };
    let error = poll_submission(&client, policy).await.unwrap_err();
    assert_eq!(error, ApiError::Timeout { attempts: 3 });
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn dropping_the_poll_stops_requests() {
    let (client, requests) = fake_portal(|_, _| (StatusCode::OK, submission("processing"))).await;

    let policy = PollPolicy { interval: Duration::from_millis(50), max_attempts: 100 };
    let outcome = tokio::time::timeout(Duration::from_millis(120), poll_submission(&client, policy)).await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(30)).await;
    let seen = requests.lock().unwrap().len();
    assert!(seen >= 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(requests.lock().unwrap().len(), seen);
}
