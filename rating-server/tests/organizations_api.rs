//! Organization API integration tests
//!
//! Drives the full router against an in-memory database.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use rating_server::ServerState;
use rating_server::api;
use rating_server::core::Config;
use rating_server::db::DbService;

async fn test_app() -> Router {
    let config = Config::with_overrides("/tmp/rating-server-test", 0);
    let db = DbService::memory().await.expect("in-memory db").db;
    api::build_app().with_state(ServerState::new(config, db))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Create a node and return its id ("organization:xyz")
async fn create_node(
    app: &Router,
    name: &str,
    org_type: &str,
    parent: Option<&str>,
    email: &str,
) -> String {
    let mut body = json!({ "name": name, "type": org_type, "email": email });
    if let Some(p) = parent {
        body["parent"] = json!(p);
    }
    let (status, value) = send(app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::OK, "create {name}: {value}");
    value["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn create_and_fetch_round_trip() {
    let app = test_app().await;

    let id = create_node(&app, "Head Office", "admin", None, "admin@example.com").await;

    let (status, node) = send(&app, get(&format!("/organizations/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["name"], "Head Office");
    assert_eq!(node["type"], "admin");
    assert_eq!(node["email"], "admin@example.com");
    assert!(node["parent"].is_null());

    let (status, list) = send(&app, get("/organizations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fetching_missing_node_is_404() {
    let app = test_app().await;
    let (status, _) = send(&app, get("/organizations/organization:missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = test_app().await;
    create_node(&app, "Head Office", "admin", None, "admin@example.com").await;

    let body = json!({ "name": "Other", "type": "hr", "email": "admin@example.com" });
    let (status, error) = send(&app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "validation_error");
}

#[tokio::test]
async fn branch_name_follows_node_type() {
    let app = test_app().await;

    // Branch without a branch name
    let body = json!({ "name": "Rio Branch", "type": "branch", "email": "rio@example.com" });
    let (status, _) = send(&app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Branch with one
    let body = json!({
        "name": "Rio Branch", "type": "branch",
        "email": "rio@example.com", "branch_name": "Rio"
    });
    let (status, node) = send(&app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["branch_name"], "Rio");

    // Non-branch carrying a branch name
    let body = json!({
        "name": "HR", "type": "hr",
        "email": "hr@example.com", "branch_name": "Rio"
    });
    let (status, _) = send(&app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_parent_is_404() {
    let app = test_app().await;
    let body = json!({
        "name": "HR", "type": "hr", "email": "hr@example.com",
        "parent": "organization:missing"
    });
    let (status, _) = send(&app, post_json("/organizations", &body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tree_endpoint_nests_children() {
    let app = test_app().await;

    let admin = create_node(&app, "Admin", "admin", None, "admin@example.com").await;
    let hr = create_node(&app, "HR", "hr", Some(&admin), "hr@example.com").await;
    create_node(&app, "Ops", "operations_manager", Some(&hr), "ops@example.com").await;

    let (status, forest) = send(&app, get("/organizations/tree")).await;
    assert_eq!(status, StatusCode::OK);

    let roots = forest.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Admin");
    assert_eq!(roots[0]["children"][0]["name"], "HR");
    assert_eq!(roots[0]["children"][0]["children"][0]["name"], "Ops");
}

#[tokio::test]
async fn subtree_and_children_endpoints() {
    let app = test_app().await;

    let admin = create_node(&app, "Admin", "admin", None, "admin@example.com").await;
    let hr = create_node(&app, "HR", "hr", Some(&admin), "hr@example.com").await;
    create_node(&app, "Ops", "operations_manager", Some(&hr), "ops@example.com").await;

    let (status, subtree) = send(&app, get(&format!("/organizations/{hr}/tree"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subtree["name"], "HR");
    assert_eq!(subtree["children"][0]["name"], "Ops");

    let (status, children) = send(&app, get(&format!("/organizations/{hr}/children"))).await;
    assert_eq!(status, StatusCode::OK);
    let children = children.as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Ops");
}

#[tokio::test]
async fn ancestry_is_root_first() {
    let app = test_app().await;

    let admin = create_node(&app, "Admin", "admin", None, "admin@example.com").await;
    let hr = create_node(&app, "HR", "hr", Some(&admin), "hr@example.com").await;
    let ops = create_node(&app, "Ops", "operations_manager", Some(&hr), "ops@example.com").await;

    let (status, path) = send(&app, get(&format!("/organizations/{ops}/ancestry"))).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = path
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Admin", "HR", "Ops"]);
}

#[tokio::test]
async fn delete_guard_requires_childless_node() {
    let app = test_app().await;

    let admin = create_node(&app, "Admin", "admin", None, "admin@example.com").await;
    let hr = create_node(&app, "HR", "hr", Some(&admin), "hr@example.com").await;

    // A node with children cannot be removed
    let (status, error) = send(&app, delete(&format!("/organizations/{admin}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "conflict");

    // Leaf first, then the parent
    let (status, _) = send(&app, delete(&format!("/organizations/{hr}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, delete(&format!("/organizations/{admin}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get(&format!("/organizations/{admin}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_fields_and_checks_email() {
    let app = test_app().await;

    let admin = create_node(&app, "Admin", "admin", None, "admin@example.com").await;
    let hr = create_node(&app, "HR", "hr", Some(&admin), "hr@example.com").await;

    let body = json!({ "name": "People Ops", "email": "people@example.com" });
    let (status, node) = send(&app, put_json(&format!("/organizations/{hr}"), &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["name"], "People Ops");
    assert_eq!(node["email"], "people@example.com");

    // Taking another node's email is rejected
    let body = json!({ "email": "admin@example.com" });
    let (status, _) = send(&app, put_json(&format!("/organizations/{hr}"), &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn on_disk_database_round_trip() {
    use rating_server::db::models::{OrgType, OrganizationCreate};
    use rating_server::db::repository::OrganizationRepository;

    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("rating.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("on-disk db")
        .db;

    let repo = OrganizationRepository::new(db);
    let created = repo
        .create(OrganizationCreate {
            name: "Admin".to_string(),
            org_type: OrgType::Admin,
            parent: None,
            email: "admin@example.com".to_string(),
            branch_name: None,
        })
        .await
        .expect("create");

    let id = created.id.expect("id").to_string();
    let found = repo.find_by_id(&id).await.expect("find").expect("present");
    assert_eq!(found.name, "Admin");
}
