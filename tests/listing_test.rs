use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use filedrop::config::AppConfig;
use filedrop::services::storage::LocalStore;
use filedrop::utils::hash::sha256_hex;
use filedrop::{AppState, create_app};
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tower::ServiceExt;

fn make_app(dir: &Path, index_token: &str) -> Router {
    let config = AppConfig {
        files_dir: dir.to_path_buf(),
        index_token: index_token.to_string(),
        ..AppConfig::default()
    };
    let store = Arc::new(LocalStore::new(&config.files_dir));
    create_app(AppState::new(store, &config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn write_at(dir: &Path, name: &str, content: &[u8], epoch_secs: u64) {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    let file = std::fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .unwrap();
}

fn empty_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer.finish().unwrap().into_inner()
}

fn one_entry_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("inner.txt", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(b"data").unwrap();
    writer.finish().unwrap().into_inner()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_healthz_is_open_and_alive() {
    let dir = tempfile::tempdir().unwrap();
    // Even with a view token configured, the probe stays open.
    let app = make_app(dir.path(), "secret");

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["ok"], true);
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_api_list_orders_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "t1.txt", b"one", 1_000);
    write_at(dir.path(), "t3.txt", b"three", 3_000);
    write_at(dir.path(), "t2.txt", b"two", 2_000);
    let app = make_app(dir.path(), "");

    let response = app.oneshot(get("/api/list")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["t3.txt", "t2.txt", "t1.txt"]);
}

#[tokio::test]
async fn test_api_list_record_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "doc.txt", b"hello world", 1_700_000_000);
    let app = make_app(dir.path(), "");

    let json = json_body(app.oneshot(get("/api/list")).await.unwrap()).await;
    let record = &json.as_array().unwrap()[0];

    assert_eq!(record["name"], "doc.txt");
    assert_eq!(record["size"], 11);
    assert_eq!(record["size_h"], "11.0 B");
    assert_eq!(record["mtime"], 1_700_000_000i64);
    assert!(record["mtime_iso"].as_str().unwrap().len() == 19);
    assert_eq!(record["sha12"], sha256_hex(b"hello world")[..12]);
    // Non-zip entries carry no archive info at all.
    assert!(record.get("zip").is_none());
}

#[tokio::test]
async fn test_api_list_zip_inspection() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "full.zip", &one_entry_zip(), 3_000);
    write_at(dir.path(), "void.zip", &empty_zip(), 2_000);
    write_at(dir.path(), "fake.zip", b"garbage", 1_000);
    let app = make_app(dir.path(), "");

    let json = json_body(app.oneshot(get("/api/list")).await.unwrap()).await;
    let files = json.as_array().unwrap();
    let find = |name: &str| files.iter().find(|f| f["name"] == name).unwrap();

    let full = find("full.zip");
    assert_eq!(full["zip"]["count"], 1);
    assert_eq!(full["zip"]["empty"], false);
    assert_eq!(full["zip"]["bad"], false);

    let void = find("void.zip");
    assert_eq!(void["zip"]["count"], 0);
    assert_eq!(void["zip"]["empty"], true);
    assert_eq!(void["zip"]["bad"], false);

    let fake = find("fake.zip");
    assert_eq!(fake["zip"]["count"], 0);
    assert_eq!(fake["zip"]["empty"], true);
    assert_eq!(fake["zip"]["bad"], true);
}

#[tokio::test]
async fn test_identical_content_identical_sha12() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "a.bin", b"same payload", 1_000);
    write_at(dir.path(), "b.bin", b"same payload", 2_000);
    let app = make_app(dir.path(), "");

    let json = json_body(app.oneshot(get("/api/list")).await.unwrap()).await;
    let files = json.as_array().unwrap();
    assert_eq!(files[0]["sha12"], files[1]["sha12"]);
}

#[tokio::test]
async fn test_view_token_gates_listing() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "f.txt", b"x", 1_000);
    let app = make_app(dir.path(), "viewsecret");

    for uri in ["/", "/api/list"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let response = app
            .clone()
            .oneshot(get(&format!("{uri}?t=wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let response = app
            .clone()
            .oneshot(get(&format!("{uri}?t=viewsecret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("X-Index-Token", "viewsecret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_gated_listing_matches_ungated_file_set() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "a.txt", b"1", 1_000);
    write_at(dir.path(), "b.txt", b"2", 2_000);

    let gated = make_app(dir.path(), "viewsecret");
    let open = make_app(dir.path(), "");

    let gated_json = json_body(
        gated
            .oneshot(get("/api/list?t=viewsecret"))
            .await
            .unwrap(),
    )
    .await;
    let open_json = json_body(open.oneshot(get("/api/list")).await.unwrap()).await;

    assert_eq!(gated_json, open_json);
}

#[tokio::test]
async fn test_index_page_renders_file_names() {
    let dir = tempfile::tempdir().unwrap();
    write_at(dir.path(), "visible.txt", b"x", 1_000);
    let app = make_app(dir.path(), "");

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("visible.txt"));
}
