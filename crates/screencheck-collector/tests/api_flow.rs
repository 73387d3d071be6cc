use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use screencheck_collector::http::{HttpRequest, HttpResponse};
use screencheck_collector::CollectorServer;
use serde_json::Value;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(1);

fn temp_db_path() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    std::env::temp_dir()
        .join(format!("screencheck-api-test-{pid}-{now}-{seq}.json"))
        .display()
        .to_string()
}

fn request(method: &str, path: &str, body: &str) -> HttpRequest {
    HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        query: HashMap::new(),
        headers: HashMap::new(),
        body: body.as_bytes().to_vec(),
    }
}

fn body_json(response: &HttpResponse) -> Value {
    serde_json::from_slice(&response.body).expect("json body")
}

const FULL_SUBMISSION: &str = r#"{"responses":{"usesDeviceBeforeSleep":true,"difficultyWithoutSocialMedia":false,"usesDeviceDuringMeals":true,"deviceDistractsAtWorkOrStudy":false},"prediction":"medium","score":0.4875}"#;

#[test]
fn create_list_export_round_trip() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let created = server.dispatch(request("POST", "/api/responses", FULL_SUBMISSION));
    assert_eq!(created.status, 201);
    let created_json = body_json(&created);
    assert_eq!(created_json["message"], "response stored");
    assert_eq!(created_json["data"]["id"], "resp-1");
    assert_eq!(created_json["data"]["usesDeviceBeforeSleep"], true);
    assert_eq!(created_json["data"]["prediction"], "medium");
    assert!(created_json["data"]["timestampMs"].as_u64().is_some());

    let second_body = r#"{"responses":{"usesDeviceBeforeSleep":true,"difficultyWithoutSocialMedia":true,"usesDeviceDuringMeals":true,"deviceDistractsAtWorkOrStudy":true},"prediction":"medium","score":0.6457}"#;
    let second = server.dispatch(request("POST", "/api/responses", second_body));
    assert_eq!(second.status, 201);
    assert_eq!(body_json(&second)["data"]["id"], "resp-2");

    let listed = server.dispatch(request("GET", "/api/responses", ""));
    assert_eq!(listed.status, 200);
    let records = body_json(&listed);
    let records = records.as_array().expect("response array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "resp-2");
    assert_eq!(records[1]["id"], "resp-1");

    let exported = server.dispatch(request("GET", "/api/export/neurona", ""));
    assert_eq!(exported.status, 200);
    let exported_json = body_json(&exported);
    let rows = exported_json["respuestas"].as_array().expect("respuestas");
    assert_eq!(rows.len(), 2);
    // Export keeps submission order and strips everything but the answers.
    assert_eq!(rows[0]["usesDeviceBeforeSleep"], true);
    assert_eq!(rows[0]["difficultyWithoutSocialMedia"], false);
    assert_eq!(rows[1]["difficultyWithoutSocialMedia"], true);
    assert!(rows[0].get("id").is_none());
    assert!(rows[0].get("prediction").is_none());
    assert!(rows[0].get("timestampMs").is_none());

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn prediction_and_score_are_optional() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let minimal = r#"{"responses":{"usesDeviceBeforeSleep":false,"difficultyWithoutSocialMedia":false,"usesDeviceDuringMeals":false,"deviceDistractsAtWorkOrStudy":true}}"#;
    let created = server.dispatch(request("POST", "/api/responses", minimal));
    assert_eq!(created.status, 201);
    let created_json = body_json(&created);
    assert_eq!(created_json["data"]["prediction"], Value::Null);
    assert_eq!(created_json["data"]["score"], Value::Null);

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn missing_responses_field_is_rejected() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let rejected = server.dispatch(request("POST", "/api/responses", r#"{"prediction":"low"}"#));
    assert_eq!(rejected.status, 400);
    let error = body_json(&rejected);
    assert_eq!(error["error"], "the responses field is required in the body");

    // Nothing may reach the store on a rejected submission.
    let listed = server.dispatch(request("GET", "/api/responses", ""));
    assert_eq!(body_json(&listed).as_array().map(Vec::len), Some(0));

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn unparseable_and_incomplete_bodies_are_client_errors() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let garbage = server.dispatch(request("POST", "/api/responses", "{not json"));
    assert_eq!(garbage.status, 400);
    assert!(body_json(&garbage)["error"]
        .as_str()
        .expect("error text")
        .starts_with("invalid json body"));

    let partial = r#"{"responses":{"usesDeviceBeforeSleep":true}}"#;
    let rejected = server.dispatch(request("POST", "/api/responses", partial));
    assert_eq!(rejected.status, 400);

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn health_reports_ok() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let health = server.dispatch(request("GET", "/health", ""));
    assert_eq!(health.status, 200);
    assert_eq!(body_json(&health)["status"], "ok");

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn preflight_gets_an_empty_no_content_reply() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let preflight = server.dispatch(request("OPTIONS", "/api/responses", ""));
    assert_eq!(preflight.status, 204);
    assert!(preflight.body.is_empty());

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn unknown_paths_and_wrong_methods_are_rejected() {
    let db_path = temp_db_path();
    let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");

    let missing = server.dispatch(request("GET", "/api/unknown", ""));
    assert_eq!(missing.status, 404);
    assert!(body_json(&missing)["error"]
        .as_str()
        .expect("error text")
        .contains("/api/unknown"));

    let wrong_method = server.dispatch(request("DELETE", "/api/responses", ""));
    assert_eq!(wrong_method.status, 405);
    assert!(body_json(&wrong_method)["error"]
        .as_str()
        .expect("error text")
        .contains("supported endpoints"));

    let post_health = server.dispatch(request("POST", "/health", ""));
    assert_eq!(post_health.status, 405);

    let _ = std::fs::remove_file(db_path);
}

#[test]
fn records_survive_a_server_restart() {
    let db_path = temp_db_path();
    {
        let server = CollectorServer::with_db_path(&db_path).expect("server with temp db");
        let created = server.dispatch(request("POST", "/api/responses", FULL_SUBMISSION));
        assert_eq!(created.status, 201);
    }

    let reopened = CollectorServer::with_db_path(&db_path).expect("reopen server");
    let listed = reopened.dispatch(request("GET", "/api/responses", ""));
    let records = body_json(&listed);
    let records = records.as_array().expect("response array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "resp-1");

    let created = reopened.dispatch(request("POST", "/api/responses", FULL_SUBMISSION));
    assert_eq!(body_json(&created)["data"]["id"], "resp-2");

    let _ = std::fs::remove_file(db_path);
}
