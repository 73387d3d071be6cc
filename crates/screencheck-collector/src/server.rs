use std::io;
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};

use screencheck_storage::{JsonResponseStore, NewResponse, ResponseStore, StorageError};
use serde::Deserialize;
use serde_json::json;

use crate::http::{read_http_request, write_http_response, HttpRequest, HttpResponse};

/// Collection service backing the quiz: accepts finished submissions over
/// HTTP, keeps them in a JSON-file store, and serves them back for review
/// and for the training-data export.
pub struct CollectorServer {
    store: Arc<Mutex<Box<dyn ResponseStore>>>,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    responses: Option<WireAnswers>,
    prediction: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnswers {
    uses_device_before_sleep: bool,
    difficulty_without_social_media: bool,
    uses_device_during_meals: bool,
    device_distracts_at_work_or_study: bool,
}

impl CollectorServer {
    pub fn from_env() -> Result<Self, StorageError> {
        let db_path =
            std::env::var("SCREENCHECK_DB").unwrap_or_else(|_| "./data/responses.json".to_string());
        Self::with_db_path(db_path)
    }

    pub fn with_db_path(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store: Box<dyn ResponseStore> = Box::new(JsonResponseStore::open(db_path)?);
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    pub fn serve_http(&self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        eprintln!("screencheckd listening on {}", listener.local_addr()?);
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = self.handle_connection(stream) {
                        eprintln!("screencheckd request error: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("screencheckd accept error: {err}");
                }
            }
        }
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> io::Result<()> {
        let Some(req) = read_http_request(&stream)? else {
            return Ok(());
        };
        let response = self.dispatch(req);
        write_http_response(&mut stream, response)
    }

    pub fn dispatch(&self, req: HttpRequest) -> HttpResponse {
        // CORS preflight, any path.
        if req.method == "OPTIONS" {
            return HttpResponse::empty(204);
        }

        if req.method == "GET" && req.path == "/health" {
            return HttpResponse::json(200, json!({"status":"ok"}));
        }

        if req.method == "POST" && req.path == "/api/responses" {
            return self.create_response(&req.body);
        }

        if req.method == "GET" && req.path == "/api/responses" {
            return self.list_responses();
        }

        if req.method == "GET" && req.path == "/api/export/neurona" {
            return self.export_answers();
        }

        if matches!(
            req.path.as_str(),
            "/health" | "/api/responses" | "/api/export/neurona"
        ) {
            return HttpResponse::json(
                405,
                json!({"error":"method not allowed; supported endpoints: GET /health, GET /api/responses, POST /api/responses, GET /api/export/neurona"}),
            );
        }

        HttpResponse::json(404, json!({"error": format!("unknown path: {}", req.path)}))
    }

    fn create_response(&self, body: &[u8]) -> HttpResponse {
        let submit: SubmitBody = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(err) => {
                return HttpResponse::json(400, json!({"error": format!("invalid json body: {err}")}))
            }
        };
        let Some(answers) = submit.responses else {
            return HttpResponse::json(
                400,
                json!({"error":"the responses field is required in the body"}),
            );
        };

        let mut locked = match self.store.lock() {
            Ok(v) => v,
            Err(_) => return HttpResponse::json(500, json!({"error":"storage lock poisoned"})),
        };
        let stored = match locked.create(NewResponse {
            uses_device_before_sleep: answers.uses_device_before_sleep,
            difficulty_without_social_media: answers.difficulty_without_social_media,
            uses_device_during_meals: answers.uses_device_during_meals,
            device_distracts_at_work_or_study: answers.device_distracts_at_work_or_study,
            prediction: submit.prediction,
            score: submit.score,
        }) {
            Ok(v) => v,
            Err(err) => {
                return HttpResponse::json(
                    500,
                    json!({"error": format!("failed to store response: {err}")}),
                )
            }
        };

        match serde_json::to_value(&stored) {
            Ok(data) => HttpResponse::json(201, json!({"message":"response stored","data": data})),
            Err(err) => HttpResponse::json(
                500,
                json!({"error": format!("failed to serialize stored response: {err}")}),
            ),
        }
    }

    fn list_responses(&self) -> HttpResponse {
        let locked = match self.store.lock() {
            Ok(v) => v,
            Err(_) => return HttpResponse::json(500, json!({"error":"storage lock poisoned"})),
        };
        match serde_json::to_value(locked.list()) {
            Ok(records) => HttpResponse::json(200, records),
            Err(err) => HttpResponse::json(
                500,
                json!({"error": format!("failed to serialize responses: {err}")}),
            ),
        }
    }

    fn export_answers(&self) -> HttpResponse {
        let locked = match self.store.lock() {
            Ok(v) => v,
            Err(_) => return HttpResponse::json(500, json!({"error":"storage lock poisoned"})),
        };
        match serde_json::to_value(locked.export_answers()) {
            Ok(rows) => HttpResponse::json(200, json!({"respuestas": rows})),
            Err(err) => HttpResponse::json(
                500,
                json!({"error": format!("failed to serialize export: {err}")}),
            ),
        }
    }
}
