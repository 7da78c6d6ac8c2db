mod http;

use anyhow::Context;
use serde::Serialize;
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use embedscape_core::{Criteria, Error, FetchError, NormalizeError, Record, DEFAULT_SCALE};
use embedscape_embeddings::Embedder;

use crate::http::{read_request, write_response, Request, RequestError, Response};

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/index.html"));
const APP_CSS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/app.css"));
const APP_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/app.js"));
const USER_SVG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/user.svg"));

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_FALLBACK_IMAGE: &str = "/assets/user.svg";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// CSV dataset, read in full on every request.
    pub data_path: PathBuf,
    pub bind: String,
    /// Image shown for records whose `Headshot` carries no URL.
    pub fallback_image: String,
    pub default_scale: f32,
}

impl ServerConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            bind: DEFAULT_BIND.to_string(),
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            default_scale: DEFAULT_SCALE,
        }
    }
}

struct AppState {
    config: ServerConfig,
    embedder: Box<dyn Embedder + Send + Sync>,
}

pub fn serve(config: ServerConfig, embedder: Box<dyn Embedder + Send + Sync>) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(&config.bind).with_context(|| format!("bind {}", config.bind))?;
    tracing::info!(
        bind = %config.bind,
        data = %config.data_path.display(),
        embedder = %embedder.profile().label(),
        api_base = embedder.provider_info().api_base.as_deref().unwrap_or("-"),
        "web: http://{}/",
        config.bind
    );
    run(listener, Arc::new(AppState { config, embedder }));
    Ok(())
}

fn run(listener: TcpListener, state: Arc<AppState>) {
    for stream in listener.incoming() {
        let state = Arc::clone(&state);
        let mut stream = match stream {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "accept failed");
                continue;
            }
        };
        std::thread::spawn(move || {
            let _ = stream.set_read_timeout(Some(Duration::from_secs(10)));
            let _ = stream.set_write_timeout(Some(Duration::from_secs(10)));
            if let Err(err) = handle_conn(&mut stream, &state) {
                let details = format!("{err:#}");
                tracing::warn!(error = %details, "connection failed");
                let _ = write_response(&mut stream, &internal_error(&details));
            }
        });
    }
}

fn handle_conn(stream: &mut TcpStream, state: &AppState) -> anyhow::Result<()> {
    let resp = respond(stream, state)?;
    write_response(stream, &resp).context("write response")
}

/// Reads one request and routes it. Only socket failures are returned as errors.
fn respond<R: std::io::Read>(stream: &mut R, state: &AppState) -> anyhow::Result<Response> {
    let req = match read_request(stream) {
        Ok(req) => req,
        Err(err @ RequestError::Malformed(_)) => {
            tracing::warn!(error = %err, "rejected request");
            return Ok(json_error(400, &err.to_string()));
        }
        Err(err @ RequestError::Io(_)) => return Err(err.into()),
    };
    let started = Instant::now();
    let resp = route(state, &req);
    tracing::info!(
        method = %req.method,
        path = %req.path,
        status = resp.status,
        elapsed_ms = started.elapsed().as_millis(),
        "request"
    );
    Ok(resp)
}

fn route(state: &AppState, req: &Request) -> Response {
    if req.method != "GET" {
        return json_error(405, &format!("method {} not allowed", req.method));
    }
    let result = match req.path.as_str() {
        "/" | "/index.html" => Ok(Response::new(200, "text/html; charset=utf-8", INDEX_HTML)),
        "/assets/app.css" => Ok(Response::new(200, "text/css; charset=utf-8", APP_CSS)),
        "/assets/app.js" => Ok(Response::new(200, "text/javascript; charset=utf-8", APP_JS)),
        "/assets/user.svg" => Ok(Response::new(200, "image/svg+xml", USER_SVG)),
        "/api/criteria" => Response::json(200, &Criteria::valid_names()),
        "/api/embeddings" => api_embeddings(state, req),
        "/api/positions" => api_positions(state, req),
        _ => Ok(json_error(404, "not found")),
    };
    result.unwrap_or_else(|err| handler_failed(&err))
}

fn handler_failed(err: &anyhow::Error) -> Response {
    let details = format!("{err:#}");
    tracing::error!(error = %details, "handler failed");
    internal_error(&details)
}

fn criteria_param(req: &Request) -> &str {
    req.query
        .get("criteria")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(Criteria::default().name())
}

fn api_embeddings(state: &AppState, req: &Request) -> anyhow::Result<Response> {
    match embedscape_ops::embed_dataset(
        &state.config.data_path,
        criteria_param(req),
        state.embedder.as_ref(),
    ) {
        Ok(records) => Response::json(200, &records),
        Err(err) => Ok(error_response(&err)),
    }
}

#[derive(Debug, Serialize)]
struct PositionedUser<'a> {
    #[serde(flatten)]
    record: &'a Record,
    image_url: &'a str,
    position: [f32; 3],
}

fn api_positions(state: &AppState, req: &Request) -> anyhow::Result<Response> {
    let scale = match req.query.get("scale") {
        None => state.config.default_scale,
        Some(raw) => match raw.parse::<f32>() {
            Ok(v) => v,
            Err(_) => return Ok(json_error(400, &format!("invalid scale {raw:?}"))),
        },
    };
    let placed = match embedscape_ops::layout_dataset(
        &state.config.data_path,
        criteria_param(req),
        state.embedder.as_ref(),
        scale,
    ) {
        Ok(placed) => placed,
        Err(err) => return Ok(error_response(&err)),
    };
    let users: Vec<PositionedUser<'_>> = placed
        .iter()
        .map(|p| PositionedUser {
            record: &p.record,
            image_url: p.record.image_url().unwrap_or(state.config.fallback_image.as_str()),
            position: p.position,
        })
        .collect();
    Response::json(200, &users)
}

/// Maps pipeline errors onto status codes and JSON bodies.
fn error_response(err: &Error) -> Response {
    match err {
        Error::Fetch(FetchError::NoData) => json_error(404, &err.to_string()),
        Error::Fetch(FetchError::InvalidCriteria { valid, .. }) => json_body(
            400,
            &serde_json::json!({ "error": err.to_string(), "valid": valid }),
        ),
        Error::Normalize(NormalizeError::InvalidScale(_)) => json_error(400, &err.to_string()),
        Error::Fetch(FetchError::Provider { .. } | FetchError::MissingEmbedding { .. })
        | Error::Normalize(NormalizeError::TooFewComponents { .. })
        | Error::Dataset(_) => {
            tracing::error!(error = %err, "request failed");
            internal_error(&err.to_string())
        }
    }
}

fn internal_error(details: &str) -> Response {
    json_body(
        500,
        &serde_json::json!({ "error": "Internal Server Error", "details": details }),
    )
}

fn json_error(status: u16, message: &str) -> Response {
    json_body(status, &serde_json::json!({ "error": message }))
}

fn json_body(status: u16, value: &serde_json::Value) -> Response {
    Response::new(status, "application/json", value.to_string())
}
