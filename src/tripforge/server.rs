//! NDJSON streaming HTTP shell.
//!
//! Thin adapter over the pipeline core, gated behind the `server` cargo
//! feature. The core knows nothing about HTTP; this module subscribes to
//! pipeline events through an [`EventHandler`] that forwards them into an
//! mpsc channel, and streams one JSON object per line
//! (`application/x-ndjson`) back to the caller as the run progresses.
//!
//! # Endpoints
//!
//! - `POST /generate-travel-plan` — start a run, stream progress and document
//!   updates, ending with a `final` (or `error`) message
//! - `GET /health` — liveness probe
//! - `GET /` — service info
//!
//! # Wire format
//!
//! Each line is a [`StreamMessage`]:
//!
//! ```json
//! {"type":"markdown_update","agent":"ItineraryAgent","content":"# Tokyo...","timestamp":"2025-10-01T12:00:00+00:00","character_count":1834}
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::StreamExt;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;

use crate::tripforge::client_wrapper::ClientWrapper;
use crate::tripforge::config::TripforgeConfig;
use crate::tripforge::event::{EventHandler, PipelineEvent};
use crate::tripforge::pipeline::{Pipeline, PipelineError};
use crate::tripforge::request::TripRequest;
use crate::tripforge::stage::travel_stages;

/// JSON payload for `POST /generate-travel-plan`.
#[derive(Debug, Clone, Deserialize)]
pub struct TripPlanRequest {
    pub destination_city: String,
    pub destination_country: String,
    /// ISO date, `YYYY-MM-DD`.
    pub depart_date: String,
    /// ISO date, `YYYY-MM-DD`.
    pub return_date: String,
    pub priority: Option<String>,
    pub budget_level: Option<String>,
    pub departure_airport: Option<String>,
    pub destination_airport: Option<String>,
    pub additional_preferences: Option<String>,
}

impl TripPlanRequest {
    fn to_trip_request(&self) -> Result<TripRequest, PipelineError> {
        let mut request = TripRequest::new(
            self.destination_city.clone(),
            self.destination_country.clone(),
            &self.depart_date,
            &self.return_date,
        )?;
        if let Some(priority) = &self.priority {
            request = request.with_priority(priority);
        }
        if let Some(budget) = &self.budget_level {
            request = request.with_budget_level(budget);
        }
        if let Some(code) = &self.departure_airport {
            request = request.with_departure_airport(code.clone());
        }
        if let Some(code) = &self.destination_airport {
            request = request.with_destination_airport(code.clone());
        }
        if let Some(preferences) = &self.additional_preferences {
            request = request.with_additional_preferences(preferences.clone());
        }
        Ok(request)
    }
}

/// One line of the NDJSON response stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamMessage {
    /// `progress`, `markdown_update`, `final` or `error`.
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub content: String,
    /// RFC 3339 timestamp of when the message was produced.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
}

impl StreamMessage {
    fn new(message_type: &str, agent: Option<&str>, content: impl Into<String>) -> Self {
        StreamMessage {
            message_type: message_type.to_string(),
            agent: agent.map(str::to_string),
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
            character_count: None,
        }
    }

    fn progress(agent: Option<&str>, content: impl Into<String>) -> Self {
        StreamMessage::new("progress", agent, content)
    }

    fn markdown_update(agent: &str, content: &str, characters: usize) -> Self {
        let mut message = StreamMessage::new("markdown_update", Some(agent), content);
        message.character_count = Some(characters);
        message
    }

    fn final_document(content: &str) -> Self {
        let mut message = StreamMessage::new("final", None, content);
        message.character_count = Some(content.chars().count());
        message
    }

    fn error(content: impl Into<String>) -> Self {
        StreamMessage::new("error", None, content)
    }
}

/// Forwards pipeline events into the response stream.
///
/// Terminal events are left to the run task, which also knows the final
/// document; everything else maps directly onto a stream message.
struct StreamForwarder {
    tx: mpsc::Sender<StreamMessage>,
}

#[async_trait]
impl EventHandler for StreamForwarder {
    async fn on_pipeline_event(&self, event: &PipelineEvent) {
        let message = match event {
            PipelineEvent::RunStarted { .. } => {
                Some(StreamMessage::progress(None, "Starting travel planning..."))
            }
            PipelineEvent::StageStarted { stage, .. } => Some(StreamMessage::progress(
                Some(stage),
                format!("{} is working...", stage),
            )),
            PipelineEvent::VersionRecorded {
                stage,
                content,
                characters,
                ..
            } => Some(StreamMessage::markdown_update(stage, content, *characters)),
            PipelineEvent::StageSkipped { stage, .. } => Some(StreamMessage::progress(
                Some(stage),
                format!("{} produced no document update", stage),
            )),
            PipelineEvent::StageResponded { .. }
            | PipelineEvent::RunCompleted { .. }
            | PipelineEvent::RunFailed { .. } => None,
        };

        if let Some(message) = message {
            // A send error means the client went away; the run finishes anyway.
            let _ = self.tx.send(message).await;
        }
    }
}

/// Build the service router around a shared LLM client.
pub fn router(client: Arc<dyn ClientWrapper>, config: TripforgeConfig) -> Router {
    Router::new()
        .route(
            "/generate-travel-plan",
            post(move |Json(payload): Json<TripPlanRequest>| {
                let client = client.clone();
                let config = config.clone();
                async move { generate_travel_plan(client, config, payload).await }
            }),
        )
        .route("/health", get(health))
        .route("/", get(service_info))
}

/// Bind and serve until the process exits.
pub async fn serve(
    addr: SocketAddr,
    client: Arc<dyn ClientWrapper>,
    config: TripforgeConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(client, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn generate_travel_plan(
    client: Arc<dyn ClientWrapper>,
    config: TripforgeConfig,
    payload: TripPlanRequest,
) -> axum::response::Response {
    // Validate before any pipeline work so bad input fails fast.
    let request = match payload.to_trip_request() {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let (tx, mut rx) = mpsc::channel::<StreamMessage>(64);
    let forwarder = Arc::new(StreamForwarder { tx: tx.clone() });

    let pipeline = Pipeline::new(client, travel_stages(&request))
        .with_event_handler(forwarder)
        .with_artifact_root(config.artifact_dir);

    // The sender is moved into the task; when the task finishes, every sender
    // is dropped and the stream below terminates.
    tokio::spawn(async move {
        match pipeline.run(&request).await {
            Ok(outcome) => {
                let _ = tx
                    .send(StreamMessage::final_document(&outcome.final_document))
                    .await;
            }
            Err(e) => {
                error!("Pipeline run failed: {}", e);
                let _ = tx.send(StreamMessage::error(e.to_string())).await;
            }
        }
    });

    let lines = futures_util::stream::poll_fn(move |cx| rx.poll_recv(cx))
        .map(|message| Ok::<_, std::convert::Infallible>(encode_line(&message)));

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}

fn encode_line(message: &StreamMessage) -> String {
    match serde_json::to_string(message) {
        Ok(line) => format!("{}\n", line),
        Err(e) => {
            warn!("Could not encode stream message: {}", e);
            String::new()
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn service_info() -> impl IntoResponse {
    Json(json!({
        "service": "tripforge",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate": "POST /generate-travel-plan",
            "health": "GET /health",
        },
    }))
}
