//! # Tripforge
//!
//! Tripforge is a Rust toolkit for sequential LLM document pipelines: a fixed
//! sequence of prompted stages collaboratively edits one shared markdown
//! travel itinerary, with diff-based version tracking and optional NDJSON
//! progress streaming over HTTP.
//!
//! The crate provides carefully layered abstractions for:
//!
//! * **Trip requests**: [`TripRequest`] with validated ISO date ranges and
//!   normalised priority/budget tags, turned into a task prompt by
//!   [`prompt::build_travel_prompt`]
//! * **Stages**: [`stage::StageSpec`] records built per run by
//!   [`stage::travel_stages`] — itinerary, images, flights, accommodation,
//!   and a terminal critic that signals completion
//! * **The pipeline**: [`Pipeline`] drives stages round-robin against one
//!   [`ClientWrapper`], threading the latest recorded document forward and
//!   stopping on the completion sentinel or the step budget
//! * **Version tracking**: [`tracker::DocumentTracker`] cleans raw responses
//!   via [`extract::DocumentExtractor`], records substantial revisions, and
//!   persists per-version markdown plus HTML diffs ([`diff`]) as artifacts
//! * **Observability**: the [`event::EventHandler`] callback trait, used by
//!   the optional `server` feature to stream progress as NDJSON
//! * **Provider flexibility**: [`ClientWrapper`] implemented for OpenAI and
//!   Azure OpenAI endpoints
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripforge::clients::openai::OpenAIClient;
//! use tripforge::stage::travel_stages;
//! use tripforge::{Pipeline, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tripforge::init_logger();
//!
//!     let request = TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")?
//!         .with_priority("food")
//!         .with_departure_airport("LHR");
//!
//!     let client = Arc::new(OpenAIClient::new(
//!         &std::env::var("OPEN_AI_SECRET")?,
//!         "gpt-4o",
//!     ));
//!
//!     let outcome = Pipeline::new(client, travel_stages(&request))
//!         .with_artifact_root("travel_plans")
//!         .run(&request)
//!         .await?;
//!
//!     println!("{}", outcome.final_document);
//!     println!(
//!         "{} versions, terminated: {}",
//!         outcome.versions.len(),
//!         outcome.reason
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Serving over HTTP
//!
//! With the `server` feature enabled, [`server::serve`] exposes
//! `POST /generate-travel-plan`, streaming one JSON object per line as the
//! document evolves. See the `server` module docs for the wire format.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding Tripforge get `RUST_LOG` driven diagnostics without
/// committing to a particular logging backend upfront.
///
/// ```rust
/// tripforge::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `tripforge` module.
pub mod tripforge;

// Re-exporting key items for easier external access.
pub use crate::tripforge::booking;
pub use crate::tripforge::client_wrapper;
pub use crate::tripforge::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
pub use crate::tripforge::clients;
pub use crate::tripforge::config::TripforgeConfig;
pub use crate::tripforge::diff;
pub use crate::tripforge::event;
pub use crate::tripforge::event::{EventHandler, PipelineEvent};
pub use crate::tripforge::extract;
pub use crate::tripforge::extract::DocumentExtractor;
pub use crate::tripforge::pipeline;
pub use crate::tripforge::pipeline::{
    Pipeline, PipelineError, PipelineOutcome, RunState, TerminationReason,
};
pub use crate::tripforge::prompt;
pub use crate::tripforge::request;
pub use crate::tripforge::request::{BudgetLevel, Priority, TripRequest};
#[cfg(feature = "server")]
pub use crate::tripforge::server;
pub use crate::tripforge::stage;
pub use crate::tripforge::stage::{travel_stages, StageSpec};
pub use crate::tripforge::tracker;
pub use crate::tripforge::tracker::{DocumentTracker, DocumentVersion, RecordOutcome};
