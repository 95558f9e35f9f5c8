// src/tripforge/mod.rs

pub mod booking;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod diff;
pub mod event;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod request;
#[cfg(feature = "server")]
pub mod server;
pub mod stage;
pub mod tracker;

// Explicitly export the pipeline so callers reach it as tripforge::Pipeline
// instead of tripforge::pipeline::Pipeline.
pub use pipeline::{Pipeline, PipelineOutcome};
pub use request::TripRequest;
