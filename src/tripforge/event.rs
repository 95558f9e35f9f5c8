//! Pipeline event system.
//!
//! Provides a callback-based observability layer for pipeline runs. Implement
//! [`EventHandler`] to receive real-time notifications about:
//!
//! - **Run lifecycle**: start, completion (with termination reason), failure
//! - **Stage lifecycle**: each stage invocation and its raw response
//! - **Document versions**: every recorded revision and every skipped response
//!
//! The handler is wrapped in `Arc<dyn EventHandler>` and registered on a
//! [`Pipeline`](crate::tripforge::pipeline::Pipeline) via
//! [`with_event_handler`](crate::tripforge::pipeline::Pipeline::with_event_handler).
//! The single method has a default no-op implementation, so a handler only
//! matches the variants it cares about.
//!
//! # Example
//!
//! ```rust,no_run
//! use tripforge::event::{EventHandler, PipelineEvent};
//! use async_trait::async_trait;
//!
//! struct ConsoleProgress;
//!
//! #[async_trait]
//! impl EventHandler for ConsoleProgress {
//!     async fn on_pipeline_event(&self, event: &PipelineEvent) {
//!         match event {
//!             PipelineEvent::StageStarted { stage, step } => {
//!                 println!("[step {}] {} working...", step, stage);
//!             }
//!             PipelineEvent::VersionRecorded { stage, sequence, characters, .. } => {
//!                 println!("{} produced version {} ({} chars)", stage, sequence, characters);
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::tripforge::pipeline::TerminationReason;

/// Events emitted during a pipeline run, in the order they occur.
///
/// A typical successful run looks like:
///
/// ```text
/// RunStarted
///   └─ StageStarted { step: 1 } .. StageResponded .. VersionRecorded
///   └─ StageStarted { step: 2 } .. StageResponded .. VersionRecorded
///   └─ ...
/// RunCompleted { reason: CompletionSignalled { .. } }
/// ```
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Fired once before the first stage is invoked.
    RunStarted {
        run_id: String,
        /// Stage names in execution order.
        stages: Vec<String>,
    },

    /// Fired before each stage invocation. `step` counts invocations across
    /// the whole run, starting at 1.
    StageStarted { stage: String, step: usize },

    /// Fired when a stage's LLM call returns.
    StageResponded {
        stage: String,
        step: usize,
        /// Character length of the raw response, before extraction.
        response_length: usize,
    },

    /// Fired when the tracker records a new document version.
    VersionRecorded {
        stage: String,
        /// 1-based sequence of the version in the run history.
        sequence: usize,
        /// Clean markdown content of the recorded version.
        content: String,
        characters: usize,
    },

    /// Fired when a stage response was cleaned but judged non-substantial and
    /// dropped. The threaded document is unchanged.
    StageSkipped { stage: String, step: usize },

    /// Fired once when the run terminates without error.
    RunCompleted {
        run_id: String,
        reason: TerminationReason,
        steps_executed: usize,
    },

    /// Fired once when a stage invocation fails and the run aborts.
    RunFailed {
        run_id: String,
        stage: String,
        error: String,
    },
}

/// Trait for receiving pipeline events.
///
/// The method has a default no-op implementation. The `Send + Sync` bound
/// allows the handler to be shared across tokio tasks via
/// `Arc<dyn EventHandler>`; internal state needs its own synchronization.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called for every event the pipeline emits. Default is a no-op.
    async fn on_pipeline_event(&self, _event: &PipelineEvent) {}
}
