//! Sequential document pipeline engine.
//!
//! A [`Pipeline`] drives a fixed sequence of [`StageSpec`]s in round-robin
//! order against one shared LLM client. Each step sends the stage's
//! instructions plus the current threaded document, offers the raw response to
//! the [`DocumentTracker`], and then consults the termination guard. The run
//! ends when a response mentions the completion sentinel or when the step
//! budget is exhausted, whichever comes first. A failed LLM call aborts the
//! run immediately; there is no retry layer here.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::tripforge::client_wrapper::{ClientWrapper, Message, Role};
use crate::tripforge::event::{EventHandler, PipelineEvent};
use crate::tripforge::extract::DocumentExtractor;
use crate::tripforge::prompt::build_travel_prompt;
use crate::tripforge::request::TripRequest;
use crate::tripforge::stage::{marker_strings, StageSpec, COMPLETION_SENTINEL};
use crate::tripforge::tracker::{DocumentTracker, DocumentVersion, RecordOutcome};

/// Default cap on stage invocations per run.
pub const DEFAULT_MAX_MESSAGES: usize = 25;

/// Errors a pipeline run can produce.
#[derive(Debug)]
pub enum PipelineError {
    /// A request date failed to parse or the range is inverted.
    InvalidDateRange(String),
    /// An LLM call failed; the run aborted at the named stage.
    StageInvocation { stage: String, message: String },
    /// The pipeline was started with an empty stage list.
    NoStages,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidDateRange(msg) => write!(f, "invalid date range: {}", msg),
            PipelineError::StageInvocation { stage, message } => {
                write!(f, "stage '{}' failed: {}", stage, message)
            }
            PipelineError::NoStages => write!(f, "pipeline has no stages configured"),
        }
    }
}

impl Error for PipelineError {}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Built but not yet started.
    Pending,
    /// Executing the stage at this index.
    Running { stage_index: usize },
    /// Terminated cleanly (sentinel or step budget).
    Completed,
    /// Aborted on a stage invocation error.
    Aborted,
}

/// Why a run terminated cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// A stage response mentioned the completion sentinel.
    CompletionSignalled { stage: String },
    /// The step budget ran out before any sentinel appeared.
    MaxMessagesReached,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::CompletionSignalled { stage } => {
                write!(f, "completion signalled by {}", stage)
            }
            TerminationReason::MaxMessagesReached => write!(f, "maximum message count reached"),
        }
    }
}

/// Verdict of the termination guard after each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationDecision {
    Continue,
    Terminate(TerminationReason),
}

/// Check a raw stage response against the two stop conditions.
///
/// The sentinel is matched on the *raw* response, before extraction, since
/// extraction strips it. Sentinel wins over the step budget when both hold on
/// the same step.
pub fn decide_termination(
    raw_response: &str,
    stage: &str,
    step: usize,
    max_messages: usize,
    sentinel: &str,
) -> TerminationDecision {
    if raw_response.contains(sentinel) {
        return TerminationDecision::Terminate(TerminationReason::CompletionSignalled {
            stage: stage.to_string(),
        });
    }
    if step >= max_messages {
        return TerminationDecision::Terminate(TerminationReason::MaxMessagesReached);
    }
    TerminationDecision::Continue
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    /// The last substantial document version, or the cleaned final response
    /// when no version was ever recorded.
    pub final_document: String,
    pub reason: TerminationReason,
    pub steps_executed: usize,
    pub final_state: RunState,
    /// Every recorded document version, oldest first.
    pub versions: Vec<DocumentVersion>,
}

/// Sequential multi-stage document pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tripforge::clients::openai::OpenAIClient;
/// use tripforge::pipeline::Pipeline;
/// use tripforge::request::TripRequest;
/// use tripforge::stage::travel_stages;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let request = TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")?
///     .with_priority("food");
///
/// let client = Arc::new(OpenAIClient::new("sk-...", "gpt-4o"));
/// let pipeline = Pipeline::new(client, travel_stages(&request));
///
/// let outcome = pipeline.run(&request).await?;
/// println!("{}", outcome.final_document);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    client: Arc<dyn ClientWrapper>,
    stages: Vec<StageSpec>,
    completion_sentinel: String,
    max_messages: usize,
    event_handler: Option<Arc<dyn EventHandler>>,
    artifact_root: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(client: Arc<dyn ClientWrapper>, stages: Vec<StageSpec>) -> Self {
        Pipeline {
            client,
            stages,
            completion_sentinel: COMPLETION_SENTINEL.to_string(),
            max_messages: DEFAULT_MAX_MESSAGES,
            event_handler: None,
            artifact_root: None,
        }
    }

    /// Override the completion sentinel matched against raw responses.
    pub fn with_completion_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.completion_sentinel = sentinel.into();
        self
    }

    /// Override the step budget (default [`DEFAULT_MAX_MESSAGES`]).
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Register an event handler for run observability.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Persist per-version artifacts under this directory.
    pub fn with_artifact_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifact_root = Some(root.into());
        self
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_pipeline_event(&event).await;
        }
    }

    /// Execute the pipeline for a trip request.
    ///
    /// Stages run in round-robin order. The first step is seeded with the
    /// generated task prompt; every later step receives the latest recorded
    /// document, falling back to the task prompt while nothing substantial
    /// has been recorded yet.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NoStages`] when the stage list is empty, and
    /// [`PipelineError::StageInvocation`] when an LLM call fails. Clean
    /// termination by step budget is not an error.
    pub async fn run(&self, request: &TripRequest) -> Result<PipelineOutcome, PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::NoStages);
        }

        let run_id = Uuid::new_v4();
        let task_prompt = build_travel_prompt(request);
        let extractor =
            DocumentExtractor::new(marker_strings(&self.stages, &self.completion_sentinel));
        let mut tracker = match &self.artifact_root {
            Some(root) => DocumentTracker::with_artifacts(
                extractor.clone(),
                root,
                &request.destination_city,
            ),
            None => DocumentTracker::new(extractor.clone()),
        };

        info!(
            "Starting run {} for {} ({} stages, max {} steps)",
            run_id,
            request.destination(),
            self.stages.len(),
            self.max_messages
        );
        self.emit(PipelineEvent::RunStarted {
            run_id: run_id.to_string(),
            stages: self.stages.iter().map(|s| s.name.clone()).collect(),
        })
        .await;

        let mut state;
        let mut last_clean = String::new();
        let mut step = 0;

        loop {
            step += 1;
            let stage_index = (step - 1) % self.stages.len();
            let stage = &self.stages[stage_index];
            state = RunState::Running { stage_index };
            debug!("Run {} step {}: {} ({:?})", run_id, step, stage.name, state);

            self.emit(PipelineEvent::StageStarted {
                stage: stage.name.clone(),
                step,
            })
            .await;

            let thread_document = tracker.final_document().unwrap_or(&task_prompt).to_string();
            let messages = vec![
                Message {
                    role: Role::System,
                    content: stage.instructions.clone(),
                },
                Message {
                    role: Role::User,
                    content: thread_document,
                },
            ];

            let raw = match self.client.send_message(&messages).await {
                Ok(response) => response.content,
                Err(e) => {
                    state = RunState::Aborted;
                    debug!("Run {} entered state {:?}", run_id, state);
                    let message = e.to_string();
                    tracker.write_summary(&format!("aborted at {}: {}", stage.name, message));
                    self.emit(PipelineEvent::RunFailed {
                        run_id: run_id.to_string(),
                        stage: stage.name.clone(),
                        error: message.clone(),
                    })
                    .await;
                    return Err(PipelineError::StageInvocation {
                        stage: stage.name.clone(),
                        message,
                    });
                }
            };

            self.emit(PipelineEvent::StageResponded {
                stage: stage.name.clone(),
                step,
                response_length: raw.chars().count(),
            })
            .await;

            match tracker.record(&stage.name, &raw) {
                RecordOutcome::Recorded(sequence) => {
                    let version = &tracker.versions()[sequence - 1];
                    self.emit(PipelineEvent::VersionRecorded {
                        stage: stage.name.clone(),
                        sequence,
                        content: version.content.clone(),
                        characters: version.content.chars().count(),
                    })
                    .await;
                }
                RecordOutcome::Skipped => {
                    self.emit(PipelineEvent::StageSkipped {
                        stage: stage.name.clone(),
                        step,
                    })
                    .await;
                }
            }
            last_clean = extractor.extract(&raw);

            match decide_termination(
                &raw,
                &stage.name,
                step,
                self.max_messages,
                &self.completion_sentinel,
            ) {
                TerminationDecision::Continue => continue,
                TerminationDecision::Terminate(reason) => {
                    state = RunState::Completed;
                    info!("Run {} finished after {} steps: {}", run_id, step, reason);
                    tracker.write_summary(&reason.to_string());
                    self.emit(PipelineEvent::RunCompleted {
                        run_id: run_id.to_string(),
                        reason: reason.clone(),
                        steps_executed: step,
                    })
                    .await;

                    let final_document = tracker
                        .final_document()
                        .map(str::to_string)
                        .unwrap_or(last_clean);
                    return Ok(PipelineOutcome {
                        run_id,
                        final_document,
                        reason,
                        steps_executed: step,
                        final_state: state,
                        versions: tracker.versions().to_vec(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_beats_step_budget() {
        let decision = decide_termination("done. DOCUMENT_READY", "CriticAgent", 25, 25, "DOCUMENT_READY");
        assert_eq!(
            decision,
            TerminationDecision::Terminate(TerminationReason::CompletionSignalled {
                stage: "CriticAgent".to_string()
            })
        );
    }

    #[test]
    fn budget_exhaustion_terminates() {
        let decision = decide_termination("still going", "ImagesAgent", 25, 25, "DOCUMENT_READY");
        assert_eq!(
            decision,
            TerminationDecision::Terminate(TerminationReason::MaxMessagesReached)
        );
    }

    #[test]
    fn mid_run_without_sentinel_continues() {
        let decision = decide_termination("partial work", "FlightsAgent", 3, 25, "DOCUMENT_READY");
        assert_eq!(decision, TerminationDecision::Continue);
    }
}
