use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tripforge::client_wrapper::{ClientWrapper, Message, Role, SendError};
use tripforge::event::{EventHandler, PipelineEvent};
use tripforge::pipeline::{Pipeline, PipelineError, RunState, TerminationReason};
use tripforge::request::TripRequest;
use tripforge::stage::travel_stages;

/// Returns a scripted response per call, recording the user content it saw.
struct ScriptedClient {
    responses: Vec<String>,
    calls: AtomicUsize,
    seen_user_content: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(responses: Vec<String>) -> Self {
        ScriptedClient {
            responses,
            calls: AtomicUsize::new(0),
            seen_user_content: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClientWrapper for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let user_content = messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.seen_user_content.lock().await.push(user_content);

        let content = self
            .responses
            .get(call)
            .cloned()
            .unwrap_or_else(|| "Nothing further to add.".to_string());
        Ok(Message {
            role: Role::Assistant,
            content,
        })
    }

    fn model_name(&self) -> &str {
        "scripted-mock"
    }
}

/// Fails every call with the same message.
struct FailingClient;

#[async_trait]
impl ClientWrapper for FailingClient {
    async fn send_message(&self, _messages: &[Message]) -> Result<Message, SendError> {
        Err("connection reset by peer".into())
    }

    fn model_name(&self) -> &str {
        "failing-mock"
    }
}

/// Collects event discriminants in arrival order.
struct EventRecorder {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl EventHandler for EventRecorder {
    async fn on_pipeline_event(&self, event: &PipelineEvent) {
        let label = match event {
            PipelineEvent::RunStarted { .. } => "run_started",
            PipelineEvent::StageStarted { .. } => "stage_started",
            PipelineEvent::StageResponded { .. } => "stage_responded",
            PipelineEvent::VersionRecorded { .. } => "version_recorded",
            PipelineEvent::StageSkipped { .. } => "stage_skipped",
            PipelineEvent::RunCompleted { .. } => "run_completed",
            PipelineEvent::RunFailed { .. } => "run_failed",
        };
        self.seen.lock().await.push(label.to_string());
    }
}

fn request() -> TripRequest {
    TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")
        .unwrap()
        .with_priority("food")
}

fn substantial(body: &str, marker: &str) -> String {
    format!(
        "# Tokyo, Japan Travel Plan\n\n## Trip Overview\n- Duration: 7 days\n\n\
         ## Day-by-Day Itinerary\n### Day 1\n{}\n\n{}",
        body, marker
    )
}

fn full_run_script() -> Vec<String> {
    vec![
        substantial("skeleton", "ITINERARY_COMPLETE - Ready for ImagesAgent"),
        substantial("with image links", "IMAGES_COMPLETE - Ready for FlightsAgent"),
        substantial("with flights", "FLIGHTS_COMPLETE - Ready for AccommodationAgent"),
        substantial("with stays", "ACCOMMODATION_COMPLETE - Ready for CriticAgent"),
        substantial("final polished document", "DOCUMENT_READY"),
    ]
}

#[tokio::test]
async fn test_full_run_terminates_on_sentinel() {
    let request = request();
    let client = Arc::new(ScriptedClient::new(full_run_script()));
    let pipeline = Pipeline::new(client, travel_stages(&request));

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.steps_executed, 5);
    assert_eq!(
        outcome.reason,
        TerminationReason::CompletionSignalled {
            stage: "CriticAgent".to_string()
        }
    );
    assert_eq!(outcome.final_state, RunState::Completed);
    assert_eq!(outcome.versions.len(), 5);
    assert!(outcome.final_document.contains("final polished document"));
    assert!(!outcome.final_document.contains("DOCUMENT_READY"));
    assert!(!outcome.final_document.contains("_COMPLETE - Ready for"));
}

#[tokio::test]
async fn test_first_stage_receives_task_prompt_then_document_threads() {
    let request = request();
    let client = Arc::new(ScriptedClient::new(full_run_script()));
    let pipeline = Pipeline::new(client.clone(), travel_stages(&request));

    pipeline.run(&request).await.unwrap();

    let seen = client.seen_user_content.lock().await;
    assert!(seen[0].contains("I want to plan a trip to Tokyo, Japan"));
    // Stage 2 sees stage 1's cleaned document, not the task prompt.
    assert!(seen[1].contains("# Tokyo, Japan Travel Plan"));
    assert!(seen[1].contains("skeleton"));
    assert!(!seen[1].contains("ITINERARY_COMPLETE"));
    // Each later stage sees the latest version.
    assert!(seen[4].contains("with stays"));
}

#[tokio::test]
async fn test_skipped_response_keeps_previous_document_threaded() {
    let request = request();
    let script = vec![
        substantial("skeleton", "ITINERARY_COMPLETE - Ready for ImagesAgent"),
        // Non-substantial acknowledgement from the images stage.
        "Understood.".to_string(),
        substantial("with flights", "DOCUMENT_READY"),
    ];
    let client = Arc::new(ScriptedClient::new(script));
    let pipeline = Pipeline::new(client.clone(), travel_stages(&request));

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.versions.len(), 2);
    let seen = client.seen_user_content.lock().await;
    // The flights stage still receives the itinerary version, the skip did
    // not regress the thread to the acknowledgement text.
    assert!(seen[2].contains("skeleton"));
}

#[tokio::test]
async fn test_max_messages_terminates_without_error() {
    let request = request();
    // Never substantial, never the sentinel.
    let client = Arc::new(ScriptedClient::new(vec![]));
    let pipeline = Pipeline::new(client, travel_stages(&request)).with_max_messages(7);

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.steps_executed, 7);
    assert_eq!(outcome.reason, TerminationReason::MaxMessagesReached);
    assert!(outcome.versions.is_empty());
    // Best-effort fallback: the last cleaned response.
    assert_eq!(outcome.final_document, "Nothing further to add.");
}

#[tokio::test]
async fn test_fallback_document_is_cleaned_of_markers() {
    let request = request();
    // Never substantial, but carries a hand-off marker the caller should
    // never see in the returned document.
    let script = vec![
        "Sorry, I cannot help with that. ITINERARY_COMPLETE - Ready for ImagesAgent".to_string();
        3
    ];
    let client = Arc::new(ScriptedClient::new(script));
    let pipeline = Pipeline::new(client, travel_stages(&request)).with_max_messages(3);

    let outcome = pipeline.run(&request).await.unwrap();

    assert!(outcome.versions.is_empty());
    assert_eq!(outcome.final_document, "Sorry, I cannot help with that.");
}

#[tokio::test]
async fn test_sentinel_mid_run_stops_before_later_stages() {
    let request = request();
    let script = vec![
        substantial("skeleton", "ITINERARY_COMPLETE - Ready for ImagesAgent"),
        substantial("images done, nothing else needed. DOCUMENT_READY", ""),
    ];
    let client = Arc::new(ScriptedClient::new(script));
    let pipeline = Pipeline::new(client, travel_stages(&request));

    let outcome = pipeline.run(&request).await.unwrap();

    assert_eq!(outcome.steps_executed, 2);
    assert_eq!(
        outcome.reason,
        TerminationReason::CompletionSignalled {
            stage: "ImagesAgent".to_string()
        }
    );
}

#[tokio::test]
async fn test_stage_failure_aborts_run() {
    let request = request();
    let pipeline = Pipeline::new(Arc::new(FailingClient), travel_stages(&request));

    let error = pipeline.run(&request).await.unwrap_err();
    match error {
        PipelineError::StageInvocation { stage, message } => {
            assert_eq!(stage, "ItineraryAgent");
            assert!(message.contains("connection reset"));
        }
        other => panic!("expected StageInvocation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_stage_list_rejected() {
    let request = request();
    let pipeline = Pipeline::new(Arc::new(FailingClient), Vec::new());
    assert!(matches!(
        pipeline.run(&request).await,
        Err(PipelineError::NoStages)
    ));
}

#[tokio::test]
async fn test_event_order_on_successful_run() {
    let request = request();
    let client = Arc::new(ScriptedClient::new(full_run_script()));
    let recorder = Arc::new(EventRecorder {
        seen: Mutex::new(Vec::new()),
    });
    let pipeline =
        Pipeline::new(client, travel_stages(&request)).with_event_handler(recorder.clone());

    pipeline.run(&request).await.unwrap();

    let seen = recorder.seen.lock().await;
    assert_eq!(seen.first().map(String::as_str), Some("run_started"));
    assert_eq!(seen.last().map(String::as_str), Some("run_completed"));
    assert_eq!(seen.iter().filter(|s| *s == "version_recorded").count(), 5);
    assert_eq!(seen.iter().filter(|s| *s == "stage_started").count(), 5);
}

#[tokio::test]
async fn test_run_failed_event_emitted_on_abort() {
    let request = request();
    let recorder = Arc::new(EventRecorder {
        seen: Mutex::new(Vec::new()),
    });
    let pipeline = Pipeline::new(Arc::new(FailingClient), travel_stages(&request))
        .with_event_handler(recorder.clone());

    let _ = pipeline.run(&request).await;

    let seen = recorder.seen.lock().await;
    assert_eq!(seen.last().map(String::as_str), Some("run_failed"));
}

#[tokio::test]
async fn test_client_wrapper_usage_defaults_to_none() {
    // Simple clients only implement send_message and model_name; the usage
    // hook defaults to None.
    let client = ScriptedClient::new(vec![]);
    assert_eq!(client.model_name(), "scripted-mock");
    assert!(client.get_last_usage().await.is_none());
}

#[tokio::test]
async fn test_artifacts_written_during_run() {
    let tmp = tempfile::tempdir().unwrap();
    let request = request();
    let client = Arc::new(ScriptedClient::new(full_run_script()));
    let pipeline = Pipeline::new(client, travel_stages(&request)).with_artifact_root(tmp.path());

    pipeline.run(&request).await.unwrap();

    let run_dirs: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(run_dirs.len(), 1);
    let run_dir = run_dirs[0].as_ref().unwrap().path();
    assert!(run_dir.join("00_SUMMARY.md").exists());
    assert!(run_dir.join("01_ItineraryAgent_clean.md").exists());
    assert!(run_dir.join("05_CriticAgent_diff.html").exists());
}
