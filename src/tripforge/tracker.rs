//! Document version tracking across pipeline stages.
//!
//! Each stage response is cleaned by the extractor and, when it looks like a
//! real document revision, recorded as a numbered [`DocumentVersion`]. The
//! tracker also optionally persists per-version artifacts (clean markdown plus
//! an HTML diff against the previous version) to a run directory on disk.
//! Artifact writes are best-effort: a full disk or bad permissions must never
//! abort an otherwise healthy run, so failures are logged and swallowed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::tripforge::diff::render_visual_diff;
use crate::tripforge::extract::DocumentExtractor;

/// A recorded document revision.
#[derive(Debug, Clone)]
pub struct DocumentVersion {
    /// 1-based position in the version history.
    pub sequence: usize,
    /// Name of the stage that produced this revision.
    pub stage: String,
    /// Clean markdown content, markers and fences already stripped.
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// Result of offering a stage response to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new version was recorded; carries its 1-based sequence number.
    Recorded(usize),
    /// The cleaned response was not a substantial document and was dropped.
    Skipped,
}

/// Collects substantial document versions and writes run artifacts.
pub struct DocumentTracker {
    extractor: DocumentExtractor,
    versions: Vec<DocumentVersion>,
    /// Run directory for artifacts; `None` disables persistence entirely.
    run_dir: Option<PathBuf>,
}

impl DocumentTracker {
    /// Tracker without on-disk artifacts.
    pub fn new(extractor: DocumentExtractor) -> Self {
        DocumentTracker {
            extractor,
            versions: Vec::new(),
            run_dir: None,
        }
    }

    /// Tracker that persists artifacts under
    /// `<artifact_root>/travel_plan_<city>_<timestamp>/` (city lower-cased
    /// and sanitised).
    ///
    /// Directory creation is attempted immediately; on failure persistence is
    /// disabled for the run and a warning logged.
    pub fn with_artifacts(
        extractor: DocumentExtractor,
        artifact_root: &Path,
        destination_city: &str,
    ) -> Self {
        let dir_name = format!(
            "travel_plan_{}_{}",
            sanitize_component(&destination_city.to_lowercase()),
            Utc::now().format("%Y%m%d_%H%M%S"),
        );
        let run_dir = artifact_root.join(dir_name);
        let run_dir = match fs::create_dir_all(&run_dir) {
            Ok(()) => Some(run_dir),
            Err(e) => {
                warn!(
                    "Could not create artifact directory {}: {}",
                    run_dir.display(),
                    e
                );
                None
            }
        };

        DocumentTracker {
            extractor,
            versions: Vec::new(),
            run_dir,
        }
    }

    /// Offer a raw stage response. Cleans it, applies the substantiality
    /// filter, and records a new version when it passes.
    ///
    /// A response is substantial when its cleaned form is longer than 100
    /// characters and starts with a markdown heading (`#`). Everything else
    /// (acknowledgements, refusals, critic feedback without a document) is
    /// skipped so the threaded document never regresses to noise.
    pub fn record(&mut self, stage: &str, raw_response: &str) -> RecordOutcome {
        let clean = self.extractor.extract(raw_response);

        if !is_substantial(&clean) {
            debug!(
                "Skipping non-substantial response from {} ({} chars)",
                stage,
                clean.len()
            );
            return RecordOutcome::Skipped;
        }

        let sequence = self.versions.len() + 1;
        let version = DocumentVersion {
            sequence,
            stage: stage.to_string(),
            content: clean,
            recorded_at: Utc::now(),
        };
        self.write_version_artifacts(&version);
        self.versions.push(version);
        RecordOutcome::Recorded(sequence)
    }

    /// All recorded versions, oldest first.
    pub fn versions(&self) -> &[DocumentVersion] {
        &self.versions
    }

    /// The most recent recorded document, if any version exists.
    pub fn final_document(&self) -> Option<&str> {
        self.versions.last().map(|v| v.content.as_str())
    }

    /// Where artifacts are being written for this run, if persistence is on.
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }

    /// Write the run summary listing every recorded version. Call once the
    /// run has finished.
    pub fn write_summary(&self, outcome_note: &str) {
        let dir = match &self.run_dir {
            Some(d) => d,
            None => return,
        };

        let mut summary = String::from("# Run Summary\n\n");
        summary.push_str(&format!("Outcome: {}\n\n", outcome_note));
        summary.push_str("| Version | Stage | Characters | Recorded at (UTC) |\n");
        summary.push_str("|---------|-------|------------|-------------------|\n");
        for v in &self.versions {
            summary.push_str(&format!(
                "| {:02} | {} | {} | {} |\n",
                v.sequence,
                v.stage,
                v.content.chars().count(),
                v.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            ));
        }

        best_effort_write(&dir.join("00_SUMMARY.md"), &summary);
    }

    fn write_version_artifacts(&self, version: &DocumentVersion) {
        let dir = match &self.run_dir {
            Some(d) => d,
            None => return,
        };

        let stem = format!(
            "{:02}_{}",
            version.sequence,
            sanitize_component(&version.stage)
        );
        best_effort_write(&dir.join(format!("{}_clean.md", stem)), &version.content);

        let previous = self
            .versions
            .last()
            .map(|v| v.content.as_str())
            .unwrap_or("");
        let diff_html = render_visual_diff(previous, &version.content);
        best_effort_write(&dir.join(format!("{}_diff.html", stem)), &diff_html);
    }
}

/// Substantiality filter: long enough to be a document and shaped like one.
fn is_substantial(clean: &str) -> bool {
    clean.len() > 100 && clean.starts_with('#')
}

/// Keep path components boring: alphanumerics and a few separators, the rest
/// becomes underscores.
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn best_effort_write(path: &Path, content: &str) {
    if let Err(e) = fs::write(path, content) {
        warn!("Could not write artifact {}: {}", path.display(), e);
    }
}
