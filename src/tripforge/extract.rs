//! Markdown extraction from raw stage responses.
//!
//! Stage responses carry protocol noise around the document itself: completion
//! markers ("ITINERARY_COMPLETE - ...") and, depending on the model's mood, a
//! code fence wrapping the whole document. [`DocumentExtractor`] strips both
//! and returns the clean markdown; it never validates markdown well-formedness.

/// Strips completion markers and code-fence wrappers from raw stage output.
///
/// # Examples
///
/// ```
/// use tripforge::extract::DocumentExtractor;
///
/// let extractor = DocumentExtractor::new(vec!["STAGE_ONE_COMPLETE".to_string()]);
/// let raw = "```markdown\n# Title\nbody\n```\nSTAGE_ONE_COMPLETE";
/// assert_eq!(extractor.extract(raw), "# Title\nbody");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    markers: Vec<String>,
}

impl DocumentExtractor {
    /// Create an extractor that strips the given marker strings.
    pub fn new(markers: Vec<String>) -> Self {
        DocumentExtractor { markers }
    }

    /// Remove every marker occurrence, then strip a wrapping code fence, then
    /// trim.
    ///
    /// Marker removal is a global replace, not a suffix trim: a marker
    /// substring appearing mid-document is deleted wherever it occurs. That
    /// matches the stage protocol (markers are appended at the end) but will
    /// eat legitimate content that happens to contain a marker string — a
    /// known sharp edge.
    ///
    /// Idempotent once all markers are stripped and the fence removed:
    /// `extract(extract(x)) == extract(x)`.
    pub fn extract(&self, raw: &str) -> String {
        let mut content = raw.trim().to_string();

        for marker in &self.markers {
            if content.contains(marker.as_str()) {
                content = content.replace(marker.as_str(), "").trim().to_string();
            }
        }

        strip_code_fence(&content)
    }
}

/// Remove a wrapping ```` ```markdown ```` or bare ```` ``` ```` fence.
///
/// Only strips when the fence opens the document; a fence appearing later is
/// document content and stays.
fn strip_code_fence(content: &str) -> String {
    let stripped = if let Some(rest) = content.strip_prefix("```markdown") {
        close_fence(rest.trim())
    } else if let Some(rest) = content.strip_prefix("```") {
        close_fence(rest.trim())
    } else {
        content
    };
    stripped.trim().to_string()
}

fn close_fence(content: &str) -> &str {
    content.strip_suffix("```").map(str::trim).unwrap_or(content)
}
