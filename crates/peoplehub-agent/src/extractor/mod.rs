//! Action extraction from raw assistant text.
//!
//! An [`ActionExtractor`] runs an ordered list of [`ActionDetector`]s over
//! the whole text. Every detector sees the full input, so the same intent
//! can be found more than once; requests are deduplicated by
//! [`ActionRequest::dedup_key`] and the first occurrence wins. Detector order
//! therefore doubles as a priority order: the JSON `actions` document comes
//! first, natural-language heuristics last.
//!
//! Extraction is pure and infallible. Malformed candidates are dropped and
//! logged at `debug`.

mod detectors;
pub(crate) mod json_scan;

use std::collections::HashSet;
use tracing::debug;

use crate::action::{ActionRequest, is_record_id};

pub use detectors::{
    ActionsDocumentDetector, LeaveDecisionDetector, NavigationPhraseDetector,
    StructuredBlockDetector, TaskStatusDetector,
};

/// One strategy for finding action declarations in text.
pub trait ActionDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns every declaration found in `text`, in text order.
    fn detect(&self, text: &str) -> Vec<ActionRequest>;
}

/// Ordered detector chain with deduplication.
pub struct ActionExtractor {
    detectors: Vec<Box<dyn ActionDetector>>,
}

impl ActionExtractor {
    /// The built-in chain.
    pub fn new() -> Self {
        Self::empty()
            .with_detector(Box::new(ActionsDocumentDetector))
            .with_detector(Box::new(StructuredBlockDetector))
            .with_detector(Box::new(LeaveDecisionDetector))
            .with_detector(Box::new(NavigationPhraseDetector::default()))
            .with_detector(Box::new(TaskStatusDetector))
    }

    /// A chain with no detectors.
    pub fn empty() -> Self {
        Self { detectors: Vec::new() }
    }

    /// Appends a detector with the lowest priority so far.
    #[must_use]
    pub fn with_detector(mut self, detector: Box<dyn ActionDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Names of the configured detectors, in order.
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Extracts the ordered, deduplicated action list from `text`.
    pub fn extract(&self, text: &str) -> Vec<ActionRequest> {
        let mut seen = HashSet::new();
        let mut requests = Vec::new();

        for detector in &self.detectors {
            for request in detector.detect(text) {
                if !is_well_formed(&request) {
                    debug!(detector = detector.name(), kind = %request.kind, "Dropping malformed action");
                    continue;
                }
                if seen.insert(request.dedup_key()) {
                    requests.push(request);
                } else {
                    debug!(detector = detector.name(), kind = %request.kind, "Dropping duplicate action");
                }
            }
        }

        debug!(count = requests.len(), "Extracted actions");
        requests
    }
}

impl Default for ActionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Record-targeting actions need a plausible identifier; navigation needs a
/// route. Everything else is left to the executor.
fn is_well_formed(request: &ActionRequest) -> bool {
    match request.kind.target_param() {
        Some(key) if request.kind.targets_record() => request.param(key).is_some_and(is_record_id),
        Some("route") => request.param("route").is_some(),
        _ => true,
    }
}
