use chrono::NaiveDate;
use tracing::{info, warn};

/// Summary of one pipeline run. Recoverable per-feature problems end up
/// here instead of aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub input: usize,
    /// Records the source marks as outside any district.
    pub skipped: usize,
    /// Features dropped because their identity could not be resolved.
    pub dropped: Vec<String>,
    /// Districts outside the requested congress.
    pub filtered: usize,
    /// Jurisdictions with no boundary at the reference date.
    pub omitted: Vec<String>,
    pub as_of: Option<NaiveDate>,
    pub boundaries: usize,
    pub existing_labels: usize,
    pub labels: usize,
    /// Boundaries that could not be given a label.
    pub degenerate: Vec<String>,
    pub nodes: usize,
    pub edges: usize,
    pub colors_used: usize,
}

impl RunReport {
    /// Emit the end-of-run summary.
    pub fn log(&self) {
        info!(
            input = self.input,
            boundaries = self.boundaries,
            labels = self.labels,
            existing_labels = self.existing_labels,
            nodes = self.nodes,
            edges = self.edges,
            colors = self.colors_used,
            skipped = self.skipped,
            filtered = self.filtered,
            "run complete"
        );
        if let Some(as_of) = self.as_of {
            info!(%as_of, omitted = self.omitted.len(), "boundaries selected");
        }
        if !self.dropped.is_empty() {
            warn!(count = self.dropped.len(), "features dropped with unresolvable identities");
            for cause in &self.dropped {
                warn!("  {cause}");
            }
        }
        if !self.degenerate.is_empty() {
            warn!(count = self.degenerate.len(), "boundaries without a label point");
            for cause in &self.degenerate {
                warn!("  {cause}");
            }
        }
    }
}
