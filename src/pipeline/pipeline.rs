use std::path::Path;

use ahash::AHashSet;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::feature::{Feature, Identity};
use crate::geom::{generate_labels, round_shape};
use crate::graph::{build_graph, color_graph, ColoringError};
use crate::identity::{resolve_all, CodeTable, IdentityScheme};
use crate::io;
use crate::temporal::{select_for_date, TemporalError};

use super::{PipelineConfig, PipelineError, RunReport, Stage};

/// Which kind of dataset a run prepares, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// A single snapshot of congressional districts. The identity scheme is
    /// detected when not given; `congress` keeps only districts in use then.
    Districts { scheme: Option<IdentityScheme>, congress: Option<u16> },
    /// Historical state boundary versions, reduced to those in force on `as_of`.
    StateVersions { as_of: NaiveDate },
    /// A collection this pipeline already wrote; only missing labels are added.
    Labels,
}

/// Features ready to write, with the run summary.
#[derive(Debug)]
pub struct Output {
    pub features: Vec<Feature>,
    pub report: RunReport,
}

/// Runs the stages in order over one dataset. Holds only immutable settings,
/// so one instance can serve any number of runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    codes: CodeTable,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(codes: CodeTable, config: PipelineConfig) -> Self {
        Self { codes, config }
    }

    #[inline] pub fn config(&self) -> &PipelineConfig { &self.config }

    #[inline] pub fn codes(&self) -> &CodeTable { &self.codes }

    /// Run every stage over `input`.
    ///
    /// Identity failures drop the feature and are listed in the report.
    /// Temporal and coloring failures abort the run.
    pub fn run(&self, input: Vec<Feature>, dataset: &Dataset) -> Result<Output, PipelineError> {
        let mut report = RunReport { input: input.len(), ..Default::default() };
        if input.is_empty() {
            info!("empty input, nothing to prepare");
            return Ok(Output { features: Vec::new(), report });
        }

        let scheme = match dataset {
            Dataset::Districts { scheme: Some(scheme), .. } => *scheme,
            Dataset::Districts { scheme: None, .. } => IdentityScheme::detect(&input)
                .map_err(|e| PipelineError::new(Stage::Identity, e, input.len()))?,
            Dataset::StateVersions { .. } => IdentityScheme::StateVersions,
            Dataset::Labels => IdentityScheme::Prepared,
        };
        info!(%scheme, features = input.len(), "resolving identities");

        let outcome = resolve_all(input, scheme, &self.codes);
        report.skipped = outcome.skipped;
        report.dropped = outcome.failures.iter().map(ToString::to_string).collect();
        if outcome.features.is_empty() {
            if let Some(first) = outcome.failures.into_iter().next() {
                return Err(PipelineError::new(Stage::Identity, first, report.dropped.len()));
            }
        }
        let mut features = outcome.features;

        if let Dataset::Districts { congress: Some(congress), .. } = dataset {
            let before = features.len();
            features.retain(|f| f.metadata.congress.is_none_or(|span| span.contains(*congress)));
            report.filtered = before - features.len();
            info!(congress, kept = features.len(), filtered = report.filtered, "filtered by congress");
        }

        if let Dataset::StateVersions { as_of } = dataset {
            let selection = select_for_date(features, *as_of, self.config.overlap_policy).map_err(|e| {
                let affected = match &e {
                    TemporalError::AmbiguousVersion { versions, .. } => versions.len(),
                    TemporalError::NoActiveVersion { .. } => 1,
                };
                PipelineError::new(Stage::Temporal, e, affected)
            })?;
            report.as_of = selection.as_of;
            report.omitted = selection.omitted.iter().map(Identity::to_string).collect();
            features = selection.features;
            info!(as_of = ?report.as_of, selected = features.len(), omitted = report.omitted.len(), "selected boundary versions");
        }

        let (mut boundaries, mut existing): (Vec<_>, Vec<_>) = features.into_iter().partition(Feature::is_boundary);
        report.boundaries = boundaries.len();
        report.existing_labels = existing.len();

        if !matches!(dataset, Dataset::Labels) {
            let graph = build_graph(&boundaries, self.config.adjacency());
            report.nodes = graph.node_count();
            report.edges = graph.edge_count();
            info!(nodes = report.nodes, edges = report.edges, "built adjacency graph");

            let coloring = color_graph(&graph, self.config.palette_size).map_err(|e| {
                let affected = match &e {
                    ColoringError::Infeasible { degree, .. } => degree + 1,
                    ColoringError::EmptyPalette => graph.node_count(),
                };
                PipelineError::new(Stage::Coloring, e, affected)
            })?;
            report.colors_used = coloring.colors_used();
            debug!(colors = report.colors_used, palette = self.config.palette_size, "colored graph");

            for feature in boundaries.iter_mut().chain(existing.iter_mut()) {
                feature.metadata.color_class = feature.identity().and_then(|id| coloring.class_of(&graph, id));
            }
        }

        let labelled = existing.iter().filter_map(Feature::identity).cloned().collect::<AHashSet<_>>();
        let batch = generate_labels(&boundaries, &labelled, self.config.label_placement, self.config.parallel);
        report.labels = batch.labels.len();
        report.degenerate = batch.degenerate.iter().map(ToString::to_string).collect();
        info!(generated = report.labels, existing = report.existing_labels, "placed labels");

        let mut features = boundaries;
        features.extend(existing);
        features.extend(batch.labels);

        if let Some(decimals) = self.config.output_decimals {
            for feature in &mut features {
                feature.geometry = feature.geometry.as_ref().map(|shape| round_shape(shape, decimals));
            }
        }

        Ok(Output { features, report })
    }

    /// Read `input`, run, and write `output`. Nothing is written unless the
    /// whole run succeeds.
    pub fn run_file(&self, input: &Path, output: &Path, dataset: &Dataset) -> anyhow::Result<RunReport> {
        let features = io::read_features(input)?;
        info!(path = %input.display(), features = features.len(), "read input");

        let Output { features, report } = self.run(features, dataset)?;
        io::write_features(output, &features, self.config.keep_source_properties)?;
        info!(path = %output.display(), features = features.len(), "wrote output");

        report.log();
        Ok(report)
    }
}
