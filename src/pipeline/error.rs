use std::fmt;

use crate::graph::ColoringError;
use crate::identity::IdentityError;
use crate::temporal::TemporalError;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Identity,
    Temporal,
    Coloring,
}

impl Stage {
    pub fn to_str(&self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::Temporal => "temporal",
            Stage::Coloring => "coloring",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Underlying cause of an aborted run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageFault {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Temporal(#[from] TemporalError),
    #[error(transparent)]
    Coloring(#[from] ColoringError),
}

/// A run-aborting failure, tagged with its stage and the number of features it concerns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed ({affected} feature(s) affected)")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub cause: StageFault,
    pub affected: usize,
}

impl PipelineError {
    pub fn new(stage: Stage, cause: impl Into<StageFault>, affected: usize) -> Self {
        Self { stage, cause: cause.into(), affected }
    }
}
