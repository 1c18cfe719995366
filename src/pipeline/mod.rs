mod config;
mod error;
mod pipeline;
mod report;

pub use config::PipelineConfig;
pub use error::{PipelineError, Stage, StageFault};
pub use pipeline::{Dataset, Output, Pipeline};
pub use report::RunReport;
