pub mod congress_start_year;
pub mod districts;
pub mod labels;
pub mod states;

use anyhow::Result;
use districtmap::{CodeTable, PipelineConfig};

use crate::cli::Common;

/// Load pipeline settings from `--config`, then apply flag overrides.
pub(crate) fn load_config(common: &Common) -> Result<PipelineConfig> {
    let mut config = match &common.config {
        Some(path) => PipelineConfig::read_json(path)?,
        None => PipelineConfig::default(),
    };
    if common.keep_source {
        config.keep_source_properties = true;
    }
    Ok(config)
}

pub(crate) fn load_codes(path: Option<&std::path::Path>) -> Result<CodeTable> {
    match path {
        Some(path) => CodeTable::read_json(path),
        None => Ok(CodeTable::builtin()),
    }
}
