use anyhow::Result;
use districtmap::{CodeTable, Dataset, Pipeline};

use super::load_config;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::LabelsArgs) -> Result<()> {
    let config = load_config(&args.common)?;

    tracing::info!(input = %args.input.display(), "adding label points");
    Pipeline::new(CodeTable::builtin(), config).run_file(&args.input, &args.output, &Dataset::Labels)?;

    Ok(())
}
