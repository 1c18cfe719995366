use anyhow::Result;
use districtmap::{Dataset, Pipeline};

use super::{load_codes, load_config};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::StatesArgs) -> Result<()> {
    let as_of = args.year;
    let codes = load_codes(args.codes.as_deref())?;
    let config = load_config(&args.common)?;

    tracing::info!(input = %args.input.display(), %as_of, "selecting state boundaries");
    Pipeline::new(codes, config).run_file(&args.input, &args.output, &Dataset::StateVersions { as_of })?;

    Ok(())
}
